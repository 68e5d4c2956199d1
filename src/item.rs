pub mod repo;

use regex::Regex;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

static ISBN13_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^97[89][0-9]{10}$").unwrap()
});

/// 평점의 최소값
pub const RATING_MIN: u8 = 1;

/// 평점의 최대값
pub const RATING_MAX: u8 = 5;

/// Item 모듈에서 사용할 에러 열거
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// 필수 데이터가 입력 되지 않음
    RequireArgumentMissing(String),

    /// ISBN-13 형식이 아니거나 체크 디지트가 맞지 않음
    InvalidIsbn(String),

    /// 평점이 1 ~ 5 범위를 벗어남
    RatingOutOfRange(u8),

    /// 아직 저장(flush) 되지 않아 아이디가 없는 도서를 참조함
    UncommittedBook,
}

impl Display for ItemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ItemError::RequireArgumentMissing(name) => write!(f, "Require argument missing: {}", name),
            ItemError::InvalidIsbn(isbn) => write!(f, "Invalid ISBN-13: {}", isbn),
            ItemError::RatingOutOfRange(rating) => {
                write!(f, "Rating must be between {} and {}: {}", RATING_MIN, RATING_MAX, rating)
            }
            ItemError::UncommittedBook => write!(f, "Review must reference a committed book"),
        }
    }
}

impl std::error::Error for ItemError {}

/// ISBN-13의 앞 12자리로 체크 디지트를 계산한다.
///
/// 홀수 번째 자리는 1, 짝수 번째 자리는 3의 가중치를 곱해 더한 뒤 10의 보수를 구한다.
///
/// # Example
/// ```
/// use bookstore_fixture::item::isbn13_check_digit;
///
/// assert_eq!(isbn13_check_digit(&[9, 7, 8, 0, 3, 0, 6, 4, 0, 6, 1, 5]), 7);
/// ```
pub fn isbn13_check_digit(digits: &[u8; 12]) -> u8 {
    let sum: u32 = digits.iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d as u32 } else { *d as u32 * 3 })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}

/// 전달 받은 문자열이 `978` 또는 `979`로 시작하는 13자리 숫자이며 체크 디지트가 올바른지 확인한다.
///
/// # Example
/// ```
/// use bookstore_fixture::item::is_valid_isbn13;
///
/// assert!(is_valid_isbn13("9780306406157"));
/// assert!(!is_valid_isbn13("9780306406158"));
/// assert!(!is_valid_isbn13("978-0306406157"));
/// ```
pub fn is_valid_isbn13(isbn: &str) -> bool {
    if !ISBN13_PATTERN.is_match(isbn) {
        return false;
    }

    let digits: Vec<u8> = isbn.bytes().map(|b| b - b'0').collect();
    let mut head = [0u8; 12];
    head.copy_from_slice(&digits[..12]);

    isbn13_check_digit(&head) == digits[12]
}

/// 도서
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Book {
    id: u64,
    isbn: String,
    title: String,
    author: String,
    description: String,
    publication_date: chrono::NaiveDateTime,
}

impl Book {
    pub fn builder() -> BookBuilder {
        BookBuilder::new()
    }

    /// 저장소에서 부여한 아이디로 아직 저장 되지 않은 도서는 0을 반환한다.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn publication_date(&self) -> chrono::NaiveDateTime {
        self.publication_date
    }

    pub fn is_committed(&self) -> bool {
        self.id != 0
    }

    /// 저장소가 부여한 아이디를 가진 새 도서를 반환한다.
    pub fn with_id(&self, id: u64) -> Book {
        Book { id, ..self.clone() }
    }
}

impl AsRef<Book> for Book {
    fn as_ref(&self) -> &Book {
        self
    }
}

/// Book 빌더
#[derive(Debug, Clone, Default)]
pub struct BookBuilder {
    id: Option<u64>,
    isbn: Option<String>,
    title: Option<String>,
    author: Option<String>,
    description: Option<String>,
    publication_date: Option<chrono::NaiveDateTime>,
}

impl BookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn isbn(mut self, isbn: String) -> Self {
        self.isbn = Some(isbn);
        self
    }

    pub fn title(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }

    pub fn author(mut self, author: String) -> Self {
        self.author = Some(author);
        self
    }

    pub fn description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn publication_date(mut self, date: chrono::NaiveDateTime) -> Self {
        self.publication_date = Some(date);
        self
    }

    /// # Errors
    /// - 필수 값(isbn, title, author, description, publication_date)이 없을 경우
    /// - ISBN이 [`is_valid_isbn13`] 검사를 통과하지 못할 경우
    pub fn build(self) -> Result<Book, ItemError> {
        let isbn = self.isbn.ok_or(ItemError::RequireArgumentMissing("isbn".to_owned()))?;
        let title = self.title.ok_or(ItemError::RequireArgumentMissing("title".to_owned()))?;
        let author = self.author.ok_or(ItemError::RequireArgumentMissing("author".to_owned()))?;
        let description = self.description
            .ok_or(ItemError::RequireArgumentMissing("description".to_owned()))?;
        let publication_date = self.publication_date
            .ok_or(ItemError::RequireArgumentMissing("publication_date".to_owned()))?;

        if !is_valid_isbn13(&isbn) {
            return Err(ItemError::InvalidIsbn(isbn));
        }

        Ok(Book {
            id: self.id.unwrap_or(0),
            isbn,
            title,
            author,
            description,
            publication_date,
        })
    }
}

/// 도서 리뷰
///
/// 리뷰는 반드시 저장소에 저장된 도서 하나를 참조하며, 한 도서는 여러 리뷰를 가질 수 있다.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Review {
    id: u64,
    book_id: u64,
    author: String,
    body: String,
    rating: u8,
    publication_date: chrono::NaiveDateTime,
}

impl Review {
    pub fn builder() -> ReviewBuilder {
        ReviewBuilder::new()
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn book_id(&self) -> u64 {
        self.book_id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn publication_date(&self) -> chrono::NaiveDateTime {
        self.publication_date
    }

    pub fn with_id(&self, id: u64) -> Review {
        Review { id, ..self.clone() }
    }
}

impl AsRef<Review> for Review {
    fn as_ref(&self) -> &Review {
        self
    }
}

/// Review 빌더
///
/// 참조 도서는 [`ReviewBuilder::book`]으로 저장된 도서를 넘겨 설정하거나,
/// 저장소에서 읽어온 값을 복원할 때는 [`ReviewBuilder::book_id`]로 설정한다.
///
/// # Example
/// ```
/// use bookstore_fixture::item::{Book, ItemError, Review};
///
/// let date = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let book = Book::builder()
///     .isbn("9780306406157".to_owned())
///     .title("제목".to_owned())
///     .author("저자".to_owned())
///     .description("설명".to_owned())
///     .publication_date(date)
///     .build()
///     .unwrap();
///
/// let review = Review::builder()
///     .book(&book)
///     .author("리뷰어".to_owned())
///     .body("본문".to_owned())
///     .rating(5)
///     .publication_date(date)
///     .build();
///
/// assert_eq!(review, Err(ItemError::UncommittedBook));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReviewBuilder {
    id: Option<u64>,
    book_id: Option<u64>,
    author: Option<String>,
    body: Option<String>,
    rating: Option<u8>,
    publication_date: Option<chrono::NaiveDateTime>,
}

impl ReviewBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn book(mut self, book: &Book) -> Self {
        self.book_id = Some(book.id());
        self
    }

    pub fn book_id(mut self, book_id: u64) -> Self {
        self.book_id = Some(book_id);
        self
    }

    pub fn author(mut self, author: String) -> Self {
        self.author = Some(author);
        self
    }

    pub fn body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn publication_date(mut self, date: chrono::NaiveDateTime) -> Self {
        self.publication_date = Some(date);
        self
    }

    pub fn build(self) -> Result<Review, ItemError> {
        let book_id = self.book_id.ok_or(ItemError::RequireArgumentMissing("book".to_owned()))?;
        let author = self.author.ok_or(ItemError::RequireArgumentMissing("author".to_owned()))?;
        let body = self.body.ok_or(ItemError::RequireArgumentMissing("body".to_owned()))?;
        let rating = self.rating.ok_or(ItemError::RequireArgumentMissing("rating".to_owned()))?;
        let publication_date = self.publication_date
            .ok_or(ItemError::RequireArgumentMissing("publication_date".to_owned()))?;

        if book_id == 0 {
            return Err(ItemError::UncommittedBook);
        }
        if !(RATING_MIN..=RATING_MAX).contains(&rating) {
            return Err(ItemError::RatingOutOfRange(rating));
        }

        Ok(Review {
            id: self.id.unwrap_or(0),
            book_id,
            author,
            body,
            rating,
            publication_date,
        })
    }
}

/// 저장소에 저장 대기 시킬 수 있는 엔티티
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Entity {
    Book(Book),
    Review(Review),
}

impl From<Book> for Entity {
    fn from(value: Book) -> Self {
        Entity::Book(value)
    }
}

impl From<Review> for Entity {
    fn from(value: Review) -> Self {
        Entity::Review(value)
    }
}

/// [`ObjectManager::flush`]로 저장이 완료된 엔티티 목록
///
/// 각 목록은 저장 대기 시킨 순서를 유지하며 모든 엔티티는 저장소가 부여한 아이디를 가진다.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Committed {
    pub books: Vec<Book>,
    pub reviews: Vec<Review>,
}

impl Committed {
    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.reviews.is_empty()
    }
}

/// 저장소 에러
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// 저장소 연결 실패
    ConnectError(String),

    /// 쿼리 실행 실패
    SqlExecuteError(String),

    /// 참조 무결성 등 제약 조건 위반
    ConstraintViolation(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::ConnectError(message) => write!(f, "Connect failed, {}", message),
            PersistError::SqlExecuteError(message) => write!(f, "SQL execute failed, {}", message),
            PersistError::ConstraintViolation(message) => write!(f, "Constraint violation, {}", message),
        }
    }
}

impl std::error::Error for PersistError {}

/// 엔티티 저장소
///
/// [`ObjectManager::persist`]로 엔티티를 저장 대기 시키고 [`ObjectManager::flush`]로 대기 중인 엔티티를 한번에 저장한다.
/// 엔티티의 아이디는 flush 시점에 부여 된다.
pub trait ObjectManager {

    /// 엔티티를 저장 대기 목록에 추가한다. 실제 저장은 [`ObjectManager::flush`]에서 이루어진다.
    fn persist(&mut self, entity: Entity);

    /// 저장 대기 중인 엔티티들을 하나의 작업 단위로 저장하고, 아이디가 부여된 엔티티들을 반환한다.
    /// 실패 시 해당 작업 단위의 어떤 엔티티도 저장 되지 않으며 대기 목록은 비워진다.
    fn flush(&mut self) -> Result<Committed, PersistError>;

    /// 저장소의 모든 리뷰와 도서를 삭제하고 삭제된 (도서, 리뷰) 개수를 반환한다.
    fn purge(&mut self) -> Result<(usize, usize), PersistError>;
}
