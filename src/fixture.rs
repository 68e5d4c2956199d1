pub mod error;
pub mod provider;

use crate::fixture::error::FixtureError;
use crate::fixture::provider::FakeProvider;
use crate::item::{Book, ObjectManager, Review};
use tracing::{debug, info, warn};

pub const DEFAULT_BOOK_COUNT: usize = 100;
pub const DEFAULT_REVIEW_COUNT: usize = 500;

/// 픽스처 실행 결과
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub books: usize,
    pub reviews: usize,
}

impl std::ops::Add for LoadSummary {
    type Output = LoadSummary;

    fn add(self, rhs: Self) -> Self::Output {
        LoadSummary {
            books: self.books + rhs.books,
            reviews: self.reviews + rhs.reviews,
        }
    }
}

/// 저장소에 샘플 데이터를 채우는 픽스처 트레이트
///
/// `load`는 저장소 에러를 처리하지 않고 그대로 반환해야 한다.
pub trait Fixture {
    fn name(&self) -> &str;

    fn load(&mut self, manager: &mut dyn ObjectManager) -> Result<LoadSummary, FixtureError>;
}

/// 도서와 리뷰 샘플 데이터를 만드는 픽스처
///
/// 도서를 모두 만들어 한번에 flush 한 뒤, flush로 아이디가 부여된 도서 목록에서
/// 임의의 인덱스를 뽑아 리뷰가 참조할 도서를 정한다. 리뷰도 모두 만든 뒤 한번에 flush 한다.
///
/// # Example
/// ```
/// use bookstore_fixture::fixture::{BookstoreFixture, Fixture};
/// use bookstore_fixture::fixture::provider::FakerProvider;
/// use bookstore_fixture::item::repo::MemoryObjectManager;
///
/// let mut manager = MemoryObjectManager::new();
/// let mut fixture = BookstoreFixture::new(FakerProvider::seeded(2025));
///
/// let summary = fixture.load(&mut manager).unwrap();
///
/// assert_eq!(summary.books, 100);
/// assert_eq!(summary.reviews, 500);
/// assert_eq!(manager.books().len(), 100);
/// assert_eq!(manager.reviews().len(), 500);
/// ```
pub struct BookstoreFixture<P>
where
    P: FakeProvider
{
    provider: P,
    book_count: usize,
    review_count: usize,
}

impl<P: FakeProvider> BookstoreFixture<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            book_count: DEFAULT_BOOK_COUNT,
            review_count: DEFAULT_REVIEW_COUNT,
        }
    }

    pub fn book_count(mut self, count: usize) -> Self {
        self.book_count = count;
        self
    }

    pub fn review_count(mut self, count: usize) -> Self {
        self.review_count = count;
        self
    }

    fn generate_book(&mut self) -> Result<Book, FixtureError> {
        let book = Book::builder()
            .title(self.provider.sentence())
            .author(self.provider.name())
            .description(self.provider.text())
            .isbn(self.provider.isbn13())
            .publication_date(self.provider.date_time())
            .build()?;
        Ok(book)
    }

    fn generate_review(&mut self, books: &[Book]) -> Result<Review, FixtureError> {
        let index = self.provider.number_between(0, books.len() - 1);
        let review = Review::builder()
            .body(self.provider.text())
            .rating(self.provider.number_between(1, 5) as u8)
            .book(&books[index])
            .author(self.provider.name())
            .publication_date(self.provider.date_time())
            .build()?;
        Ok(review)
    }

    fn load_books(&mut self, manager: &mut dyn ObjectManager) -> Result<Vec<Book>, FixtureError> {
        for _ in 0..self.book_count {
            let book = self.generate_book()?;
            manager.persist(book.into());
        }

        let committed = manager.flush()?;
        if committed.books.len() != self.book_count {
            return Err(FixtureError::IncompleteFlush {
                expected: self.book_count,
                actual: committed.books.len(),
            });
        }
        debug!(books = committed.books.len(), "도서 flush 완료");

        Ok(committed.books)
    }

    /// 리뷰를 모두 만든 뒤에 저장 대기 시킨다. 하나라도 만들지 못하면 아무 리뷰도 대기 시키지 않는다.
    fn load_reviews(&mut self, manager: &mut dyn ObjectManager, books: &[Book]) -> Result<usize, FixtureError> {
        let reviews = (0..self.review_count)
            .map(|_| self.generate_review(books))
            .collect::<Result<Vec<_>, _>>()?;
        for review in reviews {
            manager.persist(review.into());
        }

        let committed = manager.flush()?;
        if committed.reviews.len() != self.review_count {
            return Err(FixtureError::IncompleteFlush {
                expected: self.review_count,
                actual: committed.reviews.len(),
            });
        }
        debug!(reviews = committed.reviews.len(), "리뷰 flush 완료");

        Ok(committed.reviews.len())
    }
}

impl<P: FakeProvider> Fixture for BookstoreFixture<P> {
    fn name(&self) -> &str {
        "bookstore"
    }

    fn load(&mut self, manager: &mut dyn ObjectManager) -> Result<LoadSummary, FixtureError> {
        if self.book_count == 0 && self.review_count > 0 {
            return Err(FixtureError::EmptyBookPool { reviews: self.review_count });
        }

        let books = self.load_books(manager)?;
        let reviews = if self.review_count > 0 {
            self.load_reviews(manager, &books)?
        } else {
            0
        };

        Ok(LoadSummary { books: books.len(), reviews })
    }
}

/// 픽스처 실행기
///
/// `purge`가 설정되면 픽스처를 실행하기 전 저장소의 모든 데이터를 삭제한다.
/// 설정하지 않으면 기존 데이터 뒤에 이어서 저장하므로 같은 픽스처를 다시 실행하면 데이터가 중복된다.
///
/// 삭제와 픽스처의 각 flush는 서로 다른 작업 단위로 실행된다. 삭제 이후 픽스처가 실패하면 기존 데이터는 복구 되지 않으며,
/// 도서 flush 이후 리뷰 단계에서 실패한 경우 저장소에는 새로 만든 도서만 남는다.
pub struct Executor<'a> {
    manager: &'a mut dyn ObjectManager,
    purge: bool,
}

impl<'a> Executor<'a> {
    pub fn new(manager: &'a mut dyn ObjectManager) -> Self {
        Self { manager, purge: false }
    }

    pub fn purge(mut self, purge: bool) -> Self {
        self.purge = purge;
        self
    }

    pub fn execute(&mut self, fixtures: &mut [Box<dyn Fixture>]) -> Result<LoadSummary, FixtureError> {
        if self.purge {
            let (books, reviews) = self.manager.purge()?;
            info!(books, reviews, "기존 데이터를 삭제 하였습니다.");
        }

        let mut total = LoadSummary::default();
        for fixture in fixtures.iter_mut() {
            info!(fixture = fixture.name(), "픽스처 로딩 시작");
            let summary = fixture.load(self.manager)
                .inspect_err(|e| warn!(fixture = fixture.name(), "픽스처 로딩 실패 => {}", e))?;
            info!(fixture = fixture.name(), books = summary.books, reviews = summary.reviews, "픽스처 로딩 완료");
            total = total + summary;
        }

        Ok(total)
    }
}
