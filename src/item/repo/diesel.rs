use crate::item::{Book, BookBuilder, Review, ReviewBuilder};
use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use diesel::result::DatabaseErrorKind;
use r2d2::Pool;

mod schema;

/// 한 번의 INSERT 문으로 저장할 최대 row 수
const WRITE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    ConnectError(String),

    SqlExecuteError(String),

    ConstraintViolation(String),
}

impl From<diesel::result::Error> for Error {
    fn from(value: diesel::result::Error) -> Self {
        match &value {
            diesel::result::Error::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::CheckViolation => Error::ConstraintViolation(info.message().to_owned()),
                _ => Error::SqlExecuteError(value.to_string()),
            },
            _ => Error::SqlExecuteError(value.to_string()),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = schema::book)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookEntity {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub publication_date: chrono::NaiveDateTime,
}

impl BookEntity {
    pub fn to_domain_builder(self) -> BookBuilder {
        Book::builder()
            .id(self.id as u64)
            .isbn(self.isbn)
            .title(self.title)
            .author(self.author)
            .description(self.description)
            .publication_date(self.publication_date)
    }
}

#[derive(Insertable)]
#[diesel(table_name = schema::book)]
pub struct NewBook<'a> {
    pub isbn: &'a str,
    pub title: &'a str,
    pub author: &'a str,
    pub description: &'a str,
    pub publication_date: chrono::NaiveDateTime,
}

impl <'a, 'b> NewBook<'a> where 'b: 'a {
    pub fn from(book: &'b Book) -> Self {
        Self {
            isbn: book.isbn(),
            title: book.title(),
            author: book.author(),
            description: book.description(),
            publication_date: book.publication_date(),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = schema::review)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewEntity {
    pub id: i64,
    pub book_id: i64,
    pub author: String,
    pub body: String,
    pub rating: i16,
    pub publication_date: chrono::NaiveDateTime,
}

impl ReviewEntity {
    pub fn to_domain_builder(self) -> ReviewBuilder {
        Review::builder()
            .id(self.id as u64)
            .book_id(self.book_id as u64)
            .author(self.author)
            .body(self.body)
            .rating(self.rating.clamp(0, u8::MAX as i16) as u8)
            .publication_date(self.publication_date)
    }
}

#[derive(Insertable)]
#[diesel(table_name = schema::review)]
pub struct NewReview<'a> {
    pub book_id: i64,
    pub author: &'a str,
    pub body: &'a str,
    pub rating: i16,
    pub publication_date: chrono::NaiveDateTime,
}

impl <'a, 'b> NewReview<'a> where 'b: 'a {
    pub fn from(review: &'b Review) -> Self {
        Self {
            book_id: review.book_id() as i64,
            author: review.author(),
            body: review.body(),
            rating: review.rating() as i16,
            publication_date: review.publication_date(),
        }
    }
}

pub struct BookstorePgStore {
    pool: Pool<ConnectionManager<PgConnection>>
}

impl BookstorePgStore {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }
}

impl BookstorePgStore {

    /// 도서와 리뷰를 하나의 트랜잭션으로 저장한다. 도서를 먼저 저장하고 리뷰를 저장한다.
    /// 반환되는 엔티티는 전달 받은 순서를 유지한다.
    pub fn save_all(&self, books: &[Book], reviews: &[Review]) -> Result<(Vec<BookEntity>, Vec<ReviewEntity>), Error> {
        use schema::{book, review};

        let mut connection = self.pool.get()
            .map_err(|e| Error::ConnectError(e.to_string()))?;

        let saved = connection.transaction::<_, diesel::result::Error, _>(|conn| {
            let mut saved_books = Vec::with_capacity(books.len());
            for chunk in books.chunks(WRITE_SIZE) {
                let entities = chunk.iter()
                    .map(|b| NewBook::from(b))
                    .collect::<Vec<_>>();

                let results = diesel::insert_into(book::table)
                    .values(entities)
                    .returning(BookEntity::as_select())
                    .get_results(conn)?;
                saved_books.extend(results);
            }

            let mut saved_reviews = Vec::with_capacity(reviews.len());
            for chunk in reviews.chunks(WRITE_SIZE) {
                let entities = chunk.iter()
                    .map(|r| NewReview::from(r))
                    .collect::<Vec<_>>();

                let results = diesel::insert_into(review::table)
                    .values(entities)
                    .returning(ReviewEntity::as_select())
                    .get_results(conn)?;
                saved_reviews.extend(results);
            }

            Ok((saved_books, saved_reviews))
        })?;

        Ok(saved)
    }

    /// 모든 리뷰와 도서를 삭제한다. 리뷰가 도서를 참조하므로 리뷰를 먼저 삭제한다.
    pub fn delete_all(&self) -> Result<(usize, usize), Error> {
        use schema::{book, review};

        let mut connection = self.pool.get()
            .map_err(|e| Error::ConnectError(e.to_string()))?;

        let deleted = connection.transaction::<_, diesel::result::Error, _>(|conn| {
            let deleted_reviews = diesel::delete(review::table).execute(conn)?;
            let deleted_books = diesel::delete(book::table).execute(conn)?;
            Ok((deleted_books, deleted_reviews))
        })?;

        Ok(deleted)
    }

    pub fn count_all(&self) -> Result<(i64, i64), Error> {
        use schema::{book, review};

        let mut connection = self.pool.get()
            .map_err(|e| Error::ConnectError(e.to_string()))?;

        let books = book::table.count().get_result::<i64>(&mut connection)?;
        let reviews = review::table.count().get_result::<i64>(&mut connection)?;

        Ok((books, reviews))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn review_entity_to_domain() {
        let entity = ReviewEntity {
            id: 11,
            book_id: 4,
            author: "Ada Lovelace".to_owned(),
            body: "Quite good.".to_owned(),
            rating: 4,
            publication_date: date(),
        };

        let review = entity.to_domain_builder().build().unwrap();
        assert_eq!(review.id(), 11);
        assert_eq!(review.book_id(), 4);
        assert_eq!(review.rating(), 4);
    }

    #[test]
    fn review_entity_with_invalid_rating_fails_to_build() {
        let entity = ReviewEntity {
            id: 11,
            book_id: 4,
            author: "Ada Lovelace".to_owned(),
            body: "Quite good.".to_owned(),
            rating: 9,
            publication_date: date(),
        };

        assert!(entity.to_domain_builder().build().is_err());
    }

    #[test]
    fn new_review_converts_id_and_rating() {
        let review = Review::builder()
            .book_id(9_000_000_001)
            .author("Grace Hopper".to_owned())
            .body("Readable.".to_owned())
            .rating(5)
            .publication_date(date())
            .build()
            .unwrap();

        let new_review = NewReview::from(&review);
        assert_eq!(new_review.book_id, 9_000_000_001i64);
        assert_eq!(new_review.rating, 5i16);
        assert_eq!(new_review.author, "Grace Hopper");
        assert_eq!(new_review.body, "Readable.");
        assert_eq!(new_review.publication_date, date());
    }

    #[test]
    fn new_book_borrows_domain_fields() {
        let book = Book::builder()
            .isbn("9780306406157".to_owned())
            .title("Lorem".to_owned())
            .author("Ipsum".to_owned())
            .description("Dolor sit amet.".to_owned())
            .publication_date(date())
            .build()
            .unwrap();

        let new_book = NewBook::from(&book);
        assert_eq!(new_book.isbn, "9780306406157");
        assert_eq!(new_book.publication_date, date());
    }
}
