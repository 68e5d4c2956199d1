use crate::item::repo::diesel::BookstorePgStore;
use crate::item::{Book, Committed, Entity, ObjectManager, PersistError, Review};
use ::diesel::r2d2::ConnectionManager;
use ::diesel::PgConnection;
use r2d2::Pool;
use tracing::{debug, error};

mod diesel;
mod memory;

pub use memory::MemoryObjectManager;

/// PostgreSQL 저장소
///
/// 저장 대기 중인 엔티티는 flush 때 하나의 트랜잭션으로 저장 되며, 트랜잭션이 실패하면 어떤 엔티티도 저장 되지 않는다.
pub struct PgObjectManager {
    store: BookstorePgStore,
    staged: Vec<Entity>,
}

impl PgObjectManager {
    pub fn new(db_pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self {
            store: BookstorePgStore::new(db_pool),
            staged: Vec::new(),
        }
    }

    /// 저장소에 있는 (도서, 리뷰) 개수를 반환한다.
    pub fn count_all(&self) -> Result<(u64, u64), PersistError> {
        let (books, reviews) = self.store.count_all()
            .map_err(|e| logging_with_persist_error(e))?;
        Ok((books as u64, reviews as u64))
    }
}

impl ObjectManager for PgObjectManager {
    fn persist(&mut self, entity: Entity) {
        self.staged.push(entity);
    }

    fn flush(&mut self) -> Result<Committed, PersistError> {
        let staged = std::mem::take(&mut self.staged);
        if staged.is_empty() {
            return Ok(Committed::default());
        }

        let (mut books, mut reviews): (Vec<Book>, Vec<Review>) = (Vec::new(), Vec::new());
        for entity in staged {
            match entity {
                Entity::Book(book) => books.push(book),
                Entity::Review(review) => reviews.push(review),
            }
        }

        let (book_entities, review_entities) = self.store.save_all(&books, &reviews)
            .map_err(|e| logging_with_persist_error(e))?;
        debug!(books = book_entities.len(), reviews = review_entities.len(), "트랜잭션 커밋 완료");

        let books = book_entities.into_iter()
            .map(|entity| entity.to_domain_builder().build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PersistError::SqlExecuteError(format!("저장된 도서를 읽을 수 없습니다. {}", e)))?;
        let reviews = review_entities.into_iter()
            .map(|entity| entity.to_domain_builder().build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PersistError::SqlExecuteError(format!("저장된 리뷰를 읽을 수 없습니다. {}", e)))?;

        Ok(Committed { books, reviews })
    }

    fn purge(&mut self) -> Result<(usize, usize), PersistError> {
        self.store.delete_all()
            .map_err(|e| logging_with_persist_error(e))
    }
}

fn logging_with_persist_error(e: diesel::Error) -> PersistError {
    error!("{:?}", e);
    match e {
        diesel::Error::ConnectError(message) => PersistError::ConnectError(message),
        diesel::Error::SqlExecuteError(message) => PersistError::SqlExecuteError(message),
        diesel::Error::ConstraintViolation(message) => PersistError::ConstraintViolation(message),
    }
}
