use crate::item::{Book, Committed, Entity, ObjectManager, PersistError, Review};
use std::collections::HashSet;
use tracing::debug;

/// 메모리에 엔티티를 보관하는 저장소
///
/// 데이터베이스 없이 픽스처를 실행할 때(dry-run, 테스트) 사용한다.
/// flush 시 리뷰가 참조하는 도서가 저장소에 있는지 검사하며, 하나라도 위반하면 해당 flush 전체를 버린다.
///
/// # Example
/// ```
/// use bookstore_fixture::item::ObjectManager;
/// use bookstore_fixture::item::repo::MemoryObjectManager;
///
/// let mut manager = MemoryObjectManager::new();
/// let committed = manager.flush().unwrap();
///
/// assert!(committed.is_empty());
/// assert!(manager.books().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryObjectManager {
    staged: Vec<Entity>,
    books: Vec<Book>,
    reviews: Vec<Review>,
    sequence: u64,
    flush_count: usize,
}

impl MemoryObjectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장이 완료된 도서 목록
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// 저장이 완료된 리뷰 목록
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// 저장 대기 중인 엔티티 개수
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// 성공한 flush 횟수
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    pub fn find_book(&self, id: u64) -> Option<&Book> {
        self.books.iter().find(|b| b.id() == id)
    }

    fn next_id(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}

impl ObjectManager for MemoryObjectManager {
    fn persist(&mut self, entity: Entity) {
        self.staged.push(entity);
    }

    fn flush(&mut self) -> Result<Committed, PersistError> {
        let staged = std::mem::take(&mut self.staged);
        let (mut books, mut reviews) = (Vec::new(), Vec::new());
        for entity in staged {
            match entity {
                Entity::Book(book) => books.push(book),
                Entity::Review(review) => reviews.push(review),
            }
        }

        let known: HashSet<u64> = self.books.iter().map(|b| b.id()).collect();
        if let Some(orphan) = reviews.iter().find(|r| !known.contains(&r.book_id())) {
            return Err(PersistError::ConstraintViolation(
                format!("review references unknown book (book_id: {})", orphan.book_id())
            ));
        }

        let mut committed = Committed::default();
        for book in books {
            let id = self.next_id();
            committed.books.push(book.with_id(id));
        }
        for review in reviews {
            let id = self.next_id();
            committed.reviews.push(review.with_id(id));
        }

        self.books.extend(committed.books.iter().cloned());
        self.reviews.extend(committed.reviews.iter().cloned());
        self.flush_count += 1;

        debug!(books = committed.books.len(), reviews = committed.reviews.len(), "메모리 저장소 flush 완료");
        Ok(committed)
    }

    fn purge(&mut self) -> Result<(usize, usize), PersistError> {
        let deleted = (self.books.len(), self.reviews.len());
        self.books.clear();
        self.reviews.clear();
        Ok(deleted)
    }
}
