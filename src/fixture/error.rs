use crate::item::{ItemError, PersistError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureError {
    /// 저장소에서 저장/삭제를 실패함
    PersistFailed(PersistError),

    /// 생성한 값으로 도서나 리뷰를 만들 수 없음
    InvalidItem(ItemError),

    /// 리뷰가 참조할 도서가 하나도 없음
    EmptyBookPool { reviews: usize },

    /// flush 결과의 개수가 저장 대기 시킨 개수와 다름
    IncompleteFlush { expected: usize, actual: usize },
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixtureError::PersistFailed(e) => write!(f, "Persist failed, {}", e),
            FixtureError::InvalidItem(e) => write!(f, "Invalid item, {}", e),
            FixtureError::EmptyBookPool { reviews } => {
                write!(f, "Cannot create {} reviews without any book", reviews)
            }
            FixtureError::IncompleteFlush { expected, actual } => {
                write!(f, "Flush returned {} entities, expected {}", actual, expected)
            }
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixtureError::PersistFailed(e) => Some(e),
            FixtureError::InvalidItem(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PersistError> for FixtureError {
    fn from(value: PersistError) -> Self {
        FixtureError::PersistFailed(value)
    }
}

impl From<ItemError> for FixtureError {
    fn from(value: ItemError) -> Self {
        FixtureError::InvalidItem(value)
    }
}
