use crate::configs::FixtureConfig;
use crate::fixture::error::FixtureError;
use crate::fixture::provider::FakerProvider;
use crate::fixture::{BookstoreFixture, Executor, Fixture, LoadSummary};
use crate::item::ObjectManager;
use clap::Parser;
use tracing::info;

pub mod configs;
pub mod fixture;
pub mod item;

/// 서점 샘플 데이터(도서, 리뷰)를 저장소에 채운다.
#[derive(Debug, Default, Parser)]
#[command(name = "bookstore-fixture", version, long_about = None)]
pub struct Argument {
    /// 생성할 도서 수 (설정 파일의 fixture.books 보다 우선)
    #[arg(long, value_name = "COUNT")]
    pub books: Option<usize>,

    /// 생성할 리뷰 수 (설정 파일의 fixture.reviews 보다 우선)
    #[arg(long, value_name = "COUNT")]
    pub reviews: Option<usize>,

    /// 난수 시드 (같은 시드는 같은 데이터를 만든다)
    #[arg(long)]
    pub seed: Option<u64>,

    /// 기존 데이터를 삭제하지 않고 이어서 저장한다.
    #[arg(long)]
    pub append: bool,

    /// 데이터베이스 대신 메모리 저장소를 사용한다.
    #[arg(long)]
    pub dry_run: bool,
}

impl Argument {
    /// 커맨드 라인 인자로 설정 파일의 픽스처 옵션을 덮어쓴다.
    ///
    /// # Example
    /// ```
    /// use bookstore_fixture::Argument;
    /// use bookstore_fixture::configs::FixtureConfig;
    /// use clap::Parser;
    ///
    /// let argument = Argument::parse_from(["bookstore-fixture", "--books", "10", "--seed", "3"]);
    /// let config = argument.merge(&FixtureConfig::default());
    ///
    /// assert_eq!(config.books, 10);
    /// assert_eq!(config.reviews, 500);
    /// assert_eq!(config.seed, Some(3));
    /// ```
    pub fn merge(&self, config: &FixtureConfig) -> FixtureConfig {
        FixtureConfig {
            books: self.books.unwrap_or(config.books),
            reviews: self.reviews.unwrap_or(config.reviews),
            seed: self.seed.or(config.seed),
        }
    }
}

pub fn create_bookstore_fixture(config: &FixtureConfig) -> BookstoreFixture<FakerProvider> {
    BookstoreFixture::new(FakerProvider::new(config.seed))
        .book_count(config.books)
        .review_count(config.reviews)
}

/// 픽스처를 실행한다. `append`가 아니면 실행 전에 저장소를 비운다.
pub fn run(argument: &Argument, config: &FixtureConfig, manager: &mut dyn ObjectManager) -> Result<LoadSummary, FixtureError> {
    info!(
        books = config.books,
        reviews = config.reviews,
        seed = ?config.seed,
        append = argument.append,
        dry_run = argument.dry_run,
        "샘플 데이터 생성을 시작 합니다."
    );

    let mut fixtures: Vec<Box<dyn Fixture>> = vec![Box::new(create_bookstore_fixture(config))];
    Executor::new(manager)
        .purge(!argument.append)
        .execute(&mut fixtures)
}
