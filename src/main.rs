use bookstore_fixture::configs;
use bookstore_fixture::item::repo::{MemoryObjectManager, PgObjectManager};
use bookstore_fixture::Argument;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    configs::load_dotenv();
    let argument = Argument::parse();

    let config = match configs::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = match configs::set_global_logging_config(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let fixture_config = argument.merge(config.fixture());

    if argument.dry_run {
        let mut manager = MemoryObjectManager::new();
        return match bookstore_fixture::run(&argument, &fixture_config, &mut manager) {
            Ok(summary) => {
                info!(books = summary.books, reviews = summary.reviews, "dry-run 완료");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("샘플 데이터 생성 실패 => {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let pool = match configs::connect_to_postgres(config.db()) {
        Ok(pool) => pool,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut manager = PgObjectManager::new(pool);

    match bookstore_fixture::run(&argument, &fixture_config, &mut manager) {
        Ok(summary) => {
            match manager.count_all() {
                Ok((books, reviews)) => info!(
                    books = summary.books,
                    reviews = summary.reviews,
                    total_books = books,
                    total_reviews = reviews,
                    "샘플 데이터 생성 완료"
                ),
                Err(e) => error!("저장된 데이터 수를 확인할 수 없습니다. {}", e),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("샘플 데이터 생성 실패 => {}", e);
            ExitCode::FAILURE
        }
    }
}
