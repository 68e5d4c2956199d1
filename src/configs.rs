use diesel::r2d2::ConnectionManager;
use diesel::PgConnection;
use r2d2::Pool;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::{Display, Formatter};

pub mod logging;

#[derive(Debug)]
pub enum ConfigError {
    /// 설정 파일을 읽거나 역직렬화 할 수 없음
    LoadFailed(config::ConfigError),

    /// 설정 값이 올바르지 않음
    InvalidValue(String),

    /// 데이터베이스 연결 풀을 만들 수 없음
    PoolBuildFailed(r2d2::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed(e) => write!(f, "Cannot load config, {}", e),
            ConfigError::InvalidValue(message) => write!(f, "Invalid config value, {}", message),
            ConfigError::PoolBuildFailed(e) => write!(f, "Could not build connection pool, {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    host: String,
    port: i32,
    username: String,
    password: String,
    dbname: String,
}

impl Database {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> i32 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn dbname(&self) -> &str {
        &self.dbname
    }

    pub fn url(&self) -> String {
        format!("postgres://{}:{}@{}:{}/{}", self.username, self.password, self.host, self.port, self.dbname)
    }
}

/// 픽스처 생성 옵션
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureConfig {
    #[serde(default = "default_books")]
    pub books: usize,

    #[serde(default = "default_reviews")]
    pub reviews: usize,

    /// 설정하지 않으면 실행 할 때마다 다른 데이터가 만들어진다.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            books: default_books(),
            reviews: default_reviews(),
            seed: None,
        }
    }
}

fn default_books() -> usize {
    crate::fixture::DEFAULT_BOOK_COUNT
}

fn default_reviews() -> usize {
    crate::fixture::DEFAULT_REVIEW_COUNT
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    db: Option<Database>,
    logger: Option<logging::Config>,
    #[serde(default)]
    fixture: FixtureConfig,
}

impl AppConfig {
    pub fn db(&self) -> Option<&Database> {
        self.db.as_ref()
    }

    pub fn logger(&self) -> Option<&logging::Config> {
        self.logger.as_ref()
    }

    pub fn fixture(&self) -> &FixtureConfig {
        &self.fixture
    }
}

/// 실행 환경에 따라 .env 파일을 로드한다.
pub fn load_dotenv() {
    let env_filename = env::var("RUN_MODE")
        .map(|env| format!(".env.{}", env))
        .unwrap_or_else(|_| ".env".into());

    dotenvy::from_filename(env_filename).ok();
}

/// `config/{RUN_MODE}.json` 파일을 읽는다. 파일이 없으면 기본 설정을 사용한다.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
    let config = config::Config::builder()
        .add_source(config::File::with_name(&format!("config/{}.json", env)).required(false))
        .build()
        .map_err(ConfigError::LoadFailed)?;

    config.try_deserialize().map_err(ConfigError::LoadFailed)
}

/// 데이터베이스 연결 풀을 생성한다.
/// 환경 변수 `DATABASE_URL`이 있으면 설정 파일의 `db` 항목보다 우선한다.
pub fn connect_to_postgres(db: Option<&Database>) -> Result<Pool<ConnectionManager<PgConnection>>, ConfigError> {
    let database_url = match (env::var("DATABASE_URL"), db) {
        (Ok(url), _) => url,
        (Err(_), Some(db)) => db.url(),
        (Err(_), None) => {
            return Err(ConfigError::InvalidValue("DATABASE_URL 또는 db 설정이 필요 합니다.".to_owned()));
        }
    };
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    Pool::builder()
        .test_on_check_out(true)
        .build(manager)
        .map_err(ConfigError::PoolBuildFailed)
}

/// 프로그램에서 사용할 로깅 옵션을 설정한다.
///
/// 설정 파일에 `logger` 항목이 있으면 파일과 stdout에, 없으면 stdout에만 로그를 남긴다.
/// 파일 로깅을 사용하는 경우 반환된 guard를 프로그램 종료 시까지 보관해야 한다.
pub fn set_global_logging_config(app: &AppConfig) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, ConfigError> {
    match app.logger() {
        Some(c) => logging::set_global_logging_config(c)
            .map(Some)
            .map_err(ConfigError::InvalidValue),
        None => {
            let level = env::var("LOGGER_LEVEL").ok();
            logging::set_stdout_logging_config(level.as_deref())
                .map(|_| None)
                .map_err(ConfigError::InvalidValue)
        }
    }
}
