use serde::Deserialize;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub dir: String,
    pub name: String,

    /// 최대 로그 파일 개수로 로그 파일이 설정한 개수보다 커질 경우 기존의 로그파일들은 삭제 된다.
    /// 설정 되지 않을 시 로그 파일은 삭제 되지 않는다.
    pub keep: Option<usize>,

    /// 파일과 stdout에 출력할 로그의 레벨로 지정된 로그 레벨 이상만 로깅된다.
    /// 설정하지 않을시 기본값은 INFO로 설정 된다.
    pub level: Option<String>,

    /// 로깅 파일이 분리 되는 기간으로 .log 파일 하나 당 설정된 기간 동안 로그가 기록 된다.
    /// 설정 되지 않을시 기본값은 DAILY로 설정된다.
    pub rotation: Option<String>
}

/// 파일과 stdout에 JSON 형식으로 로그를 남기도록 전역 subscriber를 설정한다.
///
/// 반환된 [`WorkerGuard`]가 drop 되면 파일에 쓰이지 않은 로그가 유실 될 수 있으므로 프로그램이 끝날 때까지 보관해야 한다.
pub fn set_global_logging_config(c: &Config) -> Result<WorkerGuard, String> {
    let rotation = match &c.rotation {
        Some(rotation) => parse_rotation(rotation)?,
        None => rolling::Rotation::DAILY,
    };
    let level = match &c.level {
        Some(level) => parse_level(level)?,
        None => tracing::Level::INFO,
    };

    let mut file_appender = rolling::RollingFileAppender::builder()
        .filename_prefix(c.name.clone())
        .filename_suffix("log")
        .rotation(rotation);

    if let Some(keep) = c.keep {
        file_appender = file_appender.max_log_files(keep);
    }

    let file_appender = file_appender.build(c.dir.clone())
        .map_err(|e| format!("로그 파일을 만들 수 없습니다. {}", e))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let writer = std::io::stdout.and(non_blocking);

    tracing_subscriber::fmt()
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_current_span(true)
        .with_span_list(true)
        .with_timer(LocalTime::new(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]")))
        .with_writer(writer)
        .with_max_level(level)
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok(guard)
}

/// 로그 파일 설정이 없을 때 stdout으로만 로그를 남긴다.
pub fn set_stdout_logging_config(level: Option<&str>) -> Result<(), String> {
    let level = match level {
        Some(level) => parse_level(level)?,
        None => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .try_init()
        .map_err(|e| e.to_string())
}

pub fn parse_rotation(s: &str) -> Result<rolling::Rotation, String> {
    match s {
        "DAILY" => Ok(rolling::Rotation::DAILY),
        "HOURLY" => Ok(rolling::Rotation::HOURLY),
        "MINUTELY" => Ok(rolling::Rotation::MINUTELY),
        "NEVER" => Ok(rolling::Rotation::NEVER),
        _ => Err(format!("로깅 파일 로테이션(rotation)은 \"DAILY\", \"HOURLY\", \"MINUTELY\", \"NEVER\"만 가능 합니다. (입력 값: {})", s))
    }
}

pub fn parse_level(l: &str) -> Result<tracing::Level, String> {
    match l {
        "TRACE" => Ok(tracing::Level::TRACE),
        "DEBUG" => Ok(tracing::Level::DEBUG),
        "INFO" => Ok(tracing::Level::INFO),
        "WARN" => Ok(tracing::Level::WARN),
        "ERROR" => Ok(tracing::Level::ERROR),
        _ => Err(format!("로그 레벨(level)은 \"TRACE\", \"DEBUG\", \"INFO\", \"WARN\", \"ERROR\"만 가능 합니다. (입력 값: {})", l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_levels() {
        assert_eq!(parse_level("DEBUG"), Ok(tracing::Level::DEBUG));
        assert_eq!(parse_level("ERROR"), Ok(tracing::Level::ERROR));
        assert!(parse_level("debug").is_err());
    }

    #[test]
    fn parse_known_rotations() {
        assert!(parse_rotation("DAILY").is_ok());
        assert!(parse_rotation("NEVER").is_ok());
        assert!(parse_rotation("DALY").is_err());
    }
}
