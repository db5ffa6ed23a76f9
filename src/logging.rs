//! 로깅 설정
//!
//! TUI 모드에서는 화면을 깨뜨리지 않도록 파일로, 헤드리스 모드에서는 stderr로 쓴다.

use anyhow::Context;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";
const LOG_FILE_NAME: &str = "archiver.log";

/// 기본 로그 파일 경로: `<data_local_dir>/archiver/archiver.log`
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("archiver")
        .join(LOG_FILE_NAME)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// 전역 subscriber 설치
///
/// 파일 로깅이면 반환된 guard가 살아 있는 동안만 기록이 flush된다.
pub fn init_tracing(log_file: Option<PathBuf>, headless: bool) -> anyhow::Result<Option<WorkerGuard>> {
    if headless && log_file.is_none() {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .context("installing stderr logger")?;
        return Ok(None);
    }

    let path = log_file.unwrap_or_else(default_log_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .context("installing file logger")?;
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path() {
        let path = default_log_path();
        assert!(path.ends_with("archiver/archiver.log"));
    }
}
