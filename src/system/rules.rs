//! 압축 규칙 파일 로더
//!
//! 규칙 파일은 한 줄에 규칙 하나, 필드는 탭으로 구분한다.
//! 파일을 읽을 수 없으면 기본 zip 규칙을 돌려주고 같은 경로에 기록해 둔다.

use crate::models::rule::CompressionRule;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 규칙 파일 경로 환경변수
pub const RULES_FILE_ENV: &str = "ARCHIVER_RULES_FILE";

const RULES_FILE_NAME: &str = "archiver.rules";

/// 규칙 파일 저장소
#[derive(Debug, Clone)]
pub struct RulesStore {
    path: PathBuf,
}

impl RulesStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// 기본 위치: 환경변수 > 설정 디렉토리 > 현재 디렉토리
    pub fn default_path() -> PathBuf {
        if let Ok(custom) = env::var(RULES_FILE_ENV) {
            let trimmed = custom.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        dirs::config_dir()
            .map(|dir| dir.join("archiver").join(RULES_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(RULES_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 규칙 목록 로드 (파일 순서 유지)
    ///
    /// 실패하지 않는다. 읽기 실패 시 기본 규칙 하나를 돌려준다.
    pub fn load(&self) -> Vec<CompressionRule> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                let rules = parse_rules(&String::from_utf8_lossy(&bytes));
                debug!(path = %self.path.display(), count = rules.len(), "rules loaded");
                rules
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "rules file unreadable, using built-in zip rule"
                );
                let rule = CompressionRule::default_zip();
                if let Err(err) = write_default_rules(&self.path, &rule) {
                    warn!(path = %self.path.display(), error = %err, "could not recreate rules file");
                }
                vec![rule]
            }
        }
    }
}

/// 규칙 파일 내용 파싱
///
/// 빈 줄과 필드가 모자란 줄은 건너뛴다.
pub fn parse_rules(text: &str) -> Vec<CompressionRule> {
    let mut rules = Vec::new();
    for (line_no, line) in text.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match CompressionRule::from_line(line) {
            Some(rule) => rules.push(rule),
            None => warn!(line = line_no + 1, "skipping malformed rule"),
        }
    }
    rules
}

/// 압축 도구가 실제로 존재해서 선택 가능한 규칙의 인덱스
pub fn selectable_indices(rules: &[CompressionRule]) -> Vec<usize> {
    rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| rule.tool_exists())
        .map(|(index, _)| index)
        .collect()
}

/// 기본 규칙 기록. 이미 파일이 있으면 덮어쓰지 않는다.
fn write_default_rules(path: &Path, rule: &CompressionRule) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    writeln!(file, "{}", rule.to_line())
}
