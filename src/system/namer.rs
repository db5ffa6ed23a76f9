//! 압축 파일 이름 생성
//!
//! 대상 디렉토리에 이미 있는 이름과 겹치지 않도록 번호를 붙인다.
//! (`Archive.zip`, `Archive 1.zip`, `Archive 2.zip`, ...)

use crate::models::{CompressionJob, CompressionRule, JobId};
use crate::utils::error::{ArchiverError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// 파일이 여러 개일 때 쓰는 기본 이름
pub const DEFAULT_BASE_NAME: &str = "Archive";

/// 후보 기본 이름: 파일이 하나면 그 파일 이름, 아니면 "Archive"
pub fn candidate_base_name(sources: &[PathBuf]) -> String {
    match sources {
        [single] => single
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_BASE_NAME.to_string()),
        _ => DEFAULT_BASE_NAME.to_string(),
    }
}

/// 겹치지 않는 압축 파일 경로 생성
///
/// `directory/base+ext`가 있으면 `directory/base N+ext` (N = 1, 2, ...)를 시도한다.
/// 존재 여부를 확인할 수 없는 경로(권한 등)는 없는 것으로 본다.
pub fn generate_name(directory: &Path, base_name: &str, extension: &str) -> PathBuf {
    let mut candidate = directory.join(format!("{}{}", base_name, extension));
    let mut counter: u64 = 0;
    while entry_exists(&candidate) {
        counter += 1;
        candidate = directory.join(format!("{} {}{}", base_name, counter, extension));
    }
    candidate
}

/// 파일들의 부모 디렉토리 중 가장 깊은 공통 조상
pub fn common_parent(sources: &[PathBuf]) -> Option<PathBuf> {
    let mut parents = sources.iter().map(|source| match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    });

    let first = parents.next()?;
    let common = parents.fold(first, |acc, parent| {
        acc.components()
            .zip(parent.components())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a)
            .collect()
    });

    if common.as_os_str().is_empty() {
        None
    } else {
        Some(common)
    }
}

/// 선택된 파일과 규칙으로 작업 구성
///
/// 작업 디렉토리는 명시된 디렉토리, 없으면 파일들의 공통 부모.
pub fn plan_job(
    id: JobId,
    sources: Vec<PathBuf>,
    explicit_dir: Option<PathBuf>,
    rule: CompressionRule,
    priority: Option<i32>,
) -> Result<CompressionJob> {
    if sources.is_empty() {
        return Err(ArchiverError::EmptyJob);
    }

    let working_dir = match explicit_dir {
        Some(dir) => dir,
        None => common_parent(&sources).ok_or_else(|| {
            ArchiverError::Config("selected files share no common directory".to_string())
        })?,
    };
    if !working_dir.is_dir() {
        return Err(ArchiverError::NotADirectory { path: working_dir });
    }

    let base_name = candidate_base_name(&sources);
    let output_path = generate_name(&working_dir, &base_name, &rule.extension);

    Ok(CompressionJob {
        id,
        sources,
        working_dir,
        output_path,
        rule,
        priority,
    })
}

fn entry_exists(path: &Path) -> bool {
    // 깨진 심볼릭 링크도 이름을 차지하므로 링크 자체 메타데이터로 확인
    match fs::symlink_metadata(path) {
        Ok(_) => true,
        Err(err) if err.kind() == ErrorKind::NotFound => false,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cannot stat candidate, treating as free");
            false
        }
    }
}
