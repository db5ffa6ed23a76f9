//! 압축 작업 모델
//!
//! 사용자가 선택한 파일 묶음 하나에 대한 압축 요청과 그 진행 상태

use crate::models::rule::CompressionRule;
use std::path::PathBuf;

/// 작업 식별자 (작업 뷰 식별자와 같다)
pub type JobId = u64;

/// 압축 작업
#[derive(Debug, Clone)]
pub struct CompressionJob {
    /// 작업 식별자
    pub id: JobId,
    /// 압축할 파일 (선택 순서 유지, 비어 있지 않음)
    pub sources: Vec<PathBuf>,
    /// 압축 도구를 실행할 디렉토리
    pub working_dir: PathBuf,
    /// 생성될 압축 파일 전체 경로
    pub output_path: PathBuf,
    /// 사용할 압축 규칙 (작업 생성 시점의 스냅샷)
    pub rule: CompressionRule,
    /// 자식 프로세스 nice 값 (None이면 건드리지 않음)
    pub priority: Option<i32>,
}

impl CompressionJob {
    /// 생성될 압축 파일 이름 (경로 제외)
    pub fn output_name(&self) -> String {
        self.output_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// 작업 최종 결과 (정확히 하나만 결정된다)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// 도구가 정상 종료 (종료 코드 0)
    Completed,
    /// 사용자 요청으로 중지됨
    Stopped,
    /// 실행 실패 또는 비정상 종료
    Failed { reason: String },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Completed)
    }

    /// 상태 표시용 제목
    pub fn title(&self) -> &'static str {
        match self {
            JobOutcome::Completed => "Compression finished",
            JobOutcome::Stopped => "Compression stopped",
            JobOutcome::Failed { .. } => "Compression failed",
        }
    }
}

/// 작업 뷰에서 본 작업 상태
///
/// `Running -> StopPending -> {Running, Finished(Stopped)}` 전이는
/// 중지 확인 다이얼로그 결과로만 일어난다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPhase {
    /// 프로세스 실행 요청됨 (pid 미확인)
    Starting,
    /// 실행 중
    Running,
    /// 중지 확인 대기 중
    StopPending,
    /// 종료됨
    Finished(JobOutcome),
}

impl JobPhase {
    pub fn is_active(&self) -> bool {
        !matches!(self, JobPhase::Finished(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name() {
        let job = CompressionJob {
            id: 1,
            sources: vec![PathBuf::from("/tmp/a.txt")],
            working_dir: PathBuf::from("/tmp"),
            output_path: PathBuf::from("/tmp/a.txt 2.zip"),
            rule: CompressionRule::default_zip(),
            priority: None,
        };
        assert_eq!(job.output_name(), "a.txt 2.zip");
    }

    #[test]
    fn test_outcome_titles() {
        assert!(JobOutcome::Completed.is_success());
        assert!(!JobOutcome::Stopped.is_success());
        assert_eq!(
            JobOutcome::Failed {
                reason: "exit code 12".into()
            }
            .title(),
            "Compression failed"
        );
    }

    #[test]
    fn test_phase_active() {
        assert!(JobPhase::Starting.is_active());
        assert!(JobPhase::StopPending.is_active());
        assert!(!JobPhase::Finished(JobOutcome::Stopped).is_active());
    }
}
