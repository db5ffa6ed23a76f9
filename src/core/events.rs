//! 앱 이벤트
//!
//! 키 입력과 감시 스레드 알림이 모두 이 타입으로 디스패처에 들어온다.
//! 감시 스레드는 하나의 mpsc 채널로 보내므로 같은 작업의 알림 순서가 유지된다.

use crate::models::{JobId, JobOutcome};
use crate::system::process::JobObserver;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

/// 뷰 식별자. 작업 뷰는 작업 id를 그대로 쓴다.
pub type ViewId = JobId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// 자식 프로세스 pid 확인
    ThreadStarted { view: ViewId, pid: u32 },
    /// 작업 종료 (성공/중지/실패)
    JobCompleted {
        view: ViewId,
        outcome: JobOutcome,
        file_type: Option<&'static str>,
    },
    /// 작업 뷰의 Stop/OK 버튼
    StopRequested { view: ViewId },
    /// 중지 확인 다이얼로그 결과
    StopConfirmed { view: ViewId, confirmed: bool },
    /// 설정 뷰에서 규칙 선택 (규칙 목록 인덱스)
    RuleChanged { index: usize },
    CloseOnFinishChanged(bool),
    /// 설정 뷰 Accept
    Accept,
    RemoveView { view: ViewId },
    /// 압축할 파일 전달 (dir이 없으면 공통 부모 디렉토리)
    FilesReceived {
        sources: Vec<PathBuf>,
        dir: Option<PathBuf>,
    },
    ToggleSettings,
    QuitRequested,
    QuitConfirmed(bool),
}

impl JobObserver for Sender<AppEvent> {
    fn thread_started(&self, job: JobId, pid: u32) {
        // 수신 측이 이미 종료된 경우는 무시
        let _ = self.send(AppEvent::ThreadStarted { view: job, pid });
    }

    fn job_finished(&self, job: JobId, outcome: JobOutcome, file_type: Option<&'static str>) {
        let _ = self.send(AppEvent::JobCompleted {
            view: job,
            outcome,
            file_type,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_sender_observer_keeps_order() {
        let (tx, rx) = mpsc::channel();
        tx.thread_started(3, 4242);
        tx.job_finished(3, JobOutcome::Completed, Some("application/zip"));

        assert_eq!(
            rx.try_recv().unwrap(),
            AppEvent::ThreadStarted { view: 3, pid: 4242 }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            AppEvent::JobCompleted {
                view: 3,
                outcome: JobOutcome::Completed,
                file_type: Some("application/zip"),
            }
        );
    }

    #[test]
    fn test_sender_observer_ignores_closed_channel() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(rx);
        tx.job_finished(1, JobOutcome::Stopped, None);
    }
}
