//! 압축 도구 프로세스 실행과 감시
//!
//! 작업 하나당 자식 프로세스 하나와 감시 스레드 하나를 둔다.
//! 감시 스레드는 자식이 끝날 때까지 기다렸다가 최종 결과를 관찰자에게 알린다.
//!
//! 최종 결과는 정확히 하나다. 중지 요청과 감시 스레드가 같은 잠금 안에서
//! 상태를 바꾸고, 감시 스레드는 결과를 정하기 전까지 자식을 수거하지 않는다.

use crate::models::{CompressionJob, JobId, JobOutcome, FILENAME_PLACEHOLDER};
use crate::system::filetype::refresh_file_type;
use crate::system::signal;
use crate::utils::error::{ArchiverError, Result};
use crate::utils::formatter::format_command_line;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 비수거 대기를 못 쓰는 플랫폼에서의 폴링 간격
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 작업 진행 알림을 받는 쪽 (보통 UI 이벤트 채널)
///
/// 같은 작업에 대해 `thread_started`는 항상 `job_finished`보다 먼저 호출된다.
/// 실행 자체가 실패하면 `job_finished`만 호출된다.
pub trait JobObserver: Send + 'static {
    fn thread_started(&self, job: JobId, pid: u32);
    fn job_finished(&self, job: JobId, outcome: JobOutcome, file_type: Option<&'static str>);
}

/// 실제로 실행할 명령
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
}

impl LaunchSpec {
    /// 작업으로부터 인자 벡터 구성
    ///
    /// 규칙 인자(FILENAME 치환) 뒤에 원본 파일들을 선택 순서대로 붙인다.
    pub fn for_job(job: &CompressionJob) -> Self {
        let mut args = substitute_placeholder(&job.rule.arguments, &job.output_name());
        args.extend(
            job.sources
                .iter()
                .map(|source| source_argument(source, &job.working_dir)),
        );
        Self {
            program: job.rule.executable.clone(),
            args,
            cwd: job.working_dir.clone(),
        }
    }

    fn command(&self, inherit_output: bool) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null());
        if !inherit_output {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        command
    }
}

/// 첫 번째 FILENAME 토큰만 결과 파일 이름으로 바꾼다.
///
/// 토큰이 없으면 결과 파일 이름은 인자로 전달되지 않는다.
pub fn substitute_placeholder(arguments: &[String], output_name: &str) -> Vec<OsString> {
    let mut replaced = false;
    arguments
        .iter()
        .map(|arg| {
            if !replaced && arg == FILENAME_PLACEHOLDER {
                replaced = true;
                OsString::from(output_name)
            } else {
                OsString::from(arg)
            }
        })
        .collect()
}

/// 작업 디렉토리 아래 파일은 상대 경로로, 그 밖은 그대로 넘긴다.
fn source_argument(source: &Path, working_dir: &Path) -> OsString {
    match source.strip_prefix(working_dir) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.as_os_str().to_os_string(),
        _ => source.as_os_str().to_os_string(),
    }
}

/// 중지 요청 결과 (둘 다 성공)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    /// 이미 끝난 프로세스, 신호를 보내지 않음
    AlreadyFinished,
    /// SIGTERM 전송됨
    Signalled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RunState {
    Running,
    /// 중지 신호를 보냄
    Stopping,
    /// 소유자가 떠남, 완료 알림 생략
    Detached,
    Finished(JobOutcome),
}

#[derive(Debug)]
struct Shared {
    state: Mutex<RunState>,
    finished: Condvar,
}

impl Shared {
    fn new(state: RunState) -> Self {
        Self {
            state: Mutex::new(state),
            finished: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 실행 중인 작업 프로세스 핸들
///
/// 실행 중에 버려지면 프로세스에 SIGTERM을 보내고 완료 알림을 생략한다.
#[derive(Debug)]
pub struct ProcessHandle {
    job: JobId,
    pid: Option<u32>,
    shared: Arc<Shared>,
}

impl ProcessHandle {
    /// 자식 프로세스 pid (실행 실패 시 None)
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// 정상 종료 요청 (SIGTERM)
    ///
    /// 이미 끝난 프로세스에는 아무것도 보내지 않고 성공을 돌려준다.
    /// 부분적으로 만들어진 결과 파일 정리는 압축 도구에 맡긴다.
    pub fn stop(&self) -> Result<StopResult> {
        let mut state = self.shared.lock();
        match *state {
            RunState::Finished(_) => return Ok(StopResult::AlreadyFinished),
            RunState::Stopping | RunState::Detached => return Ok(StopResult::Signalled),
            RunState::Running => {}
        }
        let Some(pid) = self.pid else {
            return Ok(StopResult::AlreadyFinished);
        };
        // 감시 스레드가 결과를 기록하기 전이라도 이미 끝난 프로세스에는 신호를 보내지 않는다
        if self.exited_unrecorded(pid) {
            return Ok(StopResult::AlreadyFinished);
        }

        match signal::send_terminate(pid) {
            Ok(true) => {
                *state = RunState::Stopping;
                info!(job = self.job, pid, "stop requested, SIGTERM sent");
                Ok(StopResult::Signalled)
            }
            Ok(false) => Ok(StopResult::AlreadyFinished),
            Err(err) => Err(ArchiverError::SignalFailed {
                pid,
                reason: err.to_string(),
            }),
        }
    }

    /// 소유자 정리: 실행 중이면 SIGTERM을 보내고 완료 알림을 끊는다.
    ///
    /// 프로세스가 아직 살아 있었으면 `true`.
    pub fn cancel(&self) -> bool {
        let mut state = self.shared.lock();
        match *state {
            RunState::Finished(_) | RunState::Detached => false,
            RunState::Stopping => {
                *state = RunState::Detached;
                true
            }
            RunState::Running => {
                if let Some(pid) = self.pid {
                    if self.exited_unrecorded(pid) {
                        debug!(job = self.job, pid, "owner left after the tool exited");
                        return false;
                    }
                    if let Err(err) = signal::send_terminate(pid) {
                        warn!(job = self.job, pid, error = %err, "cancel could not signal process");
                    }
                }
                *state = RunState::Detached;
                info!(job = self.job, "job cancelled by owner");
                true
            }
        }
    }

    /// 종료했지만 감시 스레드가 아직 수거하지 않은 상태인지. 상태 잠금을 쥔 채로 호출한다.
    fn exited_unrecorded(&self, pid: u32) -> bool {
        match signal::has_exited(pid) {
            Ok(exited) => exited,
            Err(err) => {
                debug!(job = self.job, pid, error = %err, "exit check failed");
                false
            }
        }
    }

    /// 프로세스가 끝날 때까지 호출한 스레드를 막는다. 제한 시간 없음.
    pub fn wait(&self) -> JobOutcome {
        let mut state = self.shared.lock();
        loop {
            if let RunState::Finished(outcome) = &*state {
                return outcome.clone();
            }
            state = self
                .shared
                .finished
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 압축 도구 실행기
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    /// 자식의 표준 출력/에러를 그대로 물려줄지 (헤드리스 모드)
    inherit_output: bool,
}

impl ProcessRunner {
    /// 출력 없는 실행기 (TUI 모드)
    pub fn new() -> Self {
        Self::default()
    }

    /// 자식 출력을 터미널에 그대로 보여주는 실행기
    pub fn with_inherited_output() -> Self {
        Self {
            inherit_output: true,
        }
    }

    /// 작업 시작
    ///
    /// 원본 파일이 없으면 아무것도 실행하지 않고 `EmptyJob`.
    /// 실행 자체가 실패하면 관찰자에게 `Failed`를 알리고 끝난 핸들을 돌려준다.
    pub fn start<O: JobObserver>(&self, job: &CompressionJob, observer: O) -> Result<ProcessHandle> {
        if job.sources.is_empty() {
            return Err(ArchiverError::EmptyJob);
        }

        let spec = LaunchSpec::for_job(job);
        if !job.rule.has_placeholder() {
            warn!(
                job = job.id,
                output = %job.output_name(),
                "rule has no {} argument, the tool chooses the output name",
                FILENAME_PLACEHOLDER
            );
        }
        info!(
            job = job.id,
            cwd = %spec.cwd.display(),
            command = %format_command_line(&spec.program, &spec.args),
            "starting compression"
        );

        let child = match spec.command(self.inherit_output).spawn() {
            Ok(child) => child,
            Err(err) => {
                let reason = ArchiverError::SpawnFailed {
                    program: spec.program.clone(),
                    reason: err.to_string(),
                }
                .to_string();
                warn!(job = job.id, %reason, "compression tool did not start");
                let outcome = JobOutcome::Failed { reason };
                let shared = Arc::new(Shared::new(RunState::Finished(outcome.clone())));
                observer.job_finished(job.id, outcome, None);
                return Ok(ProcessHandle {
                    job: job.id,
                    pid: None,
                    shared,
                });
            }
        };

        let pid = child.id();
        if let Some(nice) = job.priority {
            if let Err(err) = signal::set_priority(pid, nice) {
                warn!(job = job.id, pid, nice, error = %err, "could not adjust priority");
            }
        }

        // 감시 스레드가 완료를 알리기 전에 pid부터 알린다
        observer.thread_started(job.id, pid);

        let shared = Arc::new(Shared::new(RunState::Running));
        let watcher_shared = Arc::clone(&shared);
        let job_id = job.id;
        let output_path = job.output_path.clone();
        thread::spawn(move || watch(job_id, child, watcher_shared, output_path, observer));

        Ok(ProcessHandle {
            job: job.id,
            pid: Some(pid),
            shared,
        })
    }
}

/// 감시 스레드 본체
fn watch<O: JobObserver>(
    job: JobId,
    mut child: Child,
    shared: Arc<Shared>,
    output_path: PathBuf,
    observer: O,
) {
    let (mut state, status) = wait_for_exit(&mut child, &shared);

    let outcome = match (&*state, status) {
        (RunState::Stopping | RunState::Detached, _) => JobOutcome::Stopped,
        (_, Ok(status)) if status.success() => JobOutcome::Completed,
        (_, Ok(status)) => JobOutcome::Failed {
            reason: describe_status(status),
        },
        (_, Err(err)) => JobOutcome::Failed {
            reason: format!("waiting for the tool failed: {}", err),
        },
    };
    let notify = *state != RunState::Detached;
    *state = RunState::Finished(outcome.clone());
    shared.finished.notify_all();
    drop(state);

    info!(job, outcome = ?outcome, "compression process finished");

    // 성공 여부와 관계없이 결과 파일 형식 갱신
    let file_type = refresh_file_type(&output_path);

    if notify {
        observer.job_finished(job, outcome, file_type);
    } else {
        debug!(job, "owner detached, completion not reported");
    }
}

/// 자식 종료를 기다린 뒤 상태 잠금을 쥔 채로 수거한다.
fn wait_for_exit<'a>(
    child: &mut Child,
    shared: &'a Shared,
) -> (MutexGuard<'a, RunState>, io::Result<ExitStatus>) {
    if signal::wait_exit_unreaped(child.id()).is_ok() {
        let state = shared.lock();
        // 이미 종료된 좀비라 바로 돌아온다
        let status = child.wait();
        return (state, status);
    }

    loop {
        let state = shared.lock();
        match child.try_wait() {
            Ok(Some(status)) => return (state, Ok(status)),
            Ok(None) => {}
            Err(err) => return (state, Err(err)),
        }
        drop(state);
        thread::sleep(POLL_INTERVAL);
    }
}

fn describe_status(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("tool exited with code {}", code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return format!("tool was killed by signal {}", sig);
        }
    }
    "tool ended abnormally".to_string()
}
