//! 자식 프로세스 제어용 OS 호출
//!
//! std에 없는 부분만 다룬다: SIGTERM, 우선순위 조정, 수거하지 않는 종료 대기.

use std::io;

/// SIGTERM 전송. 프로세스가 이미 없으면 `Ok(false)`.
#[cfg(unix)]
pub fn send_terminate(pid: u32) -> io::Result<bool> {
    // SAFETY: kill은 메모리를 건드리지 않는다
    let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if rc == 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        Ok(false)
    } else {
        Err(err)
    }
}

#[cfg(not(unix))]
pub fn send_terminate(_pid: u32) -> io::Result<bool> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "graceful termination is only available on Unix",
    ))
}

/// 프로세스 nice 값 설정
#[cfg(unix)]
pub fn set_priority(pid: u32, nice: i32) -> io::Result<()> {
    // SAFETY: 포인터 인자 없음
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, pid as libc::id_t, nice) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
pub fn set_priority(_pid: u32, _nice: i32) -> io::Result<()> {
    Ok(())
}

/// 자식이 종료될 때까지 대기하되 수거(reap)하지 않는다.
///
/// 좀비로 남아 있는 동안 pid가 재사용되지 않으므로 종료 판정 전까지
/// 같은 pid로 보내는 신호는 항상 원래 프로세스에 간다.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn wait_exit_unreaped(pid: u32) -> io::Result<()> {
    loop {
        // SAFETY: siginfo_t는 0으로 초기화해도 유효한 POD
        let mut info: libc::siginfo_t = unsafe { std::mem::zeroed() };
        let rc = unsafe {
            libc::waitid(
                libc::P_PID,
                pid as libc::id_t,
                &mut info,
                libc::WEXITED | libc::WNOWAIT,
            )
        };
        if rc == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

/// 자식이 이미 종료했는지 (수거하지 않고 확인)
///
/// 종료 후 아직 수거되지 않은 좀비에도 `kill`은 성공하므로
/// 신호를 보내기 전에 이것으로 먼저 확인한다.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn has_exited(pid: u32) -> io::Result<bool> {
    // SAFETY: siginfo_t는 0으로 초기화해도 유효한 POD
    let mut info: libc::siginfo_t = unsafe { std::mem::zeroed() };
    let rc = unsafe {
        libc::waitid(
            libc::P_PID,
            pid as libc::id_t,
            &mut info,
            libc::WEXITED | libc::WNOHANG | libc::WNOWAIT,
        )
    };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    // WNOHANG: 아직 실행 중이면 si_pid가 0으로 남는다
    // SAFETY: waitid가 채운 siginfo_t
    Ok(unsafe { info.si_pid() } != 0)
}

/// 폴링 감시에서는 종료 확인과 수거가 같은 잠금 안에서 일어나므로 따로 확인하지 않는다.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn has_exited(_pid: u32) -> io::Result<bool> {
    Ok(false)
}

/// 비수거 대기가 없는 플랫폼에서는 감시 스레드가 폴링한다.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn wait_exit_unreaped(_pid: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "non-reaping wait is not available on this platform",
    ))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_send_terminate_running_child() {
        let mut child = Command::new("/bin/sh")
            .arg("-c")
            .arg("exec sleep 30")
            .spawn()
            .unwrap();

        assert!(send_terminate(child.id()).unwrap());
        let status = child.wait().unwrap();
        assert!(!status.success());
    }

    #[test]
    fn test_set_priority_lower_is_allowed() {
        let mut child = Command::new("/bin/sh")
            .arg("-c")
            .arg("exec sleep 30")
            .spawn()
            .unwrap();

        // 우선순위를 낮추는 것은 권한 없이 가능
        assert!(set_priority(child.id(), 19).is_ok());
        let _ = child.kill();
        let _ = child.wait();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_has_exited_does_not_reap() {
        let mut child = Command::new("/bin/sh")
            .arg("-c")
            .arg("exec sleep 30")
            .spawn()
            .unwrap();
        assert!(!has_exited(child.id()).unwrap());

        child.kill().unwrap();
        wait_exit_unreaped(child.id()).unwrap();
        assert!(has_exited(child.id()).unwrap());
        // 확인만 했으므로 std가 여전히 수거할 수 있어야 함
        assert!(!child.wait().unwrap().success());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_wait_exit_unreaped_keeps_zombie() {
        let mut child = Command::new("/bin/sh").arg("-c").arg("exit 3").spawn().unwrap();

        wait_exit_unreaped(child.id()).unwrap();
        // 아직 수거되지 않았으므로 std가 종료 코드를 받을 수 있어야 함
        let status = child.wait().unwrap();
        assert_eq!(status.code(), Some(3));
    }
}
