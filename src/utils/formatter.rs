// Formatters - 경과 시간, 시각, 명령줄 포맷팅

use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::time::Duration;

/// 경과 시간을 "MM:SS" (1시간 이상이면 "H:MM:SS") 형식으로 포맷팅
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// 작업 시작 시각 표시 ("HH:MM:SS")
pub fn format_clock(time: DateTime<Local>) -> String {
    time.format("%H:%M:%S").to_string()
}

/// 실행 명령을 셸에 붙여넣을 수 있는 한 줄로 표시 (로그/상태 표시 전용)
///
/// 실제 실행은 인자 벡터로 하므로 여기서의 따옴표 처리는 표시용이다.
pub fn format_command_line(program: &std::path::Path, args: &[OsString]) -> String {
    let words: Vec<String> = std::iter::once(program.to_string_lossy().into_owned())
        .chain(args.iter().map(|arg| arg.to_string_lossy().into_owned()))
        .collect();
    shlex::try_join(words.iter().map(String::as_str)).unwrap_or_else(|_| words.join(" "))
}
