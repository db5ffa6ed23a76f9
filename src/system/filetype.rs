//! 생성된 압축 파일의 형식 확인
//!
//! 압축이 끝난 뒤(성공 여부와 무관하게) 결과 파일 앞부분을 읽어 실제 형식을 판별한다.
//! 실패해도 작업 결과에는 영향을 주지 않는다.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// 판별에 필요한 최대 바이트 수 (tar의 "ustar" 시그니처가 257에 있음)
const SNIFF_LEN: usize = 265;

const SIGNATURES: &[(&[u8], &str)] = &[
    (b"PK\x03\x04", "application/zip"),
    (b"PK\x05\x06", "application/zip"),
    (b"\x1f\x8b", "application/gzip"),
    (b"BZh", "application/x-bzip2"),
    (b"\xfd7zXZ\x00", "application/x-xz"),
    (b"\x28\xb5\x2f\xfd", "application/zstd"),
    (b"7z\xbc\xaf\x27\x1c", "application/x-7z-compressed"),
    (b"Rar!\x1a\x07", "application/vnd.rar"),
];

/// 결과 파일의 MIME 타입을 다시 판별한다. 파일이 없거나 모르는 형식이면 `None`.
pub fn refresh_file_type(path: &Path) -> Option<&'static str> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    let read = File::open(path)
        .and_then(|file| file.take(SNIFF_LEN as u64).read_to_end(&mut head));
    if let Err(err) = read {
        debug!(path = %path.display(), error = %err, "file type refresh skipped");
        return None;
    }

    let detected = sniff(&head);
    debug!(path = %path.display(), mime = ?detected, "file type refreshed");
    detected
}

fn sniff(head: &[u8]) -> Option<&'static str> {
    if let Some((_, mime)) = SIGNATURES.iter().find(|(magic, _)| head.starts_with(magic)) {
        return Some(*mime);
    }
    if head.len() >= 262 && &head[257..262] == b"ustar" {
        return Some("application/x-tar");
    }
    None
}
