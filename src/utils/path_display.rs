use std::path::Path;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// 파일 이름을 최대 너비에 맞춰 가운데를 생략한다.
///
/// 확장자가 보이도록 뒤쪽을 앞쪽과 같은 너비로 남긴다.
pub fn truncate_middle(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= ELLIPSIS.width() {
        return take_by_width(text.chars(), max_width);
    }

    let keep = max_width - ELLIPSIS.width();
    let head = take_by_width(text.chars(), keep - keep / 2);
    let tail: String = take_by_width(text.chars().rev(), keep / 2)
        .chars()
        .rev()
        .collect();
    format!("{}{}{}", head, ELLIPSIS, tail)
}

/// 작업 디렉토리 표시용: HOME은 `~`로 줄이고, 그래도 길면 앞쪽을 생략한다.
pub fn display_dir(path: &Path, max_width: usize) -> String {
    let text = shorten_home(&path.to_string_lossy());
    if text.width() <= max_width {
        return text;
    }
    if max_width <= ELLIPSIS.width() {
        return take_by_width(text.chars(), max_width);
    }

    let tail: String = take_by_width(text.chars().rev(), max_width - ELLIPSIS.width())
        .chars()
        .rev()
        .collect();
    format!("{}{}", ELLIPSIS, tail)
}

fn shorten_home(path: &str) -> String {
    let Some(home) = dirs::home_dir() else {
        return path.to_string();
    };
    let home = home.to_string_lossy();
    if home.is_empty() {
        return path.to_string();
    }
    match path.strip_prefix(home.as_ref()) {
        Some("") => "~".to_string(),
        Some(rest) if rest.starts_with('/') => format!("~{}", rest),
        _ => path.to_string(),
    }
}

fn take_by_width(chars: impl Iterator<Item = char>, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;
    for ch in chars {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_truncate_middle_short_text_unchanged() {
        assert_eq!(truncate_middle("Archive.zip", 20), "Archive.zip");
    }

    #[test]
    fn test_truncate_middle_keeps_extension() {
        let result = truncate_middle("very_long_archive_name_2024.zip", 15);
        assert_eq!(result.width(), 15);
        assert!(result.starts_with("very_l"));
        assert!(result.ends_with("4.zip"));
        assert!(result.contains(ELLIPSIS));
    }

    #[test]
    fn test_truncate_middle_wide_chars() {
        // 한글은 글자당 너비 2
        let result = truncate_middle("압축파일이름이아주김.zip", 12);
        assert!(result.width() <= 12);
        assert!(result.ends_with("zip"));
    }

    #[test]
    fn test_display_dir_cuts_front() {
        let path = PathBuf::from("/srv/data/projects/archiver/output");
        let result = display_dir(&path, 16);
        assert!(result.starts_with(ELLIPSIS));
        assert!(result.ends_with("output"));
        assert!(result.width() <= 16);
    }

    #[test]
    fn test_display_dir_tiny_width() {
        let path = PathBuf::from("/srv/data");
        assert_eq!(display_dir(&path, 2).width(), 2);
    }
}
