use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 색상 테마
///
/// 기본은 Dark 테마이며, `theme.toml`에 적은 항목만 덮어쓴다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    // 배경/전경
    pub bg_primary: ColorDef,
    pub fg_primary: ColorDef,
    pub fg_dim: ColorDef,

    // 뷰 패널
    pub panel_active_border: ColorDef,
    pub panel_inactive_border: ColorDef,
    pub panel_bg: ColorDef,

    // 규칙 목록
    pub item_selected: ColorDef,
    pub item_selected_bg: ColorDef,

    // 하단 바
    pub status_bar_bg: ColorDef,
    pub status_bar_fg: ColorDef,
    pub command_bar_bg: ColorDef,
    pub command_bar_fg: ColorDef,

    // 강조
    pub accent: ColorDef,
    pub warning: ColorDef,
    pub error: ColorDef,
    pub success: ColorDef,
}

/// 색상 정의 (TOML 직렬화/역직렬화 지원)
///
/// Hex 문자열("#1e1e1e") 또는 색상 이름("Red")을 지원합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorDef {
    Hex(String),
    Named(String),
}

impl ColorDef {
    /// untagged 역직렬화는 항상 `Hex`로 들어오므로 내용으로 구분한다.
    pub fn to_color(&self) -> Color {
        let value = match self {
            ColorDef::Hex(value) | ColorDef::Named(value) => value,
        };
        if value.starts_with('#') {
            parse_hex_color(value)
        } else {
            parse_named_color(value)
        }
    }
}

impl From<&str> for ColorDef {
    fn from(s: &str) -> Self {
        if s.starts_with('#') {
            ColorDef::Hex(s.to_string())
        } else {
            ColorDef::Named(s.to_string())
        }
    }
}

fn parse_hex_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');

    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
        Color::Rgb(r, g, b)
    } else {
        Color::Reset
    }
}

fn parse_named_color(name: &str) -> Color {
    match name.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "white" => Color::White,
        _ => Color::Reset,
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark 테마 (기본)
    pub fn dark() -> Self {
        Theme {
            bg_primary: "#1e1e1e".into(),
            fg_primary: "#d4d4d4".into(),
            fg_dim: "#808080".into(),

            panel_active_border: "#0078d4".into(),
            panel_inactive_border: "#3c3c3c".into(),
            panel_bg: "#252526".into(),

            item_selected: "#ffffff".into(),
            item_selected_bg: "#0078d4".into(),

            status_bar_bg: "#007acc".into(),
            status_bar_fg: "#ffffff".into(),
            command_bar_bg: "#1e1e1e".into(),
            command_bar_fg: "#d4d4d4".into(),

            accent: "#0078d4".into(),
            warning: "#cca700".into(),
            error: "#f44747".into(),
            success: "#4ec9b0".into(),
        }
    }

    /// TOML 파일에서 테마 로드 (빠진 항목은 Dark 값)
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let theme: Theme = toml::from_str(&content)?;
        Ok(theme)
    }
}

/// 테마 관리자
pub struct ThemeManager {
    current_theme: Theme,
}

impl ThemeManager {
    pub fn new() -> Self {
        Self {
            current_theme: Theme::dark(),
        }
    }

    pub fn current(&self) -> &Theme {
        &self.current_theme
    }

    /// 사용자 테마 파일 위치
    pub fn default_theme_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("archiver").join("theme.toml"))
    }

    /// 테마 파일이 있으면 적용. 적용했으면 `true`.
    pub fn load_override(&mut self, path: &Path) -> Result<bool, anyhow::Error> {
        if !path.exists() {
            return Ok(false);
        }
        self.current_theme = Theme::from_file(path)?;
        Ok(true)
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}
