//! 사용자 설정 모델
//!
//! 마지막으로 선택한 압축 규칙과 창(패널) 관련 설정을 보관한다.

use crate::models::rule::CompressionRule;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 설정 파일 형식 버전
pub const SETTINGS_VERSION: u32 = 1;

/// 기본 프로세스 우선순위 (nice 값, 낮은 우선순위)
pub const DEFAULT_PRIORITY: i32 = 10;

/// 패널 위치 (터미널 셀 좌표)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x: u16,
    pub y: u16,
}

impl Default for WindowPosition {
    fn default() -> Self {
        Self { x: 2, y: 1 }
    }
}

/// 영속 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub version: u32,
    /// 선택된 규칙 설명
    pub file_description: String,
    /// 선택된 규칙 변형
    pub file_variant: String,
    /// 결과 MIME 타입
    pub mime_type: String,
    /// 결과 확장자
    pub extension: String,
    /// 압축 도구 경로
    pub executable: PathBuf,
    /// 도구 인자 (순서 유지)
    pub arguments: Vec<String>,
    /// 압축 프로세스 nice 값
    pub priority: i32,
    /// 패널 위치
    pub window_position: WindowPosition,
    /// 압축 완료 후 작업 뷰 자동 닫기
    pub close_on_finish: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let rule = CompressionRule::default_zip();
        Self {
            version: SETTINGS_VERSION,
            file_description: rule.description,
            file_variant: rule.variant,
            mime_type: rule.mime_type,
            extension: rule.extension,
            executable: rule.executable,
            arguments: rule.arguments,
            priority: DEFAULT_PRIORITY,
            window_position: WindowPosition::default(),
            close_on_finish: true,
        }
    }
}

impl Settings {
    /// 규칙 선택 반영 (이전 규칙 정보는 모두 대체)
    pub fn apply_rule(&mut self, rule: &CompressionRule) {
        self.file_description = rule.description.clone();
        self.file_variant = rule.variant.clone();
        self.mime_type = rule.mime_type.clone();
        self.extension = rule.extension.clone();
        self.executable = rule.executable.clone();
        self.arguments = rule.arguments.clone();
    }

    /// 현재 설정으로 작업에 쓸 규칙 구성
    pub fn active_rule(&self) -> CompressionRule {
        CompressionRule {
            description: self.file_description.clone(),
            variant: self.file_variant.clone(),
            mime_type: self.mime_type.clone(),
            extension: self.extension.clone(),
            executable: self.executable.clone(),
            arguments: self.arguments.clone(),
        }
    }

    /// 설정에 저장된 규칙과 같은 규칙인지 (설명 + 변형으로 비교)
    pub fn matches_rule(&self, rule: &CompressionRule) -> bool {
        self.file_description == rule.description && self.file_variant == rule.variant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tar_rule() -> CompressionRule {
        CompressionRule {
            description: "TAR archive".into(),
            variant: "gzip".into(),
            mime_type: "application/x-gzip".into(),
            extension: ".tar.gz".into(),
            executable: PathBuf::from("/bin/tar"),
            arguments: vec!["-czf".into(), "FILENAME".into()],
        }
    }

    #[test]
    fn test_default_settings_use_zip_rule() {
        let settings = Settings::default();
        assert_eq!(settings.active_rule(), CompressionRule::default_zip());
        assert!(settings.close_on_finish);
        assert_eq!(settings.priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn test_apply_rule_replaces_previous() {
        let mut settings = Settings::default();
        settings.apply_rule(&tar_rule());

        assert_eq!(settings.active_rule(), tar_rule());
        assert!(settings.matches_rule(&tar_rule()));
        assert!(!settings.matches_rule(&CompressionRule::default_zip()));
    }

    #[test]
    fn test_settings_toml_round_trip() {
        let mut settings = Settings::default();
        settings.close_on_finish = false;
        settings.window_position = WindowPosition { x: 10, y: 4 };

        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
