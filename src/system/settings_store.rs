//! 설정 파일 저장소 (TOML)

use crate::models::settings::{Settings, SETTINGS_VERSION};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 설정 파일 경로 환경변수
pub const SETTINGS_FILE_ENV: &str = "ARCHIVER_SETTINGS_FILE";

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        if let Ok(custom) = env::var(SETTINGS_FILE_ENV) {
            let trimmed = custom.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        dirs::config_dir()
            .map(|dir| dir.join("archiver").join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("archiver-settings.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 설정 로드
    ///
    /// 파일이 없으면 기본값을 기록해 두고, 읽을 수 없거나 버전이 다르면 기본값.
    pub fn load(&self) -> Settings {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) => {
                if err.kind() == io::ErrorKind::NotFound {
                    debug!(path = %self.path.display(), "no settings file, writing defaults");
                } else {
                    warn!(path = %self.path.display(), error = %err, "settings unreadable, using defaults");
                }
                let defaults = Settings::default();
                self.save(&defaults);
                return defaults;
            }
        };

        match decode_settings(&data) {
            Some(settings) => settings,
            None => {
                warn!(path = %self.path.display(), "settings file invalid, using defaults");
                Settings::default()
            }
        }
    }

    /// 설정 저장. 실패는 기록만 하고 무시한다.
    pub fn save(&self, settings: &Settings) {
        if let Err(err) = self.try_save(settings) {
            warn!(path = %self.path.display(), error = %err, "could not save settings");
        }
    }

    fn try_save(&self, settings: &Settings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = toml::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, data)
    }
}

fn decode_settings(data: &str) -> Option<Settings> {
    let parsed: Settings = toml::from_str(data).ok()?;
    if parsed.version != SETTINGS_VERSION {
        return None;
    }
    if parsed.extension.trim().is_empty() || parsed.executable.as_os_str().is_empty() {
        return None;
    }
    Some(parsed)
}
