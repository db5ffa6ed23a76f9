// UI Components
pub mod command_bar;
pub mod compress_panel;
pub mod dialog;
pub mod settings_panel;
pub mod status_bar;
pub mod warning;

pub use command_bar::CommandBar;
pub use compress_panel::CompressPanel;
pub use dialog::{Dialog, DialogKind};
pub use settings_panel::SettingsPanel;
pub use status_bar::StatusBar;
pub use warning::WarningScreen;
