// System Layer
pub mod filetype;
pub mod namer;
pub mod process;
pub mod rules;
pub mod settings_store;
pub mod signal;

pub use namer::plan_job;
pub use process::{JobObserver, ProcessRunner};
pub use rules::RulesStore;
pub use settings_store::SettingsStore;
