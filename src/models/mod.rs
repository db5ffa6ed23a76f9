// Data Models
pub mod job;
pub mod rule;
pub mod settings;

pub use job::{CompressionJob, JobId, JobOutcome, JobPhase};
pub use rule::{CompressionRule, FILENAME_PLACEHOLDER};
pub use settings::{Settings, WindowPosition};
