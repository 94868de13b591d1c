pub mod pipeline;
pub mod validator;

pub use pipeline::{clean_file, CleanupOutcome, CleanupPipeline};
pub use validator::{TableValidator, ValidationResult, ValidationStats};
