pub mod audio;
pub mod config;
pub mod error;
pub mod interactive;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod sentiment;
pub mod summarize;
pub mod text;
pub mod topics;
pub mod transcribe;

pub use config::Config;
pub use error::{AudiogistError, Result};
pub use models::{ModelKind, ModelRegistry};
pub use pipeline::{run_analysis, AnalysisInput, AnalysisOptions};
pub use report::{print_summary, AnalysisReport};
