//! datasweeper - Clean, preview and convert tabular data
//!
//! Loads CSV and Excel files, previews them, removes duplicates and fills
//! missing values, restricts columns, charts numeric data and converts the
//! result to the other format.

pub mod chart;
pub mod clean;
pub mod config;
pub mod error;
pub mod export;
pub mod inspect;
pub mod loader;
pub mod logging;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod project;
pub mod session;

pub use config::Config;
pub use error::{SweepError, SweepResult};
pub use loader::UploadedFile;
pub use model::Table;
pub use pipeline::SweepReport;
pub use session::{FileState, Session, Stage};
