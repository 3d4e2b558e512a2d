pub mod columns;
pub mod settings;

pub use columns::{ColumnAliases, Field};
pub use settings::{ReportConfig, Settings};
