pub mod classifier;
pub mod extractor;
pub mod job;
pub mod notifier;
pub mod pending;
pub mod report;
pub mod retry;
pub mod sheets;
pub mod shift_calendar;

pub use job::{ReportJob, RunOutcome, SheetRange};
pub use notifier::{LogNotifier, Notifier, SeaTalkNotifier};
pub use report::build_messages;
pub use sheets::{FileSource, SheetsSource, SnapshotSource};
