pub mod shipment;
pub mod snapshot;

pub use shipment::{ArrivalConfirmation, PendingCategory, Shift, Shipment, StatusClass};
pub use snapshot::{RawRow, Snapshot};
