mod delivery_log;
mod summary;

pub use delivery_log::{DeliveryLog, DeliveryLogList, DeliveryStatus, UnknownStatus};
pub use summary::{NewSummary, Summary, SummaryList};
