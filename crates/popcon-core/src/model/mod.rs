//! Shared record-state model for the decision and staging steps.

pub mod data_type;
pub mod log_entry;
pub mod tag_state;
pub mod transfer;

pub use data_type::DataType;
pub use log_entry::LogDbEntry;
pub use tag_state::TagState;
pub use transfer::{TransferItem, TransferQueue};
