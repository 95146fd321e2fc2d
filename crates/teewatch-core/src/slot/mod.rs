//! Tee-time slot data and the rule that decides when a slot is worth
//! reporting.

pub mod evaluator;
pub mod types;

pub use evaluator::is_suitable;
pub use types::{Participant, SlotInfo, TeeSheetDay};
