//! Domain models for the impact engine
//!
//! This module contains the dataset row type and the selection key callers
//! narrow step by step.

pub mod record;
pub mod selection;

pub use record::{DatasetRecord, DatasetVariant, INDUSTRY_SLOTS, IndustrySlot};
pub use selection::{RecordKey, Selection, SelectionLevel};
