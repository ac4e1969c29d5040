//! Interaction categories and the records extracted from PLIP reports.
pub mod structs;

// Re-exports
pub use structs::*;
