//! Input/output helpers.
//!
//! - snapshot store on disk (`store`)
//! - CSV ingest + validation (`ingest`)
//! - series exports (`export`)

pub mod export;
pub mod ingest;
pub mod store;

pub use export::*;
pub use ingest::*;
pub use store::*;
