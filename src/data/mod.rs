//! Remote dataset access.

pub mod ctp;

pub use ctp::*;
