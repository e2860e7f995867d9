pub mod config;
pub mod error;
pub mod io;
pub mod matching;
pub mod model;
pub mod normalize;
pub mod ops;
pub mod reconcile;
pub mod report;

pub use error::{AuditError, Result};
