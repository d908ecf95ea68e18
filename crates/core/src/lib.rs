#![forbid(unsafe_code)]

pub mod achievements;
pub mod catalog;
pub mod error;
pub mod learning;
pub mod metrics;
pub mod model;
pub mod session;
pub mod time;

pub use error::{CatalogError, InvalidInputError};
pub use time::Clock;
