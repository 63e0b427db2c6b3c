#![forbid(unsafe_code)]

pub mod catalog;
pub mod countdown;
pub mod error;
pub mod ledger;
pub mod model;
pub mod planner;
pub mod progress;
pub mod time;

pub use error::{Error, IndexError, ValidationError};
pub use time::Clock;
