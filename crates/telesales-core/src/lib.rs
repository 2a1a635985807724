pub mod config;
pub mod distributor;
pub mod error;
pub mod io;
pub mod paths;
pub mod provider;
pub mod schedule;
pub mod shuffle;
pub mod store;
pub mod types;

pub use error::{CrmError, Result};
