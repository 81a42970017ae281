pub mod types;
pub mod filters;
pub mod config;
pub mod error;

pub use types::*;
pub use filters::*;
pub use config::{Config, PlaceRef};
pub use error::ReviewLensError;
