pub mod coerce;
pub mod config;
pub mod dataset;

pub use coerce::*;
pub use config::*;
pub use dataset::*;
