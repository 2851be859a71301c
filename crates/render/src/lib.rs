pub mod frame;
pub mod surface;
pub mod svg;

pub use frame::*;
pub use surface::*;
