pub mod bounds;
pub mod color;
pub mod ids;
pub mod math;
pub mod scale;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use color::*;
pub use ids::*;
pub use scale::*;
pub use time::*;
