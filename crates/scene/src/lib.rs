pub mod entity;
pub mod hierarchy;
pub mod pack;
pub mod picking;
pub mod reconcile;
pub mod selection;
pub mod world;

pub use entity::*;
pub use hierarchy::*;
pub use reconcile::*;
pub use selection::*;
pub use world::*;
