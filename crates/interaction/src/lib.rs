pub mod mediator;
pub mod state;
pub mod store;

pub use mediator::*;
pub use state::*;
pub use store::*;
