pub mod axis;
pub mod circle_pack;
pub mod engine;
pub mod scatterplot;
pub mod style;

pub use circle_pack::CirclePackView;
pub use engine::*;
pub use scatterplot::ScatterplotView;
