//! Visual constants and the animatable look of a mark.

use foundation::bounds::Rect2;
use foundation::color::Rgb;
use foundation::math::Vec2;
use render::Paint;
use runtime::transition::Lerp;

use crate::engine::Size;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// Drawing area left inside `size`, never negative.
    pub fn inner(&self, size: Size) -> (f64, f64) {
        (
            (size.width - self.left - self.right).max(0.0),
            (size.height - self.top - self.bottom).max(0.0),
        )
    }

    /// Offset from surface pixels to inner-area pixels.
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Inner area in inner-area coordinates.
    pub fn plot_area(&self, size: Size) -> Rect2 {
        let (w, h) = self.inner(size);
        Rect2::from_size(w, h)
    }
}

/// Animatable appearance of a circle mark.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Look {
    pub radius: f64,
    pub fill: Rgb,
    pub stroke: Rgb,
    /// Zero means no stroke.
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Look {
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn paint(&self) -> Paint {
        Paint::fill(self.fill)
            .with_stroke(self.stroke, self.stroke_width)
            .with_opacity(self.opacity)
    }
}

impl Lerp for Look {
    fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            radius: self.radius.lerp(other.radius, t),
            fill: self.fill.lerp(other.fill, t),
            stroke: self.stroke.lerp(other.stroke, t),
            stroke_width: self.stroke_width.lerp(other.stroke_width, t),
            opacity: self.opacity.lerp(other.opacity, t),
        }
    }
}

pub mod scatter {
    use foundation::color::Rgb;

    use super::{Look, Margin};

    pub const MARGIN: Margin = Margin {
        top: 100.0,
        right: 10.0,
        bottom: 50.0,
        left: 100.0,
    };
    pub const DEFAULT_OPACITY: f64 = 0.3;
    pub const RADIUS: f64 = 3.0;
    pub const EMPHASIS_RADIUS: f64 = 8.0;
    pub const HOVER_STROKE: f64 = 3.0;
    pub const SELECTED_STROKE: f64 = 2.0;
    pub const DATA_TRANSITION_S: f64 = 1.0;
    pub const EXIT_TRANSITION_S: f64 = 0.5;
    pub const HOVER_TRANSITION_S: f64 = 0.15;
    pub const TICK_COUNT: usize = 10;
    pub const BRUSH_FILL: Rgb = Rgb::new(0x77, 0x77, 0x77);
    pub const BRUSH_OPACITY: f64 = 0.3;
    pub const BRUSH_STROKE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const DEFAULT: Look = Look {
        radius: RADIUS,
        fill: Rgb::BLACK,
        stroke: Rgb::RED,
        stroke_width: 0.0,
        opacity: DEFAULT_OPACITY,
    };

    /// Marker appearance for a (selected, hovered) pair.
    ///
    /// Hover emphasis adds to selection emphasis; a hovered marker is drawn
    /// large with the hover stroke whether or not it is selected.
    pub fn look(selected: bool, hovered: bool) -> Look {
        if !selected && !hovered {
            return DEFAULT;
        }
        Look {
            radius: EMPHASIS_RADIUS,
            fill: Rgb::RED,
            stroke: Rgb::BLACK,
            stroke_width: if hovered { HOVER_STROKE } else { SELECTED_STROKE },
            opacity: if selected { 1.0 } else { DEFAULT_OPACITY },
        }
    }
}

pub mod pack {
    use foundation::color::Rgb;

    use super::{Look, Margin};

    pub const MARGIN: Margin = Margin::uniform(20.0);
    pub const PADDING: f64 = 3.0;
    pub const DEFAULT_OPACITY: f64 = 0.8;
    pub const DIMMED_OPACITY: f64 = 0.1;
    pub const LOW: Rgb = Rgb::new(0x2c, 0xa0, 0x2c);
    pub const MID: Rgb = Rgb::new(0xff, 0xcc, 0x00);
    pub const HIGH: Rgb = Rgb::new(0xd6, 0x27, 0x28);
    pub const GROUP_FILL: Rgb = Rgb::new(0xe0, 0xe0, 0xe0);
    pub const GROUP_STROKE: Rgb = Rgb::new(0xcc, 0xcc, 0xcc);
    pub const GROUP_STROKE_WIDTH: f64 = 1.0;
    pub const DATA_TRANSITION_S: f64 = 1.0;
    pub const EXIT_TRANSITION_S: f64 = 0.5;
    pub const SELECTED_STROKE: f64 = 2.0;
    pub const HOVER_STROKE: f64 = 4.0;

    pub fn group_look(radius: f64) -> Look {
        Look {
            radius,
            fill: GROUP_FILL,
            stroke: GROUP_STROKE,
            stroke_width: GROUP_STROKE_WIDTH,
            opacity: DEFAULT_OPACITY,
        }
    }

    /// Leaf appearance given its colour and the shared interaction state.
    pub fn leaf_look(
        radius: f64,
        fill: Rgb,
        selection_active: bool,
        selected: bool,
        hovered: bool,
    ) -> Look {
        let opacity = match (selection_active, selected) {
            (false, _) => DEFAULT_OPACITY,
            (true, true) => 1.0,
            (true, false) => DIMMED_OPACITY,
        };
        let stroke_width = if hovered {
            HOVER_STROKE
        } else if selection_active && selected {
            SELECTED_STROKE
        } else {
            0.0
        };
        Look {
            radius,
            fill,
            stroke: Rgb::BLACK,
            stroke_width,
            opacity,
        }
    }
}
