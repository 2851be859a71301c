use foundation::bounds::Rect2;
use foundation::color::Rgb;
use foundation::math::Vec2;

/// Fill and stroke of a shape. `None` means "not painted".
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Paint {
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Paint {
    pub fn fill(color: Rgb) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
            opacity: 1.0,
        }
    }

    /// Adds a stroke; a non-positive width clears it.
    pub fn with_stroke(mut self, color: Rgb, width: f64) -> Self {
        if width > 0.0 {
            self.stroke = Some(color);
            self.stroke_width = width;
        } else {
            self.stroke = None;
            self.stroke_width = 0.0;
        }
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Circle {
        center: Vec2,
        r: f64,
        paint: Paint,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgb,
        width: f64,
    },
    Rect {
        rect: Rect2,
        paint: Paint,
    },
    Text {
        at: Vec2,
        text: String,
        anchor: TextAnchor,
        size: f64,
    },
}

/// One presented picture, in surface pixels. Commands paint in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderFrame {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<RenderCommand>,
}

impl RenderFrame {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Circles in paint order as `(center, r, paint)`.
    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f64, &Paint)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Circle { center, r, paint } => Some((*center, *r, paint)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Paint, RenderCommand, RenderFrame, TextAnchor};
    use foundation::color::Rgb;
    use foundation::math::Vec2;

    #[test]
    fn zero_width_stroke_is_cleared() {
        let p = Paint::fill(Rgb::BLACK).with_stroke(Rgb::RED, 2.0);
        assert_eq!(p.stroke, Some(Rgb::RED));
        let p = p.with_stroke(Rgb::RED, 0.0);
        assert_eq!(p.stroke, None);
        assert_eq!(p.stroke_width, 0.0);
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(Paint::fill(Rgb::BLACK).with_opacity(3.0).opacity, 1.0);
    }

    #[test]
    fn circle_and_text_accessors_skip_other_commands() {
        let mut frame = RenderFrame::new(10.0, 10.0);
        frame.push(RenderCommand::Line {
            from: Vec2::ZERO,
            to: Vec2::new(1.0, 0.0),
            color: Rgb::BLACK,
            width: 1.0,
        });
        frame.push(RenderCommand::Circle {
            center: Vec2::new(2.0, 3.0),
            r: 4.0,
            paint: Paint::fill(Rgb::RED),
        });
        frame.push(RenderCommand::Text {
            at: Vec2::ZERO,
            text: "10".to_string(),
            anchor: TextAnchor::Middle,
            size: 10.0,
        });
        let circles: Vec<_> = frame.circles().map(|(c, r, _)| (c, r)).collect();
        assert_eq!(circles, vec![(Vec2::new(2.0, 3.0), 4.0)]);
        assert_eq!(frame.texts().collect::<Vec<_>>(), vec!["10"]);
        assert_eq!(frame.len(), 3);
    }
}
