//! Bottom and left axes with "nice" ticks.

use foundation::color::Rgb;
use foundation::math::Vec2;
use foundation::scale::LinearScale;
use render::{RenderCommand, TextAnchor};

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const FONT_SIZE: f64 = 10.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Position along the axis, in the scale's range units.
    pub offset: f64,
    pub label: String,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Axis {
    scale: LinearScale,
    orient: Orient,
    tick_count: usize,
}

impl Axis {
    pub fn bottom(scale: LinearScale, tick_count: usize) -> Self {
        Self {
            scale,
            orient: Orient::Bottom,
            tick_count,
        }
    }

    pub fn left(scale: LinearScale, tick_count: usize) -> Self {
        Self {
            scale,
            orient: Orient::Left,
            tick_count,
        }
    }

    pub fn orient(&self) -> Orient {
        self.orient
    }

    pub fn ticks(&self) -> Vec<Tick> {
        let values = self.scale.ticks(self.tick_count);
        let step = match values.as_slice() {
            [a, b, ..] => (b - a).abs(),
            [single] if *single != 0.0 => single.abs(),
            _ => 1.0,
        };
        values
            .into_iter()
            .filter_map(|value| {
                let offset = self.scale.try_map(value)?;
                Some(Tick {
                    value,
                    offset,
                    label: format_tick(value, step),
                })
            })
            .collect()
    }

    /// Draw commands with the axis line anchored at `origin` (surface pixels).
    pub fn commands(&self, origin: Vec2) -> Vec<RenderCommand> {
        let [r0, r1] = self.scale.range();
        let along = |offset: f64| match self.orient {
            Orient::Bottom => origin + Vec2::new(offset, 0.0),
            Orient::Left => origin + Vec2::new(0.0, offset),
        };
        let outward = match self.orient {
            Orient::Bottom => Vec2::new(0.0, 1.0),
            Orient::Left => Vec2::new(-1.0, 0.0),
        };

        let mut out = vec![RenderCommand::Line {
            from: along(r0),
            to: along(r1),
            color: Rgb::BLACK,
            width: 1.0,
        }];
        for tick in self.ticks() {
            let base = along(tick.offset);
            out.push(RenderCommand::Line {
                from: base,
                to: base + outward * TICK_SIZE,
                color: Rgb::BLACK,
                width: 1.0,
            });
            let (at, anchor) = match self.orient {
                Orient::Bottom => (
                    base + Vec2::new(0.0, TICK_SIZE + TICK_PADDING + FONT_SIZE * 0.71),
                    TextAnchor::Middle,
                ),
                Orient::Left => (
                    base + Vec2::new(-(TICK_SIZE + TICK_PADDING), FONT_SIZE * 0.32),
                    TextAnchor::End,
                ),
            };
            out.push(RenderCommand::Text {
                at,
                text: tick.label,
                anchor,
                size: FONT_SIZE,
            });
        }
        out
    }
}

/// Fixed-point label with thousands separators, precise enough for `step`.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step.is_finite() && step > 0.0 {
        (0..=20)
            .find(|&d| {
                let scaled = step * 10f64.powi(d);
                (scaled - scaled.round()).abs() <= 1e-6 * scaled.max(1.0)
            })
            .unwrap_or(20) as usize
    } else {
        0
    };
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    let is_zero = grouped.chars().all(|c| matches!(c, '0' | '.' | ','));
    if value < 0.0 && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}
