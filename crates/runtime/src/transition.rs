//! Retargetable tweens.
//!
//! A tween is sampled against the host's frame clock and never blocks.
//! Retargeting starts the new animation from the value currently on screen,
//! so a newer render pass supersedes an in-flight one without a jump.

use foundation::color::Rgb;
use foundation::math::Vec2;
use foundation::time::{Time, TimeSpan};

pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(self, other: Self, t: f64) -> Self {
        Vec2::lerp(self, other, t)
    }
}

impl Lerp for Rgb {
    fn lerp(self, other: Self, t: f64) -> Self {
        Rgb::lerp(self, other, t)
    }
}

/// Symmetric cubic ease-in-out over `t` in `[0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t2 = t.clamp(0.0, 1.0) * 2.0;
    if t2 <= 1.0 {
        t2 * t2 * t2 / 2.0
    } else {
        let u = t2 - 2.0;
        (u * u * u + 2.0) / 2.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    span: TimeSpan,
}

impl<T: Lerp> Tween<T> {
    /// A tween already at rest on `value`.
    pub fn settled(value: T) -> Self {
        Self {
            from: value,
            to: value,
            span: TimeSpan::instant(Time::ZERO),
        }
    }

    pub fn animate(from: T, to: T, now: Time, duration_s: f64) -> Self {
        Self {
            from,
            to,
            span: TimeSpan::starting_at(now, duration_s),
        }
    }

    pub fn value_at(&self, t: Time) -> T {
        let p = ease_cubic_in_out(self.span.progress(t));
        if p >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, p)
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn is_finished(&self, t: Time) -> bool {
        self.span.progress(t) >= 1.0
    }

    /// Redirects the animation toward `to`, starting from the value at `now`.
    pub fn retarget(&mut self, now: Time, to: T, duration_s: f64) {
        self.from = self.value_at(now);
        self.to = to;
        self.span = TimeSpan::starting_at(now, duration_s);
    }
}

#[cfg(test)]
mod tests {
    use super::{Tween, ease_cubic_in_out};
    use foundation::math::Vec2;
    use foundation::time::Time;

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert!(ease_cubic_in_out(0.25) < 0.25);
        assert!(ease_cubic_in_out(0.75) > 0.75);
    }

    #[test]
    fn tween_reaches_target_at_end() {
        let t = Tween::animate(0.0, 10.0, Time(1.0), 1.0);
        assert_eq!(t.value_at(Time(0.5)), 0.0);
        assert_eq!(t.value_at(Time(1.5)), 5.0);
        assert_eq!(t.value_at(Time(2.0)), 10.0);
        assert!(t.is_finished(Time(2.0)));
        assert!(!t.is_finished(Time(1.9)));
    }

    #[test]
    fn retarget_starts_from_current_value() {
        // Sampled at half progress, where the cubic curve passes through 0.5.
        let mut t = Tween::animate(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Time(0.0), 1.0);
        t.retarget(Time(0.5), Vec2::new(0.0, 0.0), 1.0);
        assert_eq!(t.value_at(Time(0.5)), Vec2::new(5.0, 0.0));
        assert_eq!(t.value_at(Time(1.0)), Vec2::new(2.5, 0.0));
        assert_eq!(t.target(), Vec2::new(0.0, 0.0));
        assert!(t.is_finished(Time(1.5)));
    }

    #[test]
    fn zero_duration_is_immediate() {
        let t = Tween::animate(1.0, 3.0, Time(2.0), 0.0);
        assert_eq!(t.value_at(Time(2.0)), 3.0);
    }

    #[test]
    fn settled_is_constant() {
        let t = Tween::settled(4.0);
        assert_eq!(t.value_at(Time(100.0)), 4.0);
        assert_eq!(t.value_at(Time(0.0)), 4.0);
        assert!(t.is_finished(Time(0.0)));
    }
}
