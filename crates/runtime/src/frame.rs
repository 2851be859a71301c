use foundation::time::Time;

/// Deterministic frame metadata.
///
/// Hosts drive every view with the same frame sequence; transitions sample
/// their tweens at `time`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
    /// Engine time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    /// Frame zero at a given frame rate.
    pub fn first(fps: f64) -> Self {
        let dt_s = if fps.is_finite() && fps > 0.0 { 1.0 / fps } else { 1.0 / 60.0 };
        Self::new(0, dt_s)
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }

    /// Advances by whole frames until `seconds` have elapsed, rounding up.
    ///
    /// Quotients within 1e-9 of a whole frame count are not rounded up, so
    /// `skip(1.0)` at 60 fps is exactly 60 frames.
    pub fn skip(self, seconds: f64) -> Self {
        let frames = if self.dt_s > 0.0 {
            (seconds.max(0.0) / self.dt_s - 1e-9).ceil().max(0.0) as u64
        } else {
            0
        };
        Self::new(self.index + frames, self.dt_s)
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Time;

    #[test]
    fn frame_time_is_deterministic() {
        let a = Frame::new(10, 1.0 / 60.0);
        let b = Frame::new(10, 1.0 / 60.0);
        assert_eq!(a, b);
        assert_eq!(a.time, Time(10.0 / 60.0));
    }

    #[test]
    fn next_advances_index_and_time() {
        let f0 = Frame::new(0, 0.5);
        let f1 = f0.next();
        assert_eq!(f1.index, 1);
        assert_eq!(f1.time, Time(0.5));
    }

    #[test]
    fn skip_rounds_up_to_whole_frames() {
        let f = Frame::first(10.0).skip(0.25);
        assert_eq!(f.index, 3);
        assert!(f.time.0 >= 0.25);
    }

    #[test]
    fn skip_one_second_at_sixty_fps_is_sixty_frames() {
        assert_eq!(Frame::first(60.0).skip(1.0).index, 60);
        assert_eq!(Frame::first(60.0).skip(0.0).index, 0);
    }

    #[test]
    fn invalid_fps_falls_back_to_sixty() {
        assert_eq!(Frame::first(0.0).dt_s, 1.0 / 60.0);
    }
}
