//! Value → pixel and value → colour mappings.
//!
//! Scales are plain values. Views derive fresh scales from the current dataset
//! on every render pass and never mutate a scale in place.

use crate::color::Rgb;

/// Minimum and maximum over the finite values of `values`.
///
/// Returns `None` when no finite value exists.
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let mut out: Option<(f64, f64)> = None;
    for v in values.into_iter().filter(|v| v.is_finite()) {
        out = Some(match out {
            None => (v, v),
            Some((min, max)) => (min.min(v), max.max(v)),
        });
    }
    out
}

/// Continuous linear mapping from a data domain onto a pixel range.
///
/// A degenerate domain (`d0 == d1`) maps every finite input onto the range
/// midpoint instead of dividing by zero.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Scale whose domain is the finite extent of `values`, or `[0, 1]` when
    /// there is none.
    pub fn from_values<I>(values: I, range: [f64; 2]) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = extent(values).unwrap_or((0.0, 1.0));
        Self::new([min, max], range)
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn is_degenerate(&self) -> bool {
        self.domain[0] == self.domain[1]
    }

    fn range_mid(&self) -> f64 {
        (self.range[0] + self.range[1]) / 2.0
    }

    /// Maps `v` onto the range. Non-finite input yields NaN.
    pub fn map(&self, v: f64) -> f64 {
        if !v.is_finite() {
            return f64::NAN;
        }
        let [d0, d1] = self.domain;
        if d0 == d1 {
            return self.range_mid();
        }
        let t = (v - d0) / (d1 - d0);
        self.range[0] + t * (self.range[1] - self.range[0])
    }

    /// Like [`LinearScale::map`] but `None` for inputs that would not produce
    /// a finite coordinate.
    pub fn try_map(&self, v: f64) -> Option<f64> {
        let out = self.map(v);
        out.is_finite().then_some(out)
    }

    /// Range → domain. A degenerate domain inverts to its single value.
    pub fn invert(&self, px: f64) -> f64 {
        let [r0, r1] = self.range;
        if r0 == r1 || self.is_degenerate() {
            return self.domain[0];
        }
        let t = (px - r0) / (r1 - r0);
        self.domain[0] + t * (self.domain[1] - self.domain[0])
    }

    /// Human-friendly tick values (steps of 1, 2 or 5 × 10^k) covering the
    /// domain, approximately `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let [d0, d1] = self.domain;
        if !d0.is_finite() || !d1.is_finite() {
            return Vec::new();
        }
        if d0 == d1 {
            return vec![d0];
        }
        let (start, stop, reverse) = if d0 < d1 {
            (d0, d1, false)
        } else {
            (d1, d0, true)
        };
        let Some((i1, i2, inc)) = tick_increment(start, stop, count as f64) else {
            return Vec::new();
        };
        if i2 < i1 {
            return Vec::new();
        }
        let mut out: Vec<f64> = (i1..=i2)
            .map(|i| {
                if inc < 0.0 {
                    i as f64 / -inc
                } else {
                    i as f64 * inc
                }
            })
            .collect();
        if reverse {
            out.reverse();
        }
        out
    }
}

/// Integer tick bounds plus increment; a negative increment encodes a
/// fractional step as its reciprocal to avoid float drift.
fn tick_increment(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    if count <= 0.0 {
        return None;
    }
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (stop - start) / count;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = (start * inv).round() as i64;
        i2 = (stop * inv).round() as i64;
        if (i1 as f64) / inv < start {
            i1 += 1;
        }
        if (i2 as f64) / inv > stop {
            i2 -= 1;
        }
        inc = -inv;
    } else {
        let step = 10f64.powf(power) * factor;
        i1 = (start / step).round() as i64;
        i2 = (stop / step).round() as i64;
        if (i1 as f64) * step < start {
            i1 += 1;
        }
        if (i2 as f64) * step > stop {
            i2 -= 1;
        }
        inc = step;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_increment(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

/// Three-stop diverging colour scale (low → mid → high), interpolated in RGB.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Diverging3ColorScale {
    domain: [f64; 3],
    colors: [Rgb; 3],
}

impl Diverging3ColorScale {
    pub fn new(domain: [f64; 3], colors: [Rgb; 3]) -> Self {
        Self { domain, colors }
    }

    /// Domain `[min, (min + max) / 2, max]` over the finite values.
    ///
    /// Without any finite value the domain collapses to `[0, 0, 0]`.
    pub fn from_values<I>(values: I, colors: [Rgb; 3]) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = extent(values).unwrap_or((0.0, 0.0));
        Self::new([min, (min + max) / 2.0, max], colors)
    }

    pub fn domain(&self) -> [f64; 3] {
        self.domain
    }

    /// Maps `v` to a colour. NaN and degenerate domains yield the mid stop;
    /// values outside the domain clamp to the end stops.
    pub fn map(&self, v: f64) -> Rgb {
        let [min, mid, max] = self.domain;
        let [c0, c1, c2] = self.colors;
        if v.is_nan() || min == max {
            return c1;
        }
        if v <= mid {
            let t = if mid == min { 1.0 } else { (v - min) / (mid - min) };
            c0.lerp(c1, t)
        } else {
            let t = if max == mid { 0.0 } else { (v - mid) / (max - mid) };
            c1.lerp(c2, t)
        }
    }
}
