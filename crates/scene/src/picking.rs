use foundation::bounds::Rect2;
use foundation::math::Vec2;
use foundation::math::precision::stable_total_cmp_f64;

use crate::pack::Circle;

/// Keys whose position lies inside `rect` (inclusive bounds).
///
/// Ordering contract: output follows input order. Non-finite positions are
/// never selected.
pub fn brush_select<K, I>(rect: &Rect2, positions: I) -> Vec<K>
where
    I: IntoIterator<Item = (K, Vec2)>,
{
    positions
        .into_iter()
        .filter(|(_, p)| p.is_finite() && rect.contains(*p))
        .map(|(key, _)| key)
        .collect()
}

/// Topmost circle under `point`, for marks painted in input order.
///
/// Ordering contract: the last containing circle wins, matching what is
/// visible on screen. Zero-radius circles are never hit.
pub fn pick_topmost<K, I>(point: Vec2, circles: I) -> Option<K>
where
    I: IntoIterator<Item = (K, Circle)>,
{
    circles
        .into_iter()
        .filter(|(_, c)| c.r > 0.0 && c.contains_point(point))
        .last()
        .map(|(key, _)| key)
}

/// Smallest circle containing `point`.
///
/// Ordering contract: on equal radii the earlier circle wins. Zero-radius
/// circles are never hit.
pub fn pick_smallest<K, I>(point: Vec2, circles: I) -> Option<K>
where
    I: IntoIterator<Item = (K, Circle)>,
{
    let mut best: Option<(K, f64)> = None;
    for (key, circle) in circles {
        if !(circle.r > 0.0 && circle.contains_point(point)) {
            continue;
        }
        let better = match &best {
            Some((_, r)) => stable_total_cmp_f64(circle.r, *r).is_lt(),
            None => true,
        };
        if better {
            best = Some((key, circle.r));
        }
    }
    best.map(|(key, _)| key)
}
