//! Circle packing primitives.
//!
//! - [`pack_siblings`] places circles tangentially along a front chain so
//!   that none overlap, then centres their enclosing circle on the origin.
//! - [`enclose`] computes the smallest circle enclosing a set of circles
//!   (randomized incremental construction over a basis of up to three).
//!
//! Randomness comes from a fixed-seed [`Lcg`], so layouts are reproducible.

use foundation::math::Vec2;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        self.center().distance(p) <= self.r
    }

    /// Whether `other` lies entirely inside `self`, with `eps` slack.
    pub fn contains_circle(&self, other: &Circle, eps: f64) -> bool {
        self.center().distance(other.center()) + other.r <= self.r + eps
    }
}

/// Linear congruential generator with a fixed seed.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new()
    }
}

impl Lcg {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 1 << 32;

    pub fn new() -> Self {
        Self { state: 1 }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (Self::A * self.state + Self::C) % Self::M;
        self.state as f64 / Self::M as f64
    }
}

fn shuffle<T>(items: &mut [T], random: &mut Lcg) {
    let mut m = items.len();
    while m > 0 {
        let i = (random.next_f64() * m as f64) as usize;
        m -= 1;
        items.swap(m, i.min(m));
    }
}

/// Places `c` tangent to both `a` and `b`.
fn place(b: Circle, a: Circle, c: &mut Circle) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let a2 = (a.r + c.r).powi(2);
        let b2 = (b.r + c.r).powi(2);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            c.x = b.x - x * dx - y * dy;
            c.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            c.x = a.x + x * dx - y * dy;
            c.y = a.y + x * dy + y * dx;
        }
    } else {
        c.x = a.x + c.r;
        c.y = a.y;
    }
}

fn intersects(a: &Circle, b: &Circle) -> bool {
    let dr = a.r + b.r - 1e-6;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

/// Squared distance from the origin to the weighted midpoint of `a` and `b`.
fn score(a: &Circle, b: &Circle) -> f64 {
    let ab = a.r + b.r;
    let (dx, dy) = if ab > 0.0 {
        (
            (a.x * b.r + b.x * a.r) / ab,
            (a.y * b.r + b.y * a.r) / ab,
        )
    } else {
        ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    };
    dx * dx + dy * dy
}

/// Packs `circles` (radii given, positions overwritten) around the origin.
///
/// Returns the radius of the enclosing circle, which is centred on the
/// origin after packing.
pub fn pack_siblings(circles: &mut [Circle], random: &mut Lcg) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return circles[0].r;
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles[0].r + circles[1].r;
    }

    let (c0, c1) = (circles[0], circles[1]);
    place(c1, c0, &mut circles[2]);

    // Front chain as a circular doubly linked list over circle indices.
    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    let (mut a, mut b) = (0usize, 1usize);
    next[0] = 1;
    prev[2] = 1;
    next[1] = 2;
    prev[0] = 2;
    next[2] = 0;
    prev[1] = 0;

    let mut i = 3;
    'pack: while i < n {
        let (ca, cb) = (circles[a], circles[b]);
        place(ca, cb, &mut circles[i]);
        let c = i;

        // Closest intersecting circle on the front chain, searching both ways.
        let mut j = next[b];
        let mut k = prev[a];
        let mut sj = circles[b].r;
        let mut sk = circles[a].r;
        loop {
            if sj <= sk {
                if intersects(&circles[j], &circles[c]) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(&circles[k], &circles[c]) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].r;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        // Insert c between a and b.
        prev[c] = a;
        next[c] = b;
        next[a] = c;
        prev[b] = c;
        b = c;

        // Re-anchor on the chain pair closest to the centroid.
        let mut best = score(&circles[a], &circles[next[a]]);
        let mut node = next[c];
        while node != b {
            let s = score(&circles[node], &circles[next[node]]);
            if s < best {
                a = node;
                best = s;
            }
            node = next[node];
        }
        b = next[a];
        i += 1;
    }

    let mut chain = vec![circles[b]];
    let mut node = next[b];
    while node != b {
        chain.push(circles[node]);
        node = next[node];
    }
    let Some(e) = enclose(&chain, random) else {
        return 0.0;
    };

    for circle in circles.iter_mut() {
        circle.x -= e.x;
        circle.y -= e.y;
    }
    e.r
}

/// Smallest circle enclosing every circle in `circles`.
pub fn enclose(circles: &[Circle], random: &mut Lcg) -> Option<Circle> {
    let mut shuffled = circles.to_vec();
    shuffle(&mut shuffled, random);

    let mut basis: Vec<Circle> = Vec::new();
    let mut e: Option<Circle> = None;
    let mut i = 0;
    while i < shuffled.len() {
        let p = shuffled[i];
        if let Some(current) = e
            && encloses_weak(&current, &p)
        {
            i += 1;
            continue;
        }
        match extend_basis(&basis, p) {
            Some(extended) => {
                basis = extended;
                e = Some(enclose_basis(&basis));
                i = 0;
            }
            None => {
                // Numerically unresolvable basis: grow the current circle to cover p.
                e = e.map(|cur| {
                    let reach = cur.center().distance(p.center()) + p.r;
                    Circle::new(cur.x, cur.y, cur.r.max(reach))
                });
                i += 1;
            }
        }
    }
    e
}

fn extend_basis(basis: &[Circle], p: Circle) -> Option<Vec<Circle>> {
    if encloses_weak_all(&p, basis) {
        return Some(vec![p]);
    }

    for &bi in basis {
        if encloses_not(&p, &bi) && encloses_weak_all(&enclose_basis2(&bi, &p), basis) {
            return Some(vec![bi, p]);
        }
    }

    for i in 0..basis.len().saturating_sub(1) {
        for j in (i + 1)..basis.len() {
            let (bi, bj) = (basis[i], basis[j]);
            if encloses_not(&enclose_basis2(&bi, &bj), &p)
                && encloses_not(&enclose_basis2(&bi, &p), &bj)
                && encloses_not(&enclose_basis2(&bj, &p), &bi)
                && encloses_weak_all(&enclose_basis3(&bi, &bj, &p), basis)
            {
                return Some(vec![bi, bj, p]);
            }
        }
    }

    None
}

fn encloses_not(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis {
        [a] => *a,
        [a, b] => enclose_basis2(a, b),
        [a, b, c] => enclose_basis3(a, b, c),
        _ => Circle::default(),
    }
}

fn enclose_basis2(a: &Circle, b: &Circle) -> Circle {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let x21 = x2 - x1;
    let y21 = y2 - y1;
    let r21 = r2 - r1;
    let l = (x21 * x21 + y21 * y21).sqrt();
    if l == 0.0 {
        return if r1 >= r2 { *a } else { *b };
    }
    Circle::new(
        (x1 + x2 + x21 / l * r21) / 2.0,
        (y1 + y2 + y21 / l * r21) / 2.0,
        (l + r1 + r2) / 2.0,
    )
}

fn enclose_basis3(a: &Circle, b: &Circle, c: &Circle) -> Circle {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let (x3, y3, r3) = (c.x, c.y, c.r);
    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    if ab == 0.0 {
        // Collinear centres: the widest pairwise enclosure covers all three.
        return [
            enclose_basis2(a, b),
            enclose_basis2(a, c),
            enclose_basis2(b, c),
        ]
        .into_iter()
        .fold(*a, |best, e| if e.r > best.r { e } else { best });
    }
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });
    Circle::new(x1 + xa + xb * r, y1 + ya + yb * r, r)
}

#[cfg(test)]
mod tests {
    use super::{Circle, Lcg, enclose, pack_siblings};

    fn assert_no_overlap(circles: &[Circle]) {
        for (i, a) in circles.iter().enumerate() {
            for b in &circles[i + 1..] {
                let d = a.center().distance(b.center());
                assert!(
                    d + 1e-4 >= a.r + b.r,
                    "overlap between {a:?} and {b:?} (d={d})"
                );
            }
        }
    }

    #[test]
    fn lcg_is_deterministic() {
        let mut a = Lcg::new();
        let mut b = Lcg::new();
        let xs: Vec<f64> = (0..5).map(|_| a.next_f64()).collect();
        let ys: Vec<f64> = (0..5).map(|_| b.next_f64()).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn one_and_two_circles() {
        let mut rng = Lcg::new();
        let mut one = [Circle::new(9.0, 9.0, 2.0)];
        assert_eq!(pack_siblings(&mut one, &mut rng), 2.0);
        assert_eq!(one[0].center().x, 0.0);

        let mut two = [Circle::new(0.0, 0.0, 1.0), Circle::new(0.0, 0.0, 2.0)];
        assert_eq!(pack_siblings(&mut two, &mut rng), 3.0);
        assert_no_overlap(&two);
    }

    #[test]
    fn many_circles_do_not_overlap_and_fit_enclosure() {
        let mut circles: Vec<Circle> = (1..=25)
            .map(|i| Circle::new(0.0, 0.0, ((i * 7 % 11) as f64 + 1.0).sqrt()))
            .collect();
        let mut rng = Lcg::new();
        let r = pack_siblings(&mut circles, &mut rng);
        assert!(r.is_finite() && r > 0.0);
        assert_no_overlap(&circles);
        let enclosing = Circle::new(0.0, 0.0, r);
        for c in &circles {
            assert!(enclosing.contains_circle(c, 1e-6), "{c:?} escapes r={r}");
        }
    }

    #[test]
    fn zero_radius_circles_stay_finite() {
        let mut circles = vec![Circle::new(0.0, 0.0, 0.0); 4];
        let r = pack_siblings(&mut circles, &mut Lcg::new());
        assert!(r.is_finite());
        assert!(circles.iter().all(|c| c.x.is_finite() && c.y.is_finite()));
    }

    #[test]
    fn enclose_two_disjoint_circles() {
        let e = enclose(
            &[Circle::new(-2.0, 0.0, 1.0), Circle::new(2.0, 0.0, 1.0)],
            &mut Lcg::new(),
        )
        .expect("non-empty");
        assert!((e.r - 3.0).abs() < 1e-9);
        assert!(e.x.abs() < 1e-9 && e.y.abs() < 1e-9);
        assert!(enclose(&[], &mut Lcg::new()).is_none());
    }
}
