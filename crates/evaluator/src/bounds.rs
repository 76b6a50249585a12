use plumb_mesh::{Triangle, Vector2, Vector3};

/// An axis aligned box that can be stored in a [`crate::BoundTree`].
pub trait Bound: Copy + std::fmt::Debug {
    /// Number of axes the box spans.
    const AXES: usize;

    /// A box containing nothing; the identity for [`Bound::union`].
    fn empty() -> Self;

    fn union(&self, other: &Self) -> Self;

    fn center(&self, axis: usize) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box3 {
    pub min: Vector3,
    pub max: Vector3,
}

impl Box3 {
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vector3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Vector3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn from_triangle(t: &Triangle) -> Self {
        let mut b = Self::empty();
        for p in t.points() {
            b.extend_by(p);
        }
        b
    }

    pub fn extend_by(&mut self, p: Vector3) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(p[axis]);
            self.max[axis] = self.max[axis].max(p[axis]);
        }
    }

    pub fn union(&self, other: &Box3) -> Box3 {
        let mut b = *self;
        for axis in 0..3 {
            b.min[axis] = b.min[axis].min(other.min[axis]);
            b.max[axis] = b.max[axis].max(other.max[axis]);
        }
        b
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min[axis] > self.max[axis])
    }

    pub fn contains(&self, p: Vector3) -> bool {
        (0..3).all(|axis| p[axis] >= self.min[axis] && p[axis] <= self.max[axis])
    }

    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Squared distance from `p` to the nearest point of the box; zero inside.
    pub fn distance_squared(&self, p: Vector3) -> f32 {
        (0..3)
            .map(|axis| {
                let d = (self.min[axis] - p[axis]).max(p[axis] - self.max[axis]).max(0.0);
                d * d
            })
            .sum()
    }

    /// Slab test against the ray `origin + t * direction` for `t` in
    /// `[0, max_distance]`.
    ///
    /// Returns the parameter at which the ray enters the box, which is `0.0`
    /// when the origin is already inside.
    pub fn intersect_ray(&self, origin: Vector3, direction: Vector3, max_distance: f32) -> Option<f32> {
        if self.is_empty() {
            return None;
        }
        let mut t_min = 0.0f32;
        let mut t_max = max_distance;
        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            if d == 0.0 {
                // Parallel to this slab, so the origin has to lie between its planes.
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (self.min[axis] - o) * inv;
            let mut t1 = (self.max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

impl Bound for Box3 {
    const AXES: usize = 3;

    fn empty() -> Self {
        Box3::empty()
    }

    fn union(&self, other: &Self) -> Self {
        Box3::union(self, other)
    }

    fn center(&self, axis: usize) -> f32 {
        0.5 * (self.min[axis] + self.max[axis])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box2 {
    pub min: Vector2,
    pub max: Vector2,
}

impl Box2 {
    pub fn new(min: Vector2, max: Vector2) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vector2::new(f32::INFINITY, f32::INFINITY),
            max: Vector2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Vector2]) -> Self {
        let mut b = Self::empty();
        for p in points {
            b.extend_by(*p);
        }
        b
    }

    pub fn extend_by(&mut self, p: Vector2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn union(&self, other: &Box2) -> Box2 {
        Box2 {
            min: Vector2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vector2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Inclusive containment, so points on an edge of the box are inside.
    pub fn contains(&self, p: Vector2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn center(&self) -> Vector2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector2 {
        self.max - self.min
    }
}

impl Bound for Box2 {
    const AXES: usize = 2;

    fn empty() -> Self {
        Box2::empty()
    }

    fn union(&self, other: &Self) -> Self {
        Box2::union(self, other)
    }

    fn center(&self, axis: usize) -> f32 {
        0.5 * (self.min[axis] + self.max[axis])
    }
}
