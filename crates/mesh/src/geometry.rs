use cgmath::{InnerSpace, Zero};

pub type Vector3 = cgmath::Vector3<f32>;
pub type Vector2 = cgmath::Vector2<f32>;

// We rely on Vector3 being repr(c).
static_assertions::assert_eq_size!(Vector3, [f32; 3]);
static_assertions::assert_eq_align!(Vector3, f32);
static_assertions::assert_eq_size!(Vector2, [f32; 2]);

#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Triangle {
    pub p0: Vector3,
    pub p1: Vector3,
    pub p2: Vector3,
}

impl Triangle {
    pub fn new(p0: Vector3, p1: Vector3, p2: Vector3) -> Self {
        Self { p0, p1, p2 }
    }

    /// The un-normalized normal, `(p1 - p0) x (p2 - p0)`.
    ///
    /// Its length is twice the area of the triangle and its direction follows
    /// the counter-clockwise winding of the points.
    pub fn cross(&self) -> Vector3 {
        (self.p1 - self.p0).cross(self.p2 - self.p0)
    }

    /// Returns the unit normal, or `None` if the triangle has no area.
    pub fn normal(&self) -> Option<Vector3> {
        let n = self.cross();
        let len = n.magnitude();
        if len > f32::MIN_POSITIVE && len.is_finite() {
            Some(n / len)
        } else {
            None
        }
    }

    pub fn area(&self) -> f32 {
        0.5 * self.cross().magnitude()
    }

    pub fn centroid(&self) -> Vector3 {
        (self.p0 + self.p1 + self.p2) / 3.0
    }

    /// Blends the three points with barycentric weights.
    pub fn interpolate(&self, bary: Vector3) -> Vector3 {
        self.p0 * bary.x + self.p1 * bary.y + self.p2 * bary.z
    }

    pub fn points(&self) -> [Vector3; 3] {
        [self.p0, self.p1, self.p2]
    }
}

impl std::default::Default for Triangle {
    fn default() -> Self {
        Self {
            p0: Vector3::zero(),
            p1: Vector3::zero(),
            p2: Vector3::zero(),
        }
    }
}
