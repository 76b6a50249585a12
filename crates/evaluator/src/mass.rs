use cgmath::{InnerSpace, Matrix3, Zero};
use plumb_mesh::{Triangle, Vector3};

type Vector3d = cgmath::Vector3<f64>;

/// Volume integrals of a solid of unit density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    /// Signed volume. Negative when the faces wind inwards.
    pub volume: f32,
    pub center_of_gravity: Vector3,
    /// Inertia tensor about the center of gravity.
    pub inertia: Matrix3<f32>,
}

fn widen(v: Vector3) -> Vector3d {
    v.map(f64::from)
}

/// Volume to `area^1.5` ratio below which a surface is treated as flat.
const FLAT_VOLUME_RATIO: f64 = 1e-9;

impl MassProperties {
    /// Sums the signed tetrahedra spanned by the origin and each triangle
    /// (Mirtich 1996), then moves the inertia to the center of gravity.
    ///
    /// The result is only physical for a closed, consistently wound surface.
    /// A surface whose volume is negligible next to its area (`|V| <= 1e-9
    /// A^1.5`) reports its area weighted centroid and zero inertia. The
    /// cutoff is scale free so tiny closed meshes keep their solid centroid.
    pub fn from_triangles<I>(triangles: I) -> Self
    where
        I: IntoIterator<Item = Triangle>,
    {
        let mut volume: f64 = 0.0;
        let mut moment = Vector3d::zero();
        let (mut xx, mut yy, mut zz) = (0.0, 0.0, 0.0);
        let (mut xy, mut xz, mut yz) = (0.0, 0.0, 0.0);
        let mut area: f64 = 0.0;
        let mut area_moment = Vector3d::zero();

        for t in triangles {
            let (a, b, c) = (widen(t.p0), widen(t.p1), widen(t.p2));

            let det = a.cross(b).dot(c);
            let vol = det / 6.0;
            volume += vol;
            moment += (a + b + c) * (vol / 4.0);

            let f60 = det / 60.0;
            let f120 = det / 120.0;
            let square = |i: usize| a[i] * a[i] + b[i] * b[i] + c[i] * c[i] + a[i] * b[i] + a[i] * c[i] + b[i] * c[i];
            let product = |i: usize, j: usize| {
                2.0 * (a[i] * a[j] + b[i] * b[j] + c[i] * c[j])
                    + a[i] * b[j]
                    + a[j] * b[i]
                    + a[i] * c[j]
                    + a[j] * c[i]
                    + b[i] * c[j]
                    + b[j] * c[i]
            };
            xx += f60 * square(0);
            yy += f60 * square(1);
            zz += f60 * square(2);
            xy += f120 * product(0, 1);
            xz += f120 * product(0, 2);
            yz += f120 * product(1, 2);

            let a2 = 0.5 * (b - a).cross(c - a).magnitude();
            area += a2;
            area_moment += (a + b + c) * (a2 / 3.0);
        }

        if volume.abs() <= FLAT_VOLUME_RATIO * area.powf(1.5) {
            let centroid = if area > 0.0 {
                area_moment / area
            } else {
                Vector3d::zero()
            };
            return Self {
                volume: volume as f32,
                center_of_gravity: centroid.map(|x| x as f32),
                inertia: Matrix3::zero(),
            };
        }

        let d = moment / volume;
        let ixx = yy + zz - volume * (d.y * d.y + d.z * d.z);
        let iyy = xx + zz - volume * (d.x * d.x + d.z * d.z);
        let izz = xx + yy - volume * (d.x * d.x + d.y * d.y);
        let ixy = -xy + volume * d.x * d.y;
        let ixz = -xz + volume * d.x * d.z;
        let iyz = -yz + volume * d.y * d.z;

        #[rustfmt::skip]
        let inertia = Matrix3::new(
            ixx, ixy, ixz,
            ixy, iyy, iyz,
            ixz, iyz, izz,
        );
        Self {
            volume: volume as f32,
            center_of_gravity: d.map(|x| x as f32),
            inertia: Matrix3::from_cols(
                inertia.x.map(|x| x as f32),
                inertia.y.map(|x| x as f32),
                inertia.z.map(|x| x as f32),
            ),
        }
    }
}

pub(crate) fn surface_area<I>(triangles: I) -> f32
where
    I: IntoIterator<Item = Triangle>,
{
    triangles.into_iter().map(|t| f64::from(t.area())).sum::<f64>() as f32
}
