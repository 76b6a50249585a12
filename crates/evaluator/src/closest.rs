use cgmath::{InnerSpace, Zero};
use plumb_mesh::{Triangle, Vector3};

use crate::{Box3, BoundTree, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ClosestHit {
    pub triangle: usize,
    pub point: Vector3,
    pub barycentric: Vector3,
    pub distance_squared: f32,
}

/// Closest point to `p` on the segment from corner `i` to corner `j`,
/// returned with its barycentric weights on the triangle.
fn closest_on_edge(p: Vector3, points: &[Vector3; 3], i: usize, j: usize) -> (Vector3, Vector3) {
    let (a, b) = (points[i], points[j]);
    let ab = b - a;
    let len2 = ab.magnitude2();
    let t = if len2 > 0.0 {
        ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut bary = Vector3::zero();
    bary[i] = 1.0 - t;
    bary[j] += t;
    (a + ab * t, bary)
}

/// Closest point on a triangle with no area: the best of its three edges.
fn closest_on_degenerate(p: Vector3, t: &Triangle) -> (Vector3, Vector3) {
    let points = t.points();
    [(0, 1), (1, 2), (2, 0)]
        .into_iter()
        .map(|(i, j)| closest_on_edge(p, &points, i, j))
        .fold(None, |best: Option<(Vector3, Vector3)>, candidate| match best {
            Some(b) if (b.0 - p).magnitude2() <= (candidate.0 - p).magnitude2() => Some(b),
            _ => Some(candidate),
        })
        .unwrap_or((t.p0, Vector3::new(1.0, 0.0, 0.0)))
}

/// Returns the point of `t` closest to `p` and its barycentric coordinates.
///
/// Follows the Voronoi region walk from Real-Time Collision Detection
/// (Ericson, 5.1.5).
pub fn closest_point_on_triangle(p: Vector3, t: &Triangle) -> (Vector3, Vector3) {
    let ab = t.p1 - t.p0;
    let ac = t.p2 - t.p0;
    if ab.cross(ac).magnitude2() <= f32::EPSILON * ab.magnitude2() * ac.magnitude2() {
        return closest_on_degenerate(p, t);
    }

    let ap = p - t.p0;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return (t.p0, Vector3::new(1.0, 0.0, 0.0));
    }

    let bp = p - t.p1;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return (t.p1, Vector3::new(0.0, 1.0, 0.0));
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return (t.p0 + ab * v, Vector3::new(1.0 - v, v, 0.0));
    }

    let cp = p - t.p2;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return (t.p2, Vector3::new(0.0, 0.0, 1.0));
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return (t.p0 + ac * w, Vector3::new(1.0 - w, 0.0, w));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return (t.p1 + (t.p2 - t.p1) * w, Vector3::new(0.0, 1.0 - w, w));
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    let u = (1.0 - v - w).max(0.0);
    (t.p0 + ab * v + ac * w, Vector3::new(u, v, w))
}

/// Branch and bound search for the triangle nearest to `p`.
///
/// Children are visited nearest box first, and a node is skipped once its box
/// is no closer than the best hit so far. Of two equally close triangles the
/// first one visited wins.
pub(crate) fn closest_hit<F>(tree: &BoundTree<Box3>, triangle: F, p: Vector3) -> Option<ClosestHit>
where
    F: Fn(usize) -> Triangle,
{
    let root = tree.root()?;
    let mut best: Option<ClosestHit> = None;
    let mut best_d2 = f32::INFINITY;
    let mut stack = vec![(root, tree.bound(root).distance_squared(p))];

    while let Some((node, d2)) = stack.pop() {
        if d2 >= best_d2 {
            continue;
        }
        match tree.kind(node) {
            NodeKind::Leaf(index) => {
                let (point, barycentric) = closest_point_on_triangle(p, &triangle(index));
                let distance_squared = (point - p).magnitude2();
                if distance_squared < best_d2 {
                    best_d2 = distance_squared;
                    best = Some(ClosestHit {
                        triangle: index,
                        point,
                        barycentric,
                        distance_squared,
                    });
                }
            }
            NodeKind::Internal(left, right) => {
                let dl = tree.bound(left).distance_squared(p);
                let dr = tree.bound(right).distance_squared(p);
                let (near, far) = if dr < dl {
                    ((right, dr), (left, dl))
                } else {
                    ((left, dl), (right, dr))
                };
                if far.1 < best_d2 {
                    stack.push(far);
                }
                if near.1 < best_d2 {
                    stack.push(near);
                }
            }
        }
    }
    best
}
