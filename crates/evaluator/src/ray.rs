use cgmath::InnerSpace;
use plumb_mesh::{Triangle, Vector3};

use crate::{Box3, BoundTree, NodeHandle, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RayHit {
    pub triangle: usize,
    pub distance: f32,
    pub barycentric: Vector3,
}

/// Möller–Trumbore ray/triangle test. `direction` should be unit length.
///
/// Returns the ray parameter and the barycentric coordinates of the hit.
/// Edges are inclusive. Rays parallel to the plane and triangles without area
/// never hit. The parameter may be negative, callers pick the range they want.
pub fn intersect_triangle(origin: Vector3, direction: Vector3, t: &Triangle) -> Option<(f32, Vector3)> {
    let e1 = t.p1 - t.p0;
    let e2 = t.p2 - t.p0;
    let h = direction.cross(e2);
    let a = e1.dot(h);
    if a.abs() <= f32::EPSILON * e1.magnitude() * e2.magnitude() {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - t.p0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = f * direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let distance = f * e2.dot(q);
    if !distance.is_finite() {
        return None;
    }
    Some((distance, Vector3::new((1.0 - u - v).max(0.0), u, v)))
}

fn leaf_hit<F>(index: usize, triangle: &F, origin: Vector3, direction: Vector3, bound: f32) -> Option<RayHit>
where
    F: Fn(usize) -> Triangle,
{
    match intersect_triangle(origin, direction, &triangle(index)) {
        Some((distance, barycentric)) if distance > 0.0 && distance < bound => Some(RayHit {
            triangle: index,
            distance,
            barycentric,
        }),
        _ => None,
    }
}

/// Nearest hit with `0 < t < max_distance`.
///
/// The accepted range shrinks with every hit, so boxes the ray enters beyond
/// the current best are never opened.
pub(crate) fn nearest_hit<F>(
    tree: &BoundTree<Box3>,
    triangle: F,
    origin: Vector3,
    direction: Vector3,
    max_distance: f32,
) -> Option<RayHit>
where
    F: Fn(usize) -> Triangle,
{
    let root = tree.root()?;
    let mut bound = max_distance;
    let mut best = None;
    let mut stack: Vec<(NodeHandle, f32)> = Vec::new();
    if let Some(entry) = tree.bound(root).intersect_ray(origin, direction, bound) {
        stack.push((root, entry));
    }

    while let Some((node, entry)) = stack.pop() {
        if entry > bound {
            continue;
        }
        match tree.kind(node) {
            NodeKind::Leaf(index) => {
                if let Some(hit) = leaf_hit(index, &triangle, origin, direction, bound) {
                    bound = hit.distance;
                    best = Some(hit);
                }
            }
            NodeKind::Internal(left, right) => {
                let l = tree.bound(left).intersect_ray(origin, direction, bound);
                let r = tree.bound(right).intersect_ray(origin, direction, bound);
                match (l, r) {
                    (Some(tl), Some(tr)) if tr < tl => {
                        stack.push((left, tl));
                        stack.push((right, tr));
                    }
                    (Some(tl), Some(tr)) => {
                        stack.push((right, tr));
                        stack.push((left, tl));
                    }
                    (Some(tl), None) => stack.push((left, tl)),
                    (None, Some(tr)) => stack.push((right, tr)),
                    (None, None) => {}
                }
            }
        }
    }
    best
}

/// Every hit with `0 < t < max_distance`, in depth first order.
///
/// A ray through a shared edge or vertex reports one hit per triangle.
pub(crate) fn all_hits<F>(
    tree: &BoundTree<Box3>,
    triangle: F,
    origin: Vector3,
    direction: Vector3,
    max_distance: f32,
) -> Vec<RayHit>
where
    F: Fn(usize) -> Triangle,
{
    let mut hits = Vec::new();
    let mut stack: Vec<NodeHandle> = tree.root().into_iter().collect();
    while let Some(node) = stack.pop() {
        if tree.bound(node).intersect_ray(origin, direction, max_distance).is_none() {
            continue;
        }
        match tree.kind(node) {
            NodeKind::Leaf(index) => hits.extend(leaf_hit(index, &triangle, origin, direction, max_distance)),
            NodeKind::Internal(left, right) => {
                stack.push(right);
                stack.push(left);
            }
        }
    }
    hits
}
