use plumb_mesh::{Vector2, Vector3};

use crate::{Box2, BoundTree, NodeHandle, NodeKind};

/// Points this far outside a uv triangle, in barycentric units, still count
/// as inside it.
const INSIDE_SLACK: f32 = 1e-6;

/// Barycentric coordinates of `target` in the uv triangle `corners`, or `None`
/// when the target lies outside or the triangle has no area in uv space.
pub fn uv_barycentric(target: Vector2, corners: &[Vector2; 3]) -> Option<Vector3> {
    let e1 = corners[1] - corners[0];
    let e2 = corners[2] - corners[0];
    let det = e1.perp_dot(e2);
    if det.abs() <= f32::EPSILON * e1.x.hypot(e1.y) * e2.x.hypot(e2.y) || !det.is_finite() {
        return None;
    }

    let p = target - corners[0];
    let v = p.perp_dot(e2) / det;
    let w = e1.perp_dot(p) / det;
    let u = 1.0 - v - w;
    if u < -INSIDE_SLACK || v < -INSIDE_SLACK || w < -INSIDE_SLACK {
        return None;
    }

    let (u, v, w) = (u.max(0.0), v.max(0.0), w.max(0.0));
    let sum = u + v + w;
    Some(Vector3::new(u / sum, v / sum, w / sum))
}

/// First triangle, in depth first order, whose uv footprint contains `target`.
pub(crate) fn find_uv(tree: &BoundTree<Box2>, uvs: &[[Vector2; 3]], target: Vector2) -> Option<(usize, Vector3)> {
    let mut stack: Vec<NodeHandle> = tree.root().into_iter().collect();
    while let Some(node) = stack.pop() {
        if !tree.bound(node).contains(target) {
            continue;
        }
        match tree.kind(node) {
            NodeKind::Leaf(index) => {
                if let Some(bary) = uv_barycentric(target, &uvs[index]) {
                    return Some((index, bary));
                }
            }
            NodeKind::Internal(left, right) => {
                stack.push(right);
                stack.push(left);
            }
        }
    }
    None
}
