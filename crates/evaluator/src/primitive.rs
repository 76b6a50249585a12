use plumb_mesh::{Vector2, Vector3};

use crate::{Box2, EvaluatorError, EvaluatorKind, EvaluatorResult, PrimitiveResult};

/// Geometric queries common to every kind of evaluated primitive.
///
/// Queries take `&self` and write into a caller-owned result, so a single
/// evaluator may serve many threads as long as each has its own result.
pub trait PrimitiveEvaluator: Send + Sync {
    fn kind(&self) -> EvaluatorKind;

    /// A fresh result tagged for this evaluator.
    fn create_result(&self) -> PrimitiveResult {
        PrimitiveResult::new(self.kind())
    }

    /// Fails with [`EvaluatorError::TypeMismatch`] unless `result` came from
    /// [`PrimitiveEvaluator::create_result`] on this kind of evaluator.
    fn validate_result(&self, result: &PrimitiveResult) -> EvaluatorResult<()> {
        match result.kind() {
            Some(kind) if kind == self.kind() => Ok(()),
            found => Err(EvaluatorError::TypeMismatch {
                expected: self.kind().name(),
                found: found.map_or("unbound", EvaluatorKind::name),
            }),
        }
    }

    /// Finds the point on the surface nearest to `point`.
    fn closest_point(&self, point: Vector3, result: &mut PrimitiveResult) -> EvaluatorResult<()>;

    /// Finds the surface point whose texture coordinate is `uv`. Returns
    /// `Ok(false)` when no triangle covers `uv`.
    fn point_at_uv(&self, uv: Vector2, result: &mut PrimitiveResult) -> EvaluatorResult<bool>;

    /// Finds the nearest hit of a ray within `max_distance`, which may be
    /// `f32::INFINITY`. Returns `Ok(false)` and leaves `result` untouched on a miss.
    fn intersection_point(
        &self,
        origin: Vector3,
        direction: Vector3,
        result: &mut PrimitiveResult,
        max_distance: f32,
    ) -> EvaluatorResult<bool>;

    /// Every hit of a ray within `max_distance`, in no particular order.
    fn intersection_points(&self, origin: Vector3, direction: Vector3, max_distance: f32) -> Vec<PrimitiveResult>;

    /// Distance to the surface, negative inside.
    fn signed_distance(&self, point: Vector3) -> EvaluatorResult<f32>;

    fn volume(&self) -> f32;

    fn center_of_gravity(&self) -> Vector3;

    fn surface_area(&self) -> f32;

    /// Box covering every usable texture coordinate, empty without uvs.
    fn uv_bound(&self) -> Box2;
}
