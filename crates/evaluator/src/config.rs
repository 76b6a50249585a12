/// Knobs for how a [`crate::MeshEvaluator`] reads its mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorConfig {
    /// Name of the `Vector2` attribute holding texture coordinates. Only
    /// `Vertex` and `FaceVarying` interpolation are usable for uv queries.
    pub uv_attribute: String,
    /// Name of an optional `Vector3` attribute holding shading normals. Angle
    /// weighted vertex normals are used when it is missing.
    pub normal_attribute: String,
    /// Barycentric weights within this distance of zero put a closest point
    /// on an edge or a vertex when choosing the normal for a signed distance.
    pub barycentric_tolerance: f32,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            uv_attribute: "uv".to_string(),
            normal_attribute: "N".to_string(),
            barycentric_tolerance: 1e-4,
        }
    }
}
