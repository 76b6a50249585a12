use std::fmt;
use std::sync::{Arc, OnceLock};

use cgmath::{InnerSpace, Matrix3, Zero};
use float_eq::float_eq;
use log::{debug, warn};
use plumb_mesh::{AttributeData, AttributeKind, Interpolation, PolygonMesh, Triangle, Vector2, Vector3};

use crate::closest::{closest_hit, ClosestHit};
use crate::interpolate::{blend, interpolate, AttributeValue, Support};
use crate::normals::{vertex_normals, EdgeNormals};
use crate::ray::{all_hits, nearest_hit};
use crate::uv::find_uv;
use crate::{
    Box2, Box3, BoundTree, EvaluatorConfig, EvaluatorError, EvaluatorKind, EvaluatorResult, MassProperties,
    PrimitiveEvaluator, PrimitiveResult,
};

/// Answers spatial queries against one immutable triangle mesh.
///
/// The triangle tree, and the uv tree when the mesh has usable texture
/// coordinates, are built on construction. Mass properties, surface area and
/// the normal tables are computed on first use and then kept.
pub struct MeshEvaluator {
    mesh: Arc<PolygonMesh>,
    config: EvaluatorConfig,
    triangles: Vec<[u32; 3]>,
    triangle_tree: BoundTree<Box3>,
    triangle_uvs: Option<Vec<[Vector2; 3]>>,
    uv_tree: Option<BoundTree<Box2>>,
    has_normal_attribute: bool,
    mass_properties: OnceLock<MassProperties>,
    surface_area: OnceLock<f32>,
    vertex_normals: OnceLock<Vec<Vector3>>,
    edge_normals: OnceLock<EdgeNormals>,
}

fn all_finite(uvs: &[Vector2; 3]) -> bool {
    uvs.iter().all(|uv| uv.x.is_finite() && uv.y.is_finite())
}

impl MeshEvaluator {
    pub fn new<M: Into<Arc<PolygonMesh>>>(mesh: M) -> EvaluatorResult<Self> {
        Self::with_config(mesh, EvaluatorConfig::default())
    }

    /// Builds the evaluator, failing with [`EvaluatorError::InvalidMesh`] if
    /// any face of the mesh is not a triangle.
    pub fn with_config<M: Into<Arc<PolygonMesh>>>(mesh: M, config: EvaluatorConfig) -> EvaluatorResult<Self> {
        let mesh = mesh.into();
        if let Some((face, &vertices)) = mesh.vertices_per_face().iter().enumerate().find(|(_, &n)| n != 3) {
            return Err(EvaluatorError::InvalidMesh { face, vertices });
        }

        let triangles: Vec<[u32; 3]> = mesh
            .vertex_ids()
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        let points = mesh.points();
        let bounds: Vec<Box3> = triangles
            .iter()
            .map(|ids| Box3::from_triangle(&Self::make_triangle(points, ids)))
            .collect();
        let triangle_tree = BoundTree::new(&bounds);

        let triangle_uvs = Self::triangle_uvs(&mesh, &config, &triangles);
        let uv_tree = triangle_uvs.as_ref().map(|uvs| {
            let items: Vec<(usize, Box2)> = uvs
                .iter()
                .enumerate()
                .filter(|(_, uv)| all_finite(uv))
                .map(|(i, uv)| (i, Box2::from_points(uv)))
                .collect();
            if items.len() < uvs.len() {
                warn!(
                    "{} triangles have non-finite uvs and are excluded from uv queries",
                    uvs.len() - items.len()
                );
            }
            BoundTree::from_indexed(items)
        });

        let has_normal_attribute = match mesh.attribute(&config.normal_attribute) {
            Some(attribute) if attribute.kind() == AttributeKind::Vector3 => true,
            Some(attribute) => {
                warn!(
                    "ignoring normal attribute '{}' of type {}",
                    config.normal_attribute,
                    attribute.kind()
                );
                false
            }
            None => false,
        };

        debug!(
            "built triangle tree: {} triangles, {} nodes, depth {}",
            triangles.len(),
            triangle_tree.node_count(),
            triangle_tree.depth()
        );
        if let Some(tree) = &uv_tree {
            debug!("built uv tree: {} triangles, {} nodes", tree.len(), tree.node_count());
        }

        Ok(Self {
            mesh,
            config,
            triangles,
            triangle_tree,
            triangle_uvs,
            uv_tree,
            has_normal_attribute,
            mass_properties: OnceLock::new(),
            surface_area: OnceLock::new(),
            vertex_normals: OnceLock::new(),
            edge_normals: OnceLock::new(),
        })
    }

    fn make_triangle(points: &[Vector3], ids: &[u32; 3]) -> Triangle {
        Triangle::new(points[ids[0] as usize], points[ids[1] as usize], points[ids[2] as usize])
    }

    // The mesh validated attribute lengths, so vertex and corner indices are in range.
    fn triangle_uvs(mesh: &PolygonMesh, config: &EvaluatorConfig, triangles: &[[u32; 3]]) -> Option<Vec<[Vector2; 3]>> {
        let attribute = mesh.attribute(&config.uv_attribute)?;
        let AttributeData::Vector2(values) = &attribute.data else {
            warn!(
                "uv attribute '{}' has type {}, uv queries are disabled",
                config.uv_attribute,
                attribute.kind()
            );
            return None;
        };
        match attribute.interpolation {
            Interpolation::Vertex => Some(
                triangles
                    .iter()
                    .map(|ids| ids.map(|v| values[v as usize]))
                    .collect(),
            ),
            Interpolation::FaceVarying => Some(
                values
                    .chunks_exact(3)
                    .map(|c| [c[0], c[1], c[2]])
                    .collect(),
            ),
            other => {
                warn!(
                    "uv attribute '{}' has {:?} interpolation, uv queries are disabled",
                    config.uv_attribute, other
                );
                None
            }
        }
    }

    pub fn mesh(&self) -> &Arc<PolygonMesh> {
        &self.mesh
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Positions of triangle `index`. Panics if it is out of range.
    pub fn triangle(&self, index: usize) -> Triangle {
        Self::make_triangle(self.mesh.points(), &self.triangles[index])
    }

    pub fn triangle_tree(&self) -> &BoundTree<Box3> {
        &self.triangle_tree
    }

    /// The uv tree, if the mesh has a usable uv attribute.
    pub fn uv_tree(&self) -> Option<&BoundTree<Box2>> {
        self.uv_tree.as_ref()
    }

    pub fn mass_properties(&self) -> &MassProperties {
        self.mass_properties.get_or_init(|| {
            if !self.is_closed() {
                warn!(
                    "mesh has {} open edges, mass properties are not physical",
                    self.edge_normals().open_edges()
                );
            }
            let mass = MassProperties::from_triangles((0..self.triangles.len()).map(|i| self.triangle(i)));
            debug!("computed mass properties: volume {}", mass.volume);
            mass
        })
    }

    pub fn inertia(&self) -> Matrix3<f32> {
        self.mass_properties().inertia
    }

    /// Whether every edge is shared by exactly two triangles.
    pub fn is_closed(&self) -> bool {
        self.edge_normals().open_edges() == 0
    }

    /// Angle weighted normal of every point of the mesh.
    pub fn vertex_normals(&self) -> &[Vector3] {
        self.vertex_normals.get_or_init(|| {
            debug!("computing vertex normals for {} points", self.mesh.points().len());
            vertex_normals(self.mesh.points(), &self.triangles)
        })
    }

    fn edge_normals(&self) -> &EdgeNormals {
        self.edge_normals.get_or_init(|| {
            let edges = EdgeNormals::new(self.mesh.points(), &self.triangles);
            debug!("computed normals for {} edges, {} open", edges.len(), edges.open_edges());
            edges
        })
    }

    /// Average normal of the faces sharing the edge between points `a` and `b`.
    pub fn edge_normal(&self, a: u32, b: u32) -> Option<Vector3> {
        self.edge_normals().get(a, b)
    }

    fn shading_normal(&self, triangle: usize, ids: [u32; 3], bary: Vector3, geometric: Vector3) -> Vector3 {
        let attribute = self
            .mesh
            .attribute(&self.config.normal_attribute)
            .filter(|_| self.has_normal_attribute);
        let blended = match attribute.map(|a| interpolate(a, triangle, ids, bary)) {
            Some(Ok(AttributeValue::Vector3(n))) => n,
            _ => blend(self.vertex_normals(), Support::Corners(ids.map(|v| v as usize)), bary)
                .unwrap_or(geometric),
        };
        let len = blended.magnitude();
        if len > f32::MIN_POSITIVE && len.is_finite() {
            blended / len
        } else {
            geometric
        }
    }

    /// `dP/du` and `dP/dv` across the triangle, or an arbitrary frame in the
    /// plane when the triangle has no uvs or they are degenerate.
    fn tangents(&self, triangle: usize, t: &Triangle, normal: Vector3) -> (Vector3, Vector3) {
        let e1 = t.p1 - t.p0;
        let e2 = t.p2 - t.p0;
        if let Some(uv) = self.triangle_uvs.as_ref().map(|uvs| uvs[triangle]) {
            let d1 = uv[1] - uv[0];
            let d2 = uv[2] - uv[0];
            let det = d1.perp_dot(d2);
            if det.abs() > f32::EPSILON * d1.magnitude() * d2.magnitude() && det.is_finite() {
                let u = (e1 * d2.y - e2 * d1.y) / det;
                let v = (e2 * d1.x - e1 * d2.x) / det;
                return (u, v);
            }
        }
        let len = e1.magnitude();
        if len > f32::MIN_POSITIVE {
            let u = e1 / len;
            (u, normal.cross(u))
        } else {
            (Vector3::zero(), Vector3::zero())
        }
    }

    fn fill_result(&self, result: &mut PrimitiveResult, triangle: usize, bary: Vector3, point: Vector3, distance: f32) {
        let ids = self.triangles[triangle];
        let t = self.triangle(triangle);
        let geometric = t.normal().unwrap_or_else(Vector3::zero);
        let (u_tangent, v_tangent) = self.tangents(triangle, &t, geometric);

        result.point = point;
        result.geometric_normal = geometric;
        result.normal = self.shading_normal(triangle, ids, bary, geometric);
        result.uv = match &self.triangle_uvs {
            Some(uvs) => {
                let [a, b, c] = uvs[triangle];
                a * bary.x + b * bary.y + c * bary.z
            }
            None => Vector2::zero(),
        };
        result.u_tangent = u_tangent;
        result.v_tangent = v_tangent;
        result.barycentric = bary;
        result.triangle_index = triangle;
        result.vertex_ids = ids;
        result.distance = distance;
    }

    fn closest(&self, point: Vector3) -> EvaluatorResult<ClosestHit> {
        if self.triangles.is_empty() {
            return Err(EvaluatorError::EmptyMesh);
        }
        closest_hit(&self.triangle_tree, |i| self.triangle(i), point)
            .ok_or(EvaluatorError::Unsupported("query point is not finite"))
    }

    /// Normal deciding the sign of a distance: the face normal inside the
    /// triangle, the edge normal on an edge and the vertex normal at a corner.
    fn sign_normal(&self, hit: &ClosestHit) -> Vector3 {
        let ids = self.triangles[hit.triangle];
        let tol = self.config.barycentric_tolerance;
        let weights = [hit.barycentric.x, hit.barycentric.y, hit.barycentric.z];
        let on = weights.map(|w| !float_eq!(w, 0.0, abs <= tol));
        let face = || self.triangle(hit.triangle).normal().unwrap_or_else(Vector3::zero);

        match on {
            [true, true, true] => face(),
            [false, true, true] => self.edge_normal(ids[1], ids[2]).unwrap_or_else(face),
            [true, false, true] => self.edge_normal(ids[2], ids[0]).unwrap_or_else(face),
            [true, true, false] => self.edge_normal(ids[0], ids[1]).unwrap_or_else(face),
            _ => {
                let corner = (0..3).fold(0, |best, k| if weights[k] > weights[best] { k } else { best });
                self.vertex_normals()[ids[corner] as usize]
            }
        }
    }
}

impl PrimitiveEvaluator for MeshEvaluator {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Mesh
    }

    fn closest_point(&self, point: Vector3, result: &mut PrimitiveResult) -> EvaluatorResult<()> {
        self.validate_result(result)?;
        let hit = self.closest(point)?;
        self.fill_result(result, hit.triangle, hit.barycentric, hit.point, hit.distance_squared.sqrt());
        Ok(())
    }

    fn point_at_uv(&self, uv: Vector2, result: &mut PrimitiveResult) -> EvaluatorResult<bool> {
        self.validate_result(result)?;
        let (Some(tree), Some(uvs)) = (&self.uv_tree, &self.triangle_uvs) else {
            return Err(EvaluatorError::Unsupported("mesh has no uv attribute"));
        };
        match find_uv(tree, uvs, uv) {
            Some((triangle, bary)) => {
                let point = self.triangle(triangle).interpolate(bary);
                self.fill_result(result, triangle, bary, point, 0.0);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn intersection_point(
        &self,
        origin: Vector3,
        direction: Vector3,
        result: &mut PrimitiveResult,
        max_distance: f32,
    ) -> EvaluatorResult<bool> {
        self.validate_result(result)?;
        if self.triangles.is_empty() {
            return Err(EvaluatorError::EmptyMesh);
        }
        let Some(direction) = unit(direction) else {
            return Ok(false);
        };
        match nearest_hit(&self.triangle_tree, |i| self.triangle(i), origin, direction, max_distance) {
            Some(hit) => {
                let point = origin + direction * hit.distance;
                self.fill_result(result, hit.triangle, hit.barycentric, point, hit.distance);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn intersection_points(&self, origin: Vector3, direction: Vector3, max_distance: f32) -> Vec<PrimitiveResult> {
        let Some(direction) = unit(direction) else {
            return Vec::new();
        };
        all_hits(&self.triangle_tree, |i| self.triangle(i), origin, direction, max_distance)
            .into_iter()
            .map(|hit| {
                let mut result = self.create_result();
                let point = origin + direction * hit.distance;
                self.fill_result(&mut result, hit.triangle, hit.barycentric, point, hit.distance);
                result
            })
            .collect()
    }

    fn signed_distance(&self, point: Vector3) -> EvaluatorResult<f32> {
        let hit = self.closest(point)?;
        let distance = hit.distance_squared.sqrt();
        if (point - hit.point).dot(self.sign_normal(&hit)) < 0.0 {
            Ok(-distance)
        } else {
            Ok(distance)
        }
    }

    fn volume(&self) -> f32 {
        self.mass_properties().volume
    }

    fn center_of_gravity(&self) -> Vector3 {
        self.mass_properties().center_of_gravity
    }

    fn surface_area(&self) -> f32 {
        *self.surface_area.get_or_init(|| {
            crate::mass::surface_area((0..self.triangles.len()).map(|i| self.triangle(i)))
        })
    }

    fn uv_bound(&self) -> Box2 {
        self.uv_tree
            .as_ref()
            .and_then(|tree| tree.root().map(|root| *tree.bound(root)))
            .unwrap_or_else(Box2::empty)
    }
}

fn unit(direction: Vector3) -> Option<Vector3> {
    let len = direction.magnitude();
    if len > f32::MIN_POSITIVE && len.is_finite() {
        Some(direction / len)
    } else {
        None
    }
}

impl fmt::Debug for MeshEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshEvaluator")
            .field("triangles", &self.triangles.len())
            .field("nodes", &self.triangle_tree.node_count())
            .field("uv_tree", &self.uv_tree.as_ref().map(BoundTree::len))
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
