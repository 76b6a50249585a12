use std::sync::Arc;

use cgmath::InnerSpace;
use float_eq::assert_float_eq;
use plumb::{
    Box2, EvaluatorConfig, EvaluatorError, MeshEvaluator, PrimitiveEvaluator, PrimitiveResult,
};
use plumb_mesh::{
    Attribute, AttributeData, DefaultMesh, Interpolation, PolygonMesh, Vector2, Vector3,
};

fn assert_vector(actual: Vector3, expected: Vector3, tol: f32) {
    assert_float_eq!(actual.x, expected.x, abs <= tol, "x of {:?}", actual);
    assert_float_eq!(actual.y, expected.y, abs <= tol, "y of {:?}", actual);
    assert_float_eq!(actual.z, expected.z, abs <= tol, "z of {:?}", actual);
}

fn cube() -> MeshEvaluator {
    MeshEvaluator::new(plumb_test_data::unit_cube()).unwrap()
}

#[test]
fn quads_are_rejected() {
    let err = MeshEvaluator::new(plumb_test_data::quad_cube()).unwrap_err();
    assert_eq!(err, EvaluatorError::InvalidMesh { face: 0, vertices: 4 });
}

#[test]
fn empty_mesh_has_no_answers() {
    let evaluator = MeshEvaluator::new(PolygonMesh::default()).unwrap();
    let mut result = evaluator.create_result();
    let up = Vector3::new(0.0, 0.0, 1.0);
    assert_eq!(
        evaluator.closest_point(Vector3::new(0.0, 0.0, 0.0), &mut result),
        Err(EvaluatorError::EmptyMesh)
    );
    assert_eq!(
        evaluator.intersection_point(Vector3::new(0.0, 0.0, 0.0), up, &mut result, f32::INFINITY),
        Err(EvaluatorError::EmptyMesh)
    );
    assert_eq!(
        evaluator.signed_distance(Vector3::new(0.0, 0.0, 0.0)),
        Err(EvaluatorError::EmptyMesh)
    );
    assert!(evaluator
        .intersection_points(Vector3::new(0.0, 0.0, 0.0), up, f32::INFINITY)
        .is_empty());
    assert_eq!(evaluator.volume(), 0.0);
    assert_eq!(evaluator.surface_area(), 0.0);
}

#[test]
fn foreign_results_are_rejected_untouched() {
    let evaluator = cube();
    let mut result = PrimitiveResult::default();
    assert_eq!(
        evaluator.validate_result(&result),
        Err(EvaluatorError::TypeMismatch {
            expected: "mesh",
            found: "unbound",
        })
    );
    assert!(evaluator
        .closest_point(Vector3::new(0.3, 0.6, 2.0), &mut result)
        .is_err());
    assert_eq!(result, PrimitiveResult::default());
    assert!(evaluator.validate_result(&evaluator.create_result()).is_ok());
}

#[test]
fn unit_cube_mass_properties() {
    let evaluator = cube();
    assert!(evaluator.is_closed());
    assert_float_eq!(evaluator.volume(), 1.0, abs <= 1e-5);
    assert_vector(evaluator.center_of_gravity(), Vector3::new(0.5, 0.5, 0.5), 1e-5);
    assert_float_eq!(evaluator.surface_area(), 6.0, abs <= 1e-5);
    let inertia = evaluator.inertia();
    assert_float_eq!(inertia[0][0], 1.0 / 6.0, abs <= 1e-5);
    assert_float_eq!(inertia[1][1], 1.0 / 6.0, abs <= 1e-5);
    assert_float_eq!(inertia[2][2], 1.0 / 6.0, abs <= 1e-5);
    assert_float_eq!(inertia[1][0], 0.0, abs <= 1e-5);
}

#[test]
fn octahedron_volume_and_area() {
    let evaluator = MeshEvaluator::new(plumb_test_data::octahedron()).unwrap();
    assert_float_eq!(evaluator.volume(), 4.0 / 3.0, abs <= 1e-5);
    assert_float_eq!(evaluator.surface_area(), 4.0 * 3f32.sqrt(), abs <= 1e-5);
    assert_vector(evaluator.center_of_gravity(), Vector3::new(0.0, 0.0, 0.0), 1e-5);
}

#[test]
fn open_mesh_is_reported() {
    let evaluator = MeshEvaluator::new(plumb_test_data::uv_plane(2)).unwrap();
    assert!(!evaluator.is_closed());
    assert_eq!(evaluator.volume(), 0.0);
    assert_vector(evaluator.center_of_gravity(), Vector3::new(1.0, 1.5, 0.0), 1e-5);
}

#[test]
fn closest_point_on_cube_face() {
    let evaluator = cube();
    let mut result = evaluator.create_result();
    evaluator
        .closest_point(Vector3::new(0.3, 0.6, 2.0), &mut result)
        .unwrap();
    assert_vector(result.point(), Vector3::new(0.3, 0.6, 1.0), 1e-6);
    assert_vector(result.geometric_normal(), Vector3::new(0.0, 0.0, 1.0), 1e-6);
    assert_float_eq!(result.distance(), 1.0, abs <= 1e-6);

    let bary = result.barycentric();
    assert_float_eq!(bary.x + bary.y + bary.z, 1.0, abs <= 1e-6);
    let ids = result.vertex_ids();
    let points = evaluator.mesh().points();
    let rebuilt = points[ids[0] as usize] * bary.x + points[ids[1] as usize] * bary.y + points[ids[2] as usize] * bary.z;
    assert_vector(rebuilt, result.point(), 1e-6);
}

#[test]
fn closest_point_at_a_corner() {
    let evaluator = cube();
    let mut result = evaluator.create_result();
    evaluator
        .closest_point(Vector3::new(2.0, 2.0, 2.0), &mut result)
        .unwrap();
    assert_vector(result.point(), Vector3::new(1.0, 1.0, 1.0), 1e-6);
    assert_float_eq!(result.distance(), 3f32.sqrt(), abs <= 1e-5);
    let s = 1.0 / 3f32.sqrt();
    assert_vector(result.normal(), Vector3::new(s, s, s), 1e-5);
}

#[test]
fn ray_through_cube() {
    let evaluator = cube();
    let origin = Vector3::new(0.3, 0.6, -1.0);
    let up = Vector3::new(0.0, 0.0, 2.0);

    let mut result = evaluator.create_result();
    assert!(evaluator
        .intersection_point(origin, up, &mut result, f32::INFINITY)
        .unwrap());
    assert_float_eq!(result.distance(), 1.0, abs <= 1e-6);
    assert_vector(result.point(), Vector3::new(0.3, 0.6, 0.0), 1e-6);
    assert_vector(result.geometric_normal(), Vector3::new(0.0, 0.0, -1.0), 1e-6);

    let mut hits = evaluator.intersection_points(origin, up, f32::INFINITY);
    assert_eq!(hits.len(), 2);
    hits.sort_by(|a, b| a.distance().total_cmp(&b.distance()));
    assert_float_eq!(hits[0].distance(), 1.0, abs <= 1e-6);
    assert_float_eq!(hits[1].distance(), 2.0, abs <= 1e-6);
    assert_eq!(evaluator.intersection_points(origin, up, 1.5).len(), 1);
}

#[test]
fn missing_ray_leaves_result_alone() {
    let evaluator = cube();
    let mut result = evaluator.create_result();
    let up = Vector3::new(0.0, 0.0, 1.0);
    assert!(evaluator
        .intersection_point(Vector3::new(0.3, 0.6, -1.0), up, &mut result, f32::INFINITY)
        .unwrap());
    let before = result.clone();

    // Beside the cube, short of it, and without a direction.
    assert!(!evaluator
        .intersection_point(Vector3::new(3.0, 0.6, -1.0), up, &mut result, f32::INFINITY)
        .unwrap());
    assert!(!evaluator
        .intersection_point(Vector3::new(0.3, 0.6, -1.0), up, &mut result, 0.5)
        .unwrap());
    assert!(!evaluator
        .intersection_point(
            Vector3::new(0.3, 0.6, -1.0),
            Vector3::new(0.0, 0.0, 0.0),
            &mut result,
            f32::INFINITY
        )
        .unwrap());
    assert_eq!(result, before);
}

#[test]
fn ray_from_inside_hits_the_exit_face() {
    let evaluator = cube();
    let mut result = evaluator.create_result();
    assert!(evaluator
        .intersection_point(
            Vector3::new(0.3, 0.6, 0.5),
            Vector3::new(1.0, 0.0, 0.0),
            &mut result,
            f32::INFINITY
        )
        .unwrap());
    assert_float_eq!(result.distance(), 0.7, abs <= 1e-6);
    assert_vector(result.geometric_normal(), Vector3::new(1.0, 0.0, 0.0), 1e-6);
}

#[test]
fn signed_distance_sign() {
    let evaluator = cube();
    assert_float_eq!(
        evaluator.signed_distance(Vector3::new(0.5, 0.5, 0.5)).unwrap(),
        -0.5,
        abs <= 1e-6
    );
    assert_float_eq!(
        evaluator.signed_distance(Vector3::new(0.5, 0.4, 0.2)).unwrap(),
        -0.2,
        abs <= 1e-6
    );
    assert_float_eq!(
        evaluator.signed_distance(Vector3::new(5.0, 0.3, 0.6)).unwrap(),
        4.0,
        abs <= 1e-5
    );
    // Nearest feature is an edge, then a corner.
    assert_float_eq!(
        evaluator.signed_distance(Vector3::new(2.0, 2.0, 0.5)).unwrap(),
        2f32.sqrt(),
        abs <= 1e-5
    );
    assert_float_eq!(
        evaluator.signed_distance(Vector3::new(-1.0, -1.0, -1.0)).unwrap(),
        3f32.sqrt(),
        abs <= 1e-5
    );
}

#[test]
fn signed_distance_on_octahedron() {
    let evaluator = MeshEvaluator::new(plumb_test_data::octahedron()).unwrap();
    let inside = evaluator.signed_distance(Vector3::new(0.0, 0.0, 0.0)).unwrap();
    assert_float_eq!(inside, -1.0 / 3f32.sqrt(), abs <= 1e-5);
    assert!(evaluator.signed_distance(Vector3::new(0.0, 0.0, 3.0)).unwrap() > 1.9);
}

#[test]
fn point_at_uv_on_plane() {
    let evaluator = MeshEvaluator::new(plumb_test_data::uv_plane(4)).unwrap();
    let mut result = evaluator.create_result();
    assert!(evaluator
        .point_at_uv(Vector2::new(0.3, 0.7), &mut result)
        .unwrap());
    assert_vector(result.point(), Vector3::new(0.6, 2.1, 0.0), 1e-5);
    assert_float_eq!(result.uv().x, 0.3, abs <= 1e-5);
    assert_float_eq!(result.uv().y, 0.7, abs <= 1e-5);
    assert_vector(result.u_tangent(), Vector3::new(2.0, 0.0, 0.0), 1e-4);
    assert_vector(result.v_tangent(), Vector3::new(0.0, 3.0, 0.0), 1e-4);
    assert_vector(result.normal(), Vector3::new(0.0, 0.0, 1.0), 1e-6);

    let before = result.clone();
    assert!(!evaluator
        .point_at_uv(Vector2::new(1.5, 0.5), &mut result)
        .unwrap());
    assert_eq!(result, before);

    let bound = evaluator.uv_bound();
    assert_eq!(bound.min, Vector2::new(0.0, 0.0));
    assert_eq!(bound.max, Vector2::new(1.0, 1.0));
}

#[test]
fn uv_queries_need_uvs() {
    let evaluator = cube();
    let mut result = evaluator.create_result();
    assert!(matches!(
        evaluator.point_at_uv(Vector2::new(0.5, 0.5), &mut result),
        Err(EvaluatorError::Unsupported(_))
    ));
    assert!(evaluator.uv_bound().is_empty());
    assert!(evaluator.uv_tree().is_none());

    let config = EvaluatorConfig {
        uv_attribute: "st".to_string(),
        ..EvaluatorConfig::default()
    };
    let renamed = MeshEvaluator::with_config(plumb_test_data::uv_plane(2), config).unwrap();
    assert!(renamed.point_at_uv(Vector2::new(0.5, 0.5), &mut result).is_err());
    assert_eq!(renamed.uv_bound(), Box2::empty());
}

#[test]
fn overlapping_face_varying_uvs_pick_one_triangle() {
    // Two triangles of a strip share the same uv footprint.
    let points = vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(5.0, 0.0, 0.0),
        Vector3::new(6.0, 0.0, 0.0),
        Vector3::new(5.0, 1.0, 0.0),
    ];
    let footprint = [Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)];
    let uvs = AttributeData::Vector2(footprint.iter().chain(footprint.iter()).copied().collect());
    let mesh = PolygonMesh::from_indexed_triangles(points, &[[0, 1, 2], [3, 4, 5]])
        .unwrap()
        .with_attribute("uv", Attribute::new(Interpolation::FaceVarying, uvs))
        .unwrap();
    let evaluator = MeshEvaluator::new(mesh).unwrap();

    let mut first = evaluator.create_result();
    assert!(evaluator.point_at_uv(Vector2::new(0.25, 0.25), &mut first).unwrap());
    let mut again = evaluator.create_result();
    assert!(evaluator.point_at_uv(Vector2::new(0.25, 0.25), &mut again).unwrap());
    assert_eq!(first, again);

    let x = first.point().x;
    assert!(
        (x - 0.25).abs() < 1e-6 || (x - 5.25).abs() < 1e-6,
        "unexpected point {:?}",
        first.point()
    );
}

#[test]
fn normal_attribute_overrides_vertex_normals() {
    let plane = plumb_test_data::uv_plane(2);
    let count = plane.points().len();
    let tilted = Vector3::new(0.0, 3.0, 4.0);
    let mesh = plane
        .with_attribute(
            "N",
            Attribute::new(Interpolation::Vertex, AttributeData::Vector3(vec![tilted; count])),
        )
        .unwrap();
    let evaluator = MeshEvaluator::new(mesh).unwrap();
    let mut result = evaluator.create_result();
    evaluator
        .closest_point(Vector3::new(0.7, 1.1, 1.0), &mut result)
        .unwrap();
    assert_vector(result.normal(), Vector3::new(0.0, 0.6, 0.8), 1e-6);
    assert_vector(result.geometric_normal(), Vector3::new(0.0, 0.0, 1.0), 1e-6);
}

#[test]
fn attributes_are_read_at_the_result() {
    let plane = plumb_test_data::uv_plane(3);
    let heights = plane.points().iter().map(|p| p.x + 10.0 * p.y).collect();
    let labels = (0..plane.face_count()).map(|f| format!("face {}", f)).collect();
    let mesh = plane
        .with_attribute("height", Attribute::new(Interpolation::Vertex, AttributeData::Float(heights)))
        .and_then(|m| {
            m.with_attribute(
                "label",
                Attribute::new(Interpolation::Uniform, AttributeData::String(labels)),
            )
        })
        .unwrap();
    let evaluator = MeshEvaluator::new(Arc::new(mesh)).unwrap();

    let mut result = evaluator.create_result();
    evaluator
        .closest_point(Vector3::new(1.1, 0.4, -2.0), &mut result)
        .unwrap();
    let mesh = evaluator.mesh();
    let height = mesh.attribute("height").unwrap();
    assert_float_eq!(result.float_attribute(height).unwrap(), 5.1, abs <= 1e-4);
    assert_eq!(
        result.int_attribute(height),
        Err(EvaluatorError::TypeMismatch {
            expected: "int",
            found: "float",
        })
    );
    let label = mesh.attribute("label").unwrap();
    assert_eq!(
        result.string_attribute(label).unwrap(),
        format!("face {}", result.triangle_index())
    );
}

#[test]
fn stl_cube_mass_properties() {
    let mesh: DefaultMesh = plumb_stl::parse_stl(plumb_test_data::STL_CUBE.bytes).unwrap();
    let evaluator = MeshEvaluator::new(mesh).unwrap();
    let edge = plumb_test_data::STL_CUBE.edge_length;
    assert!(evaluator.is_closed());
    assert_float_eq!(evaluator.volume(), edge * edge * edge, r2nd <= 1e-5);
    assert_vector(evaluator.center_of_gravity(), Vector3::new(10.0, 10.0, 10.0), 1e-3);
    assert_float_eq!(evaluator.surface_area(), 6.0 * edge * edge, r2nd <= 1e-5);
}

fn assert_tangent_frame(result: &PrimitiveResult) {
    let n = result.geometric_normal();
    let u = result.u_tangent();
    let v = result.v_tangent();
    assert_float_eq!(u.magnitude(), 1.0, abs <= 1e-5, "u tangent {:?}", u);
    assert_float_eq!(v.magnitude(), 1.0, abs <= 1e-5, "v tangent {:?}", v);
    assert_float_eq!(u.dot(v), 0.0, abs <= 1e-5);
    assert_float_eq!(u.dot(n), 0.0, abs <= 1e-5);
    assert_float_eq!(v.dot(n), 0.0, abs <= 1e-5);
}

#[test]
fn tangents_without_uvs_are_orthonormal_in_the_face() {
    let evaluator = cube();
    assert!(evaluator.uv_tree().is_none());
    for query in [
        Vector3::new(0.3, 0.6, 2.0),
        Vector3::new(-1.0, 0.4, 0.7),
        Vector3::new(0.6, 3.0, 0.2),
    ] {
        let mut result = evaluator.create_result();
        evaluator.closest_point(query, &mut result).unwrap();
        assert_tangent_frame(&result);

        // The u tangent follows the first edge of the hit triangle.
        let t = evaluator.triangle(result.triangle_index());
        assert_vector(result.u_tangent(), (t.p1 - t.p0).normalize(), 1e-5);
    }
}

fn strip_with_broken_uvs() -> MeshEvaluator {
    let points = vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(5.0, 0.0, 0.0),
        Vector3::new(6.0, 0.0, 0.0),
        Vector3::new(5.0, 1.0, 0.0),
        Vector3::new(10.0, 0.0, 0.0),
        Vector3::new(11.0, 0.0, 0.0),
        Vector3::new(10.0, 1.0, 0.0),
    ];
    let uvs = AttributeData::Vector2(vec![
        // valid
        Vector2::new(0.0, 0.0),
        Vector2::new(1.0, 0.0),
        Vector2::new(0.0, 1.0),
        // one corner is not a number
        Vector2::new(2.0, 0.0),
        Vector2::new(3.0, 0.0),
        Vector2::new(f32::NAN, 1.0),
        // collapsed to a point
        Vector2::new(0.5, 0.5),
        Vector2::new(0.5, 0.5),
        Vector2::new(0.5, 0.5),
    ]);
    let mesh = PolygonMesh::from_indexed_triangles(points, &[[0, 1, 2], [3, 4, 5], [6, 7, 8]])
        .unwrap()
        .with_attribute("uv", Attribute::new(Interpolation::FaceVarying, uvs))
        .unwrap();
    MeshEvaluator::new(mesh).unwrap()
}

#[test]
fn non_finite_uvs_are_left_out_of_uv_queries() {
    let evaluator = strip_with_broken_uvs();
    assert_eq!(evaluator.uv_tree().unwrap().len(), 2);

    let bound = evaluator.uv_bound();
    assert!(bound.min.x.is_finite() && bound.max.x.is_finite());
    assert_float_eq!(bound.min.x, 0.0, abs <= 1e-6);
    assert_float_eq!(bound.min.y, 0.0, abs <= 1e-6);
    assert_float_eq!(bound.max.x, 1.0, abs <= 1e-6);
    assert_float_eq!(bound.max.y, 1.0, abs <= 1e-6);

    let mut result = evaluator.create_result();
    assert!(!evaluator.point_at_uv(Vector2::new(2.2, 0.2), &mut result).unwrap());
    assert!(evaluator.point_at_uv(Vector2::new(0.2, 0.2), &mut result).unwrap());
    assert_eq!(result.triangle_index(), 0);

    // Spatial queries still reach the excluded triangle.
    let mut result = evaluator.create_result();
    evaluator.closest_point(Vector3::new(5.2, 0.2, 1.0), &mut result).unwrap();
    assert_eq!(result.triangle_index(), 1);
    assert_tangent_frame(&result);
}

#[test]
fn degenerate_uvs_fall_back_to_edge_tangents() {
    let evaluator = strip_with_broken_uvs();
    let mut result = evaluator.create_result();
    evaluator.closest_point(Vector3::new(10.2, 0.2, 1.0), &mut result).unwrap();
    assert_eq!(result.triangle_index(), 2);
    assert_vector(result.u_tangent(), Vector3::new(1.0, 0.0, 0.0), 1e-6);
    assert_vector(result.v_tangent(), Vector3::new(0.0, 1.0, 0.0), 1e-6);
}
