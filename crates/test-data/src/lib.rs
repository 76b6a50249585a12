use plumb_mesh::{Attribute, AttributeData, Interpolation, PolygonMesh, Vector2, Vector3};

pub struct TestModel {
    pub bytes: &'static [u8],
    pub edge_length: f32,
}

/// An axis aligned cube spanning 0-20 on x, y and z, stored as 12 facets.
pub const STL_CUBE: TestModel = TestModel {
    bytes: include_bytes!("../../../res/cube/cube-bin.stl"),
    edge_length: 20.0,
};

/// Point `i` of the unit cube has the bits of `i` as its `x, y, z` coordinates.
const CUBE_QUADS: [[u32; 4]; 6] = [
    [0, 2, 6, 4], // z = 0
    [1, 5, 7, 3], // z = 1
    [0, 4, 5, 1], // y = 0
    [2, 3, 7, 6], // y = 1
    [0, 1, 3, 2], // x = 0
    [4, 6, 7, 5], // x = 1
];

fn cube_points() -> Vec<Vector3> {
    (0..8u32)
        .map(|i| Vector3::new(((i >> 2) & 1) as f32, ((i >> 1) & 1) as f32, (i & 1) as f32))
        .collect()
}

/// The unit cube `[0, 1]^3` as 12 outward wound triangles.
///
/// Every square face is split along the diagonal through its first corner.
pub fn unit_cube() -> PolygonMesh {
    let triangles: Vec<[u32; 3]> = CUBE_QUADS
        .iter()
        .flat_map(|q| [[q[0], q[1], q[2]], [q[0], q[2], q[3]]])
        .collect();
    PolygonMesh::from_indexed_triangles(cube_points(), &triangles).unwrap()
}

/// The unit cube with its six square faces left as quads.
pub fn quad_cube() -> PolygonMesh {
    let ids = CUBE_QUADS.iter().flatten().copied().collect();
    PolygonMesh::new(cube_points(), vec![4; 6], ids).unwrap()
}

/// The octahedron with its six points on the unit axes, wound outward.
pub fn octahedron() -> PolygonMesh {
    let points = vec![
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(-1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, -1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(0.0, 0.0, -1.0),
    ];
    let triangles = [
        [0, 2, 4],
        [1, 4, 2],
        [0, 4, 3],
        [0, 5, 2],
        [1, 3, 4],
        [1, 2, 5],
        [0, 3, 5],
        [1, 5, 3],
    ];
    PolygonMesh::from_indexed_triangles(points, &triangles).unwrap()
}

/// A flat `2 x 3` rectangle on `z = 0` split into `n x n` quads of two
/// triangles each.
///
/// The per-vertex `"uv"` attribute spans the unit square, so the point at
/// `uv` is `(2 u, 3 v, 0)`. Triangles face `+z`.
pub fn uv_plane(n: u32) -> PolygonMesh {
    let row = n + 1;
    let mut points = Vec::new();
    let mut uvs = Vec::new();
    for j in 0..row {
        for i in 0..row {
            let uv = Vector2::new(i as f32 / n as f32, j as f32 / n as f32);
            points.push(Vector3::new(2.0 * uv.x, 3.0 * uv.y, 0.0));
            uvs.push(uv);
        }
    }
    let mut triangles = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let a = j * row + i;
            let b = a + 1;
            let c = a + row + 1;
            let d = a + row;
            triangles.push([a, b, c]);
            triangles.push([a, c, d]);
        }
    }
    PolygonMesh::from_indexed_triangles(points, &triangles)
        .and_then(|m| {
            m.with_attribute(
                "uv",
                Attribute::new(Interpolation::Vertex, AttributeData::Vector2(uvs)),
            )
        })
        .unwrap()
}
