mod attribute;
mod error;
mod geometry;
mod polygon_mesh;

pub use attribute::*;
pub use error::*;
pub use geometry::*;
pub use polygon_mesh::*;

/// A reasonable default mesh to select for unopinionated consumers.
pub type DefaultMesh = PolygonMesh;

pub trait TriangleMesh: Sized {
    /// Creates a TriangleMesh from a list of triangles.
    ///
    /// # Arguments
    ///
    /// * `triangles` - A vector of the triangles of the mesh.
    fn from_triangles(triangles: Vec<Triangle>) -> Self;

    /// Returns the number of triangles that comprises this mesh.
    fn triangle_count(&self) -> usize;

    /// Iterates over the triangles of this mesh, in face order.
    fn triangles(&self) -> impl Iterator<Item = Triangle> + '_;
}
