mod bounds;
mod closest;
mod config;
mod error;
mod evaluator;
mod interpolate;
mod mass;
mod normals;
mod primitive;
mod ray;
mod result;
mod tree;
mod uv;

pub use bounds::*;
pub use closest::closest_point_on_triangle;
pub use config::*;
pub use error::*;
pub use evaluator::*;
pub use interpolate::{interpolate, AttributeValue};
pub use mass::MassProperties;
pub use normals::{edge_key, EdgeNormals};
pub use primitive::*;
pub use ray::intersect_triangle;
pub use result::*;
pub use tree::*;
pub use uv::uv_barycentric;
