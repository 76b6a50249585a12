use clap::{Parser, Subcommand};
use plumb_mesh::Vector3;

/// Parses `x,y,z`.
pub fn parse_vector(s: &str) -> Result<Vector3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("'{}': {}", p, e)))
        .collect::<Result<Vec<_>, _>>()?;
    match parts[..] {
        [x, y, z] => Ok(Vector3::new(x, y, z)),
        _ => Err(format!("expected three comma separated values, got {}", parts.len())),
    }
}

#[derive(clap::Args, Debug)]
pub struct MassArgs {
    pub stl_path: String,
}

#[derive(clap::Args, Debug)]
pub struct PointArgs {
    pub stl_path: String,

    /// Query point as `x,y,z`.
    #[arg(value_parser = parse_vector, allow_hyphen_values = true)]
    pub point: Vector3,
}

#[derive(clap::Args, Debug)]
pub struct RayArgs {
    pub stl_path: String,

    /// Ray origin as `x,y,z`.
    #[arg(value_parser = parse_vector, allow_hyphen_values = true)]
    pub origin: Vector3,

    /// Ray direction as `x,y,z`. Need not be unit length.
    #[arg(value_parser = parse_vector, allow_hyphen_values = true)]
    pub direction: Vector3,

    /// Ignore hits at or beyond this distance.
    #[arg(short, long, default_value_t = f32::INFINITY)]
    pub max_distance: f32,

    /// Report every hit, sorted by distance, instead of the nearest.
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Volume, center of gravity, inertia and surface area.
    Mass(MassArgs),
    /// Closest point on the surface.
    Closest(PointArgs),
    /// Ray intersection.
    Ray(RayArgs),
    /// Signed distance, negative inside.
    Sdf(PointArgs),
}
