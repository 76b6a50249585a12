use anyhow::Context;
use clap::Parser;
use log::info;
use ordered_float::OrderedFloat;
use plumb::{MeshEvaluator, PrimitiveEvaluator, PrimitiveResult};
use plumb_mesh::{DefaultMesh, Vector3};

mod args;

use args::{Args, Commands, MassArgs, PointArgs, RayArgs};

fn load(stl_path: &str) -> anyhow::Result<MeshEvaluator> {
    let mesh: DefaultMesh =
        plumb_stl::read_stl(stl_path).with_context(|| format!("failed to read '{}'", stl_path))?;
    info!("loaded {} with {} faces", stl_path, mesh.face_count());
    MeshEvaluator::new(mesh).with_context(|| format!("'{}' cannot be evaluated", stl_path))
}

fn fmt_vector(v: Vector3) -> String {
    format!("{:.6} {:.6} {:.6}", v.x, v.y, v.z)
}

fn describe(result: &PrimitiveResult) -> String {
    format!(
        "point {}  normal {}  triangle {}  distance {:.6}",
        fmt_vector(result.point()),
        fmt_vector(result.normal()),
        result.triangle_index(),
        result.distance()
    )
}

/// The open edge warning comes from the evaluator's log, not from here.
fn mass_report(evaluator: &MeshEvaluator) -> String {
    let mass = evaluator.mass_properties();
    let i = mass.inertia;
    let mut lines = vec![
        format!("closed            {}", if evaluator.is_closed() { "yes" } else { "no" }),
        format!("volume            {:.6}", mass.volume),
        format!("center of gravity {}", fmt_vector(mass.center_of_gravity)),
        format!("surface area      {:.6}", evaluator.surface_area()),
        "inertia".to_string(),
    ];
    for row in 0..3 {
        // cgmath matrices index column first.
        lines.push(format!("  {:.6} {:.6} {:.6}", i[0][row], i[1][row], i[2][row]));
    }
    lines.join("\n")
}

fn mass(args: &MassArgs) -> anyhow::Result<()> {
    let evaluator = load(&args.stl_path)?;
    println!("{}", mass_report(&evaluator));
    Ok(())
}

fn closest(args: &PointArgs) -> anyhow::Result<()> {
    let evaluator = load(&args.stl_path)?;
    let mut result = evaluator.create_result();
    evaluator.closest_point(args.point, &mut result)?;
    println!("{}", describe(&result));
    Ok(())
}

fn ray(args: &RayArgs) -> anyhow::Result<()> {
    let evaluator = load(&args.stl_path)?;
    if args.all {
        let mut hits = evaluator.intersection_points(args.origin, args.direction, args.max_distance);
        hits.sort_by_key(|hit| OrderedFloat(hit.distance()));
        println!("{} hits", hits.len());
        for hit in &hits {
            println!("{}", describe(hit));
        }
    } else {
        let mut result = evaluator.create_result();
        if evaluator.intersection_point(args.origin, args.direction, &mut result, args.max_distance)? {
            println!("{}", describe(&result));
        } else {
            println!("no hit");
        }
    }
    Ok(())
}

fn sdf(args: &PointArgs) -> anyhow::Result<()> {
    let evaluator = load(&args.stl_path)?;
    println!("{:.6}", evaluator.signed_distance(args.point)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    match &args.command {
        Commands::Mass(a) => mass(a),
        Commands::Closest(a) => closest(a),
        Commands::Ray(a) => ray(a),
        Commands::Sdf(a) => sdf(a),
    }
}
