use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use glam::DVec3;
use meshqem::{simplify, SimplifyOptions, TriMesh};
use obj::{Group, IndexTuple, Obj, ObjData, Object, SimplePolygon};

/// QEM triangle-mesh simplifier: OBJ in, OBJ out.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Input OBJ path (triangles only).
    #[arg(long = "in")]
    input: PathBuf,
    /// Output OBJ path.
    #[arg(long = "out")]
    output: PathBuf,
    /// Target face ratio in 0..=1; ignored when --target-faces is given.
    #[arg(long, default_value_t = 0.5)]
    ratio: f64,
    /// Absolute target face count.
    #[arg(long)]
    target_faces: Option<usize>,
    /// Cap on the number of edge collapses.
    #[arg(long)]
    max_collapses: Option<usize>,
    /// Time limit in seconds; the mesh collapsed so far is kept.
    #[arg(long)]
    time_limit: Option<f64>,
    /// Log a progress line every N collapses.
    #[arg(long, default_value_t = 20_000)]
    progress_interval: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let obj = Obj::load(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    let mesh = tri_mesh_from_obj(&obj.data)?;

    let opts = SimplifyOptions {
        ratio: args.ratio,
        target_faces: args.target_faces,
        max_collapses: args.max_collapses,
        time_limit: args.time_limit.map(Duration::from_secs_f64),
        progress_interval: args.progress_interval,
    };

    let mut log_progress = |collapsed: usize, faces_now: usize, target: usize| {
        log::info!("collapsed={collapsed} faces_now={faces_now} target={target}");
        true
    };

    let (simplified, report) = simplify(&mesh, &opts, Some(&mut log_progress))?;

    write_obj(&simplified, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    // Two-line summary parsed by the calling pipeline; keep stdout clean.
    println!("faces: {} -> {}", report.faces_before, report.faces_after);
    println!("verts: {} -> {}", report.verts_before, report.verts_after);

    Ok(())
}

fn tri_mesh_from_obj(data: &ObjData) -> anyhow::Result<TriMesh> {
    let verts = data
        .position
        .iter()
        .map(|&[x, y, z]| DVec3::new(x as f64, y as f64, z as f64))
        .collect();

    let mut faces = Vec::new();
    for object in &data.objects {
        for group in &object.groups {
            for poly in &group.polys {
                anyhow::ensure!(
                    poly.0.len() == 3,
                    "non-triangle polygon ({} corners) in object {:?}",
                    poly.0.len(),
                    object.name
                );
                faces.push([poly.0[0].0 as u32, poly.0[1].0 as u32, poly.0[2].0 as u32]);
            }
        }
    }

    Ok(TriMesh::new(verts, faces))
}

fn write_obj(mesh: &TriMesh, path: &Path) -> anyhow::Result<()> {
    let mut data = ObjData::default();
    data.position = mesh
        .verts
        .iter()
        .map(|v| [v.x as f32, v.y as f32, v.z as f32])
        .collect();

    let mut group = Group::new("default".to_string());
    for &[a, b, c] in &mesh.faces {
        group.polys.push(SimplePolygon(
            [
                IndexTuple(a as usize, None, None),
                IndexTuple(b as usize, None, None),
                IndexTuple(c as usize, None, None),
            ]
            .to_vec(),
        ));
    }

    let mut object = Object::new("meshqem".to_string());
    object.groups.push(group);
    data.objects.push(object);

    data.save(path)?;
    Ok(())
}
