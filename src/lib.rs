//! Quadric Error Metric (QEM) triangle-mesh simplification.
//!
//! Reduces the triangle count of an already-triangulated surface mesh while
//! minimizing geometric distortion: per-vertex error quadrics are summed
//! from face planes, candidate edges sit in a min-priority queue with lazy
//! invalidation, and the cheapest valid edge is collapsed repeatedly until a
//! target face count is reached, the queue runs dry, or the caller's time
//! budget / progress callback stops the run. Every exit is a valid mesh.
//!
//! The algorithm is single-threaded and synchronous with no I/O; each call
//! owns its own state, so separate meshes can be simplified concurrently by
//! separate calls.

pub mod mesh;

pub use mesh::{
    candidate::{CandidateQueue, EdgeCandidate},
    quadric::Quadric,
    reduction::{ProgressFn, Reduction, ReduceOutcome, SimplifyOptions},
    topology::MeshTopology,
    tri_mesh::{MeshError, TriMesh},
};

/// Summary counters for one [`simplify`] call.
#[derive(Debug, Clone, Copy)]
pub struct SimplifyReport {
    pub faces_before: usize,
    pub faces_after: usize,
    pub verts_before: usize,
    pub verts_after: usize,
    pub collapses: usize,
    /// Sum of the quadric costs of the executed collapses.
    pub error_introduced: f64,
    pub outcome: ReduceOutcome,
}

/// Simplify `mesh` toward the target face count configured in `opts`,
/// returning a new, compacted mesh and a run report.
///
/// Only structural contract violations error, and they do so before any
/// mutation begins. Degenerate geometry is absorbed, and a time-budget
/// overrun or exhausted queue is a normal, successful termination with a
/// partial result.
pub fn simplify(
    mesh: &TriMesh,
    opts: &SimplifyOptions,
    progress: Option<&mut ProgressFn<'_>>,
) -> Result<(TriMesh, SimplifyReport), MeshError> {
    let mut topology = MeshTopology::new(mesh)?;
    let reduction = topology.reduce(opts, progress);
    let output = topology.compact();

    let report = SimplifyReport {
        faces_before: mesh.faces.len(),
        faces_after: output.faces.len(),
        verts_before: mesh.verts.len(),
        verts_after: output.verts.len(),
        collapses: reduction.collapses,
        error_introduced: reduction.error_introduced,
        outcome: reduction.outcome,
    };

    Ok((output, report))
}
