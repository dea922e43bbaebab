use std::time::{Duration, Instant};

use log::debug;

use super::{candidate::CandidateQueue, topology::MeshTopology};

/// Caller-supplied progress callback, invoked with
/// `(collapsed_so_far, current_live_faces, target_faces)`. Returning `false`
/// ends the run immediately, keeping whatever has been collapsed. An absent
/// callback and one that always returns `true` behave identically.
pub type ProgressFn<'a> = dyn FnMut(usize, usize, usize) -> bool + 'a;

/// Tuning knobs for one simplification run.
#[derive(Debug, Clone)]
pub struct SimplifyOptions {
    /// Target face ratio, clamped to `0..=1`. Used when `target_faces` is
    /// `None`.
    pub ratio: f64,
    /// Absolute target face count; overrides `ratio`.
    pub target_faces: Option<usize>,
    /// Cap on the number of edge collapses, applied by flooring the target.
    pub max_collapses: Option<usize>,
    /// Wall-clock budget. Running out is a normal early stop, not an error.
    pub time_limit: Option<Duration>,
    /// Invoke the progress callback every this many collapses.
    pub progress_interval: usize,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            ratio: 0.5,
            target_faces: None,
            max_collapses: None,
            time_limit: None,
            progress_interval: 20_000,
        }
    }
}

impl SimplifyOptions {
    /// Resolve the target face count for a mesh with `faces` live faces:
    /// `round(faces * clamp(ratio, 0, 1))` unless an absolute target is
    /// given, then floored to `faces - max_collapses`.
    pub fn target_face_count(&self, faces: usize) -> usize {
        let mut target = match self.target_faces {
            Some(t) => t,
            None => (faces as f64 * self.ratio.clamp(0.0, 1.0)).round() as usize,
        };
        if let Some(cap) = self.max_collapses {
            target = target.max(faces.saturating_sub(cap));
        }
        target
    }
}

/// Terminal state of the collapse loop. All three are successful exits;
/// well-formed input has no failure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOutcome {
    /// The live face count fell to the target.
    TargetReached,
    /// No candidates remained before the target was reached.
    QueueExhausted,
    /// The time budget expired or the progress callback asked to stop; the
    /// mesh holds a partial but valid result.
    Interrupted,
}

/// What one [`MeshTopology::reduce`] run did.
#[derive(Debug, Clone, Copy)]
pub struct Reduction {
    pub outcome: ReduceOutcome,
    pub collapses: usize,
    /// Sum of the quadric costs of the executed collapses; an estimate of
    /// the geometric error introduced.
    pub error_introduced: f64,
}

impl MeshTopology {
    /// Seed a queue with every live undirected edge, each pushed once.
    pub fn initialise_collapse_queue(&self) -> CandidateQueue {
        let mut queue = CandidateQueue::with_capacity(self.live_face_count() * 3);
        for u in self.vert_ids() {
            for v in self.neighbours(u) {
                if u < v {
                    queue.push_edge(self, u, v);
                }
            }
        }
        queue
    }

    /// Collapse cheapest edges until the target face count is reached, the
    /// queue runs dry, or the time budget / progress callback stops the run.
    pub fn reduce(
        &mut self,
        opts: &SimplifyOptions,
        mut progress: Option<&mut ProgressFn<'_>>,
    ) -> Reduction {
        let target = opts.target_face_count(self.live_face_count());
        let mut queue = self.initialise_collapse_queue();

        debug!(
            "reducing {} live faces to {target} ({} candidate edges)",
            self.live_face_count(),
            queue.len()
        );

        let start = Instant::now();
        let interval = opts.progress_interval.max(1);
        let mut collapses = 0;
        let mut last_report = 0;
        let mut error_introduced = 0.0;

        // The first report goes out before any collapse; a `false` here
        // leaves the input untouched.
        if let Some(cb) = progress.as_mut() {
            if !cb(0, self.live_face_count(), target) {
                return Reduction {
                    outcome: ReduceOutcome::Interrupted,
                    collapses,
                    error_introduced,
                };
            }
        }

        let outcome = loop {
            if self.live_face_count() <= target {
                break ReduceOutcome::TargetReached;
            }
            if let Some(limit) = opts.time_limit {
                if start.elapsed() >= limit {
                    break ReduceOutcome::Interrupted;
                }
            }

            let Some(candidate) = queue.pop() else {
                break ReduceOutcome::QueueExhausted;
            };
            // Lazy invalidation: entries whose endpoints died or whose edge
            // is gone are discarded silently.
            if !self.is_live(candidate.u) || !self.is_live(candidate.v) {
                continue;
            }
            if !self.adjacent(candidate.u, candidate.v) {
                continue;
            }

            self.collapse(candidate.u, candidate.v, candidate.position);
            collapses += 1;
            error_introduced += candidate.cost;

            // Re-evaluate every edge around the surviving vertex. Entries
            // superseded by these stay in the heap until popped.
            for w in self.neighbours(candidate.u) {
                queue.push_edge(self, candidate.u, w);
            }

            if let Some(cb) = progress.as_mut() {
                if collapses - last_report >= interval {
                    last_report = collapses;
                    if !cb(collapses, self.live_face_count(), target) {
                        break ReduceOutcome::Interrupted;
                    }
                }
            }
        };

        debug!(
            "reduction stopped: {outcome:?} after {collapses} collapses, \
             {} live faces, error {error_introduced:.3e}",
            self.live_face_count()
        );

        Reduction {
            outcome,
            collapses,
            error_introduced,
        }
    }
}
