use std::{cmp, collections::BinaryHeap};

use glam::DVec3;

use super::{topology::MeshTopology, vertex::VertId};

/// A proposed edge collapse: cost, insertion sequence number, the edge
/// endpoints and the merge position chosen when the entry was evaluated.
///
/// Entries are never mutated after creation. The queue does no eager
/// removal; entries referencing dead vertices or broken adjacency are
/// detected and discarded by the caller at pop time.
#[derive(Debug, Clone, Copy)]
pub struct EdgeCandidate {
    pub cost: f64,
    seq: u64,
    pub u: VertId,
    pub v: VertId,
    pub position: DVec3,
}

impl PartialEq for EdgeCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}

impl Eq for EdgeCandidate {}

impl PartialOrd for EdgeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCandidate {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        // BinaryHeap is a max-heap: reverse the cost so the cheapest entry
        // surfaces first, and reverse the sequence so the earlier push wins
        // a cost tie. The sequence also keeps equal costs from ever needing
        // an endpoint comparison.
        match cmp::Reverse(self.cost).partial_cmp(&cmp::Reverse(other.cost)) {
            Some(ordering) => ordering.then(cmp::Reverse(self.seq).cmp(&cmp::Reverse(other.seq))),
            None => panic!("Cannot order invalid floats"),
        }
    }
}

/// Min-priority queue of candidate edges keyed by merge cost, with lazy
/// invalidation.
#[derive(Debug, Default)]
pub struct CandidateQueue {
    heap: BinaryHeap<EdgeCandidate>,
    next_seq: u64,
}

impl CandidateQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    /// Evaluate and push the undirected edge `(u, v)`. No-op when the
    /// endpoints coincide or are not currently adjacent; stale calls are
    /// expected, not errors.
    pub fn push_edge(&mut self, mesh: &MeshTopology, u: VertId, v: VertId) {
        if u == v {
            return;
        }
        let (u, v) = (u.min(v), u.max(v));
        if !mesh.adjacent(u, v) {
            return;
        }

        let q = mesh.quadric(u) + mesh.quadric(v);
        let (position, cost) = q.optimal_position(mesh.position(u), mesh.position(v));

        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(EdgeCandidate {
            cost,
            seq,
            u,
            v,
            position,
        });
    }

    /// Lowest-cost entry, ties going to the earlier push. The caller
    /// re-validates liveness and adjacency before acting on it.
    pub fn pop(&mut self) -> Option<EdgeCandidate> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::super::{topology::MeshTopology, tri_mesh::TriMesh, vertex::VertId};
    use super::CandidateQueue;

    /// Two congruent, disconnected triangles: every edge has the same cost.
    fn twin_triangles() -> MeshTopology {
        let tri = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        let mut verts = tri.to_vec();
        verts.extend(tri.iter().map(|p| *p + DVec3::new(10.0, 0.0, 0.0)));

        MeshTopology::new(&TriMesh::new(verts, vec![[0, 1, 2], [3, 4, 5]])).unwrap()
    }

    #[test]
    fn push_edge_ignores_self_and_non_adjacent_pairs() {
        let mesh = twin_triangles();
        let mut queue = CandidateQueue::default();

        queue.push_edge(&mesh, VertId(0), VertId(0));
        // Vertices 0 and 3 are in different components.
        queue.push_edge(&mesh, VertId(0), VertId(3));
        assert!(queue.is_empty());

        queue.push_edge(&mesh, VertId(0), VertId(1));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn equal_costs_pop_in_insertion_order() {
        let mesh = twin_triangles();
        let mut queue = CandidateQueue::default();

        // Identical geometry either side, so both entries cost the same.
        queue.push_edge(&mesh, VertId(3), VertId(4));
        queue.push_edge(&mesh, VertId(0), VertId(1));

        let first = queue.pop().unwrap();
        let second = queue.pop().unwrap();
        assert_eq!(first.cost, second.cost);
        assert_eq!((first.u, first.v), (VertId(3), VertId(4)));
        assert_eq!((second.u, second.v), (VertId(0), VertId(1)));
    }

    #[test]
    fn endpoints_are_canonicalised() {
        let mesh = twin_triangles();
        let mut queue = CandidateQueue::default();

        queue.push_edge(&mesh, VertId(2), VertId(0));
        let entry = queue.pop().unwrap();
        assert_eq!((entry.u, entry.v), (VertId(0), VertId(2)));
    }
}
