use std::collections::BTreeSet;

use glam::DVec3;

use super::{
    face::Face,
    plane::Plane,
    quadric::Quadric,
    tri_mesh::{MeshError, TriMesh},
    vertex::{VertId, Vertex},
};

/// Mutable vertex/face arenas with alive flags, plus the derived
/// vertex-adjacency sets, maintained incrementally as edges collapse.
///
/// Adjacency is stored as ordered index sets rather than references: no
/// ownership cycles, and iteration order is deterministic, which the
/// tie-breaking guarantee of the candidate queue depends on. Dead entries
/// stay in place until [`compact`](MeshTopology::compact) renumbers the
/// survivors.
#[derive(Debug, Clone)]
pub struct MeshTopology {
    verts: Vec<Vertex>,
    faces: Vec<Face>,
    adjacency: Vec<BTreeSet<VertId>>,
    live_faces: usize,
    face_uvs: Option<Vec<[f64; 6]>>,
}

impl MeshTopology {
    /// Build the working state from validated input: per-vertex quadrics
    /// accumulated from every non-degenerate face's plane, adjacency from
    /// every face's three edges. Zero-area faces are flagged dead
    /// immediately and contribute no quadric.
    pub fn new(mesh: &TriMesh) -> Result<Self, MeshError> {
        mesh.validate()?;

        let mut verts: Vec<Vertex> = mesh.verts.iter().map(|&p| Vertex::new(p)).collect();
        let mut faces: Vec<Face> = mesh
            .faces
            .iter()
            .map(|&[a, b, c]| Face::new([VertId(a), VertId(b), VertId(c)]))
            .collect();

        let mut live_faces = faces.len();
        for face in &mut faces {
            let [a, b, c] = face.corners;
            let plane = Plane::from_triangle(
                verts[a.index()].position,
                verts[b.index()].position,
                verts[c.index()].position,
            );
            match plane {
                Some(plane) => {
                    let k = plane.fundamental_error_quadric();
                    verts[a.index()].quadric += k;
                    verts[b.index()].quadric += k;
                    verts[c.index()].quadric += k;
                }
                None => {
                    face.alive = false;
                    live_faces -= 1;
                }
            }
        }

        let mut adjacency = vec![BTreeSet::new(); verts.len()];
        for face in &faces {
            let [a, b, c] = face.corners;
            adjacency[a.index()].extend([b, c]);
            adjacency[b.index()].extend([a, c]);
            adjacency[c.index()].extend([a, b]);
        }

        Ok(Self {
            verts,
            faces,
            adjacency,
            live_faces,
            face_uvs: mesh.face_uvs.clone(),
        })
    }

    pub fn vert_count(&self) -> usize {
        self.verts.len()
    }

    pub fn live_face_count(&self) -> usize {
        self.live_faces
    }

    pub fn vert_ids(&self) -> impl Iterator<Item = VertId> + '_ {
        (0..self.verts.len()).map(VertId::from)
    }

    pub fn is_live(&self, v: VertId) -> bool {
        self.verts[v.index()].alive
    }

    pub fn position(&self, v: VertId) -> DVec3 {
        self.verts[v.index()].position
    }

    pub fn quadric(&self, v: VertId) -> Quadric {
        self.verts[v.index()].quadric
    }

    pub fn adjacent(&self, u: VertId, v: VertId) -> bool {
        self.adjacency[u.index()].contains(&v)
    }

    pub fn neighbours(&self, v: VertId) -> impl Iterator<Item = VertId> + '_ {
        self.adjacency[v.index()].iter().copied()
    }

    pub(super) fn verts(&self) -> &[Vertex] {
        &self.verts
    }

    pub(super) fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub(super) fn face_uvs(&self) -> Option<&[[f64; 6]]> {
        self.face_uvs.as_deref()
    }

    /// Collapse `v` into `u`: move `u` to `new_pos`, absorb `v`'s quadric,
    /// re-parent `v`'s neighbours onto `u`, rewrite every live face
    /// referencing `v` and kill the ones that degenerate. Returns the number
    /// of faces dropped; the live-face counter is already decremented.
    ///
    /// No face is re-triangulated or flipped, and no geometry is created
    /// besides the merged vertex.
    pub fn collapse(&mut self, u: VertId, v: VertId, new_pos: DVec3) -> usize {
        self.verts[u.index()].position = new_pos;
        let vq = self.verts[v.index()].quadric;
        self.verts[u.index()].quadric += vq;
        self.verts[v.index()].alive = false;

        self.adjacency[u.index()].remove(&v);
        self.adjacency[v.index()].remove(&u);

        // Re-parent the remaining neighbours, keeping the sets symmetric.
        let orphans = std::mem::take(&mut self.adjacency[v.index()]);
        for w in orphans {
            self.adjacency[w.index()].remove(&v);
            if w != u {
                self.adjacency[w.index()].insert(u);
                self.adjacency[u.index()].insert(w);
            }
        }

        let mut dropped = 0;
        for face in &mut self.faces {
            if !face.alive || !face.corners.contains(&v) {
                continue;
            }
            for corner in &mut face.corners {
                if *corner == v {
                    *corner = u;
                }
            }
            if face.is_degenerate() {
                face.alive = false;
                dropped += 1;
            }
        }
        self.live_faces -= dropped;

        dropped
    }

    /// Check the symmetric adjacency invariant: `v in adj[u]` iff
    /// `u in adj[v]`.
    #[cfg(test)]
    pub fn assert_adjacency_symmetric(&self) {
        for u in self.vert_ids() {
            for v in self.neighbours(u) {
                assert!(
                    self.adjacent(v, u),
                    "{v:?} in adj[{u:?}] but {u:?} not in adj[{v:?}]"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::super::tri_mesh::TriMesh;
    use super::super::vertex::VertId;
    use super::MeshTopology;

    /// Unit cube: 8 vertices, 12 triangles.
    pub fn cube() -> TriMesh {
        let p = |x, y, z| DVec3::new(x, y, z);
        TriMesh::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(0.0, 1.0, 0.0),
                p(0.0, 0.0, 1.0),
                p(1.0, 0.0, 1.0),
                p(1.0, 1.0, 1.0),
                p(0.0, 1.0, 1.0),
            ],
            vec![
                [0, 2, 1],
                [0, 3, 2],
                [4, 5, 6],
                [4, 6, 7],
                [0, 1, 5],
                [0, 5, 4],
                [2, 3, 7],
                [2, 7, 6],
                [0, 4, 7],
                [0, 7, 3],
                [1, 2, 6],
                [1, 6, 5],
            ],
        )
    }

    #[test]
    fn cube_adjacency_is_symmetric() {
        let topology = MeshTopology::new(&cube()).unwrap();

        topology.assert_adjacency_symmetric();
        assert_eq!(topology.live_face_count(), 12);

        // Every cube vertex touches at least its 3 axis neighbours.
        for u in topology.vert_ids() {
            assert!(topology.neighbours(u).count() >= 3);
        }
    }

    #[test]
    fn zero_area_face_dies_at_init_and_adds_no_quadric() {
        let mesh = TriMesh::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(2.0, 0.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            // First face is collinear, second is fine.
            vec![[0, 1, 2], [0, 1, 3]],
        );
        let topology = MeshTopology::new(&mesh).unwrap();

        assert_eq!(topology.live_face_count(), 1);
        assert!(!topology.faces()[0].alive);

        // Vertex 2 sits only on the dead face: its quadric stays zero.
        assert_eq!(topology.quadric(VertId(2)).0, glam::DMat4::ZERO);
    }

    #[test]
    fn collapse_rewrites_faces_and_keeps_symmetry() {
        let mut topology = MeshTopology::new(&cube()).unwrap();

        let u = VertId(0);
        let v = VertId(1);
        assert!(topology.adjacent(u, v));

        let new_pos = DVec3::new(0.5, 0.0, 0.0);
        let dropped = topology.collapse(u, v, new_pos);

        // The cube edge 0-1 borders two triangles; both degenerate.
        assert_eq!(dropped, 2);
        assert_eq!(topology.live_face_count(), 10);
        assert!(!topology.is_live(v));
        assert_eq!(topology.position(u), new_pos);
        topology.assert_adjacency_symmetric();

        // No live face still references the dead vertex.
        for face in topology.faces() {
            if face.alive {
                assert!(!face.corners.contains(&v));
            }
        }
    }
}
