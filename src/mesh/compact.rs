use super::{topology::MeshTopology, tri_mesh::TriMesh};

impl MeshTopology {
    /// Drop dead vertices and faces and remap indices to a dense, contiguous
    /// range, live entries keeping their original relative order. Surviving
    /// UV sextuples are copied in the same order as their faces.
    ///
    /// This is the only step that changes index numbering.
    pub fn compact(&self) -> TriMesh {
        let mut remap = vec![u32::MAX; self.vert_count()];
        let mut verts = Vec::new();
        for (i, vert) in self.verts().iter().enumerate() {
            if vert.alive {
                remap[i] = verts.len() as u32;
                verts.push(vert.position);
            }
        }

        let mut faces = Vec::with_capacity(self.live_face_count());
        let mut face_uvs = self
            .face_uvs()
            .map(|_| Vec::with_capacity(self.live_face_count()));
        for (i, face) in self.faces().iter().enumerate() {
            if !face.alive {
                continue;
            }
            faces.push(face.corners.map(|v| remap[v.index()]));
            if let (Some(out), Some(uvs)) = (&mut face_uvs, self.face_uvs()) {
                out.push(uvs[i]);
            }
        }

        TriMesh {
            verts,
            faces,
            face_uvs,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::super::{topology::MeshTopology, tri_mesh::TriMesh, vertex::VertId};

    #[test]
    fn compact_renumbers_survivors_in_original_order() {
        // Square fan around vertex 4; collapse 4 into 0 kills two faces.
        let mesh = TriMesh::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(2.0, 0.0, 0.0),
                DVec3::new(2.0, 2.0, 0.0),
                DVec3::new(0.0, 2.0, 0.0),
                DVec3::new(1.0, 1.0, 0.5),
            ],
            vec![[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]],
        );
        let mut topology = MeshTopology::new(&mesh).unwrap();

        let dropped = topology.collapse(VertId(0), VertId(4), DVec3::new(0.0, 0.0, 0.0));
        assert_eq!(dropped, 2);

        let out = topology.compact();
        assert_eq!(out.verts.len(), 4);
        assert_eq!(out.faces.len(), 2);
        // Vertices 0..=3 survive with identity numbering; the two surviving
        // fan faces now reference the merged corner 0.
        assert_eq!(out.faces, vec![[1, 2, 0], [2, 3, 0]]);
        for face in &out.faces {
            for &i in face {
                assert!((i as usize) < out.verts.len());
            }
        }
    }

    #[test]
    fn compact_is_identity_when_nothing_died() {
        let mesh = TriMesh::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let topology = MeshTopology::new(&mesh).unwrap();

        assert_eq!(topology.compact(), mesh);
    }

    #[test]
    fn uv_sextuples_follow_their_faces() {
        let mut mesh = TriMesh::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(2.0, 0.0, 0.0),
                DVec3::new(2.0, 2.0, 0.0),
                DVec3::new(0.0, 2.0, 0.0),
                DVec3::new(1.0, 1.0, 0.5),
            ],
            vec![[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]],
        );
        mesh.face_uvs = Some(vec![[0.0; 6], [1.0; 6], [2.0; 6], [3.0; 6]]);

        let mut topology = MeshTopology::new(&mesh).unwrap();
        topology.collapse(VertId(0), VertId(4), DVec3::new(0.0, 0.0, 0.0));

        let out = topology.compact();
        // Faces 0 and 3 degenerated; sextuples 1 and 2 ride along unchanged.
        assert_eq!(out.face_uvs, Some(vec![[1.0; 6], [2.0; 6]]));
    }
}
