use glam::DVec3;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshError {
    #[error("mesh has no vertices")]
    NoVertices,
    #[error("face {face} references vertex {index}, but only {verts} vertices exist")]
    CornerOutOfBounds {
        face: usize,
        index: u32,
        verts: usize,
    },
    #[error("{uvs} face uv sextuples supplied for {faces} faces")]
    UvCountMismatch { uvs: usize, faces: usize },
    #[error("face {face} has {count} vertices, only triangles are supported")]
    NonTriangleFace { face: usize, count: u32 },
    #[error("face-vertex index array ends inside face {face}")]
    TruncatedIndexArray { face: usize },
}

/// Triangle-only mesh as flat arrays; both the input and the output of
/// [`simplify`](crate::simplify).
///
/// Positions are comparable floating-point triples in one space; nothing is
/// assumed about file formats, coordinate conventions, or units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    pub verts: Vec<DVec3>,
    pub faces: Vec<[u32; 3]>,
    /// Optional face-varying texture coordinates: one
    /// `[u0, v0, u1, v1, u2, v2]` sextuple per face, aligned by array
    /// position. Carried through simplification, never interpolated.
    pub face_uvs: Option<Vec<[f64; 6]>>,
}

impl TriMesh {
    pub fn new(verts: Vec<DVec3>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            verts,
            faces,
            face_uvs: None,
        }
    }

    /// Build from a scene container's per-face vertex-count array and flat
    /// index array. Every count must be 3; the mesh must already be
    /// triangulated.
    pub fn from_face_counts(
        verts: Vec<DVec3>,
        counts: &[u32],
        indices: &[u32],
    ) -> Result<Self, MeshError> {
        let mut faces = Vec::with_capacity(counts.len());
        let mut it = indices.iter().copied();

        for (face, &count) in counts.iter().enumerate() {
            if count != 3 {
                return Err(MeshError::NonTriangleFace { face, count });
            }
            let (Some(a), Some(b), Some(c)) = (it.next(), it.next(), it.next()) else {
                return Err(MeshError::TruncatedIndexArray { face });
            };
            faces.push([a, b, c]);
        }

        Ok(Self::new(verts, faces))
    }

    /// Fail-fast structural checks, run before any mutation begins. These
    /// are contract violations, not algorithmic failures; degenerate
    /// geometry is absorbed later instead of rejected here.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.verts.is_empty() {
            return Err(MeshError::NoVertices);
        }

        for (face, corners) in self.faces.iter().enumerate() {
            for &index in corners {
                if index as usize >= self.verts.len() {
                    return Err(MeshError::CornerOutOfBounds {
                        face,
                        index,
                        verts: self.verts.len(),
                    });
                }
            }
        }

        if let Some(uvs) = &self.face_uvs {
            if uvs.len() != self.faces.len() {
                return Err(MeshError::UvCountMismatch {
                    uvs: uvs.len(),
                    faces: self.faces.len(),
                });
            }
        }

        Ok(())
    }

    /// Per-face vertex counts for writing back to a container: uniformly 3.
    pub fn face_vertex_counts(&self) -> Vec<u32> {
        vec![3; self.faces.len()]
    }

    /// Face indices flattened back into the container's single index array.
    pub fn flat_indices(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }
}
