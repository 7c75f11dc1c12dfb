use glam::Vec3;

use crate::{util::triangle_normal, OsteonError, OsteonResult};

/// A triangle, as three 1-based indices into a [`Mesh`]'s vertices
pub type Face = [u32; 3];

/// A triangle mesh that can be deformed by a [`super::Skeleton`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions in the bind (rest) pose
    pub bind_vertices: Vec<Vec3>,
    /// Vertex positions in the current pose. Only the skinning system writes these.
    pub current_vertices: Vec<Vec3>,
    /// Triangles of the mesh
    pub faces: Vec<Face>,
    /// Skinning weights, one row per vertex and one column per joint, indexed by joint index.
    /// The root's column is always zero. [`crate::systems::skinning_system`] panics if the rows
    /// don't match up with the vertices and joints.
    pub attachments: Vec<Vec<f32>>,
}

impl Mesh {
    /// Create a mesh from its bind pose. The current pose starts out as a copy of the bind pose.
    ///
    /// Every face index must refer to one of `bind_vertices`.
    pub fn new(bind_vertices: Vec<Vec3>, faces: Vec<Face>) -> OsteonResult<Self> {
        let vertex_count = bind_vertices.len();
        for (face_index, face) in faces.iter().enumerate() {
            if let Some(&index) = face
                .iter()
                .find(|&&i| i == 0 || i as usize > vertex_count)
            {
                return Err(OsteonError::FaceIndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(Self {
            current_vertices: bind_vertices.clone(),
            bind_vertices,
            faces,
            attachments: Vec::new(),
        })
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.bind_vertices.len()
    }

    /// The three corners of `face` in the current pose
    pub fn triangle(&self, face: &Face) -> [Vec3; 3] {
        face.map(|i| self.current_vertices[i as usize - 1])
    }

    /// One normal per face, derived from the current vertex positions.
    /// The mesh has no normals of its own so shading is faceted.
    pub fn face_normals(&self) -> Vec<Vec3> {
        self.faces
            .iter()
            .map(|face| {
                let [a, b, c] = self.triangle(face);
                triangle_normal(a, b, c)
            })
            .collect()
    }
}
