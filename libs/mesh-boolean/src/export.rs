//! Flat buffer export of result meshes.
//!
//! Converts a polygonal mesh into flat vertex/index arrays for consumers
//! that want plain buffers (renderers, file writers, test fixtures).
//! Positions come from the approximate coordinate mirror; faces are fanned
//! into triangles.

use serde::{Deserialize, Serialize};

use crate::mesh::{Mesh, MeshArena};

/// Flat mesh buffers: positions as `[x, y, z, ...]`, triangle indices as
/// `[i0, i1, i2, ...]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<f64>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Flattens `mesh` into buffers. Vertices are emitted in first-appearance
/// order and shared across faces; polygons are fanned from their first
/// vertex.
pub fn mesh_to_buffers(mesh: &Mesh, arena: &MeshArena) -> MeshBuffers {
    let mut mesh = mesh.clone();
    mesh.populate_verts(arena);
    let mut buffers = MeshBuffers {
        positions: Vec::with_capacity(3 * mesh.vert_count()),
        indices: Vec::new(),
    };
    for i in 0..mesh.vert_count() {
        let co = arena.vert(mesh.vert(i)).co;
        buffers.positions.extend_from_slice(&[co.x, co.y, co.z]);
    }
    for &f in mesh.faces() {
        let face = arena.face(f);
        let idx = |k: usize| {
            mesh.lookup_vert(face.vert(k))
                .expect("face vertex must be in the populated index") as u32
        };
        for k in 1..face.len() - 1 {
            buffers.indices.extend_from_slice(&[idx(0), idx(k), idx(k + 1)]);
        }
    }
    buffers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{axis_box, MeshBuilder};

    #[test]
    fn cube_exports_shared_vertices_and_fanned_quads() {
        let mut arena = MeshArena::new();
        let mut builder = MeshBuilder::new();
        axis_box(&mut arena, &mut builder, [0, 0, 0], [2, 2, 2]);
        let mesh = builder.build();
        let buffers = mesh_to_buffers(&mesh, &arena);
        assert_eq!(buffers.vertex_count(), 8);
        assert_eq!(buffers.triangle_count(), 12);
        assert!(buffers.positions.iter().all(|c| *c == 0.0 || *c == 2.0));
    }

    #[test]
    fn buffers_round_trip_through_serde() {
        let buffers = MeshBuffers {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 2],
        };
        let json = serde_json::to_string(&buffers).unwrap();
        let back: MeshBuffers = serde_json::from_str(&json).unwrap();
        assert_eq!(back, buffers);
    }
}
