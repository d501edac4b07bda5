//! Polygonal test solids.
//!
//! Builders for simple closed volumes over a shared arena, wired the way
//! [`crate::boolean::boolean_mesh`] expects its input: every face carries
//! `orig` equal to its index in the mesh being assembled, every real edge a
//! non-sentinel edge origin, and every vertex its input index. Solids built
//! over the same arena share vertices wherever their exact coordinates
//! coincide.

pub mod cube;
pub mod tetrahedron;

pub use cube::{axis_box, axis_box_inward};
pub use tetrahedron::tetrahedron;

use crate::mesh::{FaceId, Mesh, MeshArena, VertId};

/// Accumulates faces of one or more solids into a single polygonal mesh,
/// handing out the `orig` numbering as it grows.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    faces: Vec<FaceId>,
    next_vert_orig: u32,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next added face will get.
    pub fn next_face_orig(&self) -> u32 {
        self.faces.len() as u32
    }

    fn take_vert_orig(&mut self) -> u32 {
        let orig = self.next_vert_orig;
        self.next_vert_orig += 1;
        orig
    }

    fn push_face(&mut self, arena: &mut MeshArena, verts: Vec<VertId>) {
        let orig = self.next_face_orig();
        let nedges = verts.len();
        let edge_orig: Vec<u32> = (0..nedges).map(|k| orig * 8 + k as u32).collect();
        let f = arena.add_face(verts, orig, edge_orig);
        self.faces.push(f);
    }

    pub fn build(self) -> Mesh {
        Mesh::new(self.faces)
    }
}
