//! Extraction of the result boundary from cell flags.

use crate::mesh::{Mesh, MeshArena};

use super::cell::CellsInfo;
use super::patch::PatchesInfo;

/// Emits exactly the triangles whose patch separates a kept cell from a
/// discarded one, flipped so their normals point away from the kept volume.
///
/// A triangle is flipped when the cell on its above side is the kept one;
/// flipping reverses the vertex cycle and the matching edge origins, and
/// allocates the flipped face in the arena.
pub fn extract_from_flag_diffs(
    tm_subdivided: &Mesh,
    arena: &mut MeshArena,
    pinfo: &PatchesInfo,
    cinfo: &CellsInfo,
) -> Mesh {
    let mut out_faces = Vec::with_capacity(tm_subdivided.face_count());
    for t in 0..tm_subdivided.face_count() {
        let patch = pinfo.patch(pinfo.tri_patch(t));
        let flag_above = cinfo.cell(patch.cell_above).flag();
        let flag_below = cinfo.cell(patch.cell_below).flag();
        if flag_above == flag_below {
            continue;
        }
        let f = tm_subdivided.face(t);
        if flag_above {
            let tri = arena.face(f);
            let flipped_verts = vec![tri.vert(0), tri.vert(2), tri.vert(1)];
            let flipped_edge_orig = vec![tri.edge_orig[2], tri.edge_orig[1], tri.edge_orig[0]];
            let orig = tri.orig;
            let flipped = arena.add_face(flipped_verts, orig, flipped_edge_orig);
            out_faces.push(flipped);
        } else {
            out_faces.push(f);
        }
    }
    Mesh::new(out_faces)
}
