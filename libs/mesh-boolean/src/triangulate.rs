//! Reduction of polygonal input faces to triangles.
//!
//! Triangles pass through, quads split on their 0-2 diagonal, and larger
//! faces are projected along the dominant axis of their normal and handed
//! to the planar triangulator. Edges introduced here carry `NO_INDEX` as
//! their origin so the detriangulator can dissolve them later; boundary
//! edges keep the origin of the face side they lie on.

use crate::cdt::{delaunay_2d_calc, CdtInput, CdtOutputMode, CdtResult};
use crate::exact::{dominant_axis, EVec2};
use crate::mesh::{FaceId, Mesh, MeshArena, NO_INDEX};

/// Which triangulation output edge joins output vertices `v1` and `v2`, in
/// either order?
fn find_cdt_edge(cdt_out: &CdtResult, v1: usize, v2: usize) -> Option<usize> {
    cdt_out
        .edge
        .iter()
        .position(|&(a, b)| (a == v1 && b == v2) || (a == v2 && b == v1))
}

/// Triangulates polygon `f` (5 or more vertices), preserving its winding
/// and recovering each output edge's input edge origin.
fn triangulate_poly(f: FaceId, arena: &mut MeshArena) -> Vec<FaceId> {
    let face = arena.face(f);
    let flen = face.len();
    let axis = dominant_axis(&face.plane.norm);
    // Projecting out the y axis flips handedness, so feed the cycle
    // reversed and reverse the output triangles to compensate.
    let rev = axis == 1;

    let mut cdt_in = CdtInput {
        vert: Vec::with_capacity(flen),
        face: vec![(0..flen).collect()],
    };
    for i in 0..flen {
        let pos = if rev { flen - 1 - i } else { i };
        let co = &arena.vert(face.vert(pos)).co_exact;
        let mut coords = Vec::with_capacity(2);
        for j in 0..3 {
            if j != axis {
                coords.push(co.axis(j).clone());
            }
        }
        cdt_in
            .vert
            .push(EVec2::new(coords[0].clone(), coords[1].clone()));
    }
    let cdt_out = delaunay_2d_calc(&cdt_in, CdtOutputMode::Inside);

    // Map a fed position back to the face position, and a fed boundary edge
    // back to the face side it lies on.
    let face_pos = |fed: usize| if rev { flen - 1 - fed } else { fed };
    let face_edge = |fed: usize| {
        if rev {
            (2 * flen - 2 - fed) % flen
        } else {
            fed
        }
    };

    let orig = face.orig;
    let mut new_tris = Vec::with_capacity(cdt_out.face.len());
    for tri in &cdt_out.face {
        let mut corners = [0usize; 3];
        let mut edge_origs = [NO_INDEX; 3];
        for i in 0..3 {
            corners[i] = cdt_out.vert_orig[tri[i]][0];
        }
        for i in 0..3 {
            let e_out = find_cdt_edge(&cdt_out, tri[i], tri[(i + 1) % 3])
                .expect("triangulation must list its own edges");
            for &fed in &cdt_out.edge_orig[e_out] {
                edge_origs[i] = arena.face(f).edge_orig[face_edge(fed)];
                break;
            }
        }
        if rev {
            // Undo the fed reversal: corners back to face order, sides
            // renumbered to match.
            corners.reverse();
            edge_origs.swap(0, 2);
            edge_origs.rotate_left(1);
        }
        new_tris.push((corners, edge_origs));
    }

    let mut out = Vec::with_capacity(new_tris.len());
    for (corners, edge_origs) in new_tris {
        let verts = corners
            .iter()
            .map(|&c| arena.face(f).vert(face_pos(c)))
            .collect();
        out.push(arena.add_face(verts, orig, edge_origs.to_vec()));
    }
    out
}

/// Triangulates every face of `pm`. Diagonals added here are recognizable
/// afterwards by their `NO_INDEX` edge origin.
pub fn triangulate_polymesh(pm: &Mesh, arena: &mut MeshArena) -> Mesh {
    let mut face_tris: Vec<FaceId> = Vec::with_capacity(3 * pm.face_count());
    for &f in pm.faces() {
        let face = arena.face(f);
        match face.len() {
            3 => face_tris.push(f),
            4 => {
                let (v0, v1, v2, v3) = (face.vert(0), face.vert(1), face.vert(2), face.vert(3));
                let orig = face.orig;
                let (eo_01, eo_12, eo_23, eo_30) = (
                    face.edge_orig[0],
                    face.edge_orig[1],
                    face.edge_orig[2],
                    face.edge_orig[3],
                );
                let f0 = arena.add_face(vec![v0, v1, v2], orig, vec![eo_01, eo_12, NO_INDEX]);
                let f1 = arena.add_face(vec![v0, v2, v3], orig, vec![NO_INDEX, eo_23, eo_30]);
                face_tris.push(f0);
                face_tris.push(f1);
            }
            _ => face_tris.extend(triangulate_poly(f, arena)),
        }
    }
    Mesh::new(face_tris)
}
