//! Radial ordering of the triangles around an edge.
//!
//! Given the triangles sharing an edge `e`, produce them sorted clockwise
//! as seen looking along `e` from its first vertex to its second. Every
//! classification uses one exact 3D orientation test, so the order is
//! deterministic for any input, including stacks of exactly coplanar
//! triangles.

use crate::exact::{orient3d, Orientation};
use crate::mesh::{FaceData, Mesh, MeshArena, VertId};

use super::topology::Edge;

/// Index standing in for a triangle that is not part of the mesh, supplied
/// separately to the sorter (used when probing for the ambient cell).
pub const EXTRA_TRI_INDEX: usize = usize::MAX;

/// The vertex of `tri` not on `e`, and whether `tri` uses `e` reversed
/// relative to the edge's canonical order. `None` if `tri` does not
/// contain `e`.
pub fn find_flap_vert(tri: &FaceData, e: Edge) -> Option<(VertId, bool)> {
    debug_assert!(tri.is_tri());
    for i in 0..3 {
        if tri.vert(i) == e.v0() {
            return if tri.vert((i + 1) % 3) == e.v1() {
                Some((tri.vert((i + 2) % 3), false))
            } else if tri.vert((i + 2) % 3) == e.v1() {
                Some((tri.vert((i + 1) % 3), true))
            } else {
                None
            };
        }
    }
    None
}

fn tri_of<'a>(
    tm: &Mesh,
    arena: &'a MeshArena,
    extra_tri: Option<&'a FaceData>,
    t: usize,
) -> &'a FaceData {
    if t == EXTRA_TRI_INDEX {
        extra_tri.expect("sorting an extra triangle index without an extra triangle")
    } else {
        arena.face(tm.face(t))
    }
}

/// Classifies `tri` against `tri0` (both share `e`):
/// 1 = coplanar, same side of `e`; 2 = coplanar, opposite side;
/// 3 = flap below the oriented plane of `tri0`; 4 = flap above.
///
/// Triangles in class 1 have the same flap vertex as `tri0`, because the
/// subdivided mesh never contains partially overlapping coplanar triangles.
fn sort_tris_class(arena: &MeshArena, tri: &FaceData, tri0: &FaceData, e: Edge) -> usize {
    let a0 = &arena.vert(tri0.vert(0)).co_exact;
    let a1 = &arena.vert(tri0.vert(1)).co_exact;
    let a2 = &arena.vert(tri0.vert(2)).co_exact;
    let (flapv0, rev0) = find_flap_vert(tri0, e).expect("pivot triangle must contain the edge");
    let (flapv, _) = find_flap_vert(tri, e).expect("classified triangle must contain the edge");
    let flap = &arena.vert(flapv).co_exact;
    match orient3d(a0, a1, a2, flap) {
        Orientation::Positive => {
            if rev0 {
                4
            } else {
                3
            }
        }
        Orientation::Negative => {
            if rev0 {
                3
            } else {
                4
            }
        }
        Orientation::Zero => {
            if flapv == flapv0 {
                1
            } else {
                2
            }
        }
    }
}

/// Sorts a group of mutually coplanar triangles by signed index: positive
/// when the triangle uses `e` in canonical orientation, negative otherwise.
/// This makes the relative order of duplicate stacks identical no matter
/// which of their edges is being sorted around.
fn sort_by_signed_triangle_index(
    g: &mut [usize],
    e: Edge,
    tm: &Mesh,
    arena: &MeshArena,
    extra_tri: Option<&FaceData>,
) {
    let mut signed: Vec<i128> = g
        .iter()
        .map(|&t| {
            let tri = tri_of(tm, arena, extra_tri, t);
            let (_, rev) = find_flap_vert(tri, e).expect("triangle must contain the edge");
            if rev {
                -(t as i128)
            } else {
                t as i128
            }
        })
        .collect();
    signed.sort_unstable();
    for (slot, s) in g.iter_mut().zip(&signed) {
        *slot = s.unsigned_abs() as usize;
    }
}

/// Sorts `tris`, which all contain `e`, clockwise looking along `e`.
///
/// `t0` is the pivot of the top-level call; the merge order differs between
/// the top level and recursive calls so that the result starts at the pivot
/// when the pivot leads the input span. An `extra_tri` may be supplied to
/// stand in for `EXTRA_TRI_INDEX`.
pub fn sort_tris_around_edge(
    tm: &Mesh,
    arena: &MeshArena,
    e: Edge,
    tris: &[usize],
    t0: usize,
    extra_tri: Option<&FaceData>,
) -> Vec<usize> {
    // Quicksort-style: partition against the pivot's plane into coplanar
    // same-side (g1), coplanar opposite (g2), below (g3) and above (g4),
    // sort each group, then merge. Input spans are tiny, typically 3 or 4.
    if tris.is_empty() {
        return Vec::new();
    }
    let tri0 = tri_of(tm, arena, extra_tri, t0);
    let mut g1 = vec![tris[0]];
    let mut g2 = Vec::new();
    let mut g3 = Vec::new();
    let mut g4 = Vec::new();
    for &t in &tris[1..] {
        let tri = tri_of(tm, arena, extra_tri, t);
        match sort_tris_class(arena, tri, tri0, e) {
            1 => g1.push(t),
            2 => g2.push(t),
            3 => g3.push(t),
            _ => g4.push(t),
        }
    }
    if g1.len() > 1 {
        sort_by_signed_triangle_index(&mut g1, e, tm, arena, extra_tri);
    }
    if g2.len() > 1 {
        sort_by_signed_triangle_index(&mut g2, e, tm, arena, extra_tri);
    }
    if g3.len() > 1 {
        g3 = sort_tris_around_edge(tm, arena, e, &g3, g3[0], extra_tri);
    }
    if g4.len() > 1 {
        g4 = sort_tris_around_edge(tm, arena, e, &g4, g4[0], extra_tri);
    }
    let mut ans = Vec::with_capacity(g1.len() + g2.len() + g3.len() + g4.len());
    if tris[0] == t0 {
        ans.extend(g1);
        ans.extend(g4);
        ans.extend(g2);
        ans.extend(g3);
    } else {
        ans.extend(g3);
        ans.extend(g1);
        ans.extend(g4);
        ans.extend(g2);
    }
    ans
}
