//! # Boolean operations on volumes
//!
//! The topological phase of the boolean engine. Starting from a conforming
//! triangle mesh (all intersections already appear as shared edges), the
//! pipeline is:
//!
//! ```text
//! topology -> patches -> cells (radial sort) -> ambient cell
//!          -> winding numbers -> boundary extraction -> polygon reassembly
//! ```
//!
//! All geometric decisions use exact rational predicates, and every
//! container that affects output order is iterated by ascending integer
//! index, so results are deterministic across machines.
//!
//! Failures follow a report-and-return policy: validation problems are
//! logged and the input (or the intersected mesh) is returned unchanged.

pub mod cell;
pub mod dissolve;
pub mod extract;
pub mod patch;
pub mod radial_sort;
pub mod topology;
pub mod winding;

#[cfg(test)]
mod tests;

use crate::intersect::TrimeshIntersect;
use crate::mesh::{Mesh, MeshArena};
use crate::triangulate::triangulate_polymesh;

use cell::{find_ambient_cell, find_cells, patch_cell_graph_ok};
use dissolve::polymesh_from_trimesh_with_dissolve;
use extract::extract_from_flag_diffs;
use patch::find_patches;
use topology::TriMeshTopology;
use winding::propagate_windings_and_flag;

/// The requested boolean operator.
///
/// `Difference` subtracts every shape after the first from shape 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOpType {
    None = 0,
    Intersect = 1,
    Union = 2,
    Difference = 3,
}

/// Boolean operation over a triangle mesh.
///
/// `tm_in` holds all input shapes; `shape_fn` maps an input face index (the
/// `orig` carried by the triangles) to its shape in `0..nshapes`. With
/// `use_self` set the self-intersection collaborator runs on `tm_in` as a
/// whole, otherwise the n-ary variant runs with the shape labels.
///
/// Returns `tm_in` unchanged when it is empty, the intersected mesh when
/// `op` is `None`, and the input (or intersected) mesh unchanged with a log
/// report when the patch/cell structure cannot be resolved.
pub fn boolean_trimesh(
    tm_in: &Mesh,
    op: BoolOpType,
    nshapes: usize,
    shape_fn: &dyn Fn(usize) -> usize,
    use_self: bool,
    intersector: &dyn TrimeshIntersect,
    arena: &mut MeshArena,
) -> Mesh {
    if tm_in.is_empty() {
        return tm_in.clone();
    }
    let tm_si = if use_self {
        intersector.self_intersect(tm_in, arena)
    } else {
        intersector.nary_intersect(tm_in, nshapes, shape_fn, use_self, arena)
    };
    // All input triangles may have been degenerate.
    if tm_si.is_empty() || op == BoolOpType::None {
        return tm_si;
    }

    let tmtopo = TriMeshTopology::new(&tm_si, arena);
    let mut pinfo = find_patches(&tm_si, arena, &tmtopo);
    let mut cinfo = find_cells(&tm_si, arena, &tmtopo, &mut pinfo);
    if let Err(err) = patch_cell_graph_ok(&cinfo, &pinfo) {
        log::warn!("boolean not applied: {err}");
        return tm_in.clone();
    }
    cinfo.init_windings(nshapes);
    let Some(c_ambient) = find_ambient_cell(&tm_si, arena, &tmtopo, &pinfo) else {
        log::warn!("boolean not applied: no ambient cell; input may not be closed");
        return tm_si;
    };

    // The intersected mesh's faces reference the faces they came from;
    // classify shapes through that original index.
    let si_shape_fn = |t: usize| shape_fn(arena_orig(arena, &tm_si, t));
    propagate_windings_and_flag(&pinfo, &mut cinfo, c_ambient, op, nshapes, &si_shape_fn);
    extract_from_flag_diffs(&tm_si, arena, &pinfo, &cinfo)
}

fn arena_orig(arena: &MeshArena, tm: &Mesh, t: usize) -> usize {
    arena.face(tm.face(t)).orig as usize
}

/// Boolean operation over a polygonal mesh.
///
/// Triangulates `pm` (or uses `pm_triangulated` when supplied), runs
/// [`boolean_trimesh`], and reassembles the triangle output into polygons
/// against `pm`. Faces of `pm` must carry `orig` equal to their own index
/// in `pm`, so result triangles can be grouped by input face.
#[allow(clippy::too_many_arguments)]
pub fn boolean_mesh(
    pm: &Mesh,
    op: BoolOpType,
    nshapes: usize,
    shape_fn: &dyn Fn(usize) -> usize,
    use_self: bool,
    pm_triangulated: Option<&Mesh>,
    intersector: &dyn TrimeshIntersect,
    arena: &mut MeshArena,
) -> Mesh {
    let our_triangulation;
    let tm_in = match pm_triangulated {
        Some(tm) => tm,
        None => {
            our_triangulation = triangulate_polymesh(pm, arena);
            &our_triangulation
        }
    };
    let tm_out = boolean_trimesh(tm_in, op, nshapes, shape_fn, use_self, intersector, arena);
    polymesh_from_trimesh_with_dissolve(&tm_out, pm, arena)
}
