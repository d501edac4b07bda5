//! Seam for the self-intersection pre-pass.
//!
//! The topological phase requires a conforming triangle mesh: every pair of
//! crossing triangles must already have been split along their intersection
//! curves, so that all intersections appear as shared edges. Producing that
//! mesh is the job of an external collaborator behind this trait.

use crate::mesh::{Mesh, MeshArena};

/// Splits a triangle mesh so that all triangle/triangle intersections
/// become shared edges.
pub trait TrimeshIntersect {
    /// Resolves intersections within a single mesh.
    fn self_intersect(&self, tm: &Mesh, arena: &mut MeshArena) -> Mesh;

    /// Resolves intersections between `nshapes` labelled sub-meshes of
    /// `tm`; `shape_fn` maps a triangle index to its shape label. With
    /// `use_self` set, intersections within one shape are resolved too.
    fn nary_intersect(
        &self,
        tm: &Mesh,
        nshapes: usize,
        shape_fn: &dyn Fn(usize) -> usize,
        use_self: bool,
        arena: &mut MeshArena,
    ) -> Mesh;
}

/// Pass-through for input that is already conforming: meshes whose shapes
/// only meet along shared edges and coincident triangles, such as glued or
/// exactly overlapping solids built over one arena.
#[derive(Debug, Default, Clone, Copy)]
pub struct PreIntersected;

impl TrimeshIntersect for PreIntersected {
    fn self_intersect(&self, tm: &Mesh, _arena: &mut MeshArena) -> Mesh {
        tm.clone()
    }

    fn nary_intersect(
        &self,
        tm: &Mesh,
        _nshapes: usize,
        _shape_fn: &dyn Fn(usize) -> usize,
        _use_self: bool,
        _arena: &mut MeshArena,
    ) -> Mesh {
        tm.clone()
    }
}
