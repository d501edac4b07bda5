//! Tests for the topological phase, from topology building through polygon
//! reassembly, plus end-to-end scenarios over conforming inputs.
//!
//! Scenario meshes are built from integer coordinates so every predicate is
//! exact and the expected outputs are bit-stable.

use std::collections::HashMap;

use super::cell::{find_ambient_cell, find_cells, patch_cell_graph_ok};
use super::dissolve::polymesh_from_trimesh_with_dissolve;
use super::patch::find_patches;
use super::radial_sort::{find_flap_vert, sort_tris_around_edge};
use super::topology::{Edge, TriMeshTopology};
use super::winding::{keep_cell, propagate_windings_and_flag};
use super::{boolean_mesh, boolean_trimesh, BoolOpType};
use crate::error::BooleanError;
use crate::exact::{int, EVec3, Scalar};
use crate::intersect::PreIntersected;
use crate::mesh::{Mesh, MeshArena, VertId, NO_INDEX};
use crate::primitives::{axis_box, axis_box_inward, tetrahedron, MeshBuilder};
use crate::triangulate::triangulate_polymesh;

fn vert(arena: &mut MeshArena, x: i64, y: i64, z: i64) -> VertId {
    arena.add_or_find_vert(EVec3::from_ints(x, y, z), NO_INDEX)
}

/// Six times the signed volume enclosed by `mesh`, fanning each face from
/// its first vertex. Exact.
fn six_volume(mesh: &Mesh, arena: &MeshArena) -> Scalar {
    let mut total = int(0);
    for &f in mesh.faces() {
        let face = arena.face(f);
        let a = &arena.vert(face.vert(0)).co_exact;
        for k in 1..face.len() - 1 {
            let b = &arena.vert(face.vert(k)).co_exact;
            let c = &arena.vert(face.vert(k + 1)).co_exact;
            total = total + a.dot(&b.cross(c));
        }
    }
    total
}

/// Every directed edge must be matched by its reverse for a closed,
/// consistently oriented polygon mesh.
fn is_closed(mesh: &Mesh, arena: &MeshArena) -> bool {
    let mut balance: HashMap<(VertId, VertId), i32> = HashMap::new();
    for &f in mesh.faces() {
        let face = arena.face(f);
        for i in 0..face.len() {
            let a = face.vert(i);
            let b = face.vert(face.next_pos(i));
            let (key, delta) = if a.0 < b.0 { ((a, b), 1) } else { ((b, a), -1) };
            *balance.entry(key).or_insert(0) += delta;
        }
    }
    balance.values().all(|&d| d == 0)
}

/// Two boxes built over one arena, each given as `(min, max)` corners.
/// Faces 0-5 are shape 0, faces 6-11 shape 1.
fn two_boxes(
    arena: &mut MeshArena,
    first: ([i64; 3], [i64; 3]),
    second: ([i64; 3], [i64; 3]),
) -> Mesh {
    let mut builder = MeshBuilder::new();
    axis_box(arena, &mut builder, first.0, first.1);
    axis_box(arena, &mut builder, second.0, second.1);
    builder.build()
}

fn shape_of_box(f: usize) -> usize {
    usize::from(f >= 6)
}

fn run_boolean(pm: &Mesh, op: BoolOpType, nshapes: usize, arena: &mut MeshArena) -> Mesh {
    let shape_fn = |f: usize| if nshapes == 1 { 0 } else { shape_of_box(f) };
    boolean_mesh(pm, op, nshapes, &shape_fn, false, None, &PreIntersected, arena)
}

// ---------------------------------------------------------------------------
// Topology

#[test]
fn cube_topology_is_manifold() {
    let mut arena = MeshArena::new();
    let mut builder = MeshBuilder::new();
    axis_box(&mut arena, &mut builder, [0, 0, 0], [1, 1, 1]);
    let tm = triangulate_polymesh(&builder.build(), &mut arena);
    assert_eq!(tm.face_count(), 12);
    let topo = TriMeshTopology::new(&tm, &arena);
    assert_eq!(topo.edge_count(), 18);
    assert_eq!(topo.edge_tri_total(), 3 * tm.face_count());
    for t in 0..tm.face_count() {
        let tri = arena.face(tm.face(t));
        for i in 0..3 {
            let e = Edge::new(tri.vert(i), tri.vert((i + 1) % 3));
            let tris = topo.edge_tris(e).unwrap();
            assert_eq!(tris.len(), 2);
            assert!(tris.contains(&t));
            assert!(topo.other_tri_if_manifold(e, t).is_some());
        }
    }
}

#[test]
fn vert_edges_lists_only_incident_edges() {
    let mut arena = MeshArena::new();
    let mut builder = MeshBuilder::new();
    axis_box(&mut arena, &mut builder, [0, 0, 0], [1, 1, 1]);
    let mut tm = triangulate_polymesh(&builder.build(), &mut arena);
    let topo = TriMeshTopology::new(&tm, &arena);
    tm.populate_verts(&arena);
    let mut total = 0;
    for i in 0..tm.vert_count() {
        let v = tm.vert(i);
        for e in topo.vert_edges(v) {
            assert!(e.v0() == v || e.v1() == v);
        }
        total += topo.vert_edges(v).len();
    }
    // Each undirected edge is incident to exactly two vertices.
    assert_eq!(total, 2 * topo.edge_count());
}

// ---------------------------------------------------------------------------
// Patches

#[test]
fn closed_manifold_cube_is_one_patch() {
    let mut arena = MeshArena::new();
    let mut builder = MeshBuilder::new();
    axis_box(&mut arena, &mut builder, [0, 0, 0], [1, 1, 1]);
    let tm = triangulate_polymesh(&builder.build(), &mut arena);
    let topo = TriMeshTopology::new(&tm, &arena);
    let pinfo = find_patches(&tm, &arena, &topo);
    assert_eq!(pinfo.tot_patch(), 1);
    for t in 0..tm.face_count() {
        assert_eq!(pinfo.tri_patch(t), 0);
    }
    assert_eq!(pinfo.patch(0).tot_tri(), 12);
}

#[test]
fn coincident_cubes_split_into_single_triangle_patches() {
    let mut arena = MeshArena::new();
    let pm = two_boxes(&mut arena, ([0; 3], [1; 3]), ([0; 3], [1; 3]));
    let tm = triangulate_polymesh(&pm, &mut arena);
    assert_eq!(tm.face_count(), 24);
    let topo = TriMeshTopology::new(&tm, &arena);
    // Every edge is used by both copies, so nothing is manifold.
    let pinfo = find_patches(&tm, &arena, &topo);
    assert_eq!(pinfo.tot_patch(), 24);
    for p in 0..24 {
        assert_eq!(pinfo.patch(p as u32).tot_tri(), 1);
    }
}

// ---------------------------------------------------------------------------
// Radial sort

#[test]
fn flap_vert_reports_orientation() {
    let mut arena = MeshArena::new();
    let a = vert(&mut arena, 0, 0, 0);
    let b = vert(&mut arena, 0, 0, 1);
    let c = vert(&mut arena, 1, 0, 0);
    let e = Edge::new(a, b);
    let d = vert(&mut arena, 2, 0, 0);
    let f = vert(&mut arena, 2, 1, 0);
    let forward = arena.add_face(vec![a, b, c], NO_INDEX, vec![NO_INDEX; 3]);
    let backward = arena.add_face(vec![b, a, c], NO_INDEX, vec![NO_INDEX; 3]);
    let unrelated = arena.add_face(vec![c, d, f], NO_INDEX, vec![NO_INDEX; 3]);
    assert_eq!(find_flap_vert(arena.face(forward), e), Some((c, false)));
    assert_eq!(find_flap_vert(arena.face(backward), e), Some((c, true)));
    assert_eq!(find_flap_vert(arena.face(unrelated), e), None);
}

#[test]
fn book_of_four_pages_sorts_clockwise() {
    // Four triangles fanning out of the z-axis edge towards +x, -x, +y, -y.
    // Looking along the edge, clockwise from +x passes +y, then -x, -y.
    let mut arena = MeshArena::new();
    let e0 = vert(&mut arena, 0, 0, 0);
    let e1 = vert(&mut arena, 0, 0, 1);
    let flaps = [
        vert(&mut arena, 1, 0, 0),
        vert(&mut arena, -1, 0, 0),
        vert(&mut arena, 0, 1, 0),
        vert(&mut arena, 0, -1, 0),
    ];
    let faces: Vec<_> = flaps
        .iter()
        .map(|&f| arena.add_face(vec![e0, e1, f], NO_INDEX, vec![NO_INDEX; 3]))
        .collect();
    let tm = Mesh::new(faces);
    let sorted = sort_tris_around_edge(&tm, &arena, Edge::new(e0, e1), &[0, 1, 2, 3], 0, None);
    assert_eq!(sorted, vec![0, 2, 1, 3]);
}

// ---------------------------------------------------------------------------
// Cells and ambient cell

#[test]
fn single_closed_shape_fails_graph_validation() {
    let mut arena = MeshArena::new();
    let mut builder = MeshBuilder::new();
    axis_box(&mut arena, &mut builder, [0, 0, 0], [1, 1, 1]);
    let tm = triangulate_polymesh(&builder.build(), &mut arena);
    let topo = TriMeshTopology::new(&tm, &arena);
    let mut pinfo = find_patches(&tm, &arena, &topo);
    let cinfo = find_cells(&tm, &arena, &topo, &mut pinfo);
    assert_eq!(cinfo.tot_cell(), 0);
    assert!(patch_cell_graph_ok(&cinfo, &pinfo).is_err());
}

#[test]
fn coincident_cubes_build_a_valid_cell_graph() {
    let mut arena = MeshArena::new();
    let pm = two_boxes(&mut arena, ([0; 3], [1; 3]), ([0; 3], [1; 3]));
    let tm = triangulate_polymesh(&pm, &mut arena);
    let topo = TriMeshTopology::new(&tm, &arena);
    let mut pinfo = find_patches(&tm, &arena, &topo);
    let cinfo = find_cells(&tm, &arena, &topo, &mut pinfo);
    // One unbounded cell, one shared interior, and one zero-volume cell
    // between every coincident triangle pair.
    assert_eq!(cinfo.tot_cell(), 14);
    assert_eq!(patch_cell_graph_ok(&cinfo, &pinfo), Ok(()));
    for p in 0..pinfo.tot_patch() as u32 {
        assert_ne!(pinfo.patch(p).cell_above, NO_INDEX);
        assert_ne!(pinfo.patch(p).cell_below, NO_INDEX);
        assert_ne!(pinfo.patch(p).cell_above, pinfo.patch(p).cell_below);
    }
}

#[test]
fn ambient_cell_is_above_the_outer_shell() {
    let mut arena = MeshArena::new();
    let pm = two_boxes(&mut arena, ([0, 0, 0], [1, 1, 1]), ([1, 0, 0], [2, 1, 1]));
    let tm = triangulate_polymesh(&pm, &mut arena);
    let topo = TriMeshTopology::new(&tm, &arena);
    let mut pinfo = find_patches(&tm, &arena, &topo);
    let cinfo = find_cells(&tm, &arena, &topo, &mut pinfo);
    assert_eq!(patch_cell_graph_ok(&cinfo, &pinfo), Ok(()));
    let ambient = find_ambient_cell(&tm, &mut arena, &topo, &pinfo);
    // Triangle 0 is on the first cube's outer shell, whose above side is
    // the unbounded region.
    let shell = pinfo.patch(pinfo.tri_patch(0));
    assert_eq!(ambient, Some(shell.cell_above));
}

// ---------------------------------------------------------------------------
// Windings

#[test]
fn keep_cell_truth_tables() {
    use BoolOpType::*;
    assert!(keep_cell(Intersect, &[1, -1]));
    assert!(!keep_cell(Intersect, &[1, 0]));
    assert!(keep_cell(Union, &[0, 2]));
    assert!(!keep_cell(Union, &[0, 0]));
    assert!(keep_cell(Difference, &[1]));
    assert!(!keep_cell(Difference, &[0]));
    assert!(keep_cell(Difference, &[1, 0]));
    assert!(!keep_cell(Difference, &[1, 1]));
    assert!(!keep_cell(Difference, &[0, 0]));
    assert!(keep_cell(Difference, &[1, 1, 0]));
    assert!(!keep_cell(None, &[1, 1]));
}

#[test]
fn windings_propagate_from_the_ambient_cell() {
    let mut arena = MeshArena::new();
    let pm = two_boxes(&mut arena, ([0; 3], [1; 3]), ([0; 3], [1; 3]));
    let tm = triangulate_polymesh(&pm, &mut arena);
    let topo = TriMeshTopology::new(&tm, &arena);
    let mut pinfo = find_patches(&tm, &arena, &topo);
    let mut cinfo = find_cells(&tm, &arena, &topo, &mut pinfo);
    assert_eq!(patch_cell_graph_ok(&cinfo, &pinfo), Ok(()));
    cinfo.init_windings(2);
    let ambient = find_ambient_cell(&tm, &mut arena, &topo, &pinfo).unwrap();
    let shape_fn = |t: usize| usize::from(arena.face(tm.face(t)).orig >= 6);
    propagate_windings_and_flag(&pinfo, &mut cinfo, ambient, BoolOpType::Union, 2, &shape_fn);

    let mut histogram: HashMap<Vec<i32>, usize> = HashMap::new();
    for c in 0..cinfo.tot_cell() as u32 {
        let cell = cinfo.cell(c);
        assert!(cell.winding_assigned());
        *histogram.entry(cell.winding().to_vec()).or_insert(0) += 1;
    }
    // Ambient, twelve zero-volume cells between coincident copies, and the
    // shared interior.
    assert_eq!(histogram.get(&vec![0, 0]), Some(&1));
    assert_eq!(histogram.get(&vec![0, -1]), Some(&12));
    assert_eq!(histogram.get(&vec![-1, -1]), Some(&1));
    assert!(!cinfo.cell(ambient).flag());
}

// ---------------------------------------------------------------------------
// Polygon reassembly

#[test]
fn two_triangles_of_a_quad_reassemble_to_the_original() {
    let mut arena = MeshArena::new();
    let mut builder = MeshBuilder::new();
    axis_box(&mut arena, &mut builder, [0, 0, 0], [1, 1, 1]);
    let pm = builder.build();
    let tm = triangulate_polymesh(&pm, &mut arena);
    let out = polymesh_from_trimesh_with_dissolve(&tm, &pm, &mut arena);
    assert_eq!(out.faces(), pm.faces());
}

#[test]
fn center_fan_merges_partially() {
    // A quad fanned into four triangles around a synthetic center vertex.
    // Edge dissolves merge three of them; the remaining dissolves would
    // leave a repeated vertex and must be refused.
    let mut arena = MeshArena::new();
    let v0 = vert(&mut arena, 0, 0, 0);
    let v1 = vert(&mut arena, 2, 0, 0);
    let v2 = vert(&mut arena, 2, 2, 0);
    let v3 = vert(&mut arena, 0, 2, 0);
    let quad = arena.add_face(vec![v0, v1, v2, v3], 0, vec![80, 81, 82, 83]);
    let pm_in = Mesh::new(vec![quad]);

    let m = arena.add_or_find_vert(EVec3::from_ints(1, 1, 0), NO_INDEX);
    let tris = [
        ([v0, v1, m], [80, NO_INDEX, NO_INDEX]),
        ([v1, v2, m], [81, NO_INDEX, NO_INDEX]),
        ([v2, v3, m], [82, NO_INDEX, NO_INDEX]),
        ([v3, v0, m], [83, NO_INDEX, NO_INDEX]),
    ];
    let faces = tris
        .iter()
        .map(|(vs, eo)| arena.add_face(vs.to_vec(), 0, eo.to_vec()))
        .collect();
    let tm_out = Mesh::new(faces);

    let out = polymesh_from_trimesh_with_dissolve(&tm_out, &pm_in, &mut arena);
    assert_eq!(out.face_count(), 2);
    let lens: Vec<usize> = out
        .faces()
        .iter()
        .map(|&f| arena.face(f).len())
        .collect();
    assert_eq!(lens, vec![3, 5]);
    assert_eq!(arena.face(out.face(0)).verts, vec![v2, v3, m]);
    assert_eq!(arena.face(out.face(1)).verts, vec![v3, v0, v1, v2, m]);
}

#[test]
fn collinear_synthetic_vertex_is_dissolved() {
    // A triangle whose bottom edge was split at its midpoint; dissolving
    // the synthetic interior edge leaves the midpoint with degree 2 and
    // exactly collinear neighbours, so it is erased.
    let mut arena = MeshArena::new();
    let v0 = vert(&mut arena, 0, 0, 0);
    let v1 = vert(&mut arena, 2, 0, 0);
    let v2 = vert(&mut arena, 1, 2, 0);
    let tri = arena.add_face(vec![v0, v1, v2], 0, vec![50, 51, 52]);
    let pm_in = Mesh::new(vec![tri]);

    let m = arena.add_or_find_vert(EVec3::from_ints(1, 0, 0), NO_INDEX);
    let t0 = arena.add_face(vec![v0, m, v2], 0, vec![50, NO_INDEX, 52]);
    let t1 = arena.add_face(vec![m, v1, v2], 0, vec![50, 51, NO_INDEX]);
    let tm_out = Mesh::new(vec![t0, t1]);

    let out = polymesh_from_trimesh_with_dissolve(&tm_out, &pm_in, &mut arena);
    assert_eq!(out.face_count(), 1);
    let face = arena.face(out.face(0));
    assert_eq!(face.verts, vec![v1, v2, v0]);
    assert_eq!(face.edge_orig, vec![51, 52, 50]);
}

// ---------------------------------------------------------------------------
// End-to-end scenarios

#[test]
fn empty_input_passes_through() {
    let mut arena = MeshArena::new();
    let empty = Mesh::default();
    let out = boolean_trimesh(
        &empty,
        BoolOpType::Union,
        1,
        &|_| 0,
        false,
        &PreIntersected,
        &mut arena,
    );
    assert!(out.is_empty());
}

#[test]
fn none_operation_returns_the_intersected_mesh() {
    let mut arena = MeshArena::new();
    let mut builder = MeshBuilder::new();
    axis_box(&mut arena, &mut builder, [0, 0, 0], [1, 1, 1]);
    let tm = triangulate_polymesh(&builder.build(), &mut arena);
    let out = boolean_trimesh(
        &tm,
        BoolOpType::None,
        1,
        &|_| 0,
        false,
        &PreIntersected,
        &mut arena,
    );
    assert_eq!(out.faces(), tm.faces());
}

#[test]
fn single_shape_returns_input_with_report() {
    // One closed cube builds no cells at all; the operation reports and
    // hands the input back, which reassembles to the input quads.
    let mut arena = MeshArena::new();
    let mut builder = MeshBuilder::new();
    axis_box(&mut arena, &mut builder, [0, 0, 0], [1, 1, 1]);
    let pm = builder.build();
    let out = run_boolean(&pm, BoolOpType::Union, 1, &mut arena);
    assert_eq!(out.faces(), pm.faces());
}

#[test]
fn union_of_coincident_cubes_is_one_cube() {
    let mut arena = MeshArena::new();
    let pm = two_boxes(&mut arena, ([0; 3], [1; 3]), ([0; 3], [1; 3]));
    let mut out = run_boolean(&pm, BoolOpType::Union, 2, &mut arena);
    assert_eq!(out.face_count(), 6);
    for &f in out.faces() {
        let face = arena.face(f);
        assert_eq!(face.len(), 4);
        assert!(face.orig >= 6 && face.orig < 12);
    }
    assert_eq!(six_volume(&out, &arena), int(6));
    assert!(is_closed(&out, &arena));
    out.populate_verts(&arena);
    assert_eq!(out.vert_count(), 8);
}

#[test]
fn intersection_of_coincident_cubes_is_one_cube() {
    let mut arena = MeshArena::new();
    let pm = two_boxes(&mut arena, ([0; 3], [1; 3]), ([0; 3], [1; 3]));
    let out = run_boolean(&pm, BoolOpType::Intersect, 2, &mut arena);
    assert_eq!(out.face_count(), 6);
    for &f in out.faces() {
        assert!(arena.face(f).orig < 6);
    }
    assert_eq!(six_volume(&out, &arena), int(6));
    assert!(is_closed(&out, &arena));
}

#[test]
fn difference_of_coincident_cubes_is_empty() {
    let mut arena = MeshArena::new();
    let pm = two_boxes(&mut arena, ([0; 3], [1; 3]), ([0; 3], [1; 3]));
    let out = run_boolean(&pm, BoolOpType::Difference, 2, &mut arena);
    assert!(out.is_empty());
}

#[test]
fn union_of_face_glued_cubes_drops_the_shared_wall() {
    let mut arena = MeshArena::new();
    let pm = two_boxes(&mut arena, ([0, 0, 0], [1, 1, 1]), ([1, 0, 0], [2, 1, 1]));
    let mut out = run_boolean(&pm, BoolOpType::Union, 2, &mut arena);
    assert_eq!(out.face_count(), 10);
    assert!(out.faces().iter().all(|&f| arena.face(f).len() == 4));
    assert_eq!(six_volume(&out, &arena), int(12));
    assert!(is_closed(&out, &arena));
    out.populate_verts(&arena);
    assert_eq!(out.vert_count(), 12);
}

#[test]
fn difference_of_face_glued_cubes_restores_the_wall() {
    let mut arena = MeshArena::new();
    let pm = two_boxes(&mut arena, ([0, 0, 0], [1, 1, 1]), ([1, 0, 0], [2, 1, 1]));
    let mut out = run_boolean(&pm, BoolOpType::Difference, 2, &mut arena);
    // The first cube survives; its open side is closed by the second
    // cube's coincident wall, flipped outward.
    assert_eq!(out.face_count(), 6);
    assert!(out.faces().iter().all(|&f| arena.face(f).len() == 4));
    assert_eq!(six_volume(&out, &arena), int(6));
    assert!(is_closed(&out, &arena));
    out.populate_verts(&arena);
    assert_eq!(out.vert_count(), 8);
    for i in 0..out.vert_count() {
        let x = &arena.vert(out.vert(i)).co_exact.x;
        assert!(*x >= int(0) && *x <= int(1));
    }
}

#[test]
fn intersection_of_face_glued_cubes_is_the_degenerate_shared_wall() {
    let mut arena = MeshArena::new();
    let pm = two_boxes(&mut arena, ([0, 0, 0], [1, 1, 1]), ([1, 0, 0], [2, 1, 1]));
    let out = run_boolean(&pm, BoolOpType::Intersect, 2, &mut arena);
    // The shapes meet in a zero-volume sheet: two coincident quads with
    // opposite orientations.
    assert_eq!(out.face_count(), 2);
    assert_eq!(six_volume(&out, &arena), int(0));
    assert!(is_closed(&out, &arena));
}

#[test]
fn disjoint_shapes_return_input_with_report() {
    let mut arena = MeshArena::new();
    let mut builder = MeshBuilder::new();
    tetrahedron(&mut arena, &mut builder, [0, 0, 0]);
    tetrahedron(&mut arena, &mut builder, [5, 0, 0]);
    let pm = builder.build();
    let shape_fn = |f: usize| usize::from(f >= 4);
    let out = boolean_mesh(
        &pm,
        BoolOpType::Union,
        2,
        &shape_fn,
        false,
        None,
        &PreIntersected,
        &mut arena,
    );
    assert_eq!(out.faces(), pm.faces());
}

#[test]
fn cavity_filler_without_shared_topology_returns_input_with_report() {
    // A cube with an interior cavity plus a solid filling the cavity: the
    // outer shell never meets the inner cluster along an edge, so the
    // patch/cell graph cannot be completed and the input is handed back.
    let mut arena = MeshArena::new();
    let mut builder = MeshBuilder::new();
    axis_box(&mut arena, &mut builder, [0, 0, 0], [3, 3, 3]);
    axis_box_inward(&mut arena, &mut builder, [1, 1, 1], [2, 2, 2]);
    axis_box(&mut arena, &mut builder, [1, 1, 1], [2, 2, 2]);
    let pm = builder.build();
    let shape_fn = |f: usize| usize::from(f >= 12);
    let out = boolean_mesh(
        &pm,
        BoolOpType::Union,
        2,
        &shape_fn,
        false,
        None,
        &PreIntersected,
        &mut arena,
    );
    assert_eq!(out.faces(), pm.faces());
}

#[test]
fn validation_error_values_render() {
    assert_eq!(
        BooleanError::GraphDisconnected.to_string(),
        "patch/cell graph is not connected"
    );
    assert!(BooleanError::CellMergeRequired(1, 2).to_string().contains("1"));
}
