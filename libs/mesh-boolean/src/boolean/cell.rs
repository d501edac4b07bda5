//! Partitioning 3-space into cells bounded by patches.
//!
//! Cells are reconstructed edge by edge: the triangles around each shared
//! patch edge are sorted radially, and consecutive triangles in that cyclic
//! order bound the same volume. The distinguished unbounded cell is found
//! by probing outward from an extreme vertex.

use std::collections::HashSet;

use crate::error::BooleanError;
use crate::exact::{int, EVec3, Scalar};
use crate::mesh::{Mesh, MeshArena, NO_INDEX};
use num_traits::{Signed, Zero};

use super::patch::PatchesInfo;
use super::radial_sort::{find_flap_vert, sort_tris_around_edge, EXTRA_TRI_INDEX};
use super::topology::{Edge, TriMeshTopology};
use super::winding::keep_cell;
use super::BoolOpType;

/// A connected open volume of 3-space, listed by the patches that bound it,
/// with one winding number per input shape once propagation has run.
#[derive(Debug, Default)]
pub struct Cell {
    patches: Vec<u32>,
    winding: Vec<i32>,
    winding_assigned: bool,
    flag: bool,
}

impl Cell {
    pub fn add_patch(&mut self, p: u32) {
        self.patches.push(p);
    }

    pub fn patches(&self) -> &[u32] {
        &self.patches
    }

    pub fn winding(&self) -> &[i32] {
        &self.winding
    }

    pub fn winding_assigned(&self) -> bool {
        self.winding_assigned
    }

    /// True when the cell is inside the boolean result.
    pub fn flag(&self) -> bool {
        self.flag
    }

    pub fn init_winding(&mut self, winding_len: usize) {
        self.winding = vec![0; winding_len];
        self.winding_assigned = false;
        self.flag = false;
    }

    /// Marks this cell as the all-zero seed of the propagation.
    pub fn seed_ambient_winding(&mut self) {
        self.winding.iter_mut().for_each(|w| *w = 0);
        self.winding_assigned = true;
    }

    /// Copies the winding of the cell the traversal came from, applies the
    /// crossing delta for `shape`, and evaluates the keep flag.
    pub fn set_winding_and_flag(&mut self, from: &[i32], shape: usize, delta: i32, op: BoolOpType) {
        self.winding.copy_from_slice(from);
        self.winding[shape] += delta;
        self.winding_assigned = true;
        self.flag = keep_cell(op, &self.winding);
    }
}

/// All cells, indexed by position.
#[derive(Debug, Default)]
pub struct CellsInfo {
    cells: Vec<Cell>,
}

impl CellsInfo {
    pub fn add_cell(&mut self) -> u32 {
        self.cells.push(Cell::default());
        (self.cells.len() - 1) as u32
    }

    pub fn cell(&self, c: u32) -> &Cell {
        &self.cells[c as usize]
    }

    pub fn cell_mut(&mut self, c: u32) -> &mut Cell {
        &mut self.cells[c as usize]
    }

    pub fn tot_cell(&self) -> usize {
        self.cells.len()
    }

    pub fn init_windings(&mut self, winding_len: usize) {
        for cell in &mut self.cells {
            cell.init_winding(winding_len);
        }
    }
}

/// Walks the radial order around `e` and binds consecutive triangles'
/// patch sides to shared cells, creating cells as needed.
fn find_cells_from_edge(
    tm: &Mesh,
    arena: &MeshArena,
    tmtopo: &TriMeshTopology,
    pinfo: &mut PatchesInfo,
    cinfo: &mut CellsInfo,
    e: Edge,
) {
    let edge_tris = tmtopo
        .edge_tris(e)
        .expect("shared patch edge must have triangles");
    let sorted_tris = sort_tris_around_edge(tm, arena, e, edge_tris, edge_tris[0], None);

    let n = sorted_tris.len();
    let edge_patches: Vec<u32> = sorted_tris.iter().map(|&t| pinfo.tri_patch(t)).collect();
    for i in 0..n {
        let inext = (i + 1) % n;
        let r_index = edge_patches[i];
        let rnext_index = edge_patches[inext];
        let (_, r_rev) = find_flap_vert(arena.face(tm.face(sorted_tris[i])), e)
            .expect("sorted triangle must contain the edge");
        let (_, rnext_rev) = find_flap_vert(arena.face(tm.face(sorted_tris[inext])), e)
            .expect("sorted triangle must contain the edge");
        // Walking clockwise, we leave r through its below side when r uses
        // the edge reversed, and enter rnext through the opposite side.
        let r_side_above = !r_rev;
        let rnext_side_above = rnext_rev;
        let r_follow = pinfo.patch(r_index).cell_on_side(r_side_above);
        let rnext_prev = pinfo.patch(rnext_index).cell_on_side(rnext_side_above);
        match (r_follow == NO_INDEX, rnext_prev == NO_INDEX) {
            (true, true) => {
                let c = cinfo.add_cell();
                pinfo.patch_mut(r_index).set_cell_on_side(r_side_above, c);
                pinfo
                    .patch_mut(rnext_index)
                    .set_cell_on_side(rnext_side_above, c);
                let cell = cinfo.cell_mut(c);
                cell.add_patch(r_index);
                cell.add_patch(rnext_index);
            }
            (false, true) => {
                pinfo
                    .patch_mut(rnext_index)
                    .set_cell_on_side(rnext_side_above, r_follow);
                cinfo.cell_mut(r_follow).add_patch(rnext_index);
            }
            (true, false) => {
                pinfo
                    .patch_mut(r_index)
                    .set_cell_on_side(r_side_above, rnext_prev);
                cinfo.cell_mut(rnext_prev).add_patch(r_index);
            }
            (false, false) => {
                if r_follow != rnext_prev {
                    // Two cells turn out to be the same volume. Merging is
                    // not implemented; validation will reject the result.
                    let err =
                        BooleanError::CellMergeRequired(r_follow as usize, rnext_prev as usize);
                    log::error!("{err}");
                    debug_assert!(false, "{err}");
                }
            }
        }
    }
}

/// Builds the partition of 3-space into cells, filling in `cell_above` and
/// `cell_below` of every patch reachable through shared edges.
///
/// Patch pairs are visited in ascending index order and each representative
/// edge is processed once, so cell numbering is reproducible.
pub fn find_cells(
    tm: &Mesh,
    arena: &MeshArena,
    tmtopo: &TriMeshTopology,
    pinfo: &mut PatchesInfo,
) -> CellsInfo {
    let mut cinfo = CellsInfo::default();
    let mut processed_edges: HashSet<Edge> = HashSet::new();
    let np = pinfo.tot_patch() as u32;
    for p in 0..np {
        for q in (p + 1)..np {
            let Some(e) = pinfo.patch_patch_edge(p, q) else {
                continue;
            };
            if processed_edges.insert(e) {
                find_cells_from_edge(tm, arena, tmtopo, pinfo, &mut cinfo, e);
            }
        }
    }
    log::debug!(
        "found {} cells over {} patches",
        cinfo.tot_cell(),
        pinfo.tot_patch()
    );
    cinfo
}

/// True when the bipartite patch/cell graph is connected and covers every
/// patch and cell, starting a flood fill from patch 0.
pub fn patch_cell_graph_connected(cinfo: &CellsInfo, pinfo: &PatchesInfo) -> bool {
    if cinfo.tot_cell() == 0 || pinfo.tot_patch() == 0 {
        return false;
    }
    let mut cell_reachable = vec![false; cinfo.tot_cell()];
    let mut patch_reachable = vec![false; pinfo.tot_patch()];
    let mut stack: Vec<u32> = vec![0];
    while let Some(p) = stack.pop() {
        if patch_reachable[p as usize] {
            continue;
        }
        patch_reachable[p as usize] = true;
        let patch = pinfo.patch(p);
        for c in [patch.cell_above, patch.cell_below] {
            if c == NO_INDEX || (c as usize) >= cinfo.tot_cell() || cell_reachable[c as usize] {
                continue;
            }
            cell_reachable[c as usize] = true;
            for &q in cinfo.cell(c).patches() {
                if !patch_reachable[q as usize] {
                    stack.push(q);
                }
            }
        }
    }
    cell_reachable.into_iter().all(|r| r) && patch_reachable.into_iter().all(|r| r)
}

/// Structural validation after cell construction: every cell has at least
/// one patch, every patch has both sides bound to an in-range cell, and the
/// bipartite graph is connected.
pub fn patch_cell_graph_ok(cinfo: &CellsInfo, pinfo: &PatchesInfo) -> Result<(), BooleanError> {
    for c in 0..cinfo.tot_cell() {
        let cell = cinfo.cell(c as u32);
        if cell.patches().is_empty() {
            return Err(BooleanError::InvalidGraph(format!(
                "cell {c} has no patches"
            )));
        }
        for &p in cell.patches() {
            if (p as usize) >= pinfo.tot_patch() {
                return Err(BooleanError::InvalidGraph(format!(
                    "cell {c} references missing patch {p}"
                )));
            }
        }
    }
    for p in 0..pinfo.tot_patch() {
        let patch = pinfo.patch(p as u32);
        if patch.cell_above == NO_INDEX || patch.cell_below == NO_INDEX {
            return Err(BooleanError::InvalidGraph(format!(
                "patch {p} is missing a bounding cell"
            )));
        }
        if (patch.cell_above as usize) >= cinfo.tot_cell()
            || (patch.cell_below as usize) >= cinfo.tot_cell()
        {
            return Err(BooleanError::InvalidGraph(format!(
                "patch {p} references a missing cell"
            )));
        }
    }
    if !patch_cell_graph_connected(cinfo, pinfo) {
        return Err(BooleanError::GraphDisconnected);
    }
    Ok(())
}

/// Finds the unbounded cell.
///
/// Probes from a vertex of maximum x: the incident edge with the steepest
/// xy-projected slope lies on the convex hull, and a synthetic triangle
/// through a point strictly beyond the maximum x lands in the unbounded
/// region. Its radial neighbours both see the ambient cell on their above
/// side; if they disagree the input is malformed and `None` is returned.
pub fn find_ambient_cell(
    tm: &Mesh,
    arena: &mut MeshArena,
    tmtopo: &TriMeshTopology,
    pinfo: &PatchesInfo,
) -> Option<u32> {
    if tm.is_empty() {
        return None;
    }
    let mut v_extreme = arena.face(tm.face(0)).vert(0);
    let mut extreme_x = arena.vert(v_extreme).co_exact.x.clone();
    for &f in tm.faces() {
        for &v in &arena.face(f).verts {
            let x = &arena.vert(v).co_exact.x;
            if *x > extreme_x {
                extreme_x = x.clone();
                v_extreme = v;
            }
        }
    }

    // Incident edge with maximum |dy/dx| in the xy projection; a vertical
    // projected edge counts as infinitely steep.
    let extreme_co = arena.vert(v_extreme).co_exact.clone();
    let mut ehull: Option<Edge> = None;
    let mut max_abs_slope: Scalar = int(-1);
    for &e in tmtopo.vert_edges(v_extreme) {
        let v_other = if e.v0() == v_extreme { e.v1() } else { e.v0() };
        let co_other = &arena.vert(v_other).co_exact;
        let delta_x = &co_other.x - &extreme_x;
        if delta_x.is_zero() {
            ehull = Some(e);
            break;
        }
        let abs_slope = ((&co_other.y - &extreme_co.y) / delta_x).abs();
        if abs_slope > max_abs_slope {
            ehull = Some(e);
            max_abs_slope = abs_slope;
        }
    }
    let ehull = ehull?;

    let p_in_ambient = EVec3::new(
        &extreme_co.x + int(1),
        extreme_co.y.clone(),
        extreme_co.z.clone(),
    );
    let dummy_vert = arena.add_or_find_vert(p_in_ambient, NO_INDEX);
    let dummy_tri = arena.add_face(
        vec![ehull.v0(), ehull.v1(), dummy_vert],
        NO_INDEX,
        vec![NO_INDEX; 3],
    );
    let arena = &*arena;

    let mut edge_tris: Vec<usize> = tmtopo.edge_tris(ehull)?.clone();
    edge_tris.push(EXTRA_TRI_INDEX);
    let sorted_tris = sort_tris_around_edge(
        tm,
        arena,
        ehull,
        &edge_tris,
        edge_tris[0],
        Some(arena.face(dummy_tri)),
    );
    let n = sorted_tris.len();
    let dummy_pos = sorted_tris.iter().position(|&t| t == EXTRA_TRI_INDEX)?;
    let prev_tri = sorted_tris[(dummy_pos + n - 1) % n];
    let next_tri = sorted_tris[(dummy_pos + 1) % n];
    let prev_patch = pinfo.patch(pinfo.tri_patch(prev_tri));
    let next_patch = pinfo.patch(pinfo.tri_patch(next_tri));
    if prev_patch.cell_above != next_patch.cell_above || prev_patch.cell_above == NO_INDEX {
        log::warn!("ambient cell is ambiguous; input is malformed");
        return None;
    }
    Some(prev_patch.cell_above)
}
