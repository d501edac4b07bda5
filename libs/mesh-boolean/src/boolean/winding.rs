//! Winding-number propagation and the per-operator keep rule.

use super::cell::CellsInfo;
use super::patch::PatchesInfo;
use super::BoolOpType;

/// Decides whether a cell with the given per-shape winding vector belongs
/// to the output of `op`.
///
/// Intersection keeps cells wound by every shape, union cells wound by any
/// shape, and difference keeps cells wound by shape 0 but not by all of the
/// remaining shapes.
pub fn keep_cell(op: BoolOpType, winding: &[i32]) -> bool {
    debug_assert!(!winding.is_empty());
    match op {
        BoolOpType::Intersect => winding.iter().all(|&w| w != 0),
        BoolOpType::Union => winding.iter().any(|&w| w != 0),
        BoolOpType::Difference => {
            if winding[0] == 0 {
                return false;
            }
            if winding.len() == 1 {
                return true;
            }
            winding[1..].iter().any(|&w| w == 0)
        }
        BoolOpType::None => false,
    }
}

/// Breadth-first propagation of winding vectors from the ambient cell.
///
/// Crossing a patch from one cell to its neighbour changes the winding of
/// the patch's shape by +1 when leaving through the patch's below side and
/// -1 when leaving through its above side. Each cell is enqueued at most
/// once, and its keep flag is evaluated the moment its winding is set.
///
/// `shape_fn` maps a triangle index to its input shape; any triangle of a
/// patch serves, since patches never span shapes.
pub fn propagate_windings_and_flag(
    pinfo: &PatchesInfo,
    cinfo: &mut CellsInfo,
    c_ambient: u32,
    op: BoolOpType,
    nshapes: usize,
    shape_fn: &dyn Fn(usize) -> usize,
) {
    cinfo.cell_mut(c_ambient).seed_ambient_winding();
    let mut queue: Vec<u32> = Vec::with_capacity(cinfo.tot_cell());
    queue.push(c_ambient);
    let mut head = 0;
    while head < queue.len() {
        let c = queue[head];
        head += 1;
        let cell_patches = cinfo.cell(c).patches().to_vec();
        for p in cell_patches {
            let patch = pinfo.patch(p);
            let exits_below = patch.cell_below == c;
            let c_neighbor = if exits_below {
                patch.cell_above
            } else {
                patch.cell_below
            };
            if cinfo.cell(c_neighbor).winding_assigned() {
                continue;
            }
            let delta = if exits_below { 1 } else { -1 };
            let shape = shape_fn(patch.tri(0));
            debug_assert!(shape < nshapes);
            let from = cinfo.cell(c).winding().to_vec();
            cinfo
                .cell_mut(c_neighbor)
                .set_winding_and_flag(&from, shape, delta, op);
            queue.push(c_neighbor);
            debug_assert!(queue.len() <= cinfo.tot_cell());
        }
    }
}
