//! Axis-aligned box solids.

use crate::exact::EVec3;
use crate::mesh::{MeshArena, VertId};

use super::MeshBuilder;

/// Adds the six quad faces of the box `[min, max]` to `builder`, with
/// outward counterclockwise windings.
///
/// Each face cycle is rotated so its vertex with the smallest id comes
/// first. Coincident faces of boxes sharing vertices therefore agree on
/// their 0-2 diagonal, whichever box they came from, so triangulated boxes
/// stay conforming where they touch exactly.
pub fn axis_box(arena: &mut MeshArena, builder: &mut MeshBuilder, min: [i64; 3], max: [i64; 3]) {
    for quad in box_quads(arena, builder, min, max) {
        builder.push_face(arena, rotate_min_first(quad));
    }
}

/// Same box with inward windings, for carving cavities.
pub fn axis_box_inward(
    arena: &mut MeshArena,
    builder: &mut MeshBuilder,
    min: [i64; 3],
    max: [i64; 3],
) {
    for mut quad in box_quads(arena, builder, min, max) {
        quad.reverse();
        builder.push_face(arena, rotate_min_first(quad));
    }
}

fn box_quads(
    arena: &mut MeshArena,
    builder: &mut MeshBuilder,
    min: [i64; 3],
    max: [i64; 3],
) -> Vec<Vec<VertId>> {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;
    let corners = [
        [x0, y0, z0],
        [x1, y0, z0],
        [x1, y1, z0],
        [x0, y1, z0],
        [x0, y0, z1],
        [x1, y0, z1],
        [x1, y1, z1],
        [x0, y1, z1],
    ];
    let v: Vec<VertId> = corners
        .iter()
        .map(|&[x, y, z]| {
            let orig = builder.take_vert_orig();
            arena.add_or_find_vert(EVec3::from_ints(x, y, z), orig)
        })
        .collect();
    vec![
        vec![v[0], v[3], v[2], v[1]], // bottom, -z
        vec![v[4], v[5], v[6], v[7]], // top, +z
        vec![v[0], v[1], v[5], v[4]], // front, -y
        vec![v[1], v[2], v[6], v[5]], // right, +x
        vec![v[2], v[3], v[7], v[6]], // back, +y
        vec![v[3], v[0], v[4], v[7]], // left, -x
    ]
}

fn rotate_min_first(mut quad: Vec<VertId>) -> Vec<VertId> {
    let mut min_pos = 0;
    for i in 1..quad.len() {
        if quad[i] < quad[min_pos] {
            min_pos = i;
        }
    }
    quad.rotate_left(min_pos);
    quad
}
