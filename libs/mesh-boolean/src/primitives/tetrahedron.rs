//! Tetrahedron solid.

use crate::exact::EVec3;
use crate::mesh::{MeshArena, VertId};

use super::MeshBuilder;

/// Adds the four triangle faces of a unit corner tetrahedron translated by
/// `offset`, with outward counterclockwise windings.
pub fn tetrahedron(arena: &mut MeshArena, builder: &mut MeshBuilder, offset: [i64; 3]) {
    let [ox, oy, oz] = offset;
    let corners = [
        [ox, oy, oz],
        [ox + 1, oy, oz],
        [ox, oy + 1, oz],
        [ox, oy, oz + 1],
    ];
    let v: Vec<VertId> = corners
        .iter()
        .map(|&[x, y, z]| {
            let orig = builder.take_vert_orig();
            arena.add_or_find_vert(EVec3::from_ints(x, y, z), orig)
        })
        .collect();
    for tri in [
        vec![v[0], v[2], v[1]],
        vec![v[0], v[1], v[3]],
        vec![v[0], v[3], v[2]],
        vec![v[1], v[2], v[3]],
    ] {
        builder.push_face(arena, tri);
    }
}
