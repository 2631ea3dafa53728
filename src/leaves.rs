use glam::Vec3;
use rayon::prelude::*;

use crate::{morton3d, BoundingBox, GeometryView};

/// One entry of the leaf table: a face and the Morton key of its centroid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Leaf {
    pub id: u32,
    pub key: u32,
}

/// Builds the leaf table, sorted by Morton key.
///
/// Keys come from face centroids normalized into the unit cube by the scene
/// bounds. Axes along which the scene is flat get a zero inverse extent, so
/// every centroid collapses onto zero there instead of dividing into NaNs.
/// The sort is unstable; faces with equal keys end up in no particular
/// order.
pub(crate) fn build(
    geometry: &GeometryView,
    bounds: &BoundingBox,
) -> Vec<Leaf> {
    let extent = bounds.extent();

    let inv_extent = Vec3::new(
        if extent.x > 0.0 { 1.0 / extent.x } else { 0.0 },
        if extent.y > 0.0 { 1.0 / extent.y } else { 0.0 },
        if extent.z > 0.0 { 1.0 / extent.z } else { 0.0 },
    );

    let mut leaves: Vec<_> = (0..geometry.face_count() as u32)
        .into_par_iter()
        .map(|id| {
            let center = geometry.triangle(id).center();
            let unit = (center - bounds.min()) * inv_extent;

            Leaf {
                id,
                key: morton3d(unit.x, unit.y, unit.z),
            }
        })
        .collect();

    leaves.par_sort_unstable_by_key(|leaf| leaf.key);
    leaves
}

/// Distance between adjacent keys of the sorted table, as seen by the
/// builder: the xor of neighbors, whose magnitude tells where their Morton
/// prefixes diverge.
pub(crate) fn delta(leaves: &[Leaf], k: u32) -> u32 {
    leaves[k as usize + 1].key ^ leaves[k as usize].key
}
