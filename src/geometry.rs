use glam::Vec3;
use rayon::prelude::*;

use crate::{BoundingBox, Triangle};

/// One corner of a face: an index into the position array paired with an
/// index into the normal array.
///
/// The index stream is a flat sequence of corners; face `f` owns corners
/// `3f`, `3f + 1` and `3f + 2`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexCorner {
    pub position: u32,
    pub normal: u32,
}

/// Borrowed view over an externally owned mesh.
///
/// The view never copies the arrays; they have to outlive whatever is built
/// on top of them.
#[derive(Clone, Copy, Debug)]
pub struct GeometryView<'a> {
    positions: &'a [Vec3],
    normals: &'a [Vec3],
    corners: &'a [VertexCorner],
}

impl<'a> GeometryView<'a> {
    pub fn new(
        positions: &'a [Vec3],
        normals: &'a [Vec3],
        corners: &'a [VertexCorner],
    ) -> Self {
        Self {
            positions,
            normals,
            corners,
        }
    }

    pub fn face_count(&self) -> usize {
        self.corners.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
            || self.normals.is_empty()
            || self.face_count() == 0
    }

    pub fn triangle(&self, face_id: u32) -> Triangle {
        let corner = (face_id as usize) * 3;

        Triangle {
            positions: [
                self.positions[self.corners[corner].position as usize],
                self.positions[self.corners[corner + 1].position as usize],
                self.positions[self.corners[corner + 2].position as usize],
            ],
        }
    }

    /// Bounding box of the whole position array.
    pub fn bounds(&self) -> BoundingBox {
        self.positions
            .par_iter()
            .fold(BoundingBox::default, |bounds, position| bounds + *position)
            .reduce(BoundingBox::default, |lhs, rhs| lhs + rhs)
    }

    /// Point of face `face_id` at the barycentric weights `(w, u, v)`,
    /// applied to its corners in order.
    pub fn interpolate_position(
        &self,
        face_id: u32,
        u: f32,
        v: f32,
        w: f32,
    ) -> Vec3 {
        let corner = (face_id as usize) * 3;

        self.positions[self.corners[corner].position as usize] * w
            + self.positions[self.corners[corner + 1].position as usize] * u
            + self.positions[self.corners[corner + 2].position as usize] * v
    }

    /// Same as [`Self::interpolate_position`], over the normal array; the
    /// result is not re-normalized.
    pub fn interpolate_normal(
        &self,
        face_id: u32,
        u: f32,
        v: f32,
        w: f32,
    ) -> Vec3 {
        let corner = (face_id as usize) * 3;

        self.normals[self.corners[corner].normal as usize] * w
            + self.normals[self.corners[corner + 1].normal as usize] * u
            + self.normals[self.corners[corner + 2].normal as usize] * v
    }
}
