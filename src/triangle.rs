use glam::Vec3;

use crate::{BoundingBox, HitRecord, Ray};

/// Three positions of a face, fetched through the index stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub positions: [Vec3; 3],
}

impl Triangle {
    pub fn center(&self) -> Vec3 {
        self.positions.into_iter().sum::<Vec3>() / 3.0
    }

    pub fn bounds(&self) -> BoundingBox {
        self.positions.into_iter().collect()
    }

    /// Möller-Trumbore test against `ray`, accepting only hits that improve
    /// on `record.dist`.
    ///
    /// Updates `record.dist`, `record.u` and `record.v` on success and
    /// leaves the record untouched otherwise; the caller is responsible for
    /// `record.hit` and `record.face_id`.
    ///
    /// Acceptance is `tmin <= t < tmax` and `t <= dist`; the bounds on the
    /// interval are asymmetric on purpose, and hits exactly on an edge or a
    /// vertex (`u == 0`, `v == 0`, `u + v == 1`) count.
    pub fn hit(&self, ray: &Ray, record: &mut HitRecord) -> bool {
        let e1 = self.positions[1] - self.positions[0];
        let e2 = self.positions[2] - self.positions[0];

        let pvec = ray.dir.cross(e2);
        let det = e1.dot(pvec);

        // Parallel or degenerate
        if det == 0.0 {
            return false;
        }

        // ---

        let inv_det = 1.0 / det;
        let tvec = ray.origin - self.positions[0];

        let u = tvec.dot(pvec) * inv_det;

        if u < 0.0 || u > 1.0 {
            return false;
        }

        let qvec = tvec.cross(e1);
        let v = ray.dir.dot(qvec) * inv_det;

        if v < 0.0 || u + v > 1.0 {
            return false;
        }

        let t = e2.dot(qvec) * inv_det;

        if t < ray.tmin || ray.tmax <= t || t > record.dist {
            return false;
        }

        record.dist = t;
        record.u = u;
        record.v = v;

        true
    }
}
