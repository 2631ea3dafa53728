use std::ops::{Add, AddAssign};

use glam::Vec3;

/// Axis-aligned bounding box.
///
/// The default value is the empty box (`min = +inf`, `max = -inf`), which is
/// the identity under merging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn extent(&self) -> Vec3 {
        self.max() - self.min()
    }

    pub fn translated(mut self, offset: Vec3) -> Self {
        self.min += offset;
        self.max += offset;
        self
    }

    /// Slab test against a ray whose nearest accepted hit so far lies at
    /// `length`.
    ///
    /// Picking the near and far faces by the sign of `inv_dir` keeps the
    /// `0.0 * inf` NaNs of axis-parallel rays out of the interval bounds;
    /// the only NaN that can still appear (origin exactly on the slab of a
    /// parallel axis) is dropped by `min` / `max`.
    pub fn hit(&self, origin: Vec3, inv_dir: Vec3, length: f32) -> bool {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let (near, far) = if inv_dir[axis] > 0.0 {
                (self.min[axis], self.max[axis])
            } else {
                (self.max[axis], self.min[axis])
            };

            t_enter = t_enter.max((near - origin[axis]) * inv_dir[axis]);
            t_exit = t_exit.min((far - origin[axis]) * inv_dir[axis]);
        }

        t_enter <= t_exit && t_exit > 0.0 && t_enter < length
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(Vec3::INFINITY, Vec3::NEG_INFINITY)
    }
}

impl Add<Vec3> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Vec3) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Vec3> for BoundingBox {
    fn add_assign(&mut self, rhs: Vec3) {
        self.min = self.min.min(rhs);
        self.max = self.max.max(rhs);
    }
}

impl Add<Self> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Self> for BoundingBox {
    fn add_assign(&mut self, rhs: Self) {
        self.min = self.min.min(rhs.min);
        self.max = self.max.max(rhs.max);
    }
}

impl FromIterator<Vec3> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Vec3>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}

impl FromIterator<Self> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Self>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}
