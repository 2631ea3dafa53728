use glam::Vec3;

/// Ray clipped to the parametric interval `tmin .. tmax`.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,

    /// Componentwise reciprocal of `dir`; zero components come out as signed
    /// infinities, which the slab test relies on
    pub inv_dir: Vec3,

    pub tmin: f32,
    pub tmax: f32,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3, tmin: f32, tmax: f32) -> Self {
        Self {
            origin,
            dir,
            inv_dir: 1.0 / dir,
            tmin,
            tmax,
        }
    }

    pub fn at(&self, dist: f32) -> Vec3 {
        self.origin + self.dir * dist
    }
}
