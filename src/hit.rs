/// Closest hit found so far.
///
/// `dist` doubles as the search's upper bound, so it starts at the ray's
/// `tmax` and only ever shrinks; the remaining fields are meaningful iff
/// `hit` is set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRecord {
    pub hit: bool,
    pub dist: f32,

    /// Barycentric weight applied to the face's second corner.
    pub u: f32,

    /// Barycentric weight applied to the face's third corner; the first
    /// corner's weight is `1.0 - u - v`.
    pub v: f32,

    pub face_id: i32,
}

impl HitRecord {
    pub fn new(tmax: f32) -> Self {
        Self {
            hit: false,
            dist: tmax,
            u: 0.0,
            v: 0.0,
            face_id: -1,
        }
    }
}
