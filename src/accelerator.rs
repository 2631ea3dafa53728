use std::time::Instant;

use crate::{
    builder, leaves, BuildError, Child, GeometryView, HitRecord, Node, Ray,
};

/// Maximum number of nodes a traversal can keep pending.
///
/// A 30-bit Morton tree is at most 30 levels deep plus whatever skew
/// duplicate keys introduce, so 64 leaves plenty of headroom.
const STACK_SIZE: usize = 64;

/// Ray-triangle intersection accelerator over a borrowed mesh.
///
/// Built once, immutable afterwards; queries only read, so a single
/// accelerator can serve arbitrarily many threads at the same time.
#[derive(Debug)]
pub struct Accelerator<'a> {
    geometry: GeometryView<'a>,
    nodes: Vec<Node>,
    root: Child,
}

impl<'a> Accelerator<'a> {
    pub fn build(geometry: GeometryView<'a>) -> Result<Self, BuildError> {
        if geometry.is_empty() {
            return Err(BuildError::EmptyGeometry);
        }

        log::trace!("Building ({} triangles)", geometry.face_count());

        let tt = Instant::now();

        let bounds = geometry.bounds();
        let leaves = leaves::build(&geometry, &bounds);
        let (nodes, root) = builder::run(&geometry, &leaves, &bounds);

        log::trace!("Building completed (in {:?})", tt.elapsed());

        Ok(Self {
            geometry,
            nodes,
            root,
        })
    }

    pub fn geometry(&self) -> GeometryView<'a> {
        self.geometry
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn root(&self) -> Child {
        self.root
    }

    /// Finds the nearest hit within the ray's interval.
    ///
    /// The caller seeds `record` through [`HitRecord::new`] with the ray's
    /// `tmax`; `record.dist` only ever shrinks, which is also what prunes
    /// whole subtrees as the search narrows down.
    pub fn traverse(&self, ray: &Ray, record: &mut HitRecord) {
        self.trace(ray, record, TracingMode::Nearest);
    }

    /// Tells whether the ray hits anything at all within its interval,
    /// returning at the first accepted hit instead of searching on for the
    /// nearest one.
    pub fn traverse_any(&self, ray: &Ray) -> bool {
        let mut record = HitRecord::new(ray.tmax);

        self.trace(ray, &mut record, TracingMode::Any);

        record.hit
    }

    fn trace(&self, ray: &Ray, record: &mut HitRecord, mode: TracingMode) {
        // A single-face scene has no internal nodes; the root link points
        // straight at the face
        if self.root.is_leaf() {
            self.test_face(self.root.index(), ray, record);
            return;
        }

        let mut stack = [0; STACK_SIZE];
        let mut len = 0;

        stack[len] = self.root.index();
        len += 1;

        while len > 0 {
            len -= 1;

            let node = &self.nodes[stack[len] as usize];

            if !node.bounds.hit(ray.origin, ray.inv_dir, record.dist) {
                continue;
            }

            for child in [node.left, node.right] {
                if child.is_leaf() {
                    if self.test_face(child.index(), ray, record) {
                        if let TracingMode::Any = mode {
                            return;
                        }
                    }
                } else if len < STACK_SIZE {
                    stack[len] = child.index();
                    len += 1;
                } else {
                    debug_assert!(false, "traversal stack overflow");
                }
            }
        }
    }

    /// Tests one face, folding an accepted hit into the record.
    fn test_face(
        &self,
        face_id: u32,
        ray: &Ray,
        record: &mut HitRecord,
    ) -> bool {
        if !self.geometry.triangle(face_id).hit(ray, record) {
            return false;
        }

        record.face_id = face_id as i32;
        record.hit = true;

        true
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TracingMode {
    Nearest,
    Any,
}
