use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec3;
use rayon::prelude::*;

use crate::leaves::{delta, Leaf};
use crate::{BoundingBox, Child, GeometryView, Node};

/// Builds the internal-node array bottom-up, in one parallel pass over the
/// sorted leaf table.
///
/// Every worker starts at its own leaf and climbs: it picks the parent
/// shared with whichever neighbor range diverges latest in Morton order,
/// deposits its child link there and swaps the parent's rendezvous slot.
/// Exactly one of the two workers converging on a parent observes the
/// sentinel and stops; the other finds its sibling's range end in the slot,
/// widens its own range and keeps climbing with the parent's now-complete
/// box. No parent is processed twice and nothing ever blocks.
pub(crate) fn run(
    geometry: &GeometryView,
    leaves: &[Leaf],
    bounds: &BoundingBox,
) -> (Vec<Node>, Child) {
    debug_assert!(!leaves.is_empty());

    if leaves.len() == 1 {
        return (Vec::new(), Child::leaf(leaves[0].id));
    }

    let offset = bounds.min();
    let node_count = leaves.len() - 1;

    // Index of the last leaf; a range reaching [0, last] spans the tree
    let last = node_count as u32;

    // Merging happens in a frame translated to the scene minimum, which
    // keeps the accumulated coordinates small; the final pass translates
    // everything back
    let leaf_bounds: Vec<BoundingBox> = (0..leaves.len() as u32)
        .into_par_iter()
        .map(|face_id| geometry.triangle(face_id).bounds().translated(-offset))
        .collect();

    let slots: Vec<NodeSlots> =
        (0..node_count).map(|_| NodeSlots::unset()).collect();

    let node_bounds: Vec<SharedBounds> =
        (0..node_count).map(|_| SharedBounds::empty()).collect();

    let other_end: Vec<AtomicU32> = (0..node_count)
        .map(|_| AtomicU32::new(u32::MAX))
        .collect();

    let root = AtomicU32::new(Child::UNSET.bits());

    (0..leaves.len() as u32).into_par_iter().for_each(|leaf_idx| {
        let face_id = leaves[leaf_idx as usize].id;

        let mut current = Child::leaf(face_id);
        let mut current_bounds = leaf_bounds[face_id as usize];
        let (mut l, mut r) = (leaf_idx, leaf_idx);

        loop {
            if l == 0 && r == last {
                root.store(current.bits(), Ordering::Relaxed);
                break;
            }

            // The parent sits on whichever side of the range the Morton
            // prefix diverges later, i.e. where the neighbor key is closer
            let went_right = l == 0
                || (r != last && delta(leaves, r) < delta(leaves, l - 1));

            let (parent, far_end) = if went_right {
                slots[r as usize]
                    .left
                    .store(current.bits(), Ordering::Relaxed);

                (r, l)
            } else {
                slots[(l - 1) as usize]
                    .right
                    .store(current.bits(), Ordering::Relaxed);

                (l - 1, r)
            };

            // The rendezvous: AcqRel both publishes the slot and box writes
            // above and, on the losing side, makes the sibling's writes
            // visible below
            let prev =
                other_end[parent as usize].swap(far_end, Ordering::AcqRel);

            if prev == u32::MAX {
                // First at the parent; the worker arriving through the
                // other child takes over from here
                break;
            }

            // Second at the parent: the sibling subtree is complete, so the
            // parent's box can be finished and carried upward
            let sibling = if went_right {
                r = prev;

                Child::from_bits(
                    slots[parent as usize].right.load(Ordering::Relaxed),
                )
            } else {
                l = prev;

                Child::from_bits(
                    slots[parent as usize].left.load(Ordering::Relaxed),
                )
            };

            let sibling_bounds = if sibling.is_leaf() {
                leaf_bounds[sibling.index() as usize]
            } else {
                node_bounds[sibling.index() as usize].load()
            };

            current_bounds += sibling_bounds;
            node_bounds[parent as usize].store(current_bounds);

            current = Child::internal(parent);
        }
    });

    // ---

    let nodes = (0..node_count)
        .into_par_iter()
        .map(|id| Node {
            bounds: node_bounds[id].load().translated(offset),
            left: Child::from_bits(slots[id].left.load(Ordering::Relaxed)),
            right: Child::from_bits(slots[id].right.load(Ordering::Relaxed)),
        })
        .collect();

    (nodes, Child::from_bits(root.load(Ordering::Relaxed)))
}

struct NodeSlots {
    left: AtomicU32,
    right: AtomicU32,
}

impl NodeSlots {
    fn unset() -> Self {
        Self {
            left: AtomicU32::new(Child::UNSET.bits()),
            right: AtomicU32::new(Child::UNSET.bits()),
        }
    }
}

/// Box whose components live in atomics so that workers can hand finished
/// subtree bounds to each other.
///
/// Relaxed suffices throughout: every load happens only after the writer's
/// release-swap on `other_end` has been observed.
struct SharedBounds {
    min: [AtomicU32; 3],
    max: [AtomicU32; 3],
}

impl SharedBounds {
    fn empty() -> Self {
        Self {
            min: [(); 3].map(|_| AtomicU32::new(f32::INFINITY.to_bits())),
            max: [(); 3]
                .map(|_| AtomicU32::new(f32::NEG_INFINITY.to_bits())),
        }
    }

    fn store(&self, bounds: BoundingBox) {
        for axis in 0..3 {
            self.min[axis]
                .store(bounds.min()[axis].to_bits(), Ordering::Relaxed);

            self.max[axis]
                .store(bounds.max()[axis].to_bits(), Ordering::Relaxed);
        }
    }

    fn load(&self) -> BoundingBox {
        let read = |bits: &[AtomicU32; 3]| {
            Vec3::new(
                f32::from_bits(bits[0].load(Ordering::Relaxed)),
                f32::from_bits(bits[1].load(Ordering::Relaxed)),
                f32::from_bits(bits[2].load(Ordering::Relaxed)),
            )
        };

        BoundingBox::new(read(&self.min), read(&self.max))
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::{leaves, VertexCorner};

    use super::*;

    struct Scene {
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        corners: Vec<VertexCorner>,
    }

    impl Scene {
        fn from_triangles(triangles: &[[Vec3; 3]]) -> Self {
            Self {
                positions: triangles.iter().flatten().copied().collect(),
                normals: vec![Vec3::Z],
                corners: (0..triangles.len() as u32 * 3)
                    .map(|position| VertexCorner {
                        position,
                        normal: 0,
                    })
                    .collect(),
            }
        }

        fn random(face_count: usize, seed: u64) -> Self {
            let mut rng = StdRng::seed_from_u64(seed);

            let vertex = |rng: &mut StdRng| {
                vec3(rng.gen(), rng.gen(), rng.gen())
            };

            let triangles: Vec<_> = (0..face_count)
                .map(|_| {
                    let v0 = vertex(&mut rng);

                    [
                        v0,
                        v0 + vertex(&mut rng) * 0.1,
                        v0 + vertex(&mut rng) * 0.1,
                    ]
                })
                .collect();

            Self::from_triangles(&triangles)
        }

        fn view(&self) -> GeometryView<'_> {
            GeometryView::new(&self.positions, &self.normals, &self.corners)
        }
    }

    fn build(scene: &Scene) -> (Vec<Node>, Child) {
        let geometry = scene.view();
        let bounds = geometry.bounds();
        let leaves = leaves::build(&geometry, &bounds);

        run(&geometry, &leaves, &bounds)
    }

    /// Walks the tree, checking box containment on the way down, and
    /// returns the visited face ids.
    fn census(
        geometry: &GeometryView,
        nodes: &[Node],
        root: Child,
    ) -> Vec<u32> {
        fn contains(outer: &BoundingBox, inner: &BoundingBox) -> bool {
            const TOLERANCE: f32 = 1.0e-5;

            (0..3).all(|axis| {
                outer.min()[axis] <= inner.min()[axis] + TOLERANCE
                    && outer.max()[axis] >= inner.max()[axis] - TOLERANCE
            })
        }

        let mut faces = Vec::new();
        let mut visited_nodes = 0;
        let mut stack = vec![root];

        while let Some(child) = stack.pop() {
            if child.is_leaf() {
                faces.push(child.index());
                continue;
            }

            visited_nodes += 1;

            let node = &nodes[child.index() as usize];

            assert_ne!(Child::UNSET, node.left);
            assert_ne!(Child::UNSET, node.right);

            for child in [node.left, node.right] {
                let child_bounds = if child.is_leaf() {
                    geometry.triangle(child.index()).bounds()
                } else {
                    nodes[child.index() as usize].bounds
                };

                assert!(
                    contains(&node.bounds, &child_bounds),
                    "node {:?} does not enclose child {:?}",
                    node.bounds,
                    child_bounds,
                );

                stack.push(child);
            }
        }

        assert_eq!(nodes.len(), visited_nodes);

        faces.sort_unstable();
        faces
    }

    #[test]
    fn single_face_has_no_nodes() {
        let scene =
            Scene::from_triangles(&[[Vec3::ZERO, Vec3::X, Vec3::Y]]);

        let (nodes, root) = build(&scene);

        assert!(nodes.is_empty());
        assert!(root.is_leaf());
        assert_eq!(0, root.index());
    }

    #[test]
    fn two_faces_share_one_node() {
        let scene = Scene::from_triangles(&[
            [Vec3::ZERO, Vec3::X, Vec3::Y],
            [Vec3::ONE, Vec3::ONE + Vec3::X, Vec3::ONE + Vec3::Y],
        ]);

        let (nodes, root) = build(&scene);

        assert_eq!(1, nodes.len());
        assert!(!root.is_leaf());
        assert_eq!(0, root.index());

        let faces = census(&scene.view(), &nodes, root);

        assert_eq!(vec![0, 1], faces);
    }

    #[test]
    fn spans_every_face_once() {
        let scene = Scene::random(256, 0xb001);
        let (nodes, root) = build(&scene);

        assert_eq!(255, nodes.len());

        let faces = census(&scene.view(), &nodes, root);

        assert_eq!((0..256).collect::<Vec<_>>(), faces);
    }

    #[test]
    fn survives_identical_morton_keys() {
        // All centroids coincide, so every delta is zero and the tree
        // degenerates into a chain; it still has to terminate and span
        let base = [Vec3::ZERO, Vec3::X, Vec3::Y];

        let scene = Scene::from_triangles(&[base; 32]);
        let (nodes, root) = build(&scene);

        assert_eq!(31, nodes.len());

        let faces = census(&scene.view(), &nodes, root);

        assert_eq!((0..32).collect::<Vec<_>>(), faces);
    }

    #[test]
    fn same_input_same_tree() {
        let scene = Scene::random(128, 0xcafe);

        let (nodes_a, root_a) = build(&scene);
        let (nodes_b, root_b) = build(&scene);

        assert_eq!(root_a, root_b);

        for (a, b) in nodes_a.iter().zip(&nodes_b) {
            assert_eq!(a.left, b.left);
            assert_eq!(a.right, b.right);
            assert_eq!(a.bounds, b.bounds);
        }
    }

    #[test]
    fn translates_boxes_back_into_scene_frame() {
        // A scene far away from the origin; the root box has to cover it
        let shift = vec3(1000.0, -2000.0, 3000.0);

        let scene = Scene::from_triangles(&[
            [shift, shift + Vec3::X, shift + Vec3::Y],
            [
                shift + Vec3::Z * 4.0,
                shift + Vec3::Z * 4.0 + Vec3::X,
                shift + Vec3::Z * 4.0 + Vec3::Y,
            ],
        ]);

        let (nodes, root) = build(&scene);
        let root_bounds = nodes[root.index() as usize].bounds;

        assert!(root_bounds.min().distance(shift) < 1.0e-3);

        assert!(
            root_bounds
                .max()
                .distance(shift + vec3(1.0, 1.0, 4.0))
                < 1.0e-3
        );
    }
}
