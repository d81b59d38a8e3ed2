//! Position update from accumulated forces.
//!
//! Runs once per iteration, after every repulsion and spring contribution has
//! been summed. Each axis moves by `damping * force`, clamped to
//! `[-max_velocity, max_velocity]`.

use crate::graph::Node;

/// Per-axis displacement for one iteration.
#[inline]
pub fn displacement<const D: usize>(
    force: &[f32; D],
    damping: f32,
    max_velocity: f32,
) -> [f32; D] {
    std::array::from_fn(|axis| (damping * force[axis]).clamp(-max_velocity, max_velocity))
}

/// Move one node by its accumulated force and reset the accumulator.
///
/// Pinned nodes keep their position; their accumulator is still reset.
#[inline]
pub fn integrate_node<const D: usize>(node: &mut Node<D>, damping: f32, max_velocity: f32) {
    if !node.state.is_pinned() {
        let step = displacement(&node.force, damping, max_velocity);
        for (position, delta) in node.position.iter_mut().zip(step) {
            *position += delta;
        }
    }
    node.reset_force();
}

/// Integrate every node.
pub fn integrate<const D: usize>(nodes: &mut [Node<D>], damping: f32, max_velocity: f32) {
    for node in nodes {
        integrate_node(node, damping, max_velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;

    #[test]
    fn test_displacement_scaled_by_damping() {
        let step = displacement(&[100.0, -50.0], 0.01, 2.0);
        assert_eq!(step, [1.0, -0.5]);
    }

    #[test]
    fn test_displacement_clamped_per_axis() {
        let step = displacement(&[1000.0, -1000.0, 10.0], 0.01, 2.0);
        assert_eq!(step[0], 2.0);
        assert_eq!(step[1], -2.0);
        assert!((step[2] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_integrate_moves_and_resets() {
        let mut node: Node<2> = Node::new(NodeId(0));
        node.position = [1.0, 1.0];
        node.force = [100.0, 1000.0];

        integrate_node(&mut node, 0.01, 2.0);

        assert_eq!(node.position, [2.0, 3.0]);
        assert_eq!(node.force, [0.0, 0.0]);
    }

    #[test]
    fn test_pinned_node_stays_put() {
        let mut node: Node<3> = Node::new(NodeId(0));
        node.position = [4.0, 5.0, 6.0];
        node.force = [100.0, 100.0, 100.0];
        node.state.set_pinned(true);

        integrate_node(&mut node, 0.01, 2.0);

        assert_eq!(node.position, [4.0, 5.0, 6.0]);
        assert_eq!(node.force, [0.0; 3]);
    }

    #[test]
    fn test_integrate_all_nodes() {
        let mut nodes: Vec<Node<2>> = (0..4).map(|i| Node::new(NodeId(i))).collect();
        for node in &mut nodes {
            node.force = [50.0, -50.0];
        }

        integrate(&mut nodes, 0.01, 2.0);

        for node in &nodes {
            assert_eq!(node.position, [0.5, -0.5]);
            assert_eq!(node.force, [0.0, 0.0]);
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// No axis moves further than `max_velocity` in one iteration, for
        /// any force magnitude.
        #[test]
        fn prop_velocity_bound(
            force in prop::array::uniform3(-1.0e30f32..1.0e30),
            damping in 1.0e-4f32..10.0,
            max_velocity in 1.0e-3f32..100.0,
        ) {
            let step = displacement(&force, damping, max_velocity);
            for axis in 0..3 {
                prop_assert!(step[axis].abs() <= max_velocity);
            }
        }
    }
}
