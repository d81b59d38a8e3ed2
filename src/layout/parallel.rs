//! Data-parallel repulsion and integration on the rayon pool.
//!
//! Each node sums its own repulsion over every other node in ascending index
//! order, which is the order the sequential phase adds them in. No two tasks
//! write the same accumulator, and the result does not depend on how rayon
//! splits the work.
//!
//! A coincident pair `(hi, lo)` draws its perturbation from a stream forked
//! for that pair and iteration, so both endpoints see the same vector and the
//! draws do not depend on thread scheduling. Forces match the sequential path
//! exactly as long as no pair takes the perturbation path.

use rayon::prelude::*;

use super::forces::{ForceParams, add_assign, repulsion, sub_assign};
use super::integrator::integrate_node;
use super::perturbation::PerturbationSource;
use crate::graph::Node;

/// Pair indices use the low 40 bits.
const PAIR_BITS: u32 = 40;

fn pair_stream(iteration: u32, hi: usize, lo: usize) -> u64 {
    let hi = hi as u64;
    let pair = hi * hi.saturating_sub(1) / 2 + lo as u64;
    (u64::from(iteration) << PAIR_BITS) | (pair & ((1 << PAIR_BITS) - 1))
}

/// Forks its parent only when a sample is actually drawn.
struct LazyFork<'a, P> {
    parent: &'a P,
    stream: u64,
    rng: Option<P>,
}

impl<'a, P: PerturbationSource> LazyFork<'a, P> {
    fn new(parent: &'a P, stream: u64) -> Self {
        Self {
            parent,
            stream,
            rng: None,
        }
    }
}

impl<P: PerturbationSource> PerturbationSource for LazyFork<'_, P> {
    fn sample(&mut self) -> f32 {
        self.rng
            .get_or_insert_with(|| self.parent.fork(self.stream))
            .sample()
    }

    fn fork(&self, stream: u64) -> Self {
        Self::new(self.parent, stream)
    }
}

/// Parallel counterpart of [`super::forces::accumulate_repulsion`].
pub fn accumulate_repulsion<const D: usize, P: PerturbationSource>(
    nodes: &mut [Node<D>],
    params: &ForceParams,
    perturbation: &P,
    iteration: u32,
) {
    let positions: Vec<[f32; D]> = nodes.iter().map(|node| node.position).collect();

    nodes.par_iter_mut().enumerate().for_each(|(i, node)| {
        for j in (0..positions.len()).filter(|&j| j != i) {
            let (hi, lo) = if i > j { (i, j) } else { (j, i) };
            let (from, to) = (&positions[hi], &positions[lo]);
            let mut source = LazyFork::new(perturbation, pair_stream(iteration, hi, lo));
            let Some(force) = repulsion(from, to, params, &mut source) else {
                continue;
            };
            if i == hi {
                sub_assign(&mut node.force, &force);
            } else {
                add_assign(&mut node.force, &force);
            }
        }
    });
}

/// Parallel counterpart of [`super::integrator::integrate`].
pub fn integrate<const D: usize>(nodes: &mut [Node<D>], damping: f32, max_velocity: f32) {
    nodes
        .par_iter_mut()
        .for_each(|node| integrate_node(node, damping, max_velocity));
}
