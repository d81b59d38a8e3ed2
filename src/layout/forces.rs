//! Pairwise force laws.
//!
//! Both laws are pure functions of two positions, the force parameters and an
//! injected [`PerturbationSource`]. They return the contribution for one pair;
//! the caller applies it with opposite signs to the two endpoints, so the
//! pair's forces are always exact negations of each other.
//!
//! # Repulsion (Coulomb-like)
//!
//! `f = k² / d²`, applied along the separation vector, for pairs closer than
//! `max_distance`. Pairs at or beyond the cutoff exert nothing.
//!
//! # Attraction (Hooke-like)
//!
//! `f = (d² - k²) / (d·k)` with `d` truncated to `max_distance`. Always
//! applied. Pulls endpoints together when `d > k` and pushes them apart when
//! `d < k`, so `k` is the spring's rest length.

use super::perturbation::{COINCIDENCE_THRESHOLD, PerturbationSource};
use crate::graph::Node;

/// Parameters shared by both force laws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    /// Force constant k.
    pub strength: f32,
    /// Repulsion cutoff and spring truncation distance.
    pub max_distance: f32,
}

#[inline]
fn norm<const D: usize>(v: &[f32; D]) -> f32 {
    v.iter().map(|c| c * c).sum::<f32>().sqrt()
}

#[inline]
fn scaled<const D: usize>(v: &[f32; D], factor: f32) -> [f32; D] {
    std::array::from_fn(|axis| v[axis] * factor)
}

#[inline]
pub(crate) fn add_assign<const D: usize>(target: &mut [f32; D], v: &[f32; D]) {
    for (t, c) in target.iter_mut().zip(v) {
        *t += c;
    }
}

#[inline]
pub(crate) fn sub_assign<const D: usize>(target: &mut [f32; D], v: &[f32; D]) {
    for (t, c) in target.iter_mut().zip(v) {
        *t -= c;
    }
}

/// Separation vector `to - from` and its length.
///
/// Below [`COINCIDENCE_THRESHOLD`] the vector is replaced by a fresh
/// perturbation and the length recomputed from it, so the returned length is
/// never zero.
pub fn separation<const D: usize, P: PerturbationSource>(
    from: &[f32; D],
    to: &[f32; D],
    perturbation: &mut P,
) -> ([f32; D], f32) {
    let delta: [f32; D] = std::array::from_fn(|axis| to[axis] - from[axis]);
    let distance = norm(&delta);
    if distance < COINCIDENCE_THRESHOLD {
        let delta = perturbation.vector::<D>();
        let distance = norm(&delta);
        return (delta, distance);
    }
    (delta, distance)
}

/// Repulsive contribution for the pair (`from`, `to`).
///
/// Returns `None` when the pair is at or beyond the cutoff. Otherwise the
/// vector is added to `to`'s force and subtracted from `from`'s.
pub fn repulsion<const D: usize, P: PerturbationSource>(
    from: &[f32; D],
    to: &[f32; D],
    params: &ForceParams,
    perturbation: &mut P,
) -> Option<[f32; D]> {
    let (delta, distance) = separation(from, to, perturbation);
    if distance >= params.max_distance {
        return None;
    }
    let magnitude = (params.strength * params.strength) / (distance * distance);
    Some(scaled(&delta, magnitude))
}

/// Spring contribution for the edge (`from`, `to`).
///
/// The vector is added to `from`'s force and subtracted from `to`'s.
pub fn attraction<const D: usize, P: PerturbationSource>(
    from: &[f32; D],
    to: &[f32; D],
    params: &ForceParams,
    perturbation: &mut P,
) -> [f32; D] {
    let (delta, distance) = separation(from, to, perturbation);
    let distance = distance.min(params.max_distance);
    let k = params.strength;
    let magnitude = (distance * distance - k * k) / (distance * k);
    scaled(&delta, magnitude)
}

/// Add repulsion for every unordered pair of distinct nodes.
///
/// Pairs are visited as `(n1, n2)` with `n2 < n1`, so the perturbation stream
/// is consumed in a fixed order for a given node count.
pub fn accumulate_repulsion<const D: usize, P: PerturbationSource>(
    nodes: &mut [Node<D>],
    params: &ForceParams,
    perturbation: &mut P,
) {
    for n1 in 0..nodes.len() {
        for n2 in 0..n1 {
            let from = nodes[n1].position;
            let to = nodes[n2].position;
            if let Some(force) = repulsion(&from, &to, params, perturbation) {
                sub_assign(&mut nodes[n1].force, &force);
                add_assign(&mut nodes[n2].force, &force);
            }
        }
    }
}

/// Add one spring per edge occurrence. Edges are dense index pairs.
pub fn accumulate_attraction<const D: usize, P: PerturbationSource>(
    nodes: &mut [Node<D>],
    edges: impl IntoIterator<Item = (usize, usize)>,
    params: &ForceParams,
    perturbation: &mut P,
) {
    for (source, target) in edges {
        let from = nodes[source].position;
        let to = nodes[target].position;
        let force = attraction(&from, &to, params, perturbation);
        add_assign(&mut nodes[source].force, &force);
        sub_assign(&mut nodes[target].force, &force);
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod property_tests {
    use super::*;
    use crate::layout::perturbation::SeededPerturbation;
    use proptest::prelude::*;

    fn position() -> impl Strategy<Value = [f32; 3]> {
        prop::array::uniform3(-100.0f32..100.0)
    }

    proptest! {
        /// Applying a pair's repulsion leaves the two accumulators as exact
        /// negations of each other, including on the perturbation path.
        #[test]
        fn prop_repulsion_symmetric(a in position(), b in position(), seed in any::<u64>()) {
            let params = ForceParams { strength: 5.0, max_distance: 500.0 };
            let mut first = [0.0f32; 3];
            let mut second = [0.0f32; 3];

            if let Some(force) = repulsion(&a, &b, &params, &mut SeededPerturbation::new(seed)) {
                sub_assign(&mut first, &force);
                add_assign(&mut second, &force);
            }

            for axis in 0..3 {
                prop_assert_eq!(first[axis], -second[axis]);
            }
        }

        /// Both laws stay finite for any pair of positions.
        #[test]
        fn prop_forces_finite(a in position(), b in position(), seed in any::<u64>()) {
            let params = ForceParams { strength: 5.0, max_distance: 50.0 };
            let mut perturbation = SeededPerturbation::new(seed);

            if let Some(force) = repulsion(&a, &b, &params, &mut perturbation) {
                prop_assert!(force.iter().all(|c| c.is_finite()));
            }
            let spring = attraction(&a, &b, &params, &mut perturbation);
            prop_assert!(spring.iter().all(|c| c.is_finite()));
        }
    }
}
