//! Spring layout driver.
//!
//! A run moves through `Uninitialized -> Running { iteration } -> Done`. Each
//! step performs one full iteration with a barrier between phases:
//!
//! 1. Repulsion over every unordered node pair
//! 2. Attraction over every edge occurrence
//! 3. Integration of every node (which also resets the force accumulators)
//!
//! The run ends after exactly `config.iterations` steps; there is no
//! convergence test.

use log::{debug, trace};

#[cfg(feature = "parallel")]
use super::config::Execution;
use super::config::LayoutConfig;
use super::forces::{self, ForceParams};
use super::integrator;
use super::perturbation::PerturbationSource;
use super::result::LayoutResult;
use crate::error::Result;
use crate::graph::LayoutGraph;

/// Where a run is in its fixed iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    /// No iteration has run yet.
    Uninitialized,
    /// `iteration` iterations have completed.
    Running { iteration: u32 },
    /// The budget is exhausted.
    Done,
}

/// A validated spring layout configuration.
///
/// Stateless apart from its configuration; the graph and the perturbation
/// source are handed to each run explicitly.
#[derive(Debug, Clone)]
pub struct SpringLayout {
    config: LayoutConfig,
}

impl SpringLayout {
    /// Create a layout, rejecting invalid configurations up front.
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a layout with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }

    /// The configuration this layout runs with.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    fn force_params(&self) -> ForceParams {
        ForceParams {
            strength: self.config.force_strength,
            max_distance: self.config.max_distance,
        }
    }

    /// Begin a run over `graph`. Nothing is computed until the first step.
    pub fn start<const D: usize, P: PerturbationSource>(
        &self,
        graph: LayoutGraph<D>,
        perturbation: P,
    ) -> LayoutRun<'_, D, P> {
        LayoutRun {
            layout: self,
            graph,
            perturbation,
            state: LayoutState::Uninitialized,
        }
    }

    /// Run the full iteration budget and return the final positions.
    pub fn run<const D: usize, P: PerturbationSource>(
        &self,
        graph: LayoutGraph<D>,
        perturbation: P,
    ) -> LayoutResult<D> {
        self.run_with_observer(graph, perturbation, |_, _| {})
    }

    /// Run the full budget, calling `observer` after every iteration.
    ///
    /// The observer sees the graph with updated positions and zeroed forces.
    /// It cannot influence the run.
    pub fn run_with_observer<const D: usize, P, F>(
        &self,
        graph: LayoutGraph<D>,
        perturbation: P,
        mut observer: F,
    ) -> LayoutResult<D>
    where
        P: PerturbationSource,
        F: FnMut(u32, &LayoutGraph<D>),
    {
        let mut run = self.start(graph, perturbation);
        loop {
            let state = run.step();
            let iteration = match state {
                LayoutState::Running { iteration } => iteration,
                _ => self.config.iterations,
            };
            observer(iteration, run.graph());
            if state == LayoutState::Done {
                break;
            }
        }
        run.into_result()
    }
}

impl Default for SpringLayout {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// One layout run: owns the graph and the perturbation source until done.
pub struct LayoutRun<'a, const D: usize, P> {
    layout: &'a SpringLayout,
    graph: LayoutGraph<D>,
    perturbation: P,
    state: LayoutState,
}

impl<'a, const D: usize, P: PerturbationSource> LayoutRun<'a, D, P> {
    /// Current state.
    pub fn state(&self) -> LayoutState {
        self.state
    }

    /// The graph in its current state.
    pub fn graph(&self) -> &LayoutGraph<D> {
        &self.graph
    }

    /// Run one iteration and return the new state. A finished run is left
    /// untouched.
    pub fn step(&mut self) -> LayoutState {
        let iteration = match self.state {
            LayoutState::Done => return LayoutState::Done,
            LayoutState::Uninitialized => {
                debug!(
                    "spring layout: {} nodes, {} edges, {} iterations",
                    self.graph.node_count(),
                    self.graph.edge_count(),
                    self.layout.config.iterations
                );
                0
            }
            LayoutState::Running { iteration } => iteration,
        };

        self.iterate(iteration);

        let completed = iteration + 1;
        self.state = if completed >= self.layout.config.iterations {
            debug!("spring layout finished after {completed} iterations");
            LayoutState::Done
        } else {
            LayoutState::Running {
                iteration: completed,
            }
        };
        self.state
    }

    /// Step until the budget is exhausted.
    pub fn run_to_completion(&mut self) {
        while self.step() != LayoutState::Done {}
    }

    /// Give back the graph, whatever state the run is in.
    pub fn into_graph(self) -> LayoutGraph<D> {
        self.graph
    }

    /// Snapshot the current positions.
    pub fn into_result(self) -> LayoutResult<D> {
        LayoutResult::from_graph(&self.graph)
    }

    fn iterate(&mut self, iteration: u32) {
        let params = self.layout.force_params();

        self.repulsion_phase(&params, iteration);

        let (nodes, edges) = self.graph.arena_and_edges();
        forces::accumulate_attraction(nodes, edges, &params, &mut self.perturbation);

        self.integration_phase();

        trace!("spring layout iteration {iteration} complete");
    }

    fn repulsion_phase(
        &mut self,
        params: &ForceParams,
        #[cfg_attr(not(feature = "parallel"), allow(unused_variables))] iteration: u32,
    ) {
        #[cfg(feature = "parallel")]
        {
            if self.layout.config.execution == Execution::Parallel {
                let nodes = self.graph.nodes_mut();
                let perturbation = &self.perturbation;
                super::parallel::accumulate_repulsion(nodes, params, perturbation, iteration);
                return;
            }
        }

        forces::accumulate_repulsion(self.graph.nodes_mut(), params, &mut self.perturbation);
    }

    fn integration_phase(&mut self) {
        let config = &self.layout.config;

        #[cfg(feature = "parallel")]
        {
            if config.execution == Execution::Parallel {
                let nodes = self.graph.nodes_mut();
                super::parallel::integrate(nodes, config.damping, config.max_velocity);
                return;
            }
        }

        integrator::integrate(self.graph.nodes_mut(), config.damping, config.max_velocity);
    }
}


#[cfg(all(test, feature = "parallel"))]
mod parallel_tests {
    use super::*;
    use crate::graph::{GraphOptions, NodeId};
    use crate::layout::config::Execution;
    use crate::layout::perturbation::SeededPerturbation;

    fn layout(iterations: u32, execution: Execution) -> SpringLayout {
        SpringLayout::new(LayoutConfig {
            iterations,
            execution,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_same_seed_same_layout_from_coincident_start() {
        let edges = [(0, 1), (0, 2), (0, 3), (1, 4), (3, 2), (3, 4)];
        let run = || {
            let graph: LayoutGraph<3> =
                LayoutGraph::from_edges(&edges, &GraphOptions::default()).unwrap();
            layout(200, Execution::Parallel).run(graph, SeededPerturbation::new(12))
        };

        let first = run();
        assert_eq!(first, run());
        assert_eq!(first.len(), 5);
        assert!(first.positions.values().flatten().all(|c| c.is_finite()));
        assert_ne!(first.get(NodeId(0)), first.get(NodeId(1)));
    }

    #[test]
    fn test_matches_sequential_without_coincident_pairs() {
        let two_nodes = || {
            let mut graph: LayoutGraph<2> =
                LayoutGraph::from_edges(&[(0, 1)], &GraphOptions::default()).unwrap();
            graph.set_position(NodeId(1), [0.5, 0.0]).unwrap();
            graph
        };

        let sequential =
            layout(300, Execution::Sequential).run(two_nodes(), SeededPerturbation::new(3));
        let parallel =
            layout(300, Execution::Parallel).run(two_nodes(), SeededPerturbation::new(3));
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_spring_settles_against_repulsion() {
        let mut graph: LayoutGraph<2> =
            LayoutGraph::from_edges(&[(0, 1)], &GraphOptions::default()).unwrap();
        graph.set_position(NodeId(1), [0.5, 0.0]).unwrap();

        let result = layout(1000, Execution::Parallel).run(graph, SeededPerturbation::new(0));
        let [a, b] = [result.get(NodeId(0)).unwrap(), result.get(NodeId(1)).unwrap()];
        let d = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
        assert!((d - 5.0 * 1.324_718).abs() < 0.01, "settled at {d}");
    }
}
