//! Spring Layout - force-directed graph layout engine
//!
//! Given an edge list, this crate computes node coordinates by simulating two
//! opposing forces: Coulomb-like repulsion between every pair of nodes and
//! Hooke-like springs along edges. The simulation runs for a fixed number of
//! iterations and returns the final position of every node.
//!
//! The core is plain Rust; a thin wasm-bindgen facade exposes it to
//! JavaScript. Rendering and persistence of the positions are left to the
//! caller.
//!
//! # Architecture
//!
//! - `graph`: Graph model (petgraph topology + dense node arena)
//! - `layout`: Force laws, perturbation sources, integrator and driver
//! - `error`: Construction and configuration errors

use js_sys::Float32Array;
use log::{Level, info};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

pub mod error;
pub mod graph;
pub mod layout;

pub use error::{Error, Result};
pub use graph::{Edge, GraphOptions, LayoutGraph, NodeId};
pub use layout::{LayoutConfig, LayoutResult, SeededPerturbation, SpringLayout};

use layout::EntropyPerturbation;

/// Lay out the graph described by `edges` with a seeded perturbation source.
///
/// Every node starts at the origin, so the first iteration always takes the
/// perturbation path; the same seed gives the same layout.
pub fn spring_layout<const D: usize>(
    edges: &[(u32, u32)],
    config: LayoutConfig,
    seed: u64,
) -> Result<LayoutResult<D>> {
    let layout = SpringLayout::new(config)?;
    let graph = LayoutGraph::from_edges(edges, &GraphOptions::default())?;
    Ok(layout.run(graph, SeededPerturbation::new(seed)))
}

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(Level::Info);
    info!("spring layout module initialized");
}

/// Options accepted by the JavaScript constructor.
///
/// Layout parameters and graph policies are flattened into one object, e.g.
/// `{ iterations: 500, forceStrength: 5, dimensions: 2, seed: 12 }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Layout parameters.
    #[serde(flatten)]
    pub config: LayoutConfig,
    /// Self-loop and duplicate edge handling.
    #[serde(flatten)]
    pub graph: GraphOptions,
    /// Dimensionality of the output (2 or 3).
    pub dimensions: u32,
    /// Seed for reproducible layouts; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            config: LayoutConfig::default(),
            graph: GraphOptions::default(),
            dimensions: 3,
            seed: None,
        }
    }
}

impl LayoutOptions {
    /// Check the options before any layout runs.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.dimensions, 2 | 3) {
            return Err(Error::UnsupportedDimensions(self.dimensions));
        }
        self.config.validate()
    }

    /// Build the graph, apply optional initial positions and run the layout.
    ///
    /// Returns node ids in ascending order with their interleaved positions.
    pub fn compute(
        &self,
        edges: &[u32],
        initial: Option<&[f32]>,
    ) -> Result<(Vec<u32>, Vec<f32>)> {
        match self.dimensions {
            2 => self.compute_in::<2>(edges, initial),
            3 => self.compute_in::<3>(edges, initial),
            other => Err(Error::UnsupportedDimensions(other)),
        }
    }

    fn compute_in<const D: usize>(
        &self,
        edges: &[u32],
        initial: Option<&[f32]>,
    ) -> Result<(Vec<u32>, Vec<f32>)> {
        let layout = SpringLayout::new(self.config)?;
        let mut graph: LayoutGraph<D> = LayoutGraph::from_flat_pairs(edges, &self.graph)?;
        if let Some(positions) = initial {
            graph.set_positions_from_slice(positions)?;
        }

        let result = match self.seed {
            Some(seed) => layout.run(graph, SeededPerturbation::new(seed)),
            None => layout.run(graph, EntropyPerturbation::new()),
        };
        Ok((result.node_ids(), result.interleaved()))
    }
}

/// Layout output handed to JavaScript.
#[wasm_bindgen]
pub struct LayoutOutput {
    node_ids: Vec<u32>,
    positions: Vec<f32>,
    dimensions: u32,
}

#[wasm_bindgen]
impl LayoutOutput {
    /// Node ids in ascending order.
    #[wasm_bindgen(js_name = nodeIds)]
    pub fn node_ids(&self) -> Vec<u32> {
        self.node_ids.clone()
    }

    /// Positions as [x0, y0, (z0,) x1, ...], in `nodeIds` order.
    pub fn positions(&self) -> Float32Array {
        Float32Array::from(&self.positions[..])
    }

    /// Components per node.
    pub fn dimensions(&self) -> u32 {
        self.dimensions
    }

    /// Number of nodes laid out.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.node_ids.len() as u32
    }
}

/// Main entry point for JavaScript callers.
#[wasm_bindgen]
pub struct SpringLayoutWasm {
    options: LayoutOptions,
}

#[wasm_bindgen]
impl SpringLayoutWasm {
    /// Create a layout from an options object; omitted fields take defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> std::result::Result<SpringLayoutWasm, JsError> {
        let options: LayoutOptions = if options.is_undefined() || options.is_null() {
            LayoutOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        options.validate()?;
        Ok(Self { options })
    }

    /// Dimensionality of the output positions.
    pub fn dimensions(&self) -> u32 {
        self.options.dimensions
    }

    /// Lay out the graph given as [src0, tgt0, src1, tgt1, ...].
    ///
    /// All nodes start at the origin.
    #[wasm_bindgen(js_name = computeLayout)]
    pub fn compute_layout(&self, edges: &[u32]) -> std::result::Result<LayoutOutput, JsError> {
        self.output(edges, None)
    }

    /// Lay out the graph starting from the given positions.
    ///
    /// `initial` holds `dimensions` values per node, in the order node ids
    /// first appear in `edges`.
    #[wasm_bindgen(js_name = computeLayoutWithPositions)]
    pub fn compute_layout_with_positions(
        &self,
        edges: &[u32],
        initial: &[f32],
    ) -> std::result::Result<LayoutOutput, JsError> {
        self.output(edges, Some(initial))
    }

    fn output(
        &self,
        edges: &[u32],
        initial: Option<&[f32]>,
    ) -> std::result::Result<LayoutOutput, JsError> {
        let (node_ids, positions) = self.options.compute(edges, initial)?;
        Ok(LayoutOutput {
            node_ids,
            positions,
            dimensions: self.options.dimensions,
        })
    }
}
