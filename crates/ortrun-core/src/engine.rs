use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::{BackendConfig, IOName, InputTensor, ModelSpec, OutputTensor};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OptimizationLevel {
    Disable,
    Basic,
    Extended,
    #[default]
    All,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub backend: BackendConfig,
    pub optimization: OptimizationLevel,
    pub intra_threads: Option<usize>,
    /// File prefix for the engine's JSON profiling trace.
    pub profiling: Option<PathBuf>,
}

impl SessionConfig {
    pub fn new(backend: BackendConfig) -> Self {
        Self {
            backend,
            optimization: OptimizationLevel::default(),
            intra_threads: None,
            profiling: None,
        }
    }
}

pub trait Engine {
    type Model: EngineModel;

    fn name(&self) -> &'static str;

    /// Names of the execution providers usable in this process.
    fn available_backends(&self) -> Result<Vec<String>>;

    fn load(&self, model_path: &Path, config: &SessionConfig) -> Result<Self::Model>;
}

pub trait EngineModel {
    fn spec(&self) -> &ModelSpec;

    /// Runs one pass. Inputs are bound by name; outputs come back in the
    /// order of `output_names`, with shapes computed by the engine.
    fn run(&mut self, inputs: Vec<InputTensor>, output_names: &[IOName])
        -> Result<Vec<OutputTensor>>;
}
