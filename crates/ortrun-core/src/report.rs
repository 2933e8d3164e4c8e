use std::time::Duration;

use crate::{BackendConfig, OutputTensor, ResolvedInput, TensorSpec};

/// Everything one run learned about the model and the engine.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub available_backends: Vec<String>,
    pub backend: BackendConfig,
    pub inputs: Vec<ResolvedInput>,
    /// Output signatures as declared at load time.
    pub declared_outputs: Vec<TensorSpec>,
    /// Outputs as actually produced, shapes computed by the engine.
    pub outputs: Vec<OutputTensor>,
    pub input_bytes: usize,
    pub inference_time: Duration,
}
