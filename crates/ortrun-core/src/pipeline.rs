use std::path::PathBuf;
use std::time::Instant;

use tracing::info;

use crate::{
    provision, resolve_dynamic_dims, select_backend, BackendPreferences, Engine, EngineModel,
    OptimizationLevel, Result, RunReport, RunnerError, SessionConfig, Stage, TensorSpec,
};

#[derive(Clone, Debug, Default)]
pub struct RunRequest {
    pub model_path: PathBuf,
    /// Values for the model's dynamic input axes, in declaration order.
    pub dynamic_dims: Vec<i64>,
    pub backend: BackendPreferences,
    pub optimization: OptimizationLevel,
    pub intra_threads: Option<usize>,
    pub profiling: Option<PathBuf>,
}

impl RunRequest {
    pub fn new(model_path: impl Into<PathBuf>, dynamic_dims: Vec<i64>) -> Self {
        Self {
            model_path: model_path.into(),
            dynamic_dims,
            ..Self::default()
        }
    }
}

/// Input and output signatures of a loaded model, in declaration order.
pub fn extract_signatures(model: &impl EngineModel) -> (Vec<TensorSpec>, Vec<TensorSpec>) {
    let spec = model.spec();
    (spec.inputs.clone(), spec.outputs.clone())
}

/// Loads the model, feeds it correctly sized placeholder inputs and runs it once.
///
/// The engine session and every input buffer are owned by this call and
/// dropped on return, whichever stage fails.
pub fn run_model<E: Engine>(engine: &E, request: &RunRequest) -> Result<RunReport> {
    let available_backends = engine
        .available_backends()
        .map_err(|e| RunnerError::engine(Stage::EnumerateBackends, e))?;
    let backend = select_backend(&available_backends, &request.backend)?;

    let config = SessionConfig {
        backend: backend.clone(),
        optimization: request.optimization,
        intra_threads: request.intra_threads,
        profiling: request.profiling.clone(),
    };
    let mut model = engine
        .load(&request.model_path, &config)
        .map_err(|e| RunnerError::engine(Stage::LoadModel, e))?;
    info!(engine = engine.name(), model = %request.model_path.display(), "model loaded");

    let (input_specs, declared_outputs) = extract_signatures(&model);
    let inputs = resolve_dynamic_dims(&input_specs, &request.dynamic_dims)?;

    let tensors = inputs
        .iter()
        .cloned()
        .map(provision)
        .collect::<Result<Vec<_>>>()?;
    let input_bytes = tensors.iter().map(|t| t.byte_len()).sum();

    let output_names = model.spec().output_names();

    let t0 = Instant::now();
    let outputs = model
        .run(tensors, &output_names)
        .map_err(|e| RunnerError::engine(Stage::RunInference, e))?;
    let inference_time = t0.elapsed();
    info!(
        outputs = outputs.len(),
        elapsed_us = inference_time.as_micros() as u64,
        "inference finished"
    );

    Ok(RunReport {
        available_backends,
        backend,
        inputs,
        declared_outputs,
        outputs,
        input_bytes,
        inference_time,
    })
}
