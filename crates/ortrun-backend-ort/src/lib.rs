use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use ort::{
    execution_providers::{
        cuda::CUDAExecutionProvider, tensorrt::TensorRTExecutionProvider, ExecutionProvider,
    },
    memory::Allocator,
    session::{
        builder::{GraphOptimizationLevel, SessionBuilder},
        Session, SessionInputValue,
    },
    tensor::TensorElementType,
    value::{DynTensor, DynValue, ValueType},
};
use ortrun_core::{
    BackendConfig, Dim, ElementType, Engine, EngineModel, IOName, InputTensor, ModelSpec,
    OptimizationLevel, OutputTensor, SessionConfig, TensorSpec, CPU_PROVIDER, CUDA_PROVIDER,
    TENSORRT_PROVIDER,
};
use tracing::{debug, warn};

pub struct OrtEngine;

impl OrtEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OrtEngine {
    fn default() -> Self {
        Self::new()
    }
}

pub struct OrtModel {
    spec: ModelSpec,
    session: Session,
}

impl Engine for OrtEngine {
    type Model = OrtModel;

    fn name(&self) -> &'static str {
        "onnxruntime"
    }

    fn available_backends(&self) -> Result<Vec<String>> {
        let mut providers = Vec::new();
        if probe(TENSORRT_PROVIDER, &TensorRTExecutionProvider::default()) {
            providers.push(TENSORRT_PROVIDER.to_string());
        }
        if probe(CUDA_PROVIDER, &CUDAExecutionProvider::default()) {
            providers.push(CUDA_PROVIDER.to_string());
        }
        providers.push(CPU_PROVIDER.to_string());
        Ok(providers)
    }

    fn load(&self, model_path: &Path, config: &SessionConfig) -> Result<Self::Model> {
        let builder = Session::builder()
            .context("failed to create ORT session builder")?
            .with_optimization_level(optimization_level(config.optimization))
            .context("failed to configure ORT session builder")?;

        let builder = match config.intra_threads {
            Some(threads) => builder
                .with_intra_threads(threads)
                .context("failed to set intra-op thread count")?,
            None => builder,
        };

        let builder = match &config.profiling {
            Some(prefix) => builder
                .with_profiling(prefix)
                .context("failed to enable ORT profiling")?,
            None => builder,
        };

        let builder = configure_backend(builder, &config.backend)?;

        let session = builder
            .commit_from_file(model_path)
            .with_context(|| format!("failed to load ONNX model {}", model_path.display()))?;

        let spec = build_model_spec(&session)?;

        Ok(OrtModel { spec, session })
    }
}

impl EngineModel for OrtModel {
    fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    fn run(
        &mut self,
        inputs: Vec<InputTensor>,
        output_names: &[IOName],
    ) -> Result<Vec<OutputTensor>> {
        ensure!(
            inputs.len() == self.spec.inputs.len(),
            "expected {} inputs, got {}",
            self.spec.inputs.len(),
            inputs.len()
        );

        let mut ort_inputs = Vec::with_capacity(inputs.len());
        for input in &inputs {
            let value = input_to_ort_value(input)
                .with_context(|| format!("failed to bind input {}", input.name))?;
            ort_inputs.push((input.name.0.clone(), SessionInputValue::from(value)));
        }

        let outputs = self.session.run(ort_inputs)?;

        let mut produced = Vec::with_capacity(outputs.len());
        for (name, value) in outputs.iter() {
            produced.push(describe_output(name, &value)?);
        }

        output_names
            .iter()
            .map(|name| {
                produced
                    .iter()
                    .find(|out| &out.name == name)
                    .cloned()
                    .with_context(|| format!("session produced no output named {name}"))
            })
            .collect()
    }
}

fn probe(name: &str, ep: &impl ExecutionProvider) -> bool {
    match ep.is_available() {
        Ok(available) => {
            debug!(provider = name, available, "probed execution provider");
            available
        }
        Err(err) => {
            warn!(provider = name, error = %err, "execution provider probe failed");
            false
        }
    }
}

fn optimization_level(level: OptimizationLevel) -> GraphOptimizationLevel {
    match level {
        OptimizationLevel::Disable => GraphOptimizationLevel::Disable,
        OptimizationLevel::Basic => GraphOptimizationLevel::Level1,
        OptimizationLevel::Extended => GraphOptimizationLevel::Level2,
        OptimizationLevel::All => GraphOptimizationLevel::Level3,
    }
}

fn configure_backend(builder: SessionBuilder, backend: &BackendConfig) -> Result<SessionBuilder> {
    match backend {
        BackendConfig::Cpu => Ok(builder),
        BackendConfig::Cuda { device_id } => {
            let ep = CUDAExecutionProvider::default()
                .with_device_id(*device_id)
                .build();
            builder
                .with_execution_providers([ep])
                .context("failed to enable ORT CUDA execution provider")
        }
        BackendConfig::TensorRt {
            device_id,
            engine_cache,
        } => {
            // TensorRT compiles its own engines from the graph; caching them
            // makes the first run of later sessions fast.
            let mut ep = TensorRTExecutionProvider::default().with_device_id(*device_id);
            if let Some(dir) = engine_cache {
                ep = ep
                    .with_engine_cache(true)
                    .with_engine_cache_path(dir.to_string_lossy());
            }
            builder
                .with_execution_providers([ep.build()])
                .context("failed to enable ORT TensorRT execution provider")
        }
    }
}

fn build_model_spec(session: &Session) -> Result<ModelSpec> {
    let inputs = session
        .inputs
        .iter()
        .map(|input| tensor_spec_from_value_type(&input.name, &input.input_type))
        .collect::<Result<Vec<_>>>()?;

    let outputs = session
        .outputs
        .iter()
        .map(|output| tensor_spec_from_value_type(&output.name, &output.output_type))
        .collect::<Result<Vec<_>>>()?;

    Ok(ModelSpec { inputs, outputs })
}

fn tensor_spec_from_value_type(name: &str, value_type: &ValueType) -> Result<TensorSpec> {
    let ValueType::Tensor { ty, shape, .. } = value_type else {
        bail!("unsupported non-tensor IO value type for {name}");
    };

    let dims = shape.iter().map(|d| Dim::from_onnx(*d)).collect();
    Ok(TensorSpec::new(name, element_type(*ty), dims))
}

fn element_type(ty: TensorElementType) -> ElementType {
    let code = ort::sys::ONNXTensorElementDataType::from(ty) as i32;
    ElementType::from_onnx(code)
}

fn describe_output(name: &str, value: &ort::value::ValueRef<'_>) -> Result<OutputTensor> {
    let ValueType::Tensor { ty, shape, .. } = value.dtype() else {
        bail!("non-tensor output {name} is not supported");
    };

    Ok(OutputTensor {
        name: IOName(name.to_string()),
        dtype: element_type(*ty),
        shape: shape.iter().copied().collect(),
    })
}

/// Element types that can be decoded from little-endian bytes.
trait LeBytes: Sized {
    const WIDTH: usize;
    fn from_le(bytes: &[u8]) -> Self;
}

macro_rules! le_bytes {
    ($($t:ty),*) => {
        $(impl LeBytes for $t {
            const WIDTH: usize = std::mem::size_of::<$t>();
            fn from_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(bytes);
                <$t>::from_le_bytes(raw)
            }
        })*
    };
}

le_bytes!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, half::f16, half::bf16);

impl LeBytes for bool {
    const WIDTH: usize = 1;
    fn from_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

/// Reads the first `numel` elements of `T` out of `bytes`.
fn decode<T: LeBytes>(bytes: &[u8], numel: usize) -> Result<Vec<T>> {
    let needed = numel
        .checked_mul(T::WIDTH)
        .context("input byte size overflows")?;
    ensure!(
        bytes.len() >= needed,
        "input buffer too small: got {} bytes, need {}",
        bytes.len(),
        needed
    );
    Ok(bytes[..needed].chunks_exact(T::WIDTH).map(T::from_le).collect())
}

/// Element types without a Rust scalar are allocated by ORT itself. The
/// allocation is zero-filled, which matches the provisioned buffer contents.
fn zeroed(
    ty: TensorElementType,
    shape: Vec<usize>,
    bytes: &[u8],
    needed: usize,
) -> Result<DynValue> {
    ensure!(
        bytes.len() >= needed,
        "input buffer too small: got {} bytes, need {}",
        bytes.len(),
        needed
    );
    let tensor = DynTensor::new(&Allocator::default(), ty, shape)?;
    Ok(tensor.into_dyn())
}

fn input_to_ort_value(input: &InputTensor) -> Result<DynValue> {
    let numel = input
        .shape
        .numel()
        .context("input shape has non-positive or overflowing axes")?;
    let shape = input
        .shape
        .dims()
        .iter()
        .map(|&d| usize::try_from(d))
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("negative input axis")?;
    let bytes = input.buffer.as_bytes();

    macro_rules! typed {
        ($t:ty) => {
            ort::value::Tensor::from_array((shape, decode::<$t>(bytes, numel)?))?.into_dyn()
        };
    }

    let value = match input.dtype {
        ElementType::F32 => typed!(f32),
        ElementType::F64 => typed!(f64),
        ElementType::F16 => typed!(half::f16),
        ElementType::BF16 => typed!(half::bf16),
        ElementType::I8 => typed!(i8),
        ElementType::I16 => typed!(i16),
        ElementType::I32 => typed!(i32),
        ElementType::I64 => typed!(i64),
        ElementType::U8 => typed!(u8),
        ElementType::U16 => typed!(u16),
        ElementType::U32 => typed!(u32),
        ElementType::U64 => typed!(u64),
        ElementType::Bool => typed!(bool),
        ElementType::Complex64 => zeroed(TensorElementType::Complex64, shape, bytes, numel * 8)?,
        ElementType::Complex128 => {
            zeroed(TensorElementType::Complex128, shape, bytes, numel * 16)?
        }
        ElementType::F8E4M3FN => zeroed(TensorElementType::Float8E4M3FN, shape, bytes, numel)?,
        ElementType::F8E4M3FNUZ => {
            zeroed(TensorElementType::Float8E4M3FNUZ, shape, bytes, numel)?
        }
        ElementType::F8E5M2 => zeroed(TensorElementType::Float8E5M2, shape, bytes, numel)?,
        ElementType::F8E5M2FNUZ => {
            zeroed(TensorElementType::Float8E5M2FNUZ, shape, bytes, numel)?
        }
        other => bail!("{other} inputs cannot be bound to an ORT tensor"),
    };

    Ok(value)
}
