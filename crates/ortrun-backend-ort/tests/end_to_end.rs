use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use ortrun_backend_ort::OrtEngine;
use ortrun_core::{
    run_model, BackendChoice, BackendConfig, BackendPreferences, Dim, ElementType, Engine,
    EngineModel, RunRequest, RunnerError, SessionConfig, Stage, CPU_PROVIDER,
};

const FLOAT: u64 = 1;
const INT64: u64 = 7;
const BOOL: u64 = 9;
const FLOAT16: u64 = 10;
const BFLOAT16: u64 = 16;

enum TestDim {
    Value(u64),
    Param(&'static str),
}

/// Minimal protobuf writer, enough to emit a single-node ONNX graph.
#[derive(Default)]
struct Proto(Vec<u8>);

impl Proto {
    fn varint(&mut self, mut v: u64) {
        loop {
            let byte = (v & 0x7f) as u8;
            v >>= 7;
            if v == 0 {
                self.0.push(byte);
                return;
            }
            self.0.push(byte | 0x80);
        }
    }

    fn int(mut self, field: u64, v: u64) -> Self {
        self.varint(field << 3);
        self.varint(v);
        self
    }

    fn bytes(mut self, field: u64, data: &[u8]) -> Self {
        self.varint((field << 3) | 2);
        self.varint(data.len() as u64);
        self.0.extend_from_slice(data);
        self
    }

    fn string(self, field: u64, s: &str) -> Self {
        self.bytes(field, s.as_bytes())
    }

    fn message(self, field: u64, msg: Proto) -> Self {
        self.bytes(field, &msg.0)
    }
}

fn value_info(name: &str, elem_type: u64, dims: &[TestDim]) -> Proto {
    let shape = dims.iter().fold(Proto::default(), |shape, dim| {
        let dim = match dim {
            TestDim::Value(v) => Proto::default().int(1, *v),
            TestDim::Param(p) => Proto::default().string(2, p),
        };
        shape.message(1, dim)
    });
    let tensor_type = Proto::default().int(1, elem_type).message(2, shape);
    let type_proto = Proto::default().message(1, tensor_type);
    Proto::default().string(1, name).message(2, type_proto)
}

fn write_model(
    file_name: &str,
    op_type: &str,
    inputs: Vec<(&str, u64, Vec<TestDim>)>,
    output: (&str, u64, Vec<TestDim>),
) -> Result<PathBuf> {
    let mut node = Proto::default();
    for (name, _, _) in &inputs {
        node = node.string(1, name);
    }
    let node = node.string(2, output.0).string(4, op_type);

    let mut graph = Proto::default().message(1, node).string(2, "test");
    for (name, ty, dims) in &inputs {
        graph = graph.message(11, value_info(name, *ty, dims));
    }
    let graph = graph.message(12, value_info(output.0, output.1, &output.2));

    let opset = Proto::default().int(2, 13);
    let model = Proto::default()
        .int(1, 8)
        .string(2, "ortrun-tests")
        .message(7, graph)
        .message(8, opset);

    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(file_name);
    std::fs::write(&path, &model.0).context("failed to write test model")?;
    Ok(path)
}

fn identity_model() -> Result<PathBuf> {
    write_model(
        "identity.onnx",
        "Identity",
        vec![("x", FLOAT, vec![TestDim::Param("N"), TestDim::Value(3)])],
        ("y", FLOAT, vec![TestDim::Param("N"), TestDim::Value(3)]),
    )
}

fn matmul_model(file_name: &str) -> Result<PathBuf> {
    write_model(
        file_name,
        "MatMul",
        vec![
            ("a", FLOAT, vec![TestDim::Param("M"), TestDim::Param("K")]),
            ("b", FLOAT, vec![TestDim::Param("K"), TestDim::Param("N")]),
        ],
        ("c", FLOAT, vec![TestDim::Param("M"), TestDim::Param("N")]),
    )
}

fn cpu_request(model_path: PathBuf, dynamic_dims: Vec<i64>) -> RunRequest {
    RunRequest {
        backend: BackendPreferences {
            choice: BackendChoice::Cpu,
            ..BackendPreferences::default()
        },
        ..RunRequest::new(model_path, dynamic_dims)
    }
}

#[test]
fn cpu_is_always_available() -> Result<()> {
    let providers = OrtEngine::new().available_backends()?;
    ensure!(
        providers.last().map(String::as_str) == Some(CPU_PROVIDER),
        "CPU provider missing from {providers:?}"
    );
    Ok(())
}

#[test]
fn load_reads_the_signature() -> Result<()> {
    let engine = OrtEngine::new();
    let model = engine.load(
        &matmul_model("matmul_spec.onnx")?,
        &SessionConfig::new(BackendConfig::Cpu),
    )?;
    let spec = model.spec();

    let names: Vec<&str> = spec.inputs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(spec.inputs[0].dtype, ElementType::F32);
    assert_eq!(spec.inputs[0].dims, vec![Dim::Dynamic, Dim::Dynamic]);
    assert_eq!(spec.outputs.len(), 1);
    assert_eq!(spec.outputs[0].name.as_str(), "c");
    Ok(())
}

#[test]
fn identity_runs_on_cpu() -> Result<()> {
    let report = run_model(&OrtEngine::new(), &cpu_request(identity_model()?, vec![2]))?;

    assert_eq!(report.backend, BackendConfig::Cpu);
    assert_eq!(report.inputs[0].shape.dims(), &[2, 3]);
    assert_eq!(report.input_bytes, 2 * 3 * 4);

    let out = report.outputs.first().context("missing model output")?;
    assert_eq!(out.name.as_str(), "y");
    assert_eq!(out.dtype, ElementType::F32);
    assert_eq!(out.shape, vec![2, 3]);
    Ok(())
}

#[test]
fn matmul_output_shape_is_computed_by_the_engine() -> Result<()> {
    let request = cpu_request(matmul_model("matmul.onnx")?, vec![4, 8, 8, 5]);
    let report = run_model(&OrtEngine::new(), &request)?;

    assert_eq!(report.inputs[0].shape.dims(), &[4, 8]);
    assert_eq!(report.inputs[1].shape.dims(), &[8, 5]);
    assert_eq!(report.outputs[0].shape, vec![4, 5]);
    Ok(())
}

#[test]
fn int64_inputs_bind() -> Result<()> {
    let path = write_model(
        "identity_i64.onnx",
        "Identity",
        vec![("ids", INT64, vec![TestDim::Value(1), TestDim::Param("T")])],
        ("out", INT64, vec![TestDim::Value(1), TestDim::Param("T")]),
    )?;
    let report = run_model(&OrtEngine::new(), &cpu_request(path, vec![7]))?;

    assert_eq!(report.outputs[0].dtype, ElementType::I64);
    assert_eq!(report.outputs[0].shape, vec![1, 7]);
    Ok(())
}

fn run_identity(file_name: &str, elem_type: u64) -> Result<ortrun_core::RunReport> {
    let path = write_model(
        file_name,
        "Identity",
        vec![("x", elem_type, vec![TestDim::Param("N"), TestDim::Value(4)])],
        ("y", elem_type, vec![TestDim::Param("N"), TestDim::Value(4)]),
    )?;
    Ok(run_model(&OrtEngine::new(), &cpu_request(path, vec![3]))?)
}

#[test]
fn bfloat16_buffer_uses_the_wide_table_entry() -> Result<()> {
    let report = run_identity("identity_bf16.onnx", BFLOAT16)?;

    assert_eq!(report.inputs[0].spec.dtype, ElementType::BF16);
    assert_eq!(report.input_bytes, 3 * 4 * 16);
    assert_eq!(report.outputs[0].dtype, ElementType::BF16);
    assert_eq!(report.outputs[0].shape, vec![3, 4]);
    Ok(())
}

#[test]
fn float16_inputs_bind() -> Result<()> {
    let report = run_identity("identity_f16.onnx", FLOAT16)?;

    assert_eq!(report.input_bytes, 3 * 4 * 2);
    assert_eq!(report.outputs[0].dtype, ElementType::F16);
    assert_eq!(report.outputs[0].shape, vec![3, 4]);
    Ok(())
}

#[test]
fn bool_inputs_bind() -> Result<()> {
    let report = run_identity("identity_bool.onnx", BOOL)?;

    assert_eq!(report.input_bytes, 3 * 4);
    assert_eq!(report.outputs[0].dtype, ElementType::Bool);
    assert_eq!(report.outputs[0].shape, vec![3, 4]);
    Ok(())
}

#[test]
fn missing_model_fails_at_load() {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("does-not-exist.onnx");
    let err = run_model(&OrtEngine::new(), &cpu_request(path, vec![])).unwrap_err();
    assert!(matches!(
        err,
        RunnerError::Engine {
            stage: Stage::LoadModel,
            ..
        }
    ));
}
