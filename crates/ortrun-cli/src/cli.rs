use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ortrun_core::{BackendChoice, BackendPreferences, OptimizationLevel, RunRequest, RunnerError};

#[derive(Parser, Debug)]
#[command(
    name = "ort-runner",
    version,
    about = "Runs one ONNX Runtime inference pass on placeholder inputs"
)]
pub struct Cli {
    /// Path to ONNX model file
    pub model_path: Option<PathBuf>,

    /// Values for dynamic input dimensions, in input order
    #[arg(allow_negative_numbers = true)]
    pub dims: Vec<String>,

    /// Execution backend (auto picks TensorRT, then CUDA, then CPU)
    #[arg(long, value_enum, default_value_t = BackendArg::Auto)]
    pub backend: BackendArg,

    /// Accelerator device index
    #[arg(long, default_value_t = 0)]
    pub device_id: i32,

    /// Directory for cached TensorRT engines
    #[arg(long, default_value = "./")]
    pub engine_cache_dir: PathBuf,

    /// Do not cache TensorRT engines
    #[arg(long)]
    pub no_engine_cache: bool,

    /// Graph optimization level
    #[arg(long, value_enum, default_value_t = OptLevelArg::All)]
    pub opt_level: OptLevelArg,

    /// Intra-op thread count (engine default when omitted)
    #[arg(long)]
    pub intra_threads: Option<usize>,

    /// Write an ONNX Runtime profiling trace with this file prefix
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Log level (RUST_LOG syntax)
    #[arg(long, default_value = "warn")]
    pub log: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Auto,
    Cpu,
    Cuda,
    Tensorrt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OptLevelArg {
    Disable,
    Basic,
    Extended,
    All,
}

impl Cli {
    pub fn into_request(self) -> Result<RunRequest, RunnerError> {
        let model_path = self
            .model_path
            .ok_or_else(|| RunnerError::MissingArgument("<MODEL_PATH>".to_string()))?;
        let dynamic_dims = parse_dims(&self.dims)?;

        let choice = match self.backend {
            BackendArg::Auto => BackendChoice::Auto,
            BackendArg::Cpu => BackendChoice::Cpu,
            BackendArg::Cuda => BackendChoice::Cuda,
            BackendArg::Tensorrt => BackendChoice::TensorRt,
        };
        let optimization = match self.opt_level {
            OptLevelArg::Disable => OptimizationLevel::Disable,
            OptLevelArg::Basic => OptimizationLevel::Basic,
            OptLevelArg::Extended => OptimizationLevel::Extended,
            OptLevelArg::All => OptimizationLevel::All,
        };

        Ok(RunRequest {
            model_path,
            dynamic_dims,
            backend: BackendPreferences {
                choice,
                device_id: self.device_id,
                engine_cache_dir: (!self.no_engine_cache).then_some(self.engine_cache_dir),
            },
            optimization,
            intra_threads: self.intra_threads,
            profiling: self.profile,
        })
    }
}

pub fn parse_dims(raw: &[String]) -> Result<Vec<i64>, RunnerError> {
    raw.iter()
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| RunnerError::InvalidDimensionArgument(token.clone()))
        })
        .collect()
}
