use std::path::PathBuf;

use tracing::info;

use crate::{Result, RunnerError};

pub const TENSORRT_PROVIDER: &str = "TensorrtExecutionProvider";
pub const CUDA_PROVIDER: &str = "CUDAExecutionProvider";
pub const CPU_PROVIDER: &str = "CPUExecutionProvider";

/// Execution backend a session is configured with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendConfig {
    TensorRt {
        device_id: i32,
        /// Where compiled TensorRT engines are cached between runs.
        engine_cache: Option<PathBuf>,
    },
    Cuda {
        device_id: i32,
    },
    Cpu,
}

impl BackendConfig {
    pub fn provider_name(&self) -> &'static str {
        match self {
            BackendConfig::TensorRt { .. } => TENSORRT_PROVIDER,
            BackendConfig::Cuda { .. } => CUDA_PROVIDER,
            BackendConfig::Cpu => CPU_PROVIDER,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendChoice {
    #[default]
    Auto,
    Cpu,
    Cuda,
    TensorRt,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendPreferences {
    pub choice: BackendChoice,
    pub device_id: i32,
    pub engine_cache_dir: Option<PathBuf>,
}

impl Default for BackendPreferences {
    fn default() -> Self {
        Self {
            choice: BackendChoice::Auto,
            device_id: 0,
            engine_cache_dir: Some(PathBuf::from("./")),
        }
    }
}

/// Picks the backend to run on from the providers the engine reports.
///
/// `Auto` prefers TensorRT, then CUDA, then CPU and never fails. A forced
/// accelerator must be present in `available`.
pub fn select_backend(available: &[String], prefs: &BackendPreferences) -> Result<BackendConfig> {
    let has = |name: &str| available.iter().any(|p| p == name);

    let tensorrt = || BackendConfig::TensorRt {
        device_id: prefs.device_id,
        engine_cache: prefs.engine_cache_dir.clone(),
    };
    let cuda = || BackendConfig::Cuda {
        device_id: prefs.device_id,
    };

    let selected = match prefs.choice {
        BackendChoice::Auto if has(TENSORRT_PROVIDER) => tensorrt(),
        BackendChoice::Auto if has(CUDA_PROVIDER) => cuda(),
        BackendChoice::Auto | BackendChoice::Cpu => BackendConfig::Cpu,
        BackendChoice::TensorRt if has(TENSORRT_PROVIDER) => tensorrt(),
        BackendChoice::Cuda if has(CUDA_PROVIDER) => cuda(),
        BackendChoice::TensorRt => {
            return Err(RunnerError::BackendUnavailable(TENSORRT_PROVIDER.to_string()))
        }
        BackendChoice::Cuda => {
            return Err(RunnerError::BackendUnavailable(CUDA_PROVIDER.to_string()))
        }
    };

    info!(backend = selected.provider_name(), "selected execution backend");
    Ok(selected)
}
