use thiserror::Error;

use crate::ElementType;

/// Pipeline stage that talks to the inference engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    EnumerateBackends,
    LoadModel,
    RunInference,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::EnumerateBackends => "enumerate backends",
            Stage::LoadModel => "load model",
            Stage::RunInference => "run inference",
        })
    }
}

/// Coarse error classes reported to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Argument,
    DimensionMismatch,
    UnsupportedType,
    InvalidShape,
    Engine,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    #[error("invalid dynamic input dimension {0}, integer expected")]
    InvalidDimensionArgument(String),

    #[error("requested backend {0} is not available")]
    BackendUnavailable(String),

    #[error("please provide more values for dynamic input dimensions of input {input}")]
    InsufficientDynamicDimensions { input: String },

    #[error("too many values for dynamic input dimensions provided: {supplied} given, {consumed} used")]
    ExcessDynamicDimensions { supplied: usize, consumed: usize },

    #[error("element type {0} has no fixed byte width")]
    UnsupportedElementType(ElementType),

    #[error("element type {0} is not a valid tensor element type")]
    InvalidElementType(ElementType),

    #[error("input {input} has non-positive size {value} on axis {axis}")]
    InvalidShape { input: String, axis: usize, value: i64 },

    #[error("byte size of input {input} overflows")]
    SizeOverflow { input: String },

    #[error("failed to {stage}: {message}")]
    Engine { stage: Stage, message: String },
}

impl RunnerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunnerError::MissingArgument(_)
            | RunnerError::InvalidDimensionArgument(_)
            | RunnerError::BackendUnavailable(_) => ErrorKind::Argument,
            RunnerError::InsufficientDynamicDimensions { .. }
            | RunnerError::ExcessDynamicDimensions { .. } => ErrorKind::DimensionMismatch,
            RunnerError::UnsupportedElementType(_) | RunnerError::InvalidElementType(_) => {
                ErrorKind::UnsupportedType
            }
            RunnerError::InvalidShape { .. } | RunnerError::SizeOverflow { .. } => {
                ErrorKind::InvalidShape
            }
            RunnerError::Engine { .. } => ErrorKind::Engine,
        }
    }

    /// Wraps an engine failure, keeping the whole context chain in the message.
    pub fn engine(stage: Stage, err: anyhow::Error) -> Self {
        RunnerError::Engine {
            stage,
            message: format!("{err:#}"),
        }
    }
}

pub type Result<T, E = RunnerError> = std::result::Result<T, E>;
