use smallvec::SmallVec;
use tracing::debug;

use crate::{Dim, Result, RunnerError, Shape, TensorSpec};

/// An input signature together with its concrete shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedInput {
    pub spec: TensorSpec,
    pub shape: Shape,
}

impl ResolvedInput {
    /// Resolved axis values paired with whether the model declared them dynamic.
    pub fn axes(&self) -> impl Iterator<Item = (i64, bool)> + '_ {
        self.shape
            .dims()
            .iter()
            .zip(&self.spec.dims)
            .map(|(&value, dim)| (value, dim.is_dynamic()))
    }
}

/// Substitutes every dynamic axis of `inputs` with the next value of `queue`.
///
/// Axes are visited input-major, axis-minor. The queue must be consumed
/// exactly: running out names the input that could not be filled, and any
/// leftover values are rejected after the last input.
pub fn resolve_dynamic_dims(inputs: &[TensorSpec], queue: &[i64]) -> Result<Vec<ResolvedInput>> {
    let mut cursor = 0usize;
    let resolved = inputs
        .iter()
        .map(|spec| resolve_input(spec, queue, &mut cursor))
        .collect::<Result<Vec<_>>>()?;

    if cursor != queue.len() {
        return Err(RunnerError::ExcessDynamicDimensions {
            supplied: queue.len(),
            consumed: cursor,
        });
    }

    Ok(resolved)
}

fn resolve_input(spec: &TensorSpec, queue: &[i64], cursor: &mut usize) -> Result<ResolvedInput> {
    let mut dims: SmallVec<[i64; 6]> = SmallVec::with_capacity(spec.rank());
    for (axis, dim) in spec.dims.iter().enumerate() {
        let value = match *dim {
            Dim::Fixed(d) => d,
            Dim::Dynamic => {
                let Some(&value) = queue.get(*cursor) else {
                    return Err(RunnerError::InsufficientDynamicDimensions {
                        input: spec.name.0.clone(),
                    });
                };
                *cursor += 1;
                debug!(input = %spec.name, axis, value, "resolved dynamic axis");
                value
            }
        };
        dims.push(value);
    }

    Ok(ResolvedInput {
        spec: spec.clone(),
        shape: Shape(dims),
    })
}
