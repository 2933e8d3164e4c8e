use tracing::debug;

use crate::{InputBuffer, InputTensor, ResolvedInput, Result, RunnerError};

/// Exact byte length of the buffer backing `input`.
pub fn input_byte_len(input: &ResolvedInput) -> Result<usize> {
    let name = &input.spec.name.0;

    if let Some((axis, &value)) = input.shape.dims().iter().enumerate().find(|&(_, &d)| d <= 0) {
        return Err(RunnerError::InvalidShape {
            input: name.clone(),
            axis,
            value,
        });
    }

    let width = input.spec.dtype.byte_width()?;
    input
        .shape
        .numel()
        .and_then(|numel| numel.checked_mul(width))
        .ok_or_else(|| RunnerError::SizeOverflow {
            input: name.clone(),
        })
}

/// Allocates a zero-filled buffer for `input` and binds it to its type and shape.
pub fn provision(input: ResolvedInput) -> Result<InputTensor> {
    let len = input_byte_len(&input)?;
    debug!(input = %input.spec.name, dtype = %input.spec.dtype, bytes = len, "provisioned input buffer");

    Ok(InputTensor {
        name: input.spec.name,
        dtype: input.spec.dtype,
        shape: input.shape,
        buffer: InputBuffer::zeroed(len),
    })
}
