use std::fmt::Write;

use ortrun_core::{Dim, OutputTensor, ResolvedInput, RunReport, TensorSpec};

pub fn render(report: &RunReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &RunReport) -> std::fmt::Result {
    writeln!(out, "Available execution providers:")?;
    for (i, name) in report.available_backends.iter().enumerate() {
        writeln!(out, "  {i}. {name}")?;
    }
    writeln!(out, "Selected execution provider: {}", report.backend.provider_name())?;

    writeln!(out, "Model inputs:")?;
    for (i, input) in report.inputs.iter().enumerate() {
        write_input(out, i, input)?;
    }

    writeln!(out, "Model outputs:")?;
    for (i, spec) in report.declared_outputs.iter().enumerate() {
        write_declared(out, i, spec)?;
    }

    writeln!(
        out,
        "Running inference ... done in {:.3} ms ({} input bytes).",
        report.inference_time.as_secs_f64() * 1e3,
        report.input_bytes
    )?;
    for (i, output) in report.outputs.iter().enumerate() {
        write_output(out, i, output)?;
    }
    Ok(())
}

fn write_input(out: &mut String, i: usize, input: &ResolvedInput) -> std::fmt::Result {
    let axes = input.axes().map(|(value, dynamic)| {
        if dynamic {
            format!("({value})")
        } else {
            value.to_string()
        }
    });
    write_entry(out, i, &input.spec.name.0, &input.spec.dtype.to_string(), axes)
}

fn write_declared(out: &mut String, i: usize, spec: &TensorSpec) -> std::fmt::Result {
    let axes = spec.dims.iter().map(|dim| match dim {
        Dim::Fixed(d) => d.to_string(),
        Dim::Dynamic => "-1".to_string(),
    });
    write_entry(out, i, &spec.name.0, &spec.dtype.to_string(), axes)
}

fn write_output(out: &mut String, i: usize, output: &OutputTensor) -> std::fmt::Result {
    let axes = output.shape.iter().map(|d| d.to_string());
    write_entry(out, i, &output.name.0, &output.dtype.to_string(), axes)
}

fn write_entry(
    out: &mut String,
    i: usize,
    name: &str,
    dtype: &str,
    axes: impl Iterator<Item = String>,
) -> std::fmt::Result {
    writeln!(out, "  {i}. {name}")?;
    writeln!(out, "    type: {dtype}")?;
    write!(out, "    shape: [ ")?;
    for axis in axes {
        write!(out, "{axis} ")?;
    }
    writeln!(out, "]")
}
