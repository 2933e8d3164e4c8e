use crate::ElementType;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IOName(pub String);

impl IOName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IOName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One declared axis of an input or output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dim {
    Fixed(i64),
    /// Size is only known at run time.
    Dynamic,
}

impl Dim {
    /// ONNX Runtime reports unknown axes as negative sizes (conventionally -1).
    pub fn from_onnx(d: i64) -> Self {
        if d < 0 {
            Dim::Dynamic
        } else {
            Dim::Fixed(d)
        }
    }

    pub fn is_dynamic(self) -> bool {
        matches!(self, Dim::Dynamic)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TensorSpec {
    pub name: IOName,
    pub dtype: ElementType,
    pub dims: Vec<Dim>,
}

impl TensorSpec {
    pub fn new(name: impl Into<String>, dtype: ElementType, dims: Vec<Dim>) -> Self {
        Self {
            name: IOName(name.into()),
            dtype,
            dims,
        }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn dynamic_count(&self) -> usize {
        self.dims.iter().filter(|d| d.is_dynamic()).count()
    }
}

/// Input and output signature of a loaded model, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct ModelSpec {
    pub inputs: Vec<TensorSpec>,
    pub outputs: Vec<TensorSpec>,
}

impl ModelSpec {
    pub fn output_names(&self) -> Vec<IOName> {
        self.outputs.iter().map(|spec| spec.name.clone()).collect()
    }
}
