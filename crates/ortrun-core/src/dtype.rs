use crate::{Result, RunnerError};

/// Tensor element type, numbered after ONNX `TensorProto.DataType`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    Undefined,
    F32,
    U8,
    I8,
    U16,
    I16,
    I32,
    I64,
    String,
    Bool,
    F16,
    F64,
    U32,
    U64,
    Complex64,
    Complex128,
    BF16,
    F8E4M3FN,
    F8E4M3FNUZ,
    F8E5M2,
    F8E5M2FNUZ,
    /// A data type code this build does not know about.
    Unknown(i32),
}

impl ElementType {
    pub fn from_onnx(code: i32) -> Self {
        match code {
            0 => ElementType::Undefined,
            1 => ElementType::F32,
            2 => ElementType::U8,
            3 => ElementType::I8,
            4 => ElementType::U16,
            5 => ElementType::I16,
            6 => ElementType::I32,
            7 => ElementType::I64,
            8 => ElementType::String,
            9 => ElementType::Bool,
            10 => ElementType::F16,
            11 => ElementType::F64,
            12 => ElementType::U32,
            13 => ElementType::U64,
            14 => ElementType::Complex64,
            15 => ElementType::Complex128,
            16 => ElementType::BF16,
            17 => ElementType::F8E4M3FN,
            18 => ElementType::F8E4M3FNUZ,
            19 => ElementType::F8E5M2,
            20 => ElementType::F8E5M2FNUZ,
            other => ElementType::Unknown(other),
        }
    }

    pub fn onnx_code(self) -> i32 {
        match self {
            ElementType::Undefined => 0,
            ElementType::F32 => 1,
            ElementType::U8 => 2,
            ElementType::I8 => 3,
            ElementType::U16 => 4,
            ElementType::I16 => 5,
            ElementType::I32 => 6,
            ElementType::I64 => 7,
            ElementType::String => 8,
            ElementType::Bool => 9,
            ElementType::F16 => 10,
            ElementType::F64 => 11,
            ElementType::U32 => 12,
            ElementType::U64 => 13,
            ElementType::Complex64 => 14,
            ElementType::Complex128 => 15,
            ElementType::BF16 => 16,
            ElementType::F8E4M3FN => 17,
            ElementType::F8E4M3FNUZ => 18,
            ElementType::F8E5M2 => 19,
            ElementType::F8E5M2FNUZ => 20,
            ElementType::Unknown(code) => code,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementType::Undefined => "undefined",
            ElementType::F32 => "float",
            ElementType::U8 => "uint8",
            ElementType::I8 => "int8",
            ElementType::U16 => "uint16",
            ElementType::I16 => "int16",
            ElementType::I32 => "int32",
            ElementType::I64 => "int64",
            ElementType::String => "string",
            ElementType::Bool => "bool",
            ElementType::F16 => "float16",
            ElementType::F64 => "double",
            ElementType::U32 => "uint32",
            ElementType::U64 => "uint64",
            ElementType::Complex64 => "complex float",
            ElementType::Complex128 => "complex double",
            ElementType::BF16 => "bfloat16",
            ElementType::F8E4M3FN => "float8e4m3fn",
            ElementType::F8E4M3FNUZ => "float8e4m3fnuz",
            ElementType::F8E5M2 => "float8e5m2",
            ElementType::F8E5M2FNUZ => "float8e5m2fnuz",
            ElementType::Unknown(_) => "unknown",
        }
    }

    /// Bytes per element used when sizing input buffers.
    ///
    /// bfloat16 is sized at 16 bytes per element. Engines only read the
    /// leading `numel * 2` bytes of such a buffer.
    pub fn byte_width(self) -> Result<usize> {
        match self {
            ElementType::U8
            | ElementType::I8
            | ElementType::Bool
            | ElementType::F8E4M3FN
            | ElementType::F8E4M3FNUZ
            | ElementType::F8E5M2
            | ElementType::F8E5M2FNUZ => Ok(1),
            ElementType::U16 | ElementType::I16 | ElementType::F16 => Ok(2),
            ElementType::F32 | ElementType::I32 | ElementType::U32 => Ok(4),
            ElementType::I64 | ElementType::U64 | ElementType::F64 | ElementType::Complex64 => {
                Ok(8)
            }
            ElementType::Complex128 | ElementType::BF16 => Ok(16),
            ElementType::String => Err(RunnerError::UnsupportedElementType(self)),
            ElementType::Undefined | ElementType::Unknown(_) => {
                Err(RunnerError::InvalidElementType(self))
            }
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementType::Unknown(code) => write!(f, "unknown({code})"),
            other => f.write_str(other.name()),
        }
    }
}
