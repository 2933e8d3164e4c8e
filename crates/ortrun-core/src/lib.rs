pub mod backend;
pub mod dtype;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod provision;
pub mod report;
pub mod resolve;
pub mod spec;
pub mod tensor;

pub use backend::*;
pub use dtype::*;
pub use engine::*;
pub use error::*;
pub use pipeline::*;
pub use provision::*;
pub use report::*;
pub use resolve::*;
pub use spec::*;
pub use tensor::*;
