//! Infer a nested struct schema from one sample JSON document and emit C++
//! declarations plus a `FromJson` deserializer per struct.
//!
//! Pipeline: `serde_json::Value` → [`sample::SampleValue`] →
//! [`inference::build`] (innermost-first [`ir::StructDef`] list) →
//! [`codegen::emit`] (two text blocks) → optionally [`artifact::render`].
pub mod artifact;
pub mod cli;
pub mod codegen;
pub mod error;
pub mod inference;
pub mod ir;
pub mod naming;
pub mod sample;
pub mod scope;

use serde_json::Value;

pub use codegen::{AccessorTable, Emitted};
pub use error::{GenError, Result};
pub use ir::StructDef;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub root_type: String,
    pub accessors: AccessorTable,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            root_type: inference::DEFAULT_ROOT_TYPE.to_string(),
            accessors: AccessorTable::default(),
        }
    }
}

/// Struct list for `document`, innermost first.
pub fn infer_structs(document: &Value, options: &GenerateOptions) -> Result<Vec<StructDef>> {
    let sample = sample::SampleValue::from(document);
    inference::build(&sample, &options.root_type)
}

/// Declarations and deserializers for `document`.
pub fn generate(document: &Value, options: &GenerateOptions) -> Result<Emitted> {
    let structs = infer_structs(document, options)?;
    codegen::emit(&structs, &options.accessors)
}
