//! C++ emission: one `struct` declaration and one `FromJson` routine per
//! inferred struct, in the order the structs were closed.
pub mod accessor;

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::error::{GenError, Result};
use crate::ir::{FieldPath, Primitive, StructDef, TypeRef};
use crate::naming::{self, DESERIALIZER_FN};

pub use accessor::{AccessorOverride, AccessorTable};

/// Name of the document-node parameter in every generated deserializer.
const NODE_PARAM: &str = "json";
const FALLBACK_INSTANCE: &str = "out";
// Block locals of array loops. Type-ids are alphanumeric, so no instance name ends in `_`.
const ARRAY_VIEW: &str = "values_";
const ARRAY_INDEX: &str = "i_";

/// The two text blocks of one run. Wrapping them into a file is up to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Emitted {
    pub declarations: String,
    pub deserializers: String,
}

pub struct Codegen<'a> {
    accessors: &'a AccessorTable,
    declared: BTreeSet<String>,
    out: Emitted,
}

impl<'a> Codegen<'a> {
    pub fn new(accessors: &'a AccessorTable) -> Self {
        Self { accessors, declared: BTreeSet::new(), out: Emitted::default() }
    }

    /// Emits `structs` in the given order. A `Named` field must refer to a
    /// struct that was emitted before it, so the list has to be innermost-first.
    pub fn emit(&mut self, structs: &[StructDef]) -> Result<()> {
        for def in structs {
            if let Some(missing) = def.references().find(|name| !self.declared.contains(*name)) {
                return Err(GenError::Generation {
                    path: def.path.clone(),
                    message: format!("`{}` refers to `{missing}` before it is declared", def.name),
                });
            }
            let deserializer = self.deserializer(def)?;
            self.out.declarations.push_str(&declaration(def));
            self.out.deserializers.push_str(&deserializer);
            self.declared.insert(def.name.clone());
            debug!(type_id = %def.name, "emitted struct");
        }
        Ok(())
    }

    pub fn into_output(self) -> Emitted {
        self.out
    }

    fn accessor(&self, kind: Primitive, path: &FieldPath) -> Result<&'a str> {
        self.accessors.get(kind).ok_or_else(|| GenError::UnregisteredAccessor {
            path: path.clone(),
            kind,
        })
    }

    fn deserializer(&self, def: &StructDef) -> Result<String> {
        let inst = instance_name(&def.name);
        let mut body = String::new();
        for field in &def.fields {
            let member = &field.member;
            let key = naming::to_snake_from_member(member).ok_or_else(|| GenError::Naming {
                path: def.path.child(member.as_str()),
                message: format!("member `{member}` has no snake_case key"),
            })?;
            let path = def.path.child(key.as_str());
            match &field.ty {
                TypeRef::Named(_) => {
                    body.push_str(&format!("  {DESERIALIZER_FN}({NODE_PARAM}[\"{key}\"], {inst}.{member});\n"));
                }
                TypeRef::FixedArray { element, length } => {
                    let accessor = self.accessor(*element, &path)?;
                    let view = self.accessors.array_view();
                    body.push_str("  {\n");
                    body.push_str(&format!("    const auto& {ARRAY_VIEW} = {NODE_PARAM}[\"{key}\"].{view}();\n"));
                    body.push_str(&format!("    for (size_t {ARRAY_INDEX} = 0; {ARRAY_INDEX} < {length}; {ARRAY_INDEX}++) {{\n"));
                    body.push_str(&format!("      {inst}.{member}[{ARRAY_INDEX}] = {ARRAY_VIEW}[{ARRAY_INDEX}].{accessor}();\n"));
                    body.push_str("    }\n");
                    body.push_str("  }\n");
                }
                TypeRef::Primitive(kind) => {
                    let accessor = self.accessor(*kind, &path)?;
                    body.push_str(&format!("  {inst}.{member} = {NODE_PARAM}[\"{key}\"].{accessor}();\n"));
                }
            }
        }
        Ok(format!(
            "inline void {DESERIALIZER_FN}(const rapidjson::Value& {NODE_PARAM}, {}& {inst}) {{\n{body}}}\n\n",
            def.name
        ))
    }
}

// ---------------------------- Rendering ----------------------------------- //

pub fn cpp_primitive(kind: Primitive) -> &'static str {
    match kind {
        Primitive::Bool => "bool",
        Primitive::Int => "int",
        Primitive::Float => "float",
        Primitive::String => "std::string",
    }
}

pub fn cpp_type(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Primitive(kind) => cpp_primitive(*kind).to_string(),
        TypeRef::Named(name) => name.clone(),
        TypeRef::FixedArray { element, length } => {
            format!("std::array<{}, {length}>", cpp_primitive(*element))
        }
    }
}

fn declaration(def: &StructDef) -> String {
    let mut out = format!("struct {} {{\n", def.name);
    for field in &def.fields {
        out.push_str(&format!("  {} {};\n", cpp_type(&field.ty), field.member));
    }
    out.push_str("};\n\n");
    out
}

/// `WorkAddr` → `workAddr`, unless that would shadow the node parameter or hit a keyword.
fn instance_name(type_id: &str) -> String {
    let inst = naming::lower_first(type_id);
    if inst == NODE_PARAM || naming::is_reserved_word(&inst) {
        FALLBACK_INSTANCE.to_string()
    } else {
        inst
    }
}

// ------------------------------- Front API -------------------------------- //

pub fn emit(structs: &[StructDef], accessors: &AccessorTable) -> Result<Emitted> {
    let mut cg = Codegen::new(accessors);
    cg.emit(structs)?;
    Ok(cg.into_output())
}

// ------------------------------- Tests ------------------------------------ //
