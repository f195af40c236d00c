//! Schema inference from a single sample document.
//!
//! Walk the sample depth-first, infer a [`TypeRef`] for every field, and close
//! one [`StructDef`] per object. Structs are appended when their object
//! closes, so the finished list is innermost-first: every `Named` reference
//! points at an earlier entry.
//!
//! The document root becomes an implicit struct (default name `Root`). Its
//! name is reserved before traversal and sits at the bottom of the scope
//! stack, so a top-level key can always fall back to a `Root`-qualified name.
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{GenError, Result, ValueSite};
use crate::ir::{Field, FieldPath, Primitive, StructDef, TypeRef};
use crate::naming;
use crate::sample::SampleValue;
use crate::scope::NamingContext;

pub const DEFAULT_ROOT_TYPE: &str = "Root";

// ------------------------------ State ------------------------------------- //

/// One generation run. Consumed by [`SchemaTreeBuilder::build`].
#[derive(Debug)]
pub struct SchemaTreeBuilder {
    root_type: String,
    names: NamingContext,
    path: FieldPath,
    finished: Vec<StructDef>,
}

impl SchemaTreeBuilder {
    pub fn new(root_type: impl Into<String>) -> Self {
        Self {
            root_type: root_type.into(),
            names: NamingContext::new(),
            path: FieldPath::root(),
            finished: Vec::new(),
        }
    }

    /// Ordered struct list for `document`, innermost first, root last.
    pub fn build(mut self, document: &SampleValue) -> Result<Vec<StructDef>> {
        naming::check_type_identifier(&self.root_type, &FieldPath::root())?;
        let SampleValue::Mapping(map) = document else {
            return Err(GenError::UnsupportedElementType {
                path: FieldPath::root(),
                kind: document.kind(),
                site: ValueSite::Document,
            });
        };

        let root_type = self.root_type.clone();
        for taken in naming::RESERVED_TYPE_IDS {
            self.names.reserve(*taken);
        }
        self.names.reserve(root_type.clone());
        self.names.push_scope(root_type.clone());
        let fields = self.collect_fields(map)?;
        self.names.pop_scope();

        debug!(type_id = %root_type, fields = fields.len(), "closed root struct");
        self.finished.push(StructDef { name: root_type, path: FieldPath::root(), fields });
        Ok(self.finished)
    }

    // ------------------------------ Observe ------------------------------- //

    fn collect_fields(&mut self, map: &IndexMap<String, SampleValue>) -> Result<Vec<Field>> {
        let mut fields = Vec::with_capacity(map.len());
        for (key, value) in map {
            self.path.push(key.as_str());
            let field = self.infer_field(key, value);
            self.path.pop();
            fields.push(field?);
        }
        Ok(fields)
    }

    fn infer_field(&mut self, key: &str, value: &SampleValue) -> Result<Field> {
        let member = naming::checked_member_name(key, &self.path)?;
        let ty = match value {
            SampleValue::Mapping(child) => TypeRef::Named(self.close_object(key, child)?),
            SampleValue::Text(_) => TypeRef::Primitive(Primitive::String),
            SampleValue::Sequence(items) => self.infer_sequence(items)?,
            SampleValue::Bool(_) => TypeRef::Primitive(Primitive::Bool),
            SampleValue::Number(n) if n.is_integer() => TypeRef::Primitive(Primitive::Int),
            SampleValue::Number(_) => TypeRef::Primitive(Primitive::Float),
            SampleValue::Null => {
                return Err(GenError::UnsupportedElementType {
                    path: self.path.clone(),
                    kind: value.kind(),
                    site: ValueSite::Field,
                });
            }
        };
        Ok(Field { ty, member })
    }

    /// Opens a scope for `key`, collects the object's fields, then names and
    /// appends its struct. Children close (and claim names) before parents.
    fn close_object(&mut self, key: &str, map: &IndexMap<String, SampleValue>) -> Result<String> {
        let scope = naming::checked_type_name(key, &self.path)?;
        self.names.push_scope(scope);
        debug!(path = %self.path, scopes = ?self.names.scopes(), "opened object");
        let closed = match self.collect_fields(map) {
            Ok(fields) => self.names.allocate(&self.path).map(|name| (name, fields)),
            Err(err) => Err(err),
        };
        self.names.pop_scope();
        let (name, fields) = closed?;

        debug!(path = %self.path, type_id = %name, fields = fields.len(), "closed struct");
        self.finished.push(StructDef { name: name.clone(), path: self.path.clone(), fields });
        Ok(name)
    }

    /// Element type comes from the first sample; length is baked in.
    fn infer_sequence(&self, items: &[SampleValue]) -> Result<TypeRef> {
        let Some(first) = items.first() else {
            return Err(GenError::EmptySequence { path: self.path.clone() });
        };
        let element = first.primitive().ok_or_else(|| GenError::UnsupportedElementType {
            path: self.path.clone(),
            kind: first.kind(),
            site: ValueSite::SequenceElement,
        })?;
        if let Some((index, odd)) = items.iter().enumerate().skip(1).find(|(_, item)| item.primitive() != Some(element)) {
            warn!(
                path = %self.path,
                index,
                expected = %element,
                found = %odd.kind(),
                "array is not homogeneous; element type taken from the first sample"
            );
        }
        Ok(TypeRef::FixedArray { element, length: items.len() })
    }
}

// ------------------------------- Front API -------------------------------- //

pub fn build(document: &SampleValue, root_type: &str) -> Result<Vec<StructDef>> {
    SchemaTreeBuilder::new(root_type).build(document)
}

// ------------------------------- Tests ------------------------------------ //
