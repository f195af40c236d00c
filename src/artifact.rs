//! Wraps emitted code into a complete header: preamble, includes, namespaces.
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::codegen::Emitted;

pub const DEFAULT_NAMESPACE: &str = "json_autogenerated_classes";

const INCLUDES: &str = "\
#include <string>
#include <array>

#include \"rapidjson/document.h\"
#include \"rapidjson/writer.h\"
#include \"rapidjson/stringbuffer.h\"
";

static NAMESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$").expect("valid namespace regex")
});

#[derive(Debug, Clone)]
pub struct ArtifactOptions {
    pub namespace: String,
    /// `None` leaves the date out, making the artifact reproducible.
    pub timestamp: Option<NaiveDateTime>,
    pub generator: String,
}

impl Default for ArtifactOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            timestamp: None,
            generator: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// clap value parser for `--namespace`.
pub fn parse_namespace(s: &str) -> Result<String, String> {
    if NAMESPACE_RE.is_match(s) {
        Ok(s.to_string())
    } else {
        Err(format!("`{s}` is not a valid C++ namespace"))
    }
}

pub fn render(emitted: &Emitted, options: &ArtifactOptions) -> String {
    let ns = &options.namespace;
    let mut out = format!("// This file is auto generated by {}\n", options.generator);
    if let Some(ts) = options.timestamp {
        out.push_str(&format!("// Date: {}\n", ts.format("%d/%m/%Y %H:%M:%S")));
    }
    out.push('\n');
    out.push_str(INCLUDES);
    out.push('\n');
    out.push_str(&format!("namespace {ns} {{\n\n"));
    out.push_str(&emitted.declarations);
    out.push_str(&format!("}} // namespace {ns}\n\n"));
    out.push_str(&format!("namespace {ns} {{\n\n"));
    out.push_str(&emitted.deserializers);
    out.push_str(&format!("}} // namespace {ns}\n"));
    out
}
