//! Minimal CLI: sample JSON → (schema | cpp)
use std::io::Read;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::Value;
use tracing::info;

use crate::artifact::{self, ArtifactOptions};
use crate::codegen::{AccessorOverride, AccessorTable};
use crate::GenerateOptions;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer nested structs from one sample JSON document and emit C++ types with rapidjson deserializers
#[derive(Parser, Debug)]
#[command(name = "json-structgen", version)]
pub struct CommandLineInterface {
    /// more logging on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and print the struct list (innermost first) as JSON
    Schema(SchemaOut),
    /// infer and emit a C++ header
    Cpp(CppOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// sample JSON document, or '-' for stdin
    #[arg(long, short)]
    input: String,

    /// JSON Pointer to select the sample inside the document (e.g. /data/items/0)
    #[arg(long)]
    json_pointer: Option<String>,

    /// name of the struct synthesized for the document root
    #[arg(long, default_value = crate::inference::DEFAULT_ROOT_TYPE)]
    root_type: String,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct CppOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// namespace wrapping the generated code
    #[arg(long, default_value = artifact::DEFAULT_NAMESPACE, value_parser = artifact::parse_namespace)]
    namespace: String,

    /// override a rapidjson accessor, e.g. `--accessor int=GetInt64` (repeatable)
    #[arg(long = "accessor", value_name = "KIND=METHOD")]
    accessors: Vec<AccessorOverride>,

    /// leave the generation date out of the preamble
    #[arg(long)]
    no_timestamp: bool,

    /// output .hpp file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Value> {
        let source = if self.input == "-" {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read sample from stdin")?;
            source
        } else {
            std::fs::read_to_string(&self.input)
                .with_context(|| format!("failed to read source file {}", self.input))?
        };
        let json_value = serde_json::from_str::<Value>(&source)
            .with_context(|| format!("failed to parse JSON source file ({})", self.input))?;
        match self.json_pointer.as_ref() {
            None => Ok(json_value),
            Some(pointer) => json_value
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| anyhow!("JSON pointer `{pointer}` selects nothing in {}", self.input)),
        }
    }

    fn generate_options(&self, overrides: &[AccessorOverride]) -> GenerateOptions {
        let mut accessors = AccessorTable::rapidjson();
        accessors.apply(overrides);
        GenerateOptions { root_type: self.root_type.clone(), accessors }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Schema(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let document = target.input_settings.load()?;
                let options = target.input_settings.generate_options(&[]);
                let structs = crate::infer_structs(&document, &options)
                    .with_context(|| format!("failed to infer schema from {}", target.input_settings.input))?;
                info!(structs = structs.len(), "inferred schema");
                let schema_src = serde_json::to_string_pretty(&structs)?;
                write_output(target.out.as_ref(), &schema_src)
            }
            Command::Cpp(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let document = target.input_settings.load()?;
                let options = target.input_settings.generate_options(&target.accessors);
                let emitted = crate::generate(&document, &options)
                    .with_context(|| format!("failed to generate code from {}", target.input_settings.input))?;
                let artifact_options = ArtifactOptions {
                    namespace: target.namespace.clone(),
                    timestamp: (!target.no_timestamp).then(|| chrono::Local::now().naive_local()),
                    ..ArtifactOptions::default()
                };
                let header = artifact::render(&emitted, &artifact_options);
                info!(bytes = header.len(), "generated header");
                write_output(target.out.as_ref(), &header)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&PathBuf>, text: &str) -> Result<()> {
    let Some(out) = out else {
        println!("{text}");
        return Ok(());
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))?;
    info!(path = %out.display(), "wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file(dir: &tempfile::TempDir, source: &str) -> String {
        let path = dir.path().join("db.json");
        std::fs::write(&path, source).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn run(args: &[&str]) -> Result<()> {
        let cli = CommandLineInterface::try_parse_from(
            std::iter::once("json-structgen").chain(args.iter().copied()),
        )?;
        cli.run()
    }

    #[test]
    fn cpp_writes_header_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = sample_file(&dir, r#"{"user": {"id": 1, "name": "Ann"}, "scores": [1, 2, 3]}"#);
        let out = dir.path().join("gen/generated.hpp");
        run(&["cpp", "--input", &input, "--out", out.to_str().unwrap(), "--no-timestamp"]).unwrap();

        let header = std::fs::read_to_string(&out).unwrap();
        assert!(header.starts_with("// This file is auto generated by json-structgen\n\n#include <string>"));
        assert!(header.contains("struct User {\n  int id;\n  std::string name;\n};"));
        assert!(header.contains("struct Root {\n  User user;\n  std::array<int, 3> scores;\n};"));
        assert!(header.contains("  user.id = json[\"id\"].GetInt();"));
    }

    #[test]
    fn cpp_respects_pointer_namespace_and_accessors() {
        let dir = tempfile::tempdir().unwrap();
        let input = sample_file(&dir, r#"{"data": {"count": 3}}"#);
        let out = dir.path().join("out.hpp");
        run(&[
            "cpp", "--input", &input, "--out", out.to_str().unwrap(),
            "--json-pointer", "/data",
            "--namespace", "app::model",
            "--root-type", "Payload",
            "--accessor", "int=GetInt64",
        ])
        .unwrap();

        let header = std::fs::read_to_string(&out).unwrap();
        assert!(header.contains("// Date: "));
        assert!(header.contains("namespace app::model {"));
        assert!(header.contains("struct Payload {\n  int count;\n};"));
        assert!(header.contains("payload.count = json[\"count\"].GetInt64();"));
    }

    #[test]
    fn schema_writes_struct_list() {
        let dir = tempfile::tempdir().unwrap();
        let input = sample_file(&dir, r#"{"user": {"id": 1}}"#);
        let out = dir.path().join("schema.json");
        run(&["schema", "--input", &input, "--out", out.to_str().unwrap()]).unwrap();

        let schema: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(schema[0]["name"], "User");
        assert_eq!(schema[0]["path"], serde_json::json!(["user"]));
        assert_eq!(schema[0]["fields"][0]["ty"], serde_json::json!({"primitive": "int"}));
        assert_eq!(schema[1]["name"], "Root");
    }

    #[test]
    fn generation_errors_carry_the_field_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = sample_file(&dir, r#"{"tags": []}"#);
        let err = run(&["cpp", "--input", &input, "--no-timestamp", "--out", dir.path().join("x.hpp").to_str().unwrap()])
            .unwrap_err();
        let root = err.downcast_ref::<crate::GenError>().expect("generation error in chain");
        assert_eq!(root.path().to_string(), "tags");
        assert!(!dir.path().join("x.hpp").exists());
    }

    #[test]
    fn bad_inputs_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = sample_file(&dir, "{not json");
        assert!(run(&["schema", "--input", &input]).is_err());
        assert!(run(&["schema", "--input", dir.path().join("missing.json").to_str().unwrap()]).is_err());

        let input = sample_file(&dir, r#"{"a": 1}"#);
        let err = run(&["schema", "--input", &input, "--json-pointer", "/nope"]).unwrap_err();
        assert!(err.to_string().contains("/nope"), "{err}");
    }

    #[test]
    fn invalid_flags_are_rejected_by_clap() {
        assert!(CommandLineInterface::try_parse_from(["json-structgen", "cpp", "--input", "x", "--namespace", "1bad"]).is_err());
        assert!(CommandLineInterface::try_parse_from(["json-structgen", "cpp", "--input", "x", "--accessor", "double=GetDouble"]).is_err());
        let cli = CommandLineInterface::try_parse_from(["json-structgen", "-vv", "schema", "--input", "x"]).unwrap();
        assert_eq!(cli.verbosity(), 2);
    }
}
