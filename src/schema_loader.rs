//! Section schema loading and compilation.
//!
//! All section files share one JSON Schema document
//! (`schema/section_file.schema.json`) holding a record definition per
//! section shape. Before compiling, the loader patches the `data` items slot to
//! reference the definition of the requested section, so every compiled
//! validator is closed over exactly one record shape.

use crate::catalog::SectionKind;
use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::{Value, json};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Schema document compiled into the crate.
pub const BUNDLED_SECTION_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schema/section_file.schema.json"
));

/// Where the per-section record schema is spliced in.
const RECORD_ITEMS_POINTER: &str = "/properties/data/items";

/// A schema violation located by JSON pointer into the validated document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaViolation {
    pub pointer: String,
    pub message: String,
}

/// Compiled validator for one section shape.
pub struct SectionSchema {
    pub kind: SectionKind,
    compiled: JSONSchema,
    raw: Arc<Value>,
}

impl std::fmt::Debug for SectionSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionSchema")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl SectionSchema {
    /// Compile the bundled schema for `kind`.
    pub fn bundled(kind: SectionKind) -> Result<Self> {
        let value: Value = serde_json::from_str(BUNDLED_SECTION_SCHEMA)
            .context("parsing bundled section schema")?;
        Self::from_value(value, kind)
    }

    /// The bundled schema for `kind`, compiled once per process.
    pub fn cached(kind: SectionKind) -> Result<&'static Self> {
        static COMPILED: [OnceLock<Result<SectionSchema, String>>; SectionKind::ALL.len()] =
            [const { OnceLock::new() }; SectionKind::ALL.len()];
        COMPILED[kind as usize]
            .get_or_init(|| Self::bundled(kind).map_err(|err| format!("{err:#}")))
            .as_ref()
            .map_err(|err| anyhow!("{err}"))
    }

    /// Compile an on-disk schema document for `kind`.
    pub fn load(path: &Path, kind: SectionKind) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing schema {}", path.display()))?;
        Self::from_value(value, kind).with_context(|| format!("loading schema {}", path.display()))
    }

    pub fn from_value(mut schema: Value, kind: SectionKind) -> Result<Self> {
        let definition = kind.record_definition();
        if schema
            .pointer(&format!("/definitions/{definition}"))
            .is_none()
        {
            bail!("schema has no record definition '{definition}'");
        }

        let target = schema.pointer_mut(RECORD_ITEMS_POINTER).ok_or_else(|| {
            anyhow!("schema missing pointer {RECORD_ITEMS_POINTER} for record items")
        })?;
        *target = json!({ "$ref": format!("#/definitions/{definition}") });

        let raw = Arc::new(schema);
        let compiled = JSONSchema::compile(&raw)
            .map_err(|err| anyhow!("compiling {} section schema: {err}", kind.as_str()))?;

        Ok(Self {
            kind,
            compiled,
            raw,
        })
    }

    /// Every violation of `instance`, in the order the validator reports them.
    pub fn violations(&self, instance: &Value) -> Vec<SchemaViolation> {
        match self.compiled.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|err| SchemaViolation {
                    pointer: err.instance_path.to_string(),
                    message: err.to_string(),
                })
                .collect(),
        }
    }

    /// The patched schema document the validator was compiled from.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Render a JSON pointer as a dotted path with indices: `/data/12/tool`
/// becomes `data[12].tool`.
pub fn pointer_to_path(pointer: &str) -> String {
    let mut path = String::new();
    for segment in pointer.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
            path.push_str(&format!("[{segment}]"));
        } else {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&segment);
        }
    }
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_paths_use_index_notation() {
        assert_eq!(pointer_to_path("/data/12/categories"), "data[12].categories");
        assert_eq!(pointer_to_path("/data/0/categories/1"), "data[0].categories[1]");
        assert_eq!(pointer_to_path("/meta/categories/a~1b"), "meta.categories.a/b");
        assert_eq!(pointer_to_path(""), "(root)");
    }

    #[test]
    fn bundled_schema_compiles_for_every_section() {
        for kind in SectionKind::ALL {
            let schema = SectionSchema::bundled(kind).expect("bundled schema compiles");
            let items = schema.raw().pointer(RECORD_ITEMS_POINTER).unwrap();
            assert_eq!(
                items["$ref"],
                format!("#/definitions/{}_record", kind.as_str())
            );
        }
    }

    #[test]
    fn cached_schema_is_compiled_once_per_section() {
        for kind in SectionKind::ALL {
            let first = SectionSchema::cached(kind).unwrap();
            let second = SectionSchema::cached(kind).unwrap();
            assert!(std::ptr::eq(first, second));
            assert_eq!(first.kind, kind);
        }
    }

    #[test]
    fn loads_schema_override_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("section.schema.json");
        std::fs::write(&path, BUNDLED_SECTION_SCHEMA).unwrap();
        let schema = SectionSchema::load(&path, SectionKind::Mixed).unwrap();
        assert_eq!(schema.kind, SectionKind::Mixed);

        std::fs::write(&path, "{").unwrap();
        let err = SectionSchema::load(&path, SectionKind::Mixed).unwrap_err();
        assert!(format!("{err:#}").contains("parsing schema"));
    }

    #[test]
    fn rejects_schema_without_record_definition() {
        let err = SectionSchema::from_value(json!({"definitions": {}}), SectionKind::Mixed)
            .expect_err("missing definition should fail");
        assert!(err.to_string().contains("mixed_record"));
    }

    #[test]
    fn reports_missing_required_record_fields() {
        let schema = SectionSchema::bundled(SectionKind::Darknet).unwrap();
        let violations = schema.violations(&json!({
            "meta": {"categories": {"SE": {"name": "Search"}}},
            "data": [{"tool": "Ahmia", "categories": ["SE"], "API": null}]
        }));
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert_eq!(violations[0].pointer, "/data/0");
        assert!(violations[0].message.contains("maintained"));
    }
}
