//! Section validation: structural schema checks plus category integrity.
//!
//! Validation is cumulative. One pass collects every schema violation, every
//! Rust-side shape rule the schema cannot express, and every undeclared
//! category before returning, so contributors editing the JSON by hand can fix
//! a whole batch of mistakes at once.

use crate::catalog::{
    CategoryCode, CategoryDictionary, CategoryMeta, Record, Section, SectionKind, Status,
};
use crate::coverage::CategoryUsage;
use crate::schema_loader::{SectionSchema, pointer_to_path};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Section file missing.
    NotFound,
    /// Section file is not valid JSON.
    ParseError,
    /// Structural mismatch against the section shape.
    SchemaError,
    /// Category used by a record but not declared in `meta.categories`.
    IntegrityError,
    /// Same tool name appears more than once across sections.
    DuplicateWarning,
    /// Category declared but never used.
    UnusedCategoryWarning,
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::DuplicateWarning | IssueKind::UnusedCategoryWarning => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::NotFound => "not found",
            IssueKind::ParseError => "parse error",
            IssueKind::SchemaError => "schema error",
            IssueKind::IntegrityError => "integrity error",
            IssueKind::DuplicateWarning => "duplicate",
            IssueKind::UnusedCategoryWarning => "unused category",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub section: Option<SectionKind>,
    /// Dotted locator inside the section document, e.g. `data[12].categories`.
    pub path: String,
    pub message: String,
    /// Offending category code or duplicated name, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Issue {
    pub fn new(
        kind: IssueKind,
        section: Option<SectionKind>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            section,
            path: path.into(),
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(section) = self.section {
            write!(f, "{section}: ")?;
        }
        write!(f, "{} [{}]: {}", self.path, self.kind.label(), self.message)
    }
}

/// Every issue found while validating one document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationIssues(Vec<Issue>);

impl ValidationIssues {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self(issues)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter().filter(|issue| issue.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter().filter(|issue| !issue.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Issue::is_error)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.0
    }
}

impl fmt::Display for ValidationIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, issue) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {issue}", index + 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationIssues {}

/// A section that passed validation, plus any non-fatal findings.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedSection {
    pub section: Section,
    pub warnings: Vec<Issue>,
}

/// Validate a section document held as text. Syntax errors surface as a
/// single `ParseError` issue.
pub fn validate_str(kind: SectionKind, text: &str) -> Result<ValidatedSection, ValidationIssues> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => validate(kind, &value),
        Err(err) => Err(ValidationIssues::new(vec![Issue::new(
            IssueKind::ParseError,
            Some(kind),
            "(document)",
            format!("invalid JSON: {err}"),
        )])),
    }
}

/// Validate a parsed section document against the bundled schema for `kind`.
pub fn validate(kind: SectionKind, document: &Value) -> Result<ValidatedSection, ValidationIssues> {
    match SectionSchema::cached(kind) {
        Ok(schema) => validate_with_schema(schema, document),
        Err(err) => Err(ValidationIssues::new(vec![Issue::new(
            IssueKind::SchemaError,
            Some(kind),
            "(schema)",
            format!("{err:#}"),
        )])),
    }
}

/// Validate `document` with an already compiled section schema.
pub fn validate_with_schema(
    schema: &SectionSchema,
    document: &Value,
) -> Result<ValidatedSection, ValidationIssues> {
    let kind = schema.kind;
    let mut issues: Vec<Issue> = schema
        .violations(document)
        .into_iter()
        .map(|violation| {
            Issue::new(
                IssueKind::SchemaError,
                Some(kind),
                pointer_to_path(&violation.pointer),
                violation.message,
            )
        })
        .collect();

    let declared = check_dictionary(kind, document, &mut issues);
    let records = document
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    check_records(kind, records, &mut issues);

    let usage = CategoryUsage::from_documents(records);
    if let Some(declared) = &declared {
        check_integrity(kind, declared, &usage, &mut issues);
    }

    debug!(
        section = kind.as_str(),
        records = records.len(),
        issues = issues.len(),
        "validated section document"
    );

    if issues.iter().any(Issue::is_error) {
        return Err(ValidationIssues::new(issues));
    }

    let mut entries = BTreeMap::new();
    for (code, value) in declared.unwrap_or_default() {
        match serde_json::from_value::<CategoryMeta>(value.clone()) {
            Ok(meta) => {
                entries.insert(code, meta);
            }
            Err(err) => issues.push(Issue::new(
                IssueKind::SchemaError,
                Some(kind),
                format!("meta.categories.{}", code.display()),
                err.to_string(),
            )),
        }
    }

    let mut typed = Vec::with_capacity(records.len());
    for (index, value) in records.iter().enumerate() {
        match Record::from_value(kind, value) {
            Ok(record) => typed.push(record),
            Err(err) => issues.push(Issue::new(
                IssueKind::SchemaError,
                Some(kind),
                format!("data[{index}]"),
                format!("{err:#}"),
            )),
        }
    }

    if issues.iter().any(Issue::is_error) {
        return Err(ValidationIssues::new(issues));
    }

    Ok(ValidatedSection {
        section: Section {
            kind,
            categories: CategoryDictionary::new(entries),
            records: typed,
        },
        warnings: issues,
    })
}

/// Status-typed keys of each section shape.
fn status_keys(kind: SectionKind) -> &'static [&'static str] {
    match kind {
        SectionKind::IndexedInternet | SectionKind::ArchivedWeb => {
            &["API", "open_source", "accessibility"]
        }
        SectionKind::NetworkDevices => &["API", "services", "CVE", "maintained"],
        SectionKind::DomainsIps => &["API", "open_source", "accessibility", "maintained"],
        SectionKind::Darknet | SectionKind::SocialNetworks | SectionKind::Mixed => {
            &["API", "maintained"]
        }
        SectionKind::SearchEngines => &["API"],
    }
}

// Returns the declared dictionary keyed by canonical code, or None when
// `meta.categories` is not an object (the schema already reported that).
fn check_dictionary<'a>(
    kind: SectionKind,
    document: &'a Value,
    issues: &mut Vec<Issue>,
) -> Option<BTreeMap<CategoryCode, &'a Value>> {
    let declared = document.pointer("/meta/categories")?.as_object()?;
    let mut by_code: BTreeMap<CategoryCode, &Value> = BTreeMap::new();
    let mut spelling: BTreeMap<CategoryCode, &str> = BTreeMap::new();
    for (key, value) in declared {
        let code = CategoryCode::new(key);
        if code.as_str().is_empty() {
            issues.push(Issue::new(
                IssueKind::SchemaError,
                Some(kind),
                "meta.categories",
                "category codes must not be empty",
            ));
            continue;
        }
        if let Some(previous) = spelling.get(&code) {
            issues.push(
                Issue::new(
                    IssueKind::SchemaError,
                    Some(kind),
                    format!("meta.categories.{key}"),
                    format!("category '{key}' duplicates '{previous}' (codes are case-insensitive)"),
                )
                .with_code(code.as_str()),
            );
            continue;
        }
        spelling.insert(code.clone(), key.as_str());
        by_code.insert(code, value);
    }
    Some(by_code)
}

fn check_records(kind: SectionKind, records: &[Value], issues: &mut Vec<Issue>) {
    for (index, record) in records.iter().enumerate() {
        for key in status_keys(kind) {
            let Some(raw) = record.get(*key).and_then(Value::as_str) else {
                continue;
            };
            if !raw.trim().is_empty() && Status::parse(raw).is_none() {
                issues.push(Issue::new(
                    IssueKind::SchemaError,
                    Some(kind),
                    format!("data[{index}].{key}"),
                    format!("unrecognized status '{raw}' (expected yes, no, partial or unknown)"),
                ));
            }
        }
    }
}

fn check_integrity(
    kind: SectionKind,
    declared: &BTreeMap<CategoryCode, &Value>,
    usage: &CategoryUsage,
    issues: &mut Vec<Issue>,
) {
    for (code, entry) in usage.iter() {
        if declared.contains_key(code) {
            continue;
        }
        let count = entry.records.len();
        let noun = if count == 1 { "record" } else { "records" };
        if code.as_str().is_empty() {
            issues.push(Issue::new(
                IssueKind::IntegrityError,
                Some(kind),
                entry.first_path.clone(),
                format!("blank category code used by {count} {noun}"),
            ));
            continue;
        }
        issues.push(
            Issue::new(
                IssueKind::IntegrityError,
                Some(kind),
                entry.first_path.clone(),
                format!(
                    "unknown category '{}' used by {count} {noun}; all categories must be declared in meta.categories",
                    entry.spelling
                ),
            )
            .with_code(code.as_str()),
        );
    }

    for code in declared.keys() {
        if usage.get(code).is_none() {
            issues.push(
                Issue::new(
                    IssueKind::UnusedCategoryWarning,
                    Some(kind),
                    format!("meta.categories.{}", code.display()),
                    format!("category '{}' is declared but never used", code.display()),
                )
                .with_code(code.as_str()),
            );
        }
    }
}
