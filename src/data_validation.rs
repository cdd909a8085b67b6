//! Whole-catalog validation used by `validate-data`.
//!
//! Every section file is attempted even after an earlier one fails, so a
//! single run reports everything that needs fixing. Names that repeat across
//! the sections that did validate are reported as warnings.

use crate::catalog::{CatalogRepository, DuplicateName, SectionKind};
use crate::validation::{Issue, IssueKind, validate_str};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One section document to validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionFile {
    pub kind: SectionKind,
    pub path: PathBuf,
}

impl SectionFile {
    pub fn in_dir(dir: &Path, kind: SectionKind) -> Self {
        Self {
            kind,
            path: dir.join(kind.file_name()),
        }
    }
}

/// The standard eight section files under `dir`.
pub fn section_files(dir: &Path) -> Vec<SectionFile> {
    SectionKind::ALL
        .into_iter()
        .map(|kind| SectionFile::in_dir(dir, kind))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub section: SectionKind,
    pub path: String,
    /// Record count when the section validated.
    pub records: Option<usize>,
    /// Declared category codes, upper-cased, when the section validated.
    pub categories: Vec<String>,
    pub errors: usize,
    pub warnings: usize,
}

impl SectionReport {
    pub fn is_valid(&self) -> bool {
        self.errors == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationRun {
    pub ok: bool,
    pub sections: Vec<SectionReport>,
    pub issues: Vec<Issue>,
    pub duplicates: Vec<DuplicateName>,
    pub total_records: usize,
}

impl ValidationRun {
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|issue| issue.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }

    /// 1 when any error-class issue was found, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.ok { 0 } else { 1 }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for report in &self.sections {
            match report.records {
                Some(count) => {
                    let _ = writeln!(out, "{}: {count} records", report.section);
                    if !report.categories.is_empty() {
                        let _ = writeln!(out, "  categories: {}", report.categories.join(", "));
                    }
                }
                None => {
                    let _ = writeln!(
                        out,
                        "{}: FAILED ({} error(s)) {}",
                        report.section, report.errors, report.path
                    );
                }
            }
            let section_issues = self
                .issues
                .iter()
                .filter(|issue| issue.section == Some(report.section));
            for (index, issue) in section_issues.enumerate() {
                let _ = writeln!(
                    out,
                    "  {}. {} [{}]: {}",
                    index + 1,
                    issue.path,
                    issue.kind.label(),
                    issue.message
                );
            }
        }

        if !self.duplicates.is_empty() {
            let _ = writeln!(out, "\nwarning: duplicate tool names across sections:");
            for duplicate in &self.duplicates {
                let sections: Vec<&str> = duplicate.sections.iter().map(|kind| kind.as_str()).collect();
                let _ = writeln!(out, "  - {} ({})", duplicate.name, sections.join(", "));
            }
        }

        let _ = writeln!(out, "\ntotal records: {}", self.total_records);
        if self.ok {
            let _ = writeln!(
                out,
                "all {} sections valid ({} warning(s))",
                self.sections.len(),
                self.warning_count()
            );
        } else {
            let _ = writeln!(
                out,
                "validation failed: {} error(s), {} warning(s)",
                self.error_count(),
                self.warning_count()
            );
        }
        out
    }
}

/// Validate every file, cross-check names, and summarize.
pub fn run_validation(files: &[SectionFile]) -> ValidationRun {
    let mut repository = CatalogRepository::default();
    let mut sections = Vec::with_capacity(files.len());
    let mut issues = Vec::new();

    for file in files {
        let (report, found) = validate_file(file, &mut repository);
        debug!(
            section = %file.kind,
            errors = report.errors,
            warnings = report.warnings,
            "section checked"
        );
        sections.push(report);
        issues.extend(found);
    }

    let duplicates = repository.duplicate_names();
    for duplicate in &duplicates {
        let sections: Vec<&str> = duplicate.sections.iter().map(|kind| kind.as_str()).collect();
        issues.push(
            Issue::new(
                IssueKind::DuplicateWarning,
                None,
                "tool",
                format!(
                    "'{}' appears {} times across sections: {}",
                    duplicate.name,
                    duplicate.sections.len(),
                    sections.join(", ")
                ),
            )
            .with_code(duplicate.name.clone()),
        );
    }

    let total_records = repository.total_records();
    let ok = !issues.iter().any(Issue::is_error);
    info!(total_records, issues = issues.len(), ok, "validation finished");
    ValidationRun {
        ok,
        sections,
        issues,
        duplicates,
        total_records,
    }
}

fn validate_file(file: &SectionFile, repository: &mut CatalogRepository) -> (SectionReport, Vec<Issue>) {
    let mut report = SectionReport {
        section: file.kind,
        path: file.path.display().to_string(),
        records: None,
        categories: Vec::new(),
        errors: 0,
        warnings: 0,
    };

    let text = match fs::read_to_string(&file.path) {
        Ok(text) => text,
        Err(err) => {
            let message = if err.kind() == ErrorKind::NotFound {
                format!("section file not found: {}", file.path.display())
            } else {
                format!("unable to read {}: {err}", file.path.display())
            };
            report.errors = 1;
            return (
                report,
                vec![Issue::new(IssueKind::NotFound, Some(file.kind), "(file)", message)],
            );
        }
    };

    match validate_str(file.kind, &text) {
        Ok(validated) => {
            report.records = Some(validated.section.records.len());
            report.categories = validated
                .section
                .categories
                .codes()
                .map(|code| code.display())
                .collect();
            report.warnings = validated.warnings.len();
            repository.register(validated.section);
            (report, validated.warnings)
        }
        Err(found) => {
            report.errors = found.errors().count();
            report.warnings = found.warnings().count();
            (report, found.into_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, kind: SectionKind, value: serde_json::Value) {
        fs::write(dir.join(kind.file_name()), value.to_string()).unwrap();
    }

    #[test]
    fn missing_and_broken_files_do_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("darknet.json"), "{ nope").unwrap();
        write(
            dir.path(),
            SectionKind::SearchEngines,
            json!({
                "meta": {"categories": {"GEN": {"name": "General"}}},
                "data": [{"tool": "Google", "categories": ["GEN"], "API": true}]
            }),
        );
        let files = vec![
            SectionFile::in_dir(dir.path(), SectionKind::Mixed),
            SectionFile::in_dir(dir.path(), SectionKind::Darknet),
            SectionFile::in_dir(dir.path(), SectionKind::SearchEngines),
        ];
        let run = run_validation(&files);
        assert_eq!(run.exit_code(), 1);
        let kinds: Vec<IssueKind> = run.issues.iter().map(|issue| issue.kind).collect();
        assert_eq!(kinds, vec![IssueKind::NotFound, IssueKind::ParseError]);
        assert_eq!(run.sections[2].records, Some(1));
        assert_eq!(run.total_records, 1);
        let text = run.render_text();
        assert!(text.contains("search_engines: 1 records"));
        assert!(text.contains("mixed: FAILED"));
    }

    #[test]
    fn duplicates_across_sections_are_warnings() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            SectionKind::SearchEngines,
            json!({
                "meta": {"categories": {"IOT": {"name": "Devices"}}},
                "data": [{"tool": "Shodan", "categories": ["IOT"], "API": true}]
            }),
        );
        write(
            dir.path(),
            SectionKind::Mixed,
            json!({
                "meta": {"categories": {"IOT": {"name": "Devices"}}},
                "data": [{"tool": " shodan", "categories": ["iot"], "API": true, "maintained": true}]
            }),
        );
        let files = vec![
            SectionFile::in_dir(dir.path(), SectionKind::SearchEngines),
            SectionFile::in_dir(dir.path(), SectionKind::Mixed),
        ];
        let run = run_validation(&files);
        assert_eq!(run.exit_code(), 0);
        assert_eq!(run.total_records, 2);
        assert_eq!(run.duplicates.len(), 1);
        let warning = &run.issues[0];
        assert_eq!(warning.kind, IssueKind::DuplicateWarning);
        assert_eq!(warning.code.as_deref(), Some("shodan"));
        assert!(run.render_text().contains("shodan (search_engines, mixed)"));

        let report = serde_json::to_value(&run).unwrap();
        assert_eq!(report["ok"], json!(true));
        assert_eq!(report["issues"][0]["kind"], json!("duplicate_warning"));
        assert_eq!(report["sections"][1]["section"], json!("mixed"));
    }

    #[test]
    fn undeclared_category_fails_the_section() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            SectionKind::Darknet,
            json!({
                "meta": {"categories": {"SE": {"name": "Search"}}},
                "data": [{"tool": "Ahmia", "categories": ["Z"], "API": null, "maintained": true}]
            }),
        );
        let run = run_validation(&[SectionFile::in_dir(dir.path(), SectionKind::Darknet)]);
        assert_eq!(run.exit_code(), 1);
        let integrity: Vec<&Issue> = run
            .issues
            .iter()
            .filter(|issue| issue.kind == IssueKind::IntegrityError)
            .collect();
        assert_eq!(integrity.len(), 1);
        assert_eq!(integrity[0].path, "data[0].categories[0]");
        assert_eq!(run.total_records, 0);
    }
}
