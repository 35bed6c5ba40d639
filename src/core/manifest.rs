//! Dependency manifest (`requirements.txt` style) parser and linter.
//!
//! One requirement per line, `#` starts a comment. Comment lines between
//! entries act as section headings. A comment whose body is itself a
//! versioned requirement is a commented-out (pending) entry.

use crate::utils::error::{CutListError, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

static NAME_AND_EXTRAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[(?P<extras>[^\]]*)\])?\s*(?P<rest>.*)$")
        .expect("requirement name pattern is valid")
});

static CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<op>===|==|>=|<=|~=|!=|>|<)\s*(?P<version>[A-Za-z0-9*+!._-]+)\s*$")
        .expect("version clause pattern is valid")
});

static INLINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+#").expect("inline comment pattern is valid"));

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("separator pattern is valid"));

/// Modules that ship with the Python runtime and are never installed from an index.
const STDLIB_MODULES: &[&str] = &[
    "argparse", "asyncio", "collections", "concurrent", "csv", "datetime", "decimal", "email",
    "functools", "gzip", "hashlib", "http", "io", "itertools", "json", "logging", "math",
    "multiprocessing", "os", "pathlib", "pickle", "random", "re", "shutil", "sqlite3",
    "statistics", "subprocess", "sys", "tempfile", "threading", "time", "tkinter", "typing",
    "unittest", "urllib", "uuid", "xml", "zipfile",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionClause {
    pub op: String,
    pub version: String,
}

impl fmt::Display for VersionClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub name: String,
    pub extras: Vec<String>,
    pub clauses: Vec<VersionClause>,
    pub marker: Option<String>,
    /// 1-based line number in the manifest.
    pub line: usize,
    pub section: Option<String>,
    pub note: Option<String>,
}

impl Requirement {
    /// Lowercase with runs of `-`, `_` and `.` collapsed to a single `-`.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn is_pinned(&self) -> bool {
        !self.clauses.is_empty()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        let clauses: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        f.write_str(&clauses.join(","))?;
        if let Some(marker) = &self.marker {
            write!(f, "; {}", marker)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidLine {
    pub line: usize,
    pub content: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    /// Section headings that have at least one entry, in file order.
    pub sections: Vec<String>,
    pub requirements: Vec<Requirement>,
    pub commented_out: Vec<Requirement>,
    pub invalid: Vec<InvalidLine>,
}

pub fn normalize_name(name: &str) -> String {
    SEPARATORS.replace_all(&name.to_lowercase(), "-").into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub name: String,
    pub extras: Vec<String>,
    pub clauses: Vec<VersionClause>,
    pub marker: Option<String>,
}

impl Specifier {
    fn at(self, line: usize, section: &Option<String>, note: Option<String>) -> Requirement {
        Requirement {
            name: self.name,
            extras: self.extras,
            clauses: self.clauses,
            marker: self.marker,
            line,
            section: section.clone(),
            note,
        }
    }
}

/// Parses a single requirement specifier such as `pandas[excel]>=2.0,<3; python_version>"3.9"`.
pub fn parse_requirement(spec: &str) -> std::result::Result<Specifier, String> {
    let (spec, marker) = match spec.split_once(';') {
        Some((spec, marker)) => (spec.trim(), Some(marker.trim().to_string())),
        None => (spec.trim(), None),
    };
    if spec.is_empty() {
        return Err("empty requirement".to_string());
    }

    let caps = NAME_AND_EXTRAS
        .captures(spec)
        .ok_or_else(|| format!("'{}' does not start with a package name", spec))?;

    let name = caps["name"].to_string();
    let extras = caps
        .name("extras")
        .map(|m| {
            m.as_str()
                .split(',')
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let rest = caps["rest"].trim();
    let mut clauses = Vec::new();
    if !rest.is_empty() {
        for clause in rest.split(',') {
            let c = CLAUSE
                .captures(clause)
                .ok_or_else(|| format!("invalid version clause '{}'", clause.trim()))?;
            clauses.push(VersionClause {
                op: c["op"].to_string(),
                version: c["version"].to_string(),
            });
        }
    }

    Ok(Specifier {
        name,
        extras,
        clauses,
        marker,
    })
}

fn split_note(text: &str) -> (&str, Option<String>) {
    match INLINE_COMMENT.find(text) {
        Some(m) => {
            let note = text[m.end()..].trim();
            let note = (!note.is_empty()).then(|| note.to_string());
            (text[..m.start()].trim(), note)
        }
        None => (text.trim(), None),
    }
}

fn note_section(manifest: &mut Manifest, section: &Option<String>) {
    if let Some(title) = section {
        if manifest.sections.last() != Some(title) {
            manifest.sections.push(title.clone());
        }
    }
}

pub fn parse_manifest(text: &str) -> Manifest {
    let mut manifest = Manifest::default();
    let mut current_section: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(body) = line.strip_prefix('#') {
            let body = body.trim().trim_start_matches('#').trim();
            if body.is_empty() {
                continue;
            }
            let (spec, note) = split_note(body);
            if let Ok(specifier) = parse_requirement(spec) {
                if !specifier.clauses.is_empty() {
                    note_section(&mut manifest, &current_section);
                    manifest
                        .commented_out
                        .push(specifier.at(line_no, &current_section, note));
                    continue;
                }
            }
            current_section = Some(body.to_string());
            continue;
        }

        // pip options (-r, -e, --index-url) are not package requirements
        if line.starts_with('-') {
            manifest.invalid.push(InvalidLine {
                line: line_no,
                content: line.to_string(),
                reason: "installer options are not supported".to_string(),
            });
            continue;
        }

        let (spec, note) = split_note(line);
        match parse_requirement(spec) {
            Ok(specifier) => {
                note_section(&mut manifest, &current_section);
                manifest
                    .requirements
                    .push(specifier.at(line_no, &current_section, note));
            }
            Err(reason) => manifest.invalid.push(InvalidLine {
                line: line_no,
                content: line.to_string(),
                reason,
            }),
        }
    }

    manifest
}

pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| CutListError::ManifestError {
        message: format!("cannot read {}: {}", path.display(), e),
    })?;
    Ok(parse_manifest(&content))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum LintLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for LintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LintLevel::Info => "info",
            LintLevel::Warning => "warning",
            LintLevel::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LintKind {
    InvalidSpecifier,
    DuplicateRequirement,
    StdlibModule,
    PendingEntry,
    UnpinnedRequirement,
}

impl LintKind {
    pub fn level(&self) -> LintLevel {
        match self {
            LintKind::InvalidSpecifier => LintLevel::Error,
            LintKind::DuplicateRequirement | LintKind::StdlibModule => LintLevel::Warning,
            LintKind::PendingEntry | LintKind::UnpinnedRequirement => LintLevel::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintFinding {
    pub line: usize,
    pub kind: LintKind,
    pub level: LintLevel,
    pub message: String,
}

impl fmt::Display for LintFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.level, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintReport {
    pub findings: Vec<LintFinding>,
    pub requirement_count: usize,
    pub section_count: usize,
}

impl LintReport {
    /// No error-level findings.
    pub fn passed(&self) -> bool {
        self.count(LintLevel::Error) == 0
    }

    pub fn count(&self, level: LintLevel) -> usize {
        self.findings.iter().filter(|f| f.level == level).count()
    }
}

fn finding(line: usize, kind: LintKind, message: String) -> LintFinding {
    LintFinding {
        line,
        kind,
        level: kind.level(),
        message,
    }
}

pub fn lint(manifest: &Manifest) -> LintReport {
    let mut findings = Vec::new();

    for invalid in &manifest.invalid {
        findings.push(finding(
            invalid.line,
            LintKind::InvalidSpecifier,
            format!("'{}' is not a valid requirement: {}", invalid.content, invalid.reason),
        ));
    }

    let mut seen: HashMap<String, &Requirement> = HashMap::new();
    for requirement in &manifest.requirements {
        let normalized = requirement.normalized_name();

        if let Some(first) = seen.get(&normalized) {
            findings.push(finding(
                requirement.line,
                LintKind::DuplicateRequirement,
                format!(
                    "'{}' ({}) is already listed on line {} ({})",
                    requirement.name,
                    requirement.section.as_deref().unwrap_or("no section"),
                    first.line,
                    first.section.as_deref().unwrap_or("no section")
                ),
            ));
        } else {
            seen.insert(normalized.clone(), requirement);
        }

        if STDLIB_MODULES.contains(&normalized.as_str()) {
            findings.push(finding(
                requirement.line,
                LintKind::StdlibModule,
                format!("'{}' is part of the standard library and cannot be installed", requirement.name),
            ));
        }

        if !requirement.is_pinned() {
            findings.push(finding(
                requirement.line,
                LintKind::UnpinnedRequirement,
                format!("'{}' has no version constraint", requirement.name),
            ));
        }
    }

    for pending in &manifest.commented_out {
        let note = pending
            .note
            .as_deref()
            .map(|n| format!(" ({})", n))
            .unwrap_or_default();
        findings.push(finding(
            pending.line,
            LintKind::PendingEntry,
            format!("'{}' is commented out{}", pending, note),
        ));
    }

    findings.sort_by_key(|f| f.line);

    LintReport {
        findings,
        requirement_count: manifest.requirements.len(),
        section_count: manifest.sections.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Framework principal
streamlit>=1.28.0

# Processamento de dados
pandas>=2.0.0
numpy>=1.24.0

# Parser SketchUp (será implementado)
# sketchup-api>=1.0.0  # pendente de implementação

# Banco de dados
sqlite3

# Formatação de números
babel>=2.12.0

# Internacionalização
Babel>=2.12.0
";

    #[test]
    fn test_parse_requirement_forms() {
        let spec =
            parse_requirement("uvicorn[standard] >= 0.23, <1.0 ; python_version >= \"3.9\"").unwrap();
        assert_eq!(spec.name, "uvicorn");
        assert_eq!(spec.extras, vec!["standard"]);
        assert_eq!(spec.clauses.len(), 2);
        assert_eq!(spec.clauses[1].to_string(), "<1.0");
        assert_eq!(spec.marker.as_deref(), Some("python_version >= \"3.9\""));

        assert!(parse_requirement("python-dotenv").unwrap().clauses.is_empty());
        assert!(parse_requirement("pandas=>2.0").is_err());
        assert!(parse_requirement(">=1.0").is_err());
    }

    #[test]
    fn test_sections_and_entries() {
        let manifest = parse_manifest(SAMPLE);
        assert_eq!(manifest.requirements.len(), 6);
        assert!(manifest.invalid.is_empty());
        assert_eq!(manifest.sections[0], "Framework principal");
        assert_eq!(manifest.requirements[1].section.as_deref(), Some("Processamento de dados"));

        assert_eq!(manifest.commented_out.len(), 1);
        let pending = &manifest.commented_out[0];
        assert_eq!(pending.name, "sketchup-api");
        assert_eq!(pending.note.as_deref(), Some("pendente de implementação"));
        assert_eq!(pending.section.as_deref(), Some("Parser SketchUp (será implementado)"));
    }

    #[test]
    fn test_lint_reports_manifest_smells() {
        let report = lint(&parse_manifest(SAMPLE));
        assert!(report.passed());

        let kinds: Vec<LintKind> = report.findings.iter().map(|f| f.kind).collect();
        assert!(kinds.contains(&LintKind::PendingEntry));
        assert!(kinds.contains(&LintKind::StdlibModule));
        assert!(kinds.contains(&LintKind::UnpinnedRequirement));

        let duplicate = report
            .findings
            .iter()
            .find(|f| f.kind == LintKind::DuplicateRequirement)
            .unwrap();
        assert_eq!(duplicate.line, 18);
        assert!(duplicate.message.contains("line 15"));
        assert_eq!(
            duplicate.message,
            "'Babel' (Internacionalização) is already listed on line 15 (Formatação de números)"
        );
    }

    #[test]
    fn test_invalid_lines_fail_lint() {
        let report = lint(&parse_manifest("pandas>=2.0\nnot a requirement!\n-r base.txt\n"));
        assert!(!report.passed());
        assert_eq!(report.count(LintLevel::Error), 2);
        assert_eq!(report.findings[0].line, 2);
        assert!(report.findings[0].to_string().starts_with("line 2: error: "));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Python_Dotenv"), "python-dotenv");
        assert_eq!(normalize_name("zope.interface"), "zope-interface");
        assert_eq!(normalize_name("a--_b"), "a-b");
    }
}
