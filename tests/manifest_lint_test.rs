use anyhow::Result;
use cutlist_pro::core::manifest::{lint, load_manifest, LintKind, LintLevel};
use cutlist_pro::CutListError;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/requirements.txt");

#[test]
fn test_lint_fixture_manifest() -> Result<()> {
    let manifest = load_manifest(FIXTURE)?;
    assert_eq!(manifest.requirements.len(), 8);
    assert_eq!(manifest.commented_out.len(), 1);
    assert!(manifest.invalid.is_empty());
    assert_eq!(
        manifest.sections,
        vec![
            "Framework principal",
            "Processamento de dados",
            "Visualização",
            "Parser SketchUp (será implementado)",
            "Utilitários",
        ]
    );

    let pending = &manifest.commented_out[0];
    assert_eq!(pending.name, "sketchup-api");
    assert_eq!(pending.line, 13);
    assert_eq!(pending.note.as_deref(), Some("pendente de implementação"));

    let report = lint(&manifest);
    assert!(report.passed());
    assert_eq!(report.requirement_count, 8);
    assert_eq!(report.section_count, 5);
    assert_eq!(report.count(LintLevel::Warning), 2);

    let duplicate = report
        .findings
        .iter()
        .find(|f| f.kind == LintKind::DuplicateRequirement)
        .expect("duplicate reported");
    assert_eq!(duplicate.line, 18);
    assert!(duplicate.message.contains("line 16"));
    assert!(duplicate.message.contains("'Python_Dotenv' (Utilitários)"));

    let stdlib: Vec<usize> = report
        .findings
        .iter()
        .filter(|f| f.kind == LintKind::StdlibModule)
        .map(|f| f.line)
        .collect();
    assert_eq!(stdlib, vec![17]);

    let lines: Vec<usize> = report.findings.iter().map(|f| f.line).collect();
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
    Ok(())
}

#[test]
fn test_missing_manifest_is_a_manifest_error() {
    let err = load_manifest("tests/fixtures/does-not-exist.txt").unwrap_err();
    assert!(matches!(err, CutListError::ManifestError { .. }));
}
