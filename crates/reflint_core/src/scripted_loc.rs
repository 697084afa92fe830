//! Scripted localisation validation.
//!
//! Two checks: names referenced but never defined, and names defined but
//! never referenced. Both compare, filter and report in lower case, matching
//! how the game resolves these keys.

use std::path::Path;

use tracing::{error, info};

use crate::corpus::Corpus;
use crate::error::ValidatorError;
use crate::extract;
use crate::reconcile::{self, Check, LocateStrategy};
use crate::report::Report;

const DEFINITION_DIR: &str = "common/scripted_localisation";

/// Shared noise list: vanilla loc functions, common non-scripted-loc name
/// fragments, formatting markers, and scope/variable references.
const FALSE_POSITIVES: &[&str] = &[
    "root.getname",
    "this.getname",
    "from.getname",
    "prev.getname",
    "root.getadjective",
    "this.getadjective",
    "from.getadjective",
    "getdatetext",
    "getyear",
    "getmonth",
    "getday",
    "tt",
    "_tt",
    "_desc",
    "_title",
    "button",
    "gfx_",
    "tooltip",
    "§",
    "£",
    "$",
    "var:",
    "@",
    "[",
];

fn missing_check() -> Check {
    Check {
        name: "missing scripted localisations".into(),
        title: "Checking missing scripted localisations (used but not defined)...".into(),
        headline: "Missing scripted localisations were encountered - they are referenced \
                   but not defined in common/scripted_localisation/."
            .into(),
        note: Some(
            "Note: Some of these may be regular localisation keys rather than scripted \
             localisation. Verify manually.",
        ),
        false_positives: FALSE_POSITIVES,
        probes: vec![String::new()],
        fold_case: true,
        locate: LocateStrategy::Probe {
            extensions: &["txt", "gui"],
            case_insensitive: true,
        },
    }
}

fn unused_check() -> Check {
    Check {
        name: "unused scripted localisations".into(),
        title: "Checking unused scripted localisations (defined but not used)...".into(),
        headline: "Unused scripted localisations were encountered - they are defined but \
                   not referenced anywhere."
            .into(),
        note: None,
        false_positives: FALSE_POSITIVES,
        probes: vec!["name = ".into()],
        fold_case: true,
        locate: LocateStrategy::DefinitionDir {
            subpath: DEFINITION_DIR,
        },
    }
}

/// Runs both scripted localisation checks against the corpus.
///
/// Returns the total number of issues recorded into `report`; `output`
/// behaves as in [`crate::variables::run`].
pub fn run(
    corpus: &Corpus,
    report: &mut Report,
    output: Option<&Path>,
) -> Result<usize, ValidatorError> {
    report.header(
        "SCRIPTED LOCALISATION VALIDATION",
        corpus.root(),
        corpus.is_staged(),
        output,
    );

    let defined = extract::defined_scripted_loc(corpus)?;
    let used = extract::used_scripted_loc(corpus, &defined);

    reconcile::run_check(corpus, report, &missing_check(), &used, &defined);
    reconcile::run_check(corpus, report, &unused_check(), &defined, &used);

    report.summary();

    if let Some(path) = output {
        match report.save(path) {
            Ok(()) => info!("Results saved to: {}", path.display()),
            Err(e) => error!("Failed to save output to {}: {}", path.display(), e),
        }
    }

    Ok(report.issues())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn run_quiet(corpus: &Corpus) -> (usize, Vec<String>) {
        let mut report = Report::new(false);
        let issues = run(corpus, &mut report, None).unwrap();
        (issues, report.lines().to_vec())
    }

    #[test]
    fn defined_and_referenced_name_is_clean() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "common/scripted_localisation/defs.txt",
            "defined_text = {\n\tname = GetRulerNick\n}\n",
        );
        write(
            temp.path(),
            "interface/menu.gui",
            "buttonText = \"[GetRulerNick]\"\n",
        );

        let corpus = Corpus::open(temp.path()).unwrap();
        let (issues, lines) = run_quiet(&corpus);
        assert_eq!(issues, 0);
        assert!(
            lines
                .iter()
                .any(|l| l == "✓ No issues found with unused scripted localisations")
        );
    }

    #[test]
    fn defined_but_unreferenced_name_is_reported_at_definition() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "common/scripted_localisation/defs.txt",
            "defined_text = {\n\tname = GetObscure\n}\n",
        );

        let corpus = Corpus::open(temp.path()).unwrap();
        let (issues, lines) = run_quiet(&corpus);
        assert_eq!(issues, 1);
        // Folded display, located on the definition's `name =` line.
        assert!(
            lines.contains(
                &"  common/scripted_localisation/defs.txt:2 - getobscure".to_string()
            )
        );
    }

    #[test]
    fn noise_fragments_never_surface() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "common/scripted_localisation/defs.txt",
            "defined_text = {\n\tname = faction_tt\n}\ndefined_text = {\n\tname = gfx_icon_picker\n}\n",
        );

        let corpus = Corpus::open(temp.path()).unwrap();
        let (issues, _) = run_quiet(&corpus);
        assert_eq!(issues, 0);
    }

    #[test]
    fn definition_files_do_not_count_as_references() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "common/scripted_localisation/defs.txt",
            "defined_text = {\n\tname = GetLonely\n}\n",
        );
        // A second definition file mentioning the name is still not a use.
        write(
            temp.path(),
            "common/scripted_localisation/more_defs.txt",
            "defined_text = {\n\tname = GetLonely\n}\n",
        );

        let corpus = Corpus::open(temp.path()).unwrap();
        let (issues, _) = run_quiet(&corpus);
        assert_eq!(issues, 1);
    }

    #[test]
    fn reruns_are_deterministic() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "common/scripted_localisation/defs.txt",
            "defined_text = {\n\tname = GetAlpha\n}\ndefined_text = {\n\tname = GetBeta\n}\n",
        );

        let corpus = Corpus::open(temp.path()).unwrap();
        let (_, first) = run_quiet(&corpus);
        let (_, second) = run_quiet(&corpus);
        assert_eq!(first, second);
    }

    #[test]
    fn transcript_is_persisted_when_requested() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "common/scripted_localisation/defs.txt",
            "defined_text = {\n\tname = GetObscure\n}\n",
        );
        let out = temp.path().join("report_out");

        let corpus = Corpus::open(temp.path()).unwrap();
        let mut report = Report::new(false);
        run(&corpus, &mut report, Some(&out)).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("SCRIPTED LOCALISATION VALIDATION"));
        assert!(written.contains("getobscure"));
    }
}
