//! End-to-end run over a small but realistic mod tree.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use reflint_core::{Corpus, Report, scripted_loc, variables};

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// A tree with one defect per flag-check family plus healthy symbols that
/// must stay silent.
fn build_tree(root: &Path) {
    write(
        root,
        "events/politics.txt",
        "country_event = {\n\
         \tid = politics.1\n\
         \timmediate = {\n\
         \t\tset_country_flag = election_held\n\
         \t\tset_country_flag = forgotten_marker\n\
         \t\tsave_event_target_as = new_leader\n\
         \t}\n\
         \ttrigger = {\n\
         \t\thas_country_flag = election_held\n\
         \t\thas_country_flag = phantom_marker\n\
         \t}\n\
         \toption = {\n\
         \t\tclr_country_flag = stale_marker\n\
         \t\teffect_tooltip = { event_target:new_leader = { } }\n\
         \t}\n\
         }\n",
    );
    write(
        root,
        "common/decisions/economy.txt",
        "set_global_flag = market_open\n\
         if = { has_global_flag = market_open }\n\
         save_event_target_as = silent_partner\n",
    );
    write(
        root,
        "localisation/english/events_l_english.yml",
        "l_english:\n politics.1.t:0 \"Elections\"\n",
    );
    // Ignored directory: symbols here must not leak into any check.
    write(root, "tools/generator.txt", "set_country_flag = tool_only\n");
}

#[test]
fn one_run_catches_each_defect_family_once() {
    let temp = TempDir::new().unwrap();
    build_tree(temp.path());

    let corpus = Corpus::open(temp.path()).unwrap();
    let mut report = Report::new(false);
    let issues = variables::run(&corpus, &mut report, None).unwrap();

    let lines = report.lines().to_vec();
    // forgotten_marker: set but never tested.
    assert!(lines.contains(&"  events/politics.txt:5 - forgotten_marker".to_string()));
    // phantom_marker: tested but never set.
    assert!(lines.contains(&"  events/politics.txt:10 - phantom_marker".to_string()));
    // stale_marker: cleared but never set.
    assert!(lines.contains(&"  events/politics.txt:13 - stale_marker".to_string()));
    // silent_partner: saved but never dereferenced.
    assert!(
        lines.contains(&"  common/decisions/economy.txt:3 - silent_partner".to_string())
    );
    // Healthy symbols and ignored-directory symbols stay silent.
    assert!(!lines.iter().any(|l| l.contains("election_held")));
    assert!(!lines.iter().any(|l| l.contains("market_open")));
    assert!(!lines.iter().any(|l| l.contains("new_leader")));
    assert!(!lines.iter().any(|l| l.contains("tool_only")));

    assert_eq!(issues, 4);
    assert!(lines.contains(&"✗ VALIDATION COMPLETE - 4 TOTAL ISSUES FOUND".to_string()));
}

#[test]
fn repeated_runs_produce_identical_transcripts() {
    let temp = TempDir::new().unwrap();
    build_tree(temp.path());
    write(
        temp.path(),
        "common/scripted_localisation/nicknames.txt",
        "defined_text = {\n\tname = GetRulerNick\n}\ndefined_text = {\n\tname = GetOrphan\n}\n",
    );
    write(
        temp.path(),
        "interface/topbar.gui",
        "text = \"[GetRulerNick]\"\n",
    );

    let corpus = Corpus::open(temp.path()).unwrap();

    let run_variables = || {
        let mut report = Report::new(false);
        variables::run(&corpus, &mut report, None).unwrap();
        report.lines().to_vec()
    };
    let run_loc = || {
        let mut report = Report::new(false);
        scripted_loc::run(&corpus, &mut report, None).unwrap();
        report.lines().to_vec()
    };

    assert_eq!(run_variables(), run_variables());
    assert_eq!(run_loc(), run_loc());
}

#[test]
fn staged_narrowing_changes_selection_not_semantics() {
    let temp = TempDir::new().unwrap();
    build_tree(temp.path());

    let staged = vec![temp.path().join("common/decisions/economy.txt")];
    let corpus = Corpus::open(temp.path()).unwrap().with_staged(staged);

    let mut report = Report::new(false);
    let issues = variables::run(&corpus, &mut report, None).unwrap();

    // Only the staged file's symbols are considered.
    let lines = report.lines().to_vec();
    assert!(
        lines.contains(&"  common/decisions/economy.txt:3 - silent_partner".to_string())
    );
    assert!(!lines.iter().any(|l| l.contains("forgotten_marker")));
    assert_eq!(issues, 1);
}
