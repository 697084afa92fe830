//! Flag and event-target validation.
//!
//! Runs the cleared/missing/unused triple for each flag namespace, then the
//! same triple for event targets. Event targets get one extra pass: a target
//! only ever consumed from localisation text counts as used.

use std::path::Path;

use tracing::{error, info};

use crate::corpus::Corpus;
use crate::error::ValidatorError;
use crate::extract::{self, FlagKind};
use crate::reconcile::{self, Check, LocateStrategy};
use crate::report::Report;

const FALSE_POSITIVES_GENERIC: &[&str] = &["@", "[", "{"];

const FALSE_POSITIVES_COUNTRY: &[&str] = &[
    "@",
    "[",
    "{",
    "ire_got_guarantee",
    "ire_rejected_guarantee",
    "nfa_rebelled",
    "ire_alliance_refused",
    "nfa_previously_rebelled",
    "rom_deal",
    "rus_can_core",
    "sent_volunteers",
    "china_refused_alliance",
    "_QMV_voted",
    "recognised_opponent_",
    "rival_government_",
    "_QMV",
    "trade_agreement",
    "mutual_investment_treaty_",
    "libya_casablanca_accords_signed_by_",
    "_EP_agenda",
    "initiated_blockade_",
];

const FALSE_POSITIVES_COUNTRY_UNUSED: &[&str] = &[
    "@",
    "[",
    "{",
    "saf_antagonise_",
    "default_puppet",
    "_QMV_voted",
    "_EP_approval",
    "recognised_opponent_",
];

const FALSE_POSITIVES_GLOBAL_UNUSED: &[&str] = &[
    "@",
    "[",
    "{",
    "kr_current_version",
    "_QMV_result",
    "_QMV_voted",
];

const FALSE_POSITIVES_TARGETS_MISSING: &[&str] = &["."];

const FALSE_POSITIVES_TARGETS_UNUSED: &[&str] =
    &["wca_usa_floyd_olson", "wca_usa_al_smith", "target_value"];

const SCRIPT_PROBE: LocateStrategy = LocateStrategy::Probe {
    extensions: &["txt"],
    case_insensitive: false,
};

fn false_positives_for(kind: FlagKind) -> (&'static [&'static str], &'static [&'static str], &'static [&'static str]) {
    match kind {
        FlagKind::Country => (
            FALSE_POSITIVES_COUNTRY,
            FALSE_POSITIVES_COUNTRY,
            FALSE_POSITIVES_COUNTRY_UNUSED,
        ),
        FlagKind::Global => (
            FALSE_POSITIVES_GENERIC,
            FALSE_POSITIVES_GENERIC,
            FALSE_POSITIVES_GLOBAL_UNUSED,
        ),
        FlagKind::State => (
            FALSE_POSITIVES_GENERIC,
            FALSE_POSITIVES_GENERIC,
            FALSE_POSITIVES_GENERIC,
        ),
    }
}

fn cleared_flags_check(kind: FlagKind, false_positives: &'static [&'static str]) -> Check {
    Check {
        name: format!("cleared {kind} flags"),
        title: format!("Checking cleared {kind} flags that are never set..."),
        headline: format!(
            "Cleared {kind} flags that are never set were encountered. Flags with @ are skipped."
        ),
        note: None,
        false_positives,
        probes: vec![format!("clr_{kind}_flag = ")],
        fold_case: false,
        locate: SCRIPT_PROBE,
    }
}

fn missing_flags_check(kind: FlagKind, false_positives: &'static [&'static str]) -> Check {
    Check {
        name: format!("missing {kind} flags"),
        title: format!("Checking missing {kind} flags (used but not set)..."),
        headline: format!(
            "Missing {kind} flags were encountered - they are not set via 'set_{kind}_flag'. \
             Flags with @ are skipped."
        ),
        note: None,
        false_positives,
        probes: vec![format!("has_{kind}_flag = ")],
        fold_case: false,
        locate: SCRIPT_PROBE,
    }
}

fn unused_flags_check(kind: FlagKind, false_positives: &'static [&'static str]) -> Check {
    Check {
        name: format!("unused {kind} flags"),
        title: format!("Checking unused {kind} flags (set but not used)..."),
        headline: format!(
            "Unused {kind} flags were encountered - they are not used via 'has_{kind}_flag' \
             at least once. Flags with @ are skipped."
        ),
        note: None,
        false_positives,
        probes: vec![format!("set_{kind}_flag = ")],
        fold_case: false,
        locate: SCRIPT_PROBE,
    }
}

fn cleared_targets_check() -> Check {
    Check {
        name: "cleared event targets".into(),
        title: "Checking cleared event targets that are not set...".into(),
        headline: "Cleared event targets that are not set were encountered.".into(),
        note: None,
        false_positives: &[],
        probes: vec!["clear_global_event_target = ".into()],
        fold_case: false,
        locate: SCRIPT_PROBE,
    }
}

fn missing_targets_check() -> Check {
    Check {
        name: "missing event targets".into(),
        title: "Checking missing event targets (used but not set)...".into(),
        headline: "Used event targets that are not set were encountered.".into(),
        note: None,
        false_positives: FALSE_POSITIVES_TARGETS_MISSING,
        probes: vec!["event_target:".into(), "has_event_target = ".into()],
        fold_case: false,
        locate: SCRIPT_PROBE,
    }
}

fn unused_targets_check() -> Check {
    Check {
        name: "unused event targets".into(),
        title: "Checking unused event targets (set but not used)...".into(),
        headline: "Unused event targets were encountered.".into(),
        note: None,
        false_positives: FALSE_POSITIVES_TARGETS_UNUSED,
        probes: vec![
            "save_event_target_as = ".into(),
            "save_global_event_target_as = ".into(),
        ],
        fold_case: false,
        locate: SCRIPT_PROBE,
    }
}

/// Runs every flag and event-target check against the corpus.
///
/// Returns the total number of issues recorded into `report`. When `output`
/// is given the plain transcript is persisted there; a write failure is
/// logged and does not affect the result.
pub fn run(
    corpus: &Corpus,
    report: &mut Report,
    output: Option<&Path>,
) -> Result<usize, ValidatorError> {
    report.header(
        "VARIABLE AND EVENT TARGET VALIDATION",
        corpus.root(),
        corpus.is_staged(),
        output,
    );

    for kind in [FlagKind::Country, FlagKind::Global, FlagKind::State] {
        let (fp_cleared, fp_missing, fp_unused) = false_positives_for(kind);

        reconcile::run_check(
            corpus,
            report,
            &cleared_flags_check(kind, fp_cleared),
            &extract::cleared_flags(corpus, kind)?,
            &extract::set_flags(corpus, kind)?,
        );
        reconcile::run_check(
            corpus,
            report,
            &missing_flags_check(kind, fp_missing),
            &extract::used_flags(corpus, kind)?,
            &extract::set_flags(corpus, kind)?,
        );
        reconcile::run_check(
            corpus,
            report,
            &unused_flags_check(kind, fp_unused),
            &extract::set_flags(corpus, kind)?,
            &extract::used_flags(corpus, kind)?,
        );
    }

    reconcile::run_check(
        corpus,
        report,
        &cleared_targets_check(),
        &extract::cleared_event_targets(corpus)?,
        &extract::set_event_targets(corpus)?,
    );
    reconcile::run_check(
        corpus,
        report,
        &missing_targets_check(),
        &extract::used_event_targets(corpus)?,
        &extract::set_event_targets(corpus)?,
    );

    // Unused targets get the localisation escape hatch: a target consumed
    // only via [<target>.GetName]/[<target>.GetAdjective] still counts as
    // used.
    {
        let check = unused_targets_check();
        let set_targets = extract::set_event_targets(corpus)?;
        let used_targets = extract::used_event_targets(corpus)?;
        let mut pending = reconcile::survivors(&set_targets, &used_targets, &check);
        let keys: Vec<String> = pending.iter().map(|s| s.key.clone()).collect();
        let referenced = extract::loc_referenced_targets(corpus, &keys);
        pending.retain(|s| !referenced.contains(&s.key));
        reconcile::resolve_and_emit(corpus, report, &check, &pending);
    }

    report.summary();

    if let Some(path) = output {
        match report.save(path) {
            Ok(()) => info!("Results saved to: {}", path.display()),
            Err(e) => error!("Failed to save output to {}: {}", path.display(), e),
        }
    }

    Ok(report.issues())
}
