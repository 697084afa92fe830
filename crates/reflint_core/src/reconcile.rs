//! Set reconciliation: the engine every check runs through.
//!
//! A check is a data record, not code: candidate and reference occurrence
//! sets come from extraction, and the [`Check`] describes how to filter,
//! compare, locate and render what survives. Comparison is always by
//! lower-cased key; display and probe casing are per-check.

use std::collections::HashSet;

use crate::corpus::Corpus;
use crate::extract::OccurrenceSet;
use crate::filter;
use crate::locate;
use crate::report::Report;

/// How a surviving symbol is resolved back to a concrete file.
#[derive(Debug, Clone)]
pub enum LocateStrategy {
    /// Walk the given extensions and probe file contents.
    Probe {
        extensions: &'static [&'static str],
        case_insensitive: bool,
    },
    /// Resolve the recorded basename inside a fixed definition directory;
    /// line search is always case-insensitive here.
    DefinitionDir { subpath: &'static str },
}

/// Everything one defect check needs besides its occurrence sets.
#[derive(Debug, Clone)]
pub struct Check {
    /// Short noun phrase for the all-clear line, e.g. `unused country flags`.
    pub name: String,
    /// Section title, e.g. `Checking unused country flags (set but not used)...`.
    pub title: String,
    /// Red headline shown above a non-empty defect list.
    pub headline: String,
    /// Optional advisory printed under the headline.
    pub note: Option<&'static str>,
    /// Substring rules removing known-noise candidates.
    pub false_positives: &'static [&'static str],
    /// Probe prefixes tried in order; a probe is `prefix + symbol`.
    pub probes: Vec<String>,
    /// Fold symbols to lower case for filtering, probing and display.
    pub fold_case: bool,
    pub locate: LocateStrategy,
}

/// A defect candidate that survived filtering, set difference and dedup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Survivor {
    /// Display form: original casing, or folded for case-folding checks.
    pub symbol: String,
    /// Lower-cased comparison key.
    pub key: String,
    /// Basename of the first file that produced the symbol.
    pub basename: Option<String>,
}

/// Candidates that are absent from the reference set.
///
/// Candidates are visited in first-encounter order; false positives are
/// dropped first, then membership and dedup are decided on the lowered key.
pub fn survivors(
    candidates: &OccurrenceSet,
    references: &OccurrenceSet,
    check: &Check,
) -> Vec<Survivor> {
    let reference_keys: HashSet<String> =
        references.symbols().map(|s| s.to_lowercase()).collect();

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for symbol in candidates.symbols() {
        let key = symbol.to_lowercase();
        let display = if check.fold_case {
            key.clone()
        } else {
            symbol.to_string()
        };
        if filter::is_false_positive(&display, check.false_positives) {
            continue;
        }
        if reference_keys.contains(&key) {
            continue;
        }
        if !seen.insert(key.clone()) {
            continue;
        }
        out.push(Survivor {
            basename: candidates.file_of(symbol).map(str::to_string),
            symbol: display,
            key,
        });
    }
    out
}

/// Locates each survivor and renders the check section.
///
/// A survivor whose owning file cannot be re-located is still reported,
/// under its recorded basename (or `unknown`) with line 0.
pub fn resolve_and_emit(corpus: &Corpus, report: &mut Report, check: &Check, found: &[Survivor]) {
    report.section(&check.title);

    let mut defects: Vec<(String, u32, String)> = Vec::new();
    for survivor in found {
        let basename = survivor.basename.as_deref().unwrap_or("unknown");
        let probes: Vec<String> = check
            .probes
            .iter()
            .map(|prefix| format!("{prefix}{}", survivor.symbol))
            .collect();

        let located = match &check.locate {
            LocateStrategy::Probe {
                extensions,
                case_insensitive,
            } => probes
                .iter()
                .find_map(|probe| {
                    locate::find_owning_file(corpus, basename, probe, *extensions, *case_insensitive)
                })
                .map(|path| {
                    let line = probes
                        .iter()
                        .map(|probe| locate::line_of(&path, probe, *case_insensitive))
                        .find(|&l| l > 0)
                        .unwrap_or(0);
                    (corpus.display_path(&path), line)
                }),
            LocateStrategy::DefinitionDir { subpath } => {
                locate::find_in_definition_dir(corpus, *subpath, basename).map(|path| {
                    let line = probes
                        .iter()
                        .map(|probe| locate::line_of(&path, probe, true))
                        .find(|&l| l > 0)
                        .unwrap_or(0);
                    (corpus.display_path(&path), line)
                })
            }
        };

        match located {
            Some((file, line)) => defects.push((file, line, survivor.symbol.clone())),
            None => defects.push((basename.to_string(), 0, survivor.symbol.clone())),
        }
    }

    if defects.is_empty() {
        report.clean(&check.name);
        return;
    }

    report.headline(&check.headline);
    if let Some(note) = check.note {
        report.caution(note);
    }
    for (file, line, symbol) in &defects {
        let location = if *line > 0 {
            format!("{file}:{line}")
        } else {
            file.clone()
        };
        report.defect(&location, symbol);
    }
    report.issue_count(defects.len());
}

/// Runs a full check: set algebra, then location and rendering.
pub fn run_check(
    corpus: &Corpus,
    report: &mut Report,
    check: &Check,
    candidates: &OccurrenceSet,
    references: &OccurrenceSet,
) {
    let found = survivors(candidates, references, check);
    resolve_and_emit(corpus, report, check, &found);
}
