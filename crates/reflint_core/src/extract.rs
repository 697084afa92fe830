//! Occurrence extraction: which symbols appear in which role, and where.
//!
//! Each extraction call is one pass over the selected files. Files are
//! gate-checked with cheap substring containment before any pattern runs.
//! Extraction preserves original casing; reconciliation decides how symbols
//! are compared.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use regex::Regex;

use crate::corpus::{Corpus, FileScope, read_text};
use crate::error::ValidatorError;

/// All plain script files.
const SCRIPT_FILES: FileScope = FileScope::of(&["txt"]);
/// Localisation text files.
const LOC_FILES: FileScope = FileScope::of(&["yml"]);
/// Interface definition files.
const GUI_FILES: FileScope = FileScope::of(&["gui"]);
/// Scripted localisation definition files.
const SCRIPTED_LOC_FILES: FileScope = FileScope::under(&["txt"], "scripted_localisation");
/// Scripted GUI logic files, the only script files that reference scripted
/// localisation by name.
const SCRIPTED_GUI_FILES: FileScope = FileScope::under(&["txt"], "scripted_guis");

/// Which flag namespace a pattern family targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    Country,
    State,
    Global,
}

impl FlagKind {
    pub fn keyword(self) -> &'static str {
        match self {
            FlagKind::Country => "country",
            FlagKind::State => "state",
            FlagKind::Global => "global",
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// An insertion-ordered set of symbols, each attributed to the first file in
/// which it was seen.
///
/// Re-recording an already known symbol is a no-op: the first file wins, and
/// iteration order is first-encounter order.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceSet {
    order: Vec<String>,
    files: HashMap<String, String>,
}

impl OccurrenceSet {
    pub fn record(&mut self, symbol: &str, file: &Path) {
        if self.files.contains_key(symbol) {
            return;
        }
        let basename = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.order.push(symbol.to_string());
        self.files.insert(symbol.to_string(), basename);
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.files.contains_key(symbol)
    }

    /// Symbols in first-encounter order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Basename of the first file that produced `symbol`.
    pub fn file_of(&self, symbol: &str) -> Option<&str> {
        self.files.get(symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn pattern(re: &str) -> Result<Regex, ValidatorError> {
    Regex::new(re).map_err(|source| ValidatorError::Pattern {
        pattern: re.to_string(),
        source,
    })
}

fn record_captures(out: &mut OccurrenceSet, re: &Regex, text: &str, file: &Path) {
    for cap in re.captures_iter(text) {
        out.record(&cap[1], file);
    }
}

fn path_contains(path: &Path, needle: &str) -> bool {
    path.to_string_lossy().contains(needle)
}

/// Flags tested by script logic (`has_…`, plus the braced `modify_…`/`has_…`
/// block form).
pub fn used_flags(corpus: &Corpus, kind: FlagKind) -> Result<OccurrenceSet, ValidatorError> {
    let keyword = kind.keyword();
    let simple = pattern(&format!(r"has_{keyword}_flag = ([^ \t\n]+)"))?;
    let braced = pattern(&format!(
        r"(?s)[ys]_{keyword}_flag = \{{.*?flag = ([^ \t\n}}]+).*?\}}"
    ))?;
    let has_gate = format!("has_{keyword}_flag =");
    let modify_gate = format!("modify_{keyword}_flag =");

    let mut out = OccurrenceSet::default();
    for file in corpus.files(&[SCRIPT_FILES]) {
        let text = read_text(&file);
        if !text.contains(&has_gate) && !text.contains(&modify_gate) {
            continue;
        }
        record_captures(&mut out, &simple, &text, &file);
        record_captures(&mut out, &braced, &text, &file);
    }
    Ok(out)
}

/// Flags assigned by script logic (`set_…`, simple and braced forms).
pub fn set_flags(corpus: &Corpus, kind: FlagKind) -> Result<OccurrenceSet, ValidatorError> {
    let keyword = kind.keyword();
    let simple = pattern(&format!(r"set_{keyword}_flag = ([^ \t\n]+)"))?;
    let braced = pattern(&format!(
        r"(?s)set_{keyword}_flag = \{{.*?flag = ([^ \t\n}}]+).*?\}}"
    ))?;
    let gate = format!("set_{keyword}_flag =");

    let mut out = OccurrenceSet::default();
    for file in corpus.files(&[SCRIPT_FILES]) {
        let text = read_text(&file);
        if !text.contains(&gate) {
            continue;
        }
        record_captures(&mut out, &simple, &text, &file);
        record_captures(&mut out, &braced, &text, &file);
    }
    Ok(out)
}

/// Flags reset by script logic (`clr_…`).
pub fn cleared_flags(corpus: &Corpus, kind: FlagKind) -> Result<OccurrenceSet, ValidatorError> {
    let keyword = kind.keyword();
    let simple = pattern(&format!(r"clr_{keyword}_flag = ([^ \t\n]+)"))?;
    let gate = format!("clr_{keyword}_flag =");

    let mut out = OccurrenceSet::default();
    for file in corpus.files(&[SCRIPT_FILES]) {
        let text = read_text(&file);
        if !text.contains(&gate) {
            continue;
        }
        record_captures(&mut out, &simple, &text, &file);
    }
    Ok(out)
}

/// Event targets dereferenced by script logic.
///
/// Tag alias files are a special class: they only contribute
/// `global_event_target = …` references.
pub fn used_event_targets(corpus: &Corpus) -> Result<OccurrenceSet, ValidatorError> {
    let alias = pattern(r#"global_event_target = ([^ \n\t#"]+)"#)?;
    let scoped = pattern(r#"event_target:([^ \n\t#"]+)"#)?;
    let tested = pattern(r#"has_event_target = ([^ \n\t"]+)"#)?;

    let mut out = OccurrenceSet::default();
    for file in corpus.files(&[SCRIPT_FILES]) {
        let is_alias_file = path_contains(&file, "tag_aliases");
        let text = read_text(&file);
        if is_alias_file {
            if text.contains("global_event_target =") {
                record_captures(&mut out, &alias, &text, &file);
            }
        } else {
            if text.contains("event_target:") {
                record_captures(&mut out, &scoped, &text, &file);
            }
            if text.contains("has_event_target =") {
                record_captures(&mut out, &tested, &text, &file);
            }
        }
    }
    Ok(out)
}

/// Event targets saved by script logic.
pub fn set_event_targets(corpus: &Corpus) -> Result<OccurrenceSet, ValidatorError> {
    let global = pattern(r#"save_global_event_target_as = ([^ \n\t#"]+)"#)?;
    let scoped = pattern(r#"save_event_target_as = ([^ \n\t#"]+)"#)?;

    let mut out = OccurrenceSet::default();
    for file in corpus.files(&[SCRIPT_FILES]) {
        if path_contains(&file, "tag_aliases") {
            continue;
        }
        let text = read_text(&file);
        if text.contains("save_global_event_target_as =") {
            record_captures(&mut out, &global, &text, &file);
        }
        if text.contains("save_event_target_as =") {
            record_captures(&mut out, &scoped, &text, &file);
        }
    }
    Ok(out)
}

/// Event targets discarded by script logic.
pub fn cleared_event_targets(corpus: &Corpus) -> Result<OccurrenceSet, ValidatorError> {
    let cleared = pattern(r#"clear_global_event_target = ([^ \n\t#"]+)"#)?;

    let mut out = OccurrenceSet::default();
    for file in corpus.files(&[SCRIPT_FILES]) {
        let text = read_text(&file);
        if text.contains("clear_global_event_target =") {
            record_captures(&mut out, &cleared, &text, &file);
        }
    }
    Ok(out)
}

/// Scripted localisation names declared in definition files.
///
/// The French translation mirror is skipped: it duplicates names without
/// being authoritative for them.
pub fn defined_scripted_loc(corpus: &Corpus) -> Result<OccurrenceSet, ValidatorError> {
    let name = pattern(r"name\s*=\s*([a-zA-Z_0-9]+)")?;

    let mut out = OccurrenceSet::default();
    for file in corpus.files(&[SCRIPTED_LOC_FILES]) {
        if path_contains(&file, "00_scripted_localisation_FR_loc") {
            continue;
        }
        let text = read_text(&file);
        if !text.contains("defined_text") || !text.contains("name =") {
            continue;
        }
        record_captures(&mut out, &name, &text, &file);
    }
    Ok(out)
}

/// Scripted localisation names referenced from interface and localisation
/// files.
///
/// Deliberately not pattern-matched: the candidate set is bounded by the
/// define pass, so plain substring containment per known name is both faster
/// and sufficient. Names are probed in define order, keeping report order
/// stable across runs.
pub fn used_scripted_loc(corpus: &Corpus, defined: &OccurrenceSet) -> OccurrenceSet {
    let scopes = [GUI_FILES, LOC_FILES, SCRIPTED_GUI_FILES];

    let mut out = OccurrenceSet::default();
    for file in corpus.files(&scopes) {
        if path_contains(&file, "scripted_localisation") {
            continue;
        }
        let text = read_text(&file);
        for name in defined.symbols() {
            if !out.contains(name) && text.contains(name) {
                out.record(name, &file);
            }
        }
    }
    out
}

/// Event targets consumed from localisation via the `[<target>.GetName]` /
/// `[<target>.GetAdjective]` idiom.
///
/// Takes lower-cased target keys and returns the subset that appears in any
/// localisation file; matching is case-insensitive on both sides.
pub fn loc_referenced_targets(corpus: &Corpus, targets: &[String]) -> HashSet<String> {
    let mut found = HashSet::new();
    for file in corpus.files(&[LOC_FILES]) {
        if found.len() == targets.len() {
            break;
        }
        let text = read_text(&file).to_lowercase();
        if !text.contains(".get") {
            continue;
        }
        for target in targets {
            if found.contains(target) {
                continue;
            }
            if text.contains(&format!("[{target}.getname"))
                || text.contains(&format!("[{target}.getadjective"))
            {
                found.insert(target.clone());
            }
        }
    }
    found
}
