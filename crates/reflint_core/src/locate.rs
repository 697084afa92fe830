//! Defect location: turning a recorded basename back into a concrete path
//! and line number.
//!
//! Extraction only keeps basenames, so reporting re-walks the corpus. The
//! walk always covers the full tree, even when the scan itself was narrowed
//! to staged files. Case sensitivity is a per-call decision: set/clear/define
//! probes want exact-case matching, generic containment probes want
//! tolerance.

use std::path::{Path, PathBuf};

use crate::corpus::{Corpus, FileScope, read_text};

/// Finds the file with the given basename whose content contains `probe`.
///
/// Returns the first match in walk order; ties between same-named files that
/// all contain the probe are broken arbitrarily.
pub fn find_owning_file(
    corpus: &Corpus,
    basename: &str,
    probe: &str,
    extensions: &'static [&'static str],
    case_insensitive: bool,
) -> Option<PathBuf> {
    let folded_probe = probe.to_lowercase();
    for file in corpus.walk(&[FileScope::of(extensions)]) {
        if file.file_name().is_none_or(|n| n != basename) {
            continue;
        }
        let content = read_text(&file);
        let hit = if case_insensitive {
            content.to_lowercase().contains(&folded_probe)
        } else {
            content.contains(probe)
        };
        if hit {
            return Some(file);
        }
    }
    None
}

/// Resolves a basename inside a fixed definition directory.
///
/// Tries the direct join first, then falls back to scanning the directory's
/// script files for a matching basename.
pub fn find_in_definition_dir(
    corpus: &Corpus,
    subpath: &'static str,
    basename: &str,
) -> Option<PathBuf> {
    let direct = corpus.root().join(subpath).join(basename);
    if direct.is_file() {
        return Some(direct);
    }
    corpus
        .walk(&[FileScope::under(&["txt"], subpath)])
        .into_iter()
        .find(|f| f.file_name().is_some_and(|n| n == basename))
}

/// 1-indexed line of the first occurrence of `pattern`, or 0 when absent.
pub fn line_of(path: &Path, pattern: &str, case_insensitive: bool) -> u32 {
    let content = read_text(path);
    let needle = if case_insensitive {
        pattern.to_lowercase()
    } else {
        pattern.to_string()
    };
    for (index, line) in content.lines().enumerate() {
        let hit = if case_insensitive {
            line.to_lowercase().contains(&needle)
        } else {
            line.contains(&needle)
        };
        if hit {
            return index as u32 + 1;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn corpus(temp: &TempDir) -> Corpus {
        Corpus::open(temp.path()).unwrap()
    }

    #[test]
    fn resolves_basename_by_probe_content() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "events/one/shared.txt", "other content\n");
        let wanted = write(
            temp.path(),
            "events/two/shared.txt",
            "set_country_flag = my_flag\n",
        );

        let found = find_owning_file(
            &corpus(&temp),
            "shared.txt",
            "set_country_flag = my_flag",
            &["txt"],
            false,
        )
        .unwrap();
        assert_eq!(found, wanted);
    }

    #[test]
    fn exact_case_probe_misses_folded_content() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "events/a.txt", "SET_COUNTRY_FLAG = MY_FLAG\n");

        let corpus = corpus(&temp);
        let exact = find_owning_file(
            &corpus,
            "a.txt",
            "set_country_flag = my_flag",
            &["txt"],
            false,
        );
        assert!(exact.is_none());

        let folded = find_owning_file(
            &corpus,
            "a.txt",
            "set_country_flag = my_flag",
            &["txt"],
            true,
        );
        assert!(folded.is_some());
    }

    #[test]
    fn definition_dir_resolution_prefers_direct_join() {
        let temp = TempDir::new().unwrap();
        let defs = write(
            temp.path(),
            "common/scripted_localisation/defs.txt",
            "defined_text = { name = X }\n",
        );

        let found =
            find_in_definition_dir(&corpus(&temp), "common/scripted_localisation", "defs.txt");
        assert_eq!(found, Some(defs));
        assert!(
            find_in_definition_dir(&corpus(&temp), "common/scripted_localisation", "nope.txt")
                .is_none()
        );
    }

    #[test]
    fn line_of_is_one_indexed_and_zero_on_miss() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "a.txt", "first\nsecond target here\nthird\n");

        assert_eq!(line_of(&path, "target", false), 2);
        assert_eq!(line_of(&path, "absent", false), 0);
        assert_eq!(line_of(&path, "TARGET", false), 0);
        assert_eq!(line_of(&path, "TARGET", true), 2);
    }
}
