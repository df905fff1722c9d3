//! Structural comparison of two [`Config`] trees.
//!
//! Maps compare by key set and pointwise values, argument lists compare
//! element by element. Differing lists are aligned with a longest common
//! subsequence so the report shows which occurrences were added or removed.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::{Config, Section};

/// One argument line of a directive in a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
pub enum DiffLine {
    Same(String),
    Removed(String),
    Added(String),
}

impl DiffLine {
    pub fn marker(&self) -> char {
        match self {
            DiffLine::Same(_) => ' ',
            DiffLine::Removed(_) => '-',
            DiffLine::Added(_) => '+',
        }
    }

    pub fn args(&self) -> &str {
        match self {
            DiffLine::Same(args) | DiffLine::Removed(args) | DiffLine::Added(args) => args,
        }
    }
}

/// Differences in the argument list of one directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectiveDiff {
    pub name: String,
    pub lines: Vec<DiffLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", content = "detail", rename_all = "snake_case")]
pub enum SectionChange {
    Added(Section),
    Removed(Section),
    Modified(Vec<DirectiveDiff>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionDiff {
    pub keyword: String,
    pub name: String,
    #[serde(flatten)]
    pub change: SectionChange,
}

/// All differences between two configurations, ordered by keyword then name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigDiff {
    pub sections: Vec<SectionDiff>,
}

impl ConfigDiff {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }
}

/// Compare two configurations.
pub fn compute_diff(old: &Config, new: &Config) -> ConfigDiff {
    let mut sections = Vec::new();

    let keywords: BTreeSet<&str> = old.keywords().chain(new.keywords()).collect();
    for keyword in keywords {
        let old_named = old.sections_of(keyword);
        let new_named = new.sections_of(keyword);

        let names: BTreeSet<&str> = old_named
            .into_iter()
            .chain(new_named)
            .flat_map(|named| named.keys().map(String::as_str))
            .collect();

        for name in names {
            let change = match (old.section(keyword, name), new.section(keyword, name)) {
                (Some(a), Some(b)) if a == b => continue,
                (Some(a), Some(b)) => SectionChange::Modified(diff_sections(a, b)),
                (Some(a), None) => SectionChange::Removed(a.clone()),
                (None, Some(b)) => SectionChange::Added(b.clone()),
                (None, None) => continue,
            };
            sections.push(SectionDiff {
                keyword: keyword.to_string(),
                name: name.to_string(),
                change,
            });
        }
    }

    ConfigDiff { sections }
}

fn diff_sections(old: &Section, new: &Section) -> Vec<DirectiveDiff> {
    let names: BTreeSet<&str> = old
        .directives()
        .chain(new.directives())
        .map(|(name, _)| name)
        .collect();

    names
        .into_iter()
        .filter_map(|name| {
            let a = old.directive(name).unwrap_or_default();
            let b = new.directive(name).unwrap_or_default();
            if a == b {
                return None;
            }
            Some(DirectiveDiff {
                name: name.to_string(),
                lines: diff_lists(a, b),
            })
        })
        .collect()
}

/// Align two argument lists on their longest common subsequence.
pub fn diff_lists(old: &[String], new: &[String]) -> Vec<DiffLine> {
    let (n, m) = (old.len(), new.len());

    // lcs[i][j] = LCS length of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut lines = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            lines.push(DiffLine::Same(old[i].clone()));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            lines.push(DiffLine::Removed(old[i].clone()));
            i += 1;
        } else {
            lines.push(DiffLine::Added(new[j].clone()));
            j += 1;
        }
    }
    lines.extend(old[i..].iter().cloned().map(DiffLine::Removed));
    lines.extend(new[j..].iter().cloned().map(DiffLine::Added));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ConfigParser;

    fn parse(content: &str) -> Config {
        ConfigParser::default().parse_str(content).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identical_configs_have_no_diff() {
        let content = "global\n  maxconn 10\nbackend be\n  server s1 a\n";
        let diff = compute_diff(&parse(content), &parse(content));
        assert!(diff.is_empty());
    }

    #[test]
    fn test_added_and_removed_sections() {
        let old = parse("backend a\n  mode http\nbackend b\n");
        let new = parse("backend b\nfrontend c\n  bind :80\n");

        let diff = compute_diff(&old, &new);
        assert_eq!(diff.len(), 2);

        assert_eq!(diff.sections[0].keyword, "backend");
        assert_eq!(diff.sections[0].name, "a");
        assert!(matches!(diff.sections[0].change, SectionChange::Removed(_)));

        assert_eq!(diff.sections[1].keyword, "frontend");
        assert!(matches!(diff.sections[1].change, SectionChange::Added(_)));
    }

    #[test]
    fn test_modified_section_lists_only_changed_directives() {
        let old = parse("backend be\n  mode http\n  balance roundrobin\nlisten x\n");
        let new = parse("backend be\n  mode tcp\n  balance roundrobin\nlisten x\n");

        let diff = compute_diff(&old, &new);
        let SectionChange::Modified(directives) = &diff.sections[0].change else {
            panic!("expected modified section");
        };
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].name, "mode");
        assert_eq!(
            directives[0].lines,
            vec![
                DiffLine::Removed("http".to_string()),
                DiffLine::Added("tcp".to_string()),
            ]
        );
    }

    #[test]
    fn test_directive_missing_on_one_side() {
        let old = parse("defaults\n  retries 3\n");
        let new = parse("defaults\n  retries 3\n  log global\n");

        let diff = compute_diff(&old, &new);
        let SectionChange::Modified(directives) = &diff.sections[0].change else {
            panic!("expected modified section");
        };
        assert_eq!(directives[0].name, "log");
        assert_eq!(directives[0].lines, vec![DiffLine::Added("global".to_string())]);
    }

    #[test]
    fn test_diff_lists_keeps_common_lines() {
        let lines = diff_lists(&strings(&["a", "b", "c"]), &strings(&["a", "c", "d"]));
        assert_eq!(
            lines,
            vec![
                DiffLine::Same("a".to_string()),
                DiffLine::Removed("b".to_string()),
                DiffLine::Same("c".to_string()),
                DiffLine::Added("d".to_string()),
            ]
        );
    }

    #[test]
    fn test_diff_lists_duplicate_occurrence() {
        let lines = diff_lists(&strings(&["httpchk"]), &strings(&["httpchk", "httpchk"]));
        assert_eq!(
            lines,
            vec![
                DiffLine::Same("httpchk".to_string()),
                DiffLine::Added("httpchk".to_string()),
            ]
        );
    }

    #[test]
    fn test_order_matters_for_plain_directives() {
        let old = parse("frontend fe\n  http-request deny\n  http-request allow\nbackend be\n");
        let new = parse("frontend fe\n  http-request allow\n  http-request deny\nbackend be\n");
        assert!(!compute_diff(&old, &new).is_empty());
    }
}
