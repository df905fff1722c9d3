//! Rendering of a [`ConfigDiff`] for humans or machines.

use crate::config::{Config, Section};
use crate::diff::{compute_diff, ConfigDiff, DiffLine, SectionChange};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Unified-diff-like text
    #[default]
    Text,
    /// Pretty-printed JSON of the diff structure
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "diff" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

pub fn format_diff(diff: &ConfigDiff, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(diff)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(diff)?),
    }
}

/// Compare two configurations and render the result as text.
/// Returns an empty string when they are equal.
pub fn compare(old: &Config, new: &Config) -> String {
    render_text(&compute_diff(old, new))
}

fn header(keyword: &str, name: &str) -> String {
    if name.is_empty() {
        keyword.to_string()
    } else {
        format!("{} {}", keyword, name)
    }
}

fn push_line(out: &mut String, marker: char, name: &str, args: &str) {
    if args.is_empty() {
        out.push_str(&format!("{}   {}\n", marker, name));
    } else {
        out.push_str(&format!("{}   {} {}\n", marker, name, args));
    }
}

fn push_section(out: &mut String, marker: char, section: &Section) {
    for (name, args) in section.directives() {
        for arg in args {
            push_line(out, marker, name, arg);
        }
    }
}

fn render_text(diff: &ConfigDiff) -> String {
    let mut out = String::new();

    for (i, section) in diff.sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let title = header(&section.keyword, &section.name);
        match &section.change {
            SectionChange::Removed(removed) => {
                out.push_str(&format!("- {}\n", title));
                push_section(&mut out, '-', removed);
            }
            SectionChange::Added(added) => {
                out.push_str(&format!("+ {}\n", title));
                push_section(&mut out, '+', added);
            }
            SectionChange::Modified(directives) => {
                out.push_str(&format!("  {}\n", title));
                for directive in directives {
                    for line in &directive.lines {
                        push_line(&mut out, line.marker(), &directive.name, line.args());
                    }
                }
            }
        }
    }

    out
}

fn line_count(section: &Section) -> usize {
    section.directives().map(|(_, args)| args.len()).sum()
}

/// Count of `+`/`-` lines, for a one-line summary.
pub fn summarize(diff: &ConfigDiff) -> String {
    let (mut added, mut removed) = (0usize, 0usize);
    for section in &diff.sections {
        match &section.change {
            SectionChange::Added(s) => added += line_count(s),
            SectionChange::Removed(s) => removed += line_count(s),
            SectionChange::Modified(directives) => {
                for line in directives.iter().flat_map(|d| &d.lines) {
                    match line {
                        DiffLine::Added(_) => added += 1,
                        DiffLine::Removed(_) => removed += 1,
                        DiffLine::Same(_) => {}
                    }
                }
            }
        }
    }
    format!(
        "{} section(s) differ, {} line(s) added, {} line(s) removed",
        diff.len(),
        added,
        removed
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ConfigParser;

    fn parse(content: &str) -> Config {
        ConfigParser::default().parse_str(content).unwrap()
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("TEXT"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("yaml"), None);
    }

    #[test]
    fn test_compare_equal_is_empty() {
        let config = parse("global\n  daemon\n");
        assert_eq!(compare(&config, &config), "");
    }

    #[test]
    fn test_render_modified_section() {
        let old = parse("backend be\n  option httpchk\n");
        let new = parse("backend be\n  option httpchk\n  option httpchk\n");

        assert_eq!(
            compare(&old, &new),
            "  backend be\n    option httpchk\n+   option httpchk\n"
        );
    }

    #[test]
    fn test_render_added_and_removed_sections() {
        let old = parse("global\n  daemon\n");
        let new = parse("peers mypeers\n  peer p1 10.0.0.1:1024\n");

        assert_eq!(
            compare(&old, &new),
            "- global\n-   daemon\n\n+ peers mypeers\n+   peer p1 10.0.0.1:1024\n"
        );
    }

    #[test]
    fn test_json_output() {
        let old = parse("backend be\n  mode http\n");
        let new = parse("backend be\n  mode tcp\n");
        let diff = compute_diff(&old, &new);

        let json = format_diff(&diff, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["keyword"], "backend");
        assert_eq!(value[0]["change"], "modified");
        assert_eq!(value[0]["detail"][0]["name"], "mode");
        assert_eq!(value[0]["detail"][0]["lines"][0]["op"], "removed");
        assert_eq!(value[0]["detail"][0]["lines"][1]["args"], "tcp");

        let empty = format_diff(&ConfigDiff::default(), OutputFormat::Json).unwrap();
        assert_eq!(empty, "[]");
    }

    #[test]
    fn test_summarize() {
        let old = parse("backend be\n  mode http\nbackend gone\n  server s a\n");
        let new = parse("backend be\n  mode tcp\n");
        let diff = compute_diff(&old, &new);
        assert_eq!(
            summarize(&diff),
            "2 section(s) differ, 1 line(s) added, 2 line(s) removed"
        );
    }
}
