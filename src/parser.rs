//! Line-oriented HAProxy configuration parser.
//!
//! Each non-blank, non-comment line is either a section header (its first
//! token is one of [`SECTION_KEYWORDS`](crate::config::SECTION_KEYWORDS)) or a
//! directive belonging to the most recent header.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::{is_section_keyword, Config, Section};
use crate::error::{ConfigDiffError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Also sort the order-insensitive directives of the final section.
    /// Off by default: a section is only finalized when the next header appears.
    pub sort_last_section: bool,
}

/// Parser for HAProxy configuration text
#[derive(Debug, Clone, Default)]
pub struct ConfigParser {
    options: ParserOptions,
}

/// Section currently collecting directives.
struct OpenSection {
    keyword: String,
    name: String,
    section: Section,
}

struct ParseState {
    config: Config,
    current: Option<OpenSection>,
    line: usize,
}

impl ParseState {
    fn new() -> Self {
        Self {
            config: Config::new(),
            current: None,
            line: 0,
        }
    }

    fn start_section(&mut self, keyword: &str, name: &str) {
        if let Some(mut previous) = self.current.take() {
            previous.section.finalize();
            self.store(previous);
        }
        tracing::debug!("line {}: section {} {:?}", self.line, keyword, name);
        self.current = Some(OpenSection {
            keyword: keyword.to_string(),
            name: name.to_string(),
            section: Section::new(),
        });
    }

    fn add_directive(&mut self, keyword: &str, params: &str) -> Result<()> {
        match self.current.as_mut() {
            Some(open) => {
                open.section.push(keyword, params);
                Ok(())
            }
            None => Err(ConfigDiffError::DirectiveOutsideSection {
                keyword: keyword.to_string(),
                line: self.line,
            }),
        }
    }

    fn store(&mut self, open: OpenSection) {
        let OpenSection {
            keyword,
            name,
            section,
        } = open;
        if self.config.section(&keyword, &name).is_some() {
            tracing::warn!(
                "section {} {:?} defined again, earlier directives are discarded",
                keyword,
                name
            );
        }
        self.config.insert(keyword, name, section);
    }

    fn finish(mut self, sort_last_section: bool) -> Config {
        if let Some(mut last) = self.current.take() {
            if sort_last_section {
                last.section.finalize();
            }
            self.store(last);
        }
        self.config
    }
}

/// Split a trimmed line into its keyword and the remaining parameter text.
fn split_keyword(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((keyword, params)) => (keyword, params.trim_start()),
        None => (line, ""),
    }
}

fn strip_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

impl ConfigParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parse configuration text from any buffered reader.
    ///
    /// Bytes that are not valid UTF-8 are replaced, not rejected.
    pub fn parse<R: BufRead>(&self, mut reader: R) -> Result<Config> {
        let mut state = ParseState::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            state.line += 1;

            let line = String::from_utf8_lossy(strip_line_ending(&buf));
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (keyword, params) = split_keyword(trimmed);
            if is_section_keyword(keyword) {
                state.start_section(keyword, params);
            } else {
                state.add_directive(keyword, params)?;
            }
        }

        Ok(state.finish(self.options.sort_last_section))
    }

    pub fn parse_str(&self, content: &str) -> Result<Config> {
        self.parse(content.as_bytes())
    }

    /// Parse a file from disk. Errors carry the file path.
    pub fn parse_file(&self, path: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|source| ConfigDiffError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let config = self
            .parse(BufReader::new(file))
            .map_err(|e| e.in_file(path))?;
        tracing::debug!(
            "{}: parsed {} sections",
            path.display(),
            config.section_count()
        );
        Ok(config)
    }
}

/// Parse with default options.
pub fn parse_config<R: BufRead>(reader: R) -> Result<Config> {
    ConfigParser::default().parse(reader)
}
