//! Semantic comparison of HAProxy configuration files.
//!
//! Files are parsed into a normalized [`Config`] tree, then two trees are
//! compared structurally with [`compute_diff`] and rendered with
//! [`format_diff`].

pub mod config;
pub mod diff;
pub mod error;
pub mod output;
pub mod parser;

pub use config::{
    is_section_keyword, is_sorted_directive, Config, Section, SECTION_KEYWORDS, SORTED_DIRECTIVES,
};
pub use diff::{
    compute_diff, diff_lists, ConfigDiff, DiffLine, DirectiveDiff, SectionChange, SectionDiff,
};
pub use error::{ConfigDiffError, Result};
pub use output::{compare, format_diff, summarize, OutputFormat};
pub use parser::{parse_config, ConfigParser, ParserOptions};
