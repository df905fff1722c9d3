use std::path::{Path, PathBuf};

use clap::Parser;

use haproxy_config_diff::{
    compute_diff, format_diff, summarize, Config, ConfigDiffError, ConfigParser, OutputFormat,
    ParserOptions, Result,
};

#[derive(Parser)]
#[command(name = "haproxy-config-diff")]
#[command(about = "Compare two HAProxy configurations, ignoring formatting and irrelevant ordering")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Show semantic differences
    haproxy-config-diff old/haproxy.cfg new/haproxy.cfg

    # Machine-readable output
    haproxy-config-diff --format json old/haproxy.cfg new/haproxy.cfg

    # Inspect the normalized trees
    haproxy-config-diff --dump old/haproxy.cfg new/haproxy.cfg

Lines of timeout, acl, bind, server, option and stats are compared without
regard to order. Set RUST_LOG=haproxy_config_diff=debug for parser tracing.
"#)]
pub struct Cli {
    /// Original configuration file
    pub old: PathBuf,

    /// Changed configuration file
    pub new: PathBuf,

    /// Output format: text, json
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Also sort order-insensitive directives in the last section of each file
    #[arg(long)]
    pub sort_last_section: bool,

    /// Print the normalized trees as JSON instead of a diff
    #[arg(long)]
    pub dump: bool,
}

impl Cli {
    pub fn parser(&self) -> ConfigParser {
        ConfigParser::new(ParserOptions {
            sort_last_section: self.sort_last_section,
        })
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        OutputFormat::from_str(&self.format)
            .ok_or_else(|| ConfigDiffError::UnknownFormat(self.format.clone()))
    }
}

/// Parse both files; the two parses run in parallel.
fn parse_pair(parser: &ConfigParser, old: &Path, new: &Path) -> Result<(Config, Config)> {
    let (old_config, new_config) =
        rayon::join(|| parser.parse_file(old), || parser.parse_file(new));
    Ok((old_config?, new_config?))
}

pub fn diff_files(
    parser: &ConfigParser,
    old: &Path,
    new: &Path,
    format: OutputFormat,
) -> Result<String> {
    let (old_config, new_config) = parse_pair(parser, old, new)?;

    let diff = compute_diff(&old_config, &new_config);
    tracing::info!("{}", summarize(&diff));
    tracing::debug!("rendering diff as {}", format.as_str());

    format_diff(&diff, format)
}

pub fn dump_files(parser: &ConfigParser, old: &Path, new: &Path) -> Result<String> {
    let (old_config, new_config) = parse_pair(parser, old, new)?;

    let trees = serde_json::json!({
        "old": old_config,
        "new": new_config,
    });
    Ok(serde_json::to_string_pretty(&trees)?)
}
