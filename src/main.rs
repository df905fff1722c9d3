mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "haproxy_config_diff=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let parser = cli.parser();

    let report = if cli.dump {
        cli::dump_files(&parser, &cli.old, &cli.new)?
    } else {
        let format = cli.output_format()?;
        cli::diff_files(&parser, &cli.old, &cli.new, format)?
    };

    if !report.is_empty() {
        println!("{}", report.trim_end());
    }

    Ok(())
}
