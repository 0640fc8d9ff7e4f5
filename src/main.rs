use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;
use sprout_cli::{CliArgs, FormatArg};
use sprout_core::{FrontmatterFormat, PostRequest, new_post, read_config};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Exit status for runtime errors, the same one `exit(-1)` produces.
const EXIT_ERROR: u8 = 255;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sprout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let mut config = read_config(&args.config)?;

    if let Some(format) = args.format {
        config.format = match format {
            FormatArg::Yaml => FrontmatterFormat::Yaml,
            FormatArg::Toml => FrontmatterFormat::Toml,
        };
    }
    if let Some(template) = args.template {
        // Relative to the working directory, unlike paths in the config file.
        let template = template
            .canonicalize_utf8()
            .with_context(|| format!("Failed to open template `{template}`"))?;
        config.set_template(template);
    }

    let request = PostRequest::new(&args.name, args.post_type, config.default_type.as_deref())?
        .with_title(args.title.unwrap_or_default());

    new_post(&config, &request)?;
    Ok(())
}
