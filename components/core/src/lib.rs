use std::io;

use anyhow::{Context as _, anyhow};
use camino::Utf8Path;
use fs_err as fs;
use tracing::debug;

pub mod config;
pub mod frontmatter;
pub mod request;
pub mod scaffold;
mod template;

pub use self::{
    config::Config,
    frontmatter::{Frontmatter, FrontmatterFormat},
    request::PostRequest,
    scaffold::{AlreadyExists, new_post},
};

/// File name of the configuration file that is allowed to be missing.
pub const DEFAULT_CONFIG_FILE: &str = "sprout.toml";

pub fn read_config(path: &Utf8Path) -> anyhow::Result<Config> {
    let mut config = match fs::read_to_string(path) {
        Ok(config_str) => {
            toml::from_str(&config_str).with_context(|| format!("Failed to parse `{path}`"))?
        }
        Err(e)
            if e.kind() == io::ErrorKind::NotFound
                && path.file_name() == Some(DEFAULT_CONFIG_FILE) =>
        {
            // Running without a config file is the common case.
            debug!("`{path}` not found, falling back to defaults");
            Config::default()
        }
        Err(e) => {
            return Err(anyhow!(e).context(format!("Failed to open `{path}`")));
        }
    };

    config.path = path.to_owned();
    Ok(config)
}
