use std::io::{self, Write as _};

use anyhow::Context as _;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err::{self as fs, OpenOptions};
use tracing::{debug, info};

use crate::{config::Config, frontmatter::Frontmatter, request::PostRequest, template};

/// The target of a new post is already taken.
#[derive(Debug, thiserror::Error)]
#[error("`{path}` already exists")]
pub struct AlreadyExists {
    pub path: Utf8PathBuf,
}

/// Create the file for a new post and return its path.
///
/// Fails with [`AlreadyExists`] before touching the filesystem if anything is
/// in the way of the target path. Parent directories are created as needed.
pub fn new_post(config: &Config, request: &PostRequest) -> anyhow::Result<Utf8PathBuf> {
    let target = request.target_path(&config.content_dir());
    debug!(?target, post_type = request.post_type(), "resolved new post");

    ensure_vacant(&target)?;

    // Generate everything up front so that a broken template doesn't leave
    // empty directories behind.
    let frontmatter = Frontmatter::generate(request, &config.types);
    let contents = match config.template() {
        Some(template) => template::render_template(&template, &frontmatter)?,
        None => frontmatter.render(config.format)?,
    };

    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir).context("creating content subdirectory")?;
    }
    write_new(&target, &contents)?;

    info!("created `{target}`");
    Ok(target)
}

fn ensure_vacant(path: &Utf8Path) -> anyhow::Result<()> {
    // Doesn't follow symlinks, a dangling one still counts as taken.
    match fs::symlink_metadata(path) {
        Ok(_) => Err(AlreadyExists { path: path.to_owned() }.into()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn write_new(path: &Utf8Path, contents: &str) -> anyhow::Result<()> {
    // create_new closes the gap between the existence check and this write.
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(AlreadyExists { path: path.to_owned() }.into());
        }
        Err(e) => return Err(e.into()),
    };

    file.write_all(contents.as_bytes())?;
    Ok(())
}
