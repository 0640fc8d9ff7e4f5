use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Extension appended to post names that don't have one.
pub const DEFAULT_EXTENSION: &str = "md";

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("post name must not be empty")]
    Empty,
    #[error("post name `{0}` must be a relative path")]
    Absolute(String),
    #[error("post name `{0}` must not point outside of the content directory")]
    OutsideContentDir(String),
}

/// A single request to create a new post.
#[derive(Clone, Debug)]
pub struct PostRequest {
    /// Path relative to the content directory, with extension.
    name: Utf8PathBuf,
    post_type: Option<String>,
    title: String,
}

impl PostRequest {
    /// Build a request from the user-supplied post name.
    ///
    /// The post type is, in order of preference, `explicit_type`, the first
    /// directory of `name` or `default_type`.
    pub fn new(
        name: &str,
        explicit_type: Option<String>,
        default_type: Option<&str>,
    ) -> Result<Self, ResolveError> {
        let name = normalize_name(name)?;
        let post_type = explicit_type
            .or_else(|| infer_type(&name).map(ToOwned::to_owned))
            .or_else(|| default_type.map(ToOwned::to_owned));

        Ok(Self { name, post_type, title: String::new() })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn name(&self) -> &Utf8Path {
        &self.name
    }

    pub fn post_type(&self) -> Option<&str> {
        self.post_type.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn target_path(&self, content_dir: &Utf8Path) -> Utf8PathBuf {
        content_dir.join(&self.name)
    }
}

/// Turn a user-supplied post name into a path relative to the content
/// directory.
///
/// Backslashes are treated as path separators and `.md` is appended if the
/// file name has no extension. `.` components are dropped, everything that
/// could leave the content directory is rejected.
pub fn normalize_name(name: &str) -> Result<Utf8PathBuf, ResolveError> {
    let name = name.replace('\\', "/");

    let mut path = Utf8PathBuf::new();
    for component in Utf8Path::new(&name).components() {
        match component {
            Utf8Component::Normal(part) => path.push(part),
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                return Err(ResolveError::OutsideContentDir(name.clone()));
            }
            Utf8Component::RootDir | Utf8Component::Prefix(_) => {
                return Err(ResolveError::Absolute(name.clone()));
            }
        }
    }

    if path.as_str().is_empty() {
        return Err(ResolveError::Empty);
    }

    if path.extension().is_none() {
        path = format!("{path}.{DEFAULT_EXTENSION}").into();
    }

    Ok(path)
}

/// The leading directory of a post name, if there is one.
pub fn infer_type(name: &Utf8Path) -> Option<&str> {
    let mut components = name.components();
    let first = components.next()?;
    // A bare file name has no directory to infer from.
    components.next()?;
    Some(first.as_str())
}
