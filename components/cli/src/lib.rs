use camino::Utf8PathBuf;

/// Create a new content file with pre-filled front-matter.
#[derive(clap::Parser)]
#[command(version)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(long, short, default_value = "sprout.toml")]
    pub config: Utf8PathBuf,

    /// New post file name, this can be a path.
    ///
    /// Eg. blog/tutorials/my_post.md. If no extension is given, `.md` is
    /// appended.
    pub name: String,

    /// The type of the new post.
    ///
    /// Defaults to the first directory of the post name, if it has one.
    #[arg(long = "type", short = 't')]
    pub post_type: Option<String>,

    /// Title to pre-fill in the front-matter.
    #[arg(long)]
    pub title: Option<String>,

    /// Front-matter format. Overrides the configuration file.
    #[arg(long, short, value_enum)]
    pub format: Option<FormatArg>,

    /// Template to render instead of generating structured front-matter.
    ///
    /// Relative to the working directory. Fields are substituted for `{id}`,
    /// `{date}`, `{title}`, `{type}` and so on; `{% ... %}` blocks are
    /// available as well.
    #[arg(long)]
    pub template: Option<Utf8PathBuf>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum FormatArg {
    /// `---` delimited YAML.
    Yaml,
    /// `+++` delimited TOML.
    Toml,
}
