use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::frontmatter::{FrontmatterFormat, TypeTable};

#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_content_dir")]
    content_dir: Utf8PathBuf,
    #[serde(default)]
    template: Option<Utf8PathBuf>,

    /// Front-matter format used when no template is configured.
    #[serde(default)]
    pub format: FrontmatterFormat,

    /// Post type used when neither `--type` is given nor one can be inferred
    /// from the post name.
    #[serde(default)]
    pub default_type: Option<String>,

    /// Extra default fields per post type, merged over the builtin types.
    #[serde(default)]
    pub types: TypeTable,

    /// The path to the config file.
    ///
    /// Populated by [`read_config`][crate::read_config] after deserialization.
    #[serde(skip, default)]
    pub(crate) path: Utf8PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            template: None,
            format: FrontmatterFormat::default(),
            default_type: None,
            types: TypeTable::default(),
            path: Utf8PathBuf::new(),
        }
    }
}

impl Config {
    pub fn content_dir(&self) -> Utf8PathBuf {
        self.project_root().join(&self.content_dir)
    }

    pub fn template(&self) -> Option<Utf8PathBuf> {
        self.template.as_ref().map(|template| self.project_root().join(template))
    }

    /// Override the configured template.
    ///
    /// Relative paths are still resolved against the project root, so callers
    /// should pass an absolute path for anything relative to the working
    /// directory.
    pub fn set_template(&mut self, value: Utf8PathBuf) {
        self.template = Some(value);
    }

    /// Get the "project root", that is the parent directory of the config file.
    ///
    /// Content and template paths from the config are treated as relative to
    /// this.
    fn project_root(&self) -> &Utf8Path {
        assert_ne!(self.path, "", "config path must be set at this point");
        self.path.parent().expect("config path must have a parent")
    }
}

fn default_content_dir() -> Utf8PathBuf {
    "content".into()
}

#[cfg(test)]
mod tests {
    use camino::Utf8Path;

    use super::Config;
    use crate::frontmatter::{FrontmatterFormat, Value};

    fn parse(s: &str) -> Config {
        let mut config: Config = toml::from_str(s).unwrap();
        config.path = "site/sprout.toml".into();
        config
    }

    #[test]
    fn defaults() {
        let config = parse("");
        assert_eq!(config.content_dir(), Utf8Path::new("site/content"));
        assert_eq!(config.template(), None);
        assert_eq!(config.format, FrontmatterFormat::Yaml);
        assert!(config.types.fields_for("blog").is_some());
    }

    #[test]
    fn paths_are_relative_to_config_file() {
        let config = parse(
            r#"
            content_dir = "posts"
            template = "templates/new_post.md"
            format = "toml"
            "#,
        );
        assert_eq!(config.content_dir(), Utf8Path::new("site/posts"));
        assert_eq!(config.template().unwrap(), Utf8Path::new("site/templates/new_post.md"));
        assert_eq!(config.format, FrontmatterFormat::Toml);
    }

    #[test]
    fn custom_types_keep_field_order() {
        let config = parse(
            r#"
            [types.recipe]
            servings = 2
            ingredients = []
            vegan = false

            [types.blog]
            series = ""
            "#,
        );

        let recipe = config.types.fields_for("recipe").unwrap();
        let keys: Vec<_> = recipe.keys().map(String::as_str).collect();
        assert_eq!(keys, ["servings", "ingredients", "vegan"]);
        assert_eq!(recipe["servings"], Value::Integer(2));

        // Configured types replace builtin ones wholesale.
        let blog = config.types.fields_for("blog").unwrap();
        assert_eq!(blog.len(), 1);
        assert_eq!(blog["series"], Value::String(String::new()));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("output_dir = \"build\"").is_err());
    }
}
