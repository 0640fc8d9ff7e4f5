use anyhow::Context as _;
use camino::Utf8Path;
use fs_err as fs;
use indexmap::IndexMap;
use minijinja::{UndefinedBehavior, syntax::SyntaxConfig};
use serde::Serialize;

use crate::frontmatter::{Frontmatter, Value};

const TEMPLATE_NAME: &str = "new_post";

#[derive(Serialize)]
struct TemplateContext<'a> {
    /// All generated fields, also available as top-level variables.
    fields: &'a IndexMap<String, Value>,
    #[serde(flatten)]
    top_level: &'a IndexMap<String, Value>,
}

/// Render the template at `path` with the resolved front-matter fields.
pub(crate) fn render_template(path: &Utf8Path, frontmatter: &Frontmatter) -> anyhow::Result<String> {
    let source = fs::read_to_string(path)?;

    let mut env = environment()?;
    env.add_template(TEMPLATE_NAME, &source)
        .with_context(|| format!("Failed to parse template `{path}`"))?;

    let fields = frontmatter.fields();
    env.get_template(TEMPLATE_NAME)?
        .render(TemplateContext { fields, top_level: fields })
        .with_context(|| format!("Failed to render template `{path}`"))
}

/// Template environment using `{name}` for variables, the same placeholders
/// as Python's `str.format`.
fn environment<'a>() -> anyhow::Result<minijinja::Environment<'a>> {
    let mut env = minijinja::Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);

    let syntax = SyntaxConfig::builder()
        .block_delimiters("{%", "%}")
        .variable_delimiters("{", "}")
        .comment_delimiters("{#", "#}")
        .build()
        .context("invalid template syntax")?;
    env.set_syntax(syntax);

    Ok(env)
}
