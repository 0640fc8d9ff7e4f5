use anyhow::Context as _;
use chrono::{DateTime, FixedOffset, Local, SubsecRound as _};
use indexmap::{IndexMap, indexmap};
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap as _};
use uuid::Uuid;

use crate::request::PostRequest;

/// Markers written after the front-matter block, in order.
pub const BODY_MARKERS: [&str; 3] = ["<!--description-->", "<!--more-->", "<!--content-->"];

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FrontmatterFormat {
    /// YAML between `---` lines.
    #[default]
    Yaml,
    /// TOML between `+++` lines.
    Toml,
}

impl FrontmatterFormat {
    pub fn delimiter(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// A concrete front-matter value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Datetime(DateTime<FixedOffset>),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Self::String(s),
            toml::Value::Integer(i) => Self::Integer(i),
            toml::Value::Float(f) => Self::Float(f),
            toml::Value::Boolean(b) => Self::Bool(b),
            // Local dates and times have no offset, keep them verbatim.
            toml::Value::Datetime(dt) => Self::String(dt.to_string()),
            toml::Value::Array(items) => Self::List(items.into_iter().map(Into::into).collect()),
            toml::Value::Table(table) => {
                Self::Map(table.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl Value {
    /// Convert to a TOML value. TOML has no null, so `None` means "leave out".
    fn to_toml(&self) -> Option<toml::Value> {
        let value = match self {
            Self::Null => return None,
            Self::Bool(b) => toml::Value::Boolean(*b),
            Self::Integer(i) => toml::Value::Integer(*i),
            Self::Float(f) => toml::Value::Float(*f),
            Self::String(s) => toml::Value::String(s.clone()),
            Self::Datetime(dt) => {
                let formatted = format_datetime(dt);
                match formatted.parse() {
                    Ok(dt) => toml::Value::Datetime(dt),
                    Err(_) => toml::Value::String(formatted),
                }
            }
            Self::List(items) => {
                toml::Value::Array(items.iter().filter_map(Self::to_toml).collect())
            }
            Self::Map(map) => toml::Value::Table(to_toml_table(map)),
        };

        Some(value)
    }
}

fn to_toml_table(map: &IndexMap<String, Value>) -> toml::Table {
    map.iter().filter_map(|(k, v)| Some((k.clone(), v.to_toml()?))).collect()
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Datetime(dt) => serializer.serialize_str(&format_datetime(dt)),
            Self::List(items) => serializer.collect_seq(items),
            Self::Map(map) => {
                let mut ser_map = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    ser_map.serialize_entry(k, v)?;
                }
                ser_map.end()
            }
        }
    }
}

/// A value that is only computed when the front-matter is generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    /// A random (v4) UUID.
    Uuid,
    /// The current local time, truncated to whole seconds.
    Now,
}

impl Deferred {
    fn evaluate(self) -> Value {
        match self {
            Self::Uuid => Value::String(Uuid::new_v4().to_string()),
            Self::Now => Value::Datetime(Local::now().trunc_subsecs(0).fixed_offset()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Literal(Value),
    Deferred(Deferred),
}

/// Default fields for the given post, before deferred values are evaluated.
///
/// `id`, `date`, `title` and `type` always come first, followed by the extra
/// fields of the post type, if it is known. Extra fields never replace one of
/// the default ones.
pub fn default_fields(request: &PostRequest, types: &TypeTable) -> IndexMap<String, FieldValue> {
    let post_type = match request.post_type() {
        Some(post_type) => Value::String(post_type.to_owned()),
        None => Value::Null,
    };

    let mut fields = indexmap! {
        "id".to_owned() => FieldValue::Deferred(Deferred::Uuid),
        "date".to_owned() => FieldValue::Deferred(Deferred::Now),
        "title".to_owned() => FieldValue::Literal(Value::String(request.title().to_owned())),
        "type".to_owned() => FieldValue::Literal(post_type),
    };

    let type_fields = request.post_type().and_then(|post_type| types.fields_for(post_type));
    for (key, value) in type_fields.into_iter().flatten() {
        fields.entry(key.clone()).or_insert_with(|| FieldValue::Literal(value.clone()));
    }

    fields
}

/// Generated front-matter, with every field resolved to a concrete value.
#[derive(Clone, Debug)]
pub struct Frontmatter {
    fields: IndexMap<String, Value>,
}

impl Frontmatter {
    pub fn generate(request: &PostRequest, types: &TypeTable) -> Self {
        Self::resolve(default_fields(request, types))
    }

    /// Evaluate every deferred field exactly once.
    pub fn resolve(fields: IndexMap<String, FieldValue>) -> Self {
        let fields = fields
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    FieldValue::Literal(value) => value,
                    FieldValue::Deferred(deferred) => deferred.evaluate(),
                };
                (key, value)
            })
            .collect();

        Self { fields }
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Render the front-matter block followed by the body markers.
    pub fn render(&self, format: FrontmatterFormat) -> anyhow::Result<String> {
        let delimiter = format.delimiter();
        let block = match format {
            FrontmatterFormat::Yaml => {
                serde_yaml::to_string(&self.fields).context("serializing YAML front-matter")?
            }
            FrontmatterFormat::Toml => toml::to_string(&to_toml_table(&self.fields))
                .context("serializing TOML front-matter")?,
        };

        let mut out = format!("{delimiter}\n{block}{delimiter}\n");
        for marker in BODY_MARKERS {
            out.push('\n');
            out.push_str(marker);
            out.push('\n');
        }
        Ok(out)
    }
}

pub(crate) fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, false)
}

/// Extra default fields for each known post type.
///
/// Built once from the builtin types plus the `[types]` table of the config
/// file, and not changed afterwards.
#[derive(Clone, Debug)]
pub struct TypeTable {
    types: IndexMap<String, IndexMap<String, Value>>,
}

impl TypeTable {
    pub fn builtin() -> Self {
        Self {
            types: indexmap! {
                "blog".to_owned() => indexmap! {
                    "tags".to_owned() => Value::List(Vec::new()),
                    "categories".to_owned() => Value::List(Vec::new()),
                },
            },
        }
    }

    pub(crate) fn from_map(map: IndexMap<String, IndexMap<String, toml::Value>>) -> Self {
        let mut table = Self::builtin();
        for (name, fields) in map {
            let fields = fields.into_iter().map(|(k, v)| (k, v.into())).collect();
            table.types.insert(name, fields);
        }
        table
    }

    pub fn fields_for(&self, post_type: &str) -> Option<&IndexMap<String, Value>> {
        self.types.get(post_type)
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'de> Deserialize<'de> for TypeTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map: IndexMap<String, IndexMap<String, toml::Value>> =
            IndexMap::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}
