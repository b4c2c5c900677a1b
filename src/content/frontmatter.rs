//! Front-matter parsing

use serde_yaml::{Mapping, Value};

/// Front-matter data from a content file.
///
/// The YAML block is kept as an untyped mapping; records pull typed fields
/// out of it through the accessors below, each of which falls back to
/// "absent" when the key is missing or holds an unexpected type.
#[derive(Debug, Clone, Default)]
pub struct FrontMatter {
    fields: Mapping,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), serde_yaml::Error> {
        let Some((yaml, body)) = split_yaml_block(content) else {
            return Ok((FrontMatter::default(), content));
        };

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let fields = match serde_yaml::from_str::<Value>(yaml)? {
            Value::Mapping(fields) => fields,
            other => {
                tracing::debug!("Front-matter is not a mapping, ignoring: {:?}", other);
                Mapping::new()
            }
        };

        Ok((Self { fields }, body))
    }

    /// Whether the key is present at all
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// A scalar field rendered as a string. Numbers and booleans are
    /// stringified; null, lists and maps count as absent.
    pub fn string(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(scalar_to_string)
    }

    /// A string field that is absent or empty resolves to `""`
    pub fn string_or_empty(&self, key: &str) -> String {
        self.string(key).unwrap_or_default()
    }

    /// A list of strings. A single scalar is treated as a one-element list.
    pub fn strings(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(value) => scalar_to_string(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// A boolean flag; anything other than `true` reads as `false`
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.fields.get(key), Some(Value::Bool(true)))
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

/// Split `---` delimited YAML from the body.
///
/// The opening delimiter must be the very first line; the block ends at the
/// next line consisting of `---` alone.
fn split_yaml_block(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}
