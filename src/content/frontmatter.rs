//! Front-matter parsing

use serde_json::Value;
use thiserror::Error;

/// Front-matter keys in the order the author wrote them
pub type Metadata = serde_json::Map<String, Value>;

const DELIMITER: &str = "---";

/// Errors emitted while splitting a post into front-matter and body
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("unterminated front-matter block: expected closing '---'")]
    Unterminated,
    #[error("unsupported front-matter language '{0}'")]
    UnsupportedLanguage(String),
    #[error("{0}")]
    Yaml(String),
    #[error("front-matter must be a YAML mapping at the top level")]
    InvalidRootType,
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub data: Metadata,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        // `----` opens a thematic break, not a front-matter block
        if !content.starts_with(DELIMITER) || content[DELIMITER.len()..].starts_with('-') {
            return Ok((FrontMatter::default(), content));
        }

        let after_open = &content[DELIMITER.len()..];
        let language = match after_open.find('\n') {
            Some(pos) => after_open[..pos].trim_end_matches('\r'),
            None => after_open,
        };
        let lang = language.trim();
        if !lang.is_empty() && lang != "yaml" {
            return Err(FrontMatterError::UnsupportedLanguage(lang.to_string()));
        }

        // The block still starts with the opening line's newline, so an empty
        // block closes immediately.
        let rest = &after_open[language.len()..];
        let close = format!("\n{}", DELIMITER);
        let close_pos = rest.find(&close).ok_or(FrontMatterError::Unterminated)?;

        let yaml_content = &rest[..close_pos];
        let remaining = &rest[close_pos + close.len()..];
        let remaining = remaining.strip_prefix('\r').unwrap_or(remaining);
        let remaining = remaining.strip_prefix('\n').unwrap_or(remaining);

        let data = parse_yaml_block(yaml_content)?;
        Ok((FrontMatter { data }, remaining))
    }

    /// Look up a front-matter field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn into_metadata(self) -> Metadata {
        self.data
    }
}

fn parse_yaml_block(block: &str) -> Result<Metadata, FrontMatterError> {
    if block.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|e| FrontMatterError::Yaml(e.to_string()))?;
    let json = serde_json::to_value(yaml).map_err(|e| FrontMatterError::Yaml(e.to_string()))?;

    match json {
        Value::Null => Ok(Metadata::new()),
        Value::Object(map) => Ok(map),
        _ => Err(FrontMatterError::InvalidRootType),
    }
}
