//! Front matter parsing and serialization
//!
//! Posts are stored as `---\n<yaml>\n---\n<body>`. Round-trip law:
//! `parse(serialize(matter, body)) == (matter, body)`.

use crate::error::{ContentError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Structured metadata of a post file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Splits a raw post file into front matter and body
///
/// A file without an opening fence is all body with empty metadata; one
/// corrupt YAML block is an error the caller may choose to swallow.
pub fn parse(raw: &str) -> Result<(FrontMatter, String)> {
    let rest = match raw.strip_prefix("---\n") {
        Some(rest) => rest,
        None => return Ok((FrontMatter::default(), raw.to_string())),
    };

    // A close fence directly after the open fence is an empty block
    let (yaml, body) = if let Some(body) = rest.strip_prefix("---\n") {
        ("", body)
    } else if rest == "---" {
        ("", "")
    } else {
        match rest.find("\n---\n") {
            Some(i) => (&rest[..i], &rest[i + 5..]),
            None if rest.ends_with("\n---") => (&rest[..rest.len() - 4], ""),
            None => {
                return Err(ContentError::FrontMatter(
                    "unterminated front matter fence".to_string(),
                ));
            }
        }
    };

    let matter = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(yaml).map_err(|e| ContentError::FrontMatter(e.to_string()))?
    };

    Ok((matter, body.to_string()))
}

/// Serializes front matter and body back to the stored text format
pub fn serialize(matter: &FrontMatter, body: &str) -> Result<String> {
    let yaml =
        serde_yaml::to_string(matter).map_err(|e| ContentError::FrontMatter(e.to_string()))?;
    Ok(format!("---\n{}---\n{}", yaml, body))
}
