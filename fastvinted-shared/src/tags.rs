/// Search tag input handling
///
/// Tags are stored in a `TEXT[]` column and always leave the API as a JSON
/// list. Input is more forgiving: the dashboard sends a list, but older
/// clients post the list JSON-encoded inside a string, or a plain
/// comma-separated string. All three shapes end up as the same `Vec<String>`.
///
/// ```
/// use fastvinted_shared::tags::TagsInput;
///
/// let from_list: TagsInput = serde_json::from_str(r#"["nike", " vintage "]"#).unwrap();
/// let from_csv: TagsInput = serde_json::from_str(r#""nike,vintage""#).unwrap();
///
/// assert_eq!(from_list.into_tags(), vec!["nike", "vintage"]);
/// assert_eq!(from_csv.into_tags(), vec!["nike", "vintage"]);
/// ```

use serde::{Deserialize, Serialize};

/// Longest accepted tag, in characters
pub const MAX_TAG_LENGTH: usize = 100;

/// Most tags a single search may carry
pub const MAX_TAGS: usize = 50;

/// Tags as received in a request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Text(String),
}

impl Default for TagsInput {
    fn default() -> Self {
        TagsInput::List(Vec::new())
    }
}

impl TagsInput {
    /// Normalizes the input into a list of trimmed, non-empty tags
    ///
    /// Order is preserved. A tag may contain a comma when it arrives as a
    /// list element; only the plain-string shape is split on commas.
    pub fn into_tags(self) -> Vec<String> {
        let raw = match self {
            TagsInput::List(tags) => tags,
            TagsInput::Text(text) => match serde_json::from_str::<Vec<String>>(&text) {
                Ok(tags) => tags,
                Err(_) => text.split(',').map(str::to_string).collect(),
            },
        };

        raw.into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

/// Checks tag count and length limits
///
/// Returns a human-readable message for the first violation.
pub fn validate_tags(tags: &[String]) -> Result<(), String> {
    if tags.len() > MAX_TAGS {
        return Err(format!("At most {} tags are allowed", MAX_TAGS));
    }

    if let Some(tag) = tags.iter().find(|t| t.chars().count() > MAX_TAG_LENGTH) {
        return Err(format!(
            "Tag '{}...' exceeds {} characters",
            tag.chars().take(20).collect::<String>(),
            MAX_TAG_LENGTH
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<String> {
        serde_json::from_str::<TagsInput>(json).unwrap().into_tags()
    }

    #[test]
    fn test_list_is_kept_in_order() {
        assert_eq!(parse(r#"["nike","vintage"]"#), vec!["nike", "vintage"]);
    }

    #[test]
    fn test_comma_inside_list_element_survives() {
        assert_eq!(parse(r#"["a,b","c"]"#), vec!["a,b", "c"]);
    }

    #[test]
    fn test_json_encoded_string() {
        assert_eq!(parse(r#""[\"nike\",\"adidas\"]""#), vec!["nike", "adidas"]);
    }

    #[test]
    fn test_comma_separated_string() {
        assert_eq!(parse(r#""nike, vintage,,""#), vec!["nike", "vintage"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(parse(r#"[]"#).is_empty());
        assert!(parse(r#""""#).is_empty());
        assert!(parse(r#"["  "]"#).is_empty());
        assert!(TagsInput::default().into_tags().is_empty());
    }

    #[test]
    fn test_validate_tags_limits() {
        assert!(validate_tags(&["ok".to_string()]).is_ok());

        let too_many: Vec<String> = (0..=MAX_TAGS).map(|i| i.to_string()).collect();
        assert!(validate_tags(&too_many).is_err());

        let too_long = vec!["x".repeat(MAX_TAG_LENGTH + 1)];
        assert!(validate_tags(&too_long).is_err());
    }
}
