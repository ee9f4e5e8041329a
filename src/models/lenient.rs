//! Lenient field decoding.
//!
//! The metadata service is loose about field shapes: a creator may arrive as
//! `"Bach"` on one item and `["Bach", "Gould"]` on the next, and new media type
//! or file format spellings appear without notice. The helpers here are meant
//! for `#[serde(deserialize_with = "...")]` and never reject a payload for
//! those reasons.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A closed set of variants decoded from an exact, case-sensitive lookup table.
pub trait KnownVariants: Sized + Copy + PartialEq + 'static {
    /// Upstream spelling of every known variant.
    const TABLE: &'static [(&'static str, Self)];

    /// Variant used for spellings missing from [`Self::TABLE`].
    const UNKNOWN: Self;
}

/// Resolve a raw upstream string against the variant table.
pub fn lookup<T: KnownVariants>(raw: &str) -> T {
    T::TABLE
        .iter()
        .find(|(name, _)| *name == raw)
        .map(|(_, variant)| *variant)
        .unwrap_or(T::UNKNOWN)
}

/// Upstream spelling of a variant, if it has one.
pub fn spelling<T: KnownVariants>(variant: T) -> Option<&'static str> {
    T::TABLE
        .iter()
        .find(|(_, known)| *known == variant)
        .map(|(name, _)| *name)
}

/// Decode a "string or array of strings" field into a list.
///
/// Absent and `null` fields yield an empty list (pair with `#[serde(default)]`).
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(normalize_list).unwrap_or_default())
}

/// Decode a nominally scalar text field.
///
/// Numbers are rendered as text and arrays contribute their first scalar.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(normalize_text))
}

/// Like [`optional_text`] but yields an empty string when absent.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_text(deserializer).map(Option::unwrap_or_default)
}

/// Decode a mandatory enumerated field. Unknown spellings map to the fallback.
pub fn variant<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: KnownVariants,
{
    let raw = String::deserialize(deserializer)?;
    Ok(lookup(&raw))
}

/// Decode an optional enumerated field. Non-string values are treated as absent.
pub fn optional_variant<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: KnownVariants,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => Some(lookup(&raw)),
        _ => None,
    })
}

/// Normalize an arbitrary JSON value into a list of strings.
pub fn normalize_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    }
}

fn normalize_text(value: Value) -> Option<String> {
    match value {
        Value::Array(items) => items.into_iter().find_map(scalar_text),
        other => scalar_text(other),
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Color {
        Red,
        Blue,
        Other,
    }

    impl KnownVariants for Color {
        const TABLE: &'static [(&'static str, Self)] = &[("red", Color::Red), ("blue", Color::Blue)];
        const UNKNOWN: Self = Color::Other;
    }

    #[derive(Debug, Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "string_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "optional_text")]
        title: Option<String>,
        #[serde(deserialize_with = "variant")]
        color: Color,
        #[serde(default, deserialize_with = "optional_variant")]
        accent: Option<Color>,
    }

    fn decode(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scalar_becomes_single_element_list() {
        let record = decode(json!({ "tags": "piano", "color": "red" }));
        assert_eq!(record.tags, vec!["piano".to_string()]);
    }

    #[test]
    fn test_array_is_kept_in_order() {
        let record = decode(json!({ "tags": ["piano", "solo", "2010"], "color": "red" }));
        assert_eq!(record.tags, vec!["piano", "solo", "2010"]);
    }

    #[test]
    fn test_absent_and_null_lists_are_empty() {
        assert!(decode(json!({ "color": "red" })).tags.is_empty());
        assert!(decode(json!({ "tags": null, "color": "red" })).tags.is_empty());
    }

    #[test]
    fn test_odd_list_shapes_do_not_fail() {
        assert_eq!(decode(json!({ "tags": 1978, "color": "red" })).tags, vec!["1978"]);
        assert!(decode(json!({ "tags": { "a": 1 }, "color": "red" })).tags.is_empty());
        assert_eq!(
            decode(json!({ "tags": ["a", null, 2], "color": "red" })).tags,
            vec!["a", "2"]
        );
    }

    #[test]
    fn test_text_takes_first_of_array() {
        let record = decode(json!({ "title": ["First", "Second"], "color": "red" }));
        assert_eq!(record.title.as_deref(), Some("First"));
    }

    #[test]
    fn test_unknown_variant_falls_back() {
        let record = decode(json!({ "color": "chartreuse", "accent": "Blue" }));
        assert_eq!(record.color, Color::Other);
        // Lookup is case-sensitive.
        assert_eq!(record.accent, Some(Color::Other));
    }

    #[test]
    fn test_optional_variant_ignores_non_strings() {
        let record = decode(json!({ "color": "blue", "accent": 7 }));
        assert_eq!(record.color, Color::Blue);
        assert_eq!(record.accent, None);
    }

    #[test]
    fn test_mandatory_variant_must_be_present() {
        let result = serde_json::from_value::<Record>(json!({ "tags": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_spelling_round_trips_table() {
        assert_eq!(spelling(Color::Blue), Some("blue"));
        assert_eq!(spelling(Color::Other), None);
        assert_eq!(lookup::<Color>("red"), Color::Red);
    }
}
