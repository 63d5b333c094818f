//! Lenient deserializers for loosely typed tracker JSON.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Accepts `8.5`, `"8.5"`, `"8,5"`, `""` or `null`. Unparseable text and
/// zero both map to `None`.
pub fn score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrString>::deserialize(deserializer)?;
    let value = match raw {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().replace(',', ".").parse::<f64>().ok(),
        None => None,
    };
    Ok(value.filter(|v| v.is_finite() && *v != 0.0))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<Option<String>>),
}

/// Accepts a string, an array of (nullable) strings, or `null`.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(match raw {
        Some(OneOrMany::One(s)) if !s.is_empty() => vec![s],
        Some(OneOrMany::Many(items)) => items.into_iter().flatten().collect(),
        _ => Vec::new(),
    })
}

/// Treats `null` as the type's default (used for list fields).
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(default, deserialize_with = "score")]
        score: Option<f64>,
        #[serde(default, deserialize_with = "string_list")]
        names: Vec<String>,
    }

    fn decode(json: &str) -> Wrapper {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_score_forms() {
        assert_eq!(decode(r#"{"score": "8.75"}"#).score, Some(8.75));
        assert_eq!(decode(r#"{"score": "7,5"}"#).score, Some(7.5));
        assert_eq!(decode(r#"{"score": 9}"#).score, Some(9.0));
        assert_eq!(decode(r#"{"score": "0.0"}"#).score, None);
        assert_eq!(decode(r#"{"score": null}"#).score, None);
        assert_eq!(decode("{}").score, None);
    }

    #[test]
    fn test_string_list_forms() {
        assert_eq!(decode(r#"{"names": "Frieren"}"#).names, vec!["Frieren"]);
        assert_eq!(
            decode(r#"{"names": ["A", null, "B"]}"#).names,
            vec!["A", "B"]
        );
        assert!(decode(r#"{"names": null}"#).names.is_empty());
        assert!(decode("{}").names.is_empty());
    }
}
