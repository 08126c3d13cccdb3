//! Decoding helpers shared by the manifest dialects.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Decode every document of a `---` separated stream. Empty documents are
/// skipped.
pub fn documents<T: DeserializeOwned>(source: &str) -> Result<Vec<T>> {
    let mut decoded = Vec::new();
    for document in serde_yaml::Deserializer::from_str(source) {
        if let Some(value) = Option::<T>::deserialize(document)? {
            decoded.push(value);
        }
    }
    Ok(decoded)
}

/// Decode only the first document of a manifest. Later `---` documents are
/// never parsed. An empty file decodes as the default.
pub fn document<T: DeserializeOwned + Default>(source: &str) -> Result<T> {
    match serde_yaml::Deserializer::from_str(source).next() {
        Some(first) => Ok(Option::<T>::deserialize(first)?.unwrap_or_default()),
        None => Ok(T::default()),
    }
}

/// Accept any scalar where a string is expected, keeping its spelling:
/// `version: 1.10` stays `"1.10"` and `version: ~` becomes empty.
pub fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Treat an explicit `null` like a missing key.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    struct Release {
        #[serde(default, deserialize_with = "lenient_string")]
        version: String,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn splits_document_stream() {
        let releases: Vec<Release> =
            documents("version: 1.0.0\n---\nversion: 2.0.0\n---\n").unwrap();
        let versions: Vec<&str> = releases.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["1.0.0", "2.0.0"]);
    }

    #[test]
    fn empty_source_has_no_documents() {
        assert!(documents::<Release>("").unwrap().is_empty());
        assert_eq!(document::<Release>("").unwrap().version, "");
    }

    #[test]
    fn scalars_become_strings() {
        let release: Release = document("version: 3\ntags: ~\n").unwrap();
        assert_eq!(release.version, "3");
        assert!(release.tags.is_empty());

        let release: Release = document("version: ~\n").unwrap();
        assert_eq!(release.version, "");
    }

    #[test]
    fn numbers_keep_their_spelling() {
        let release: Release = document("version: 1.10\n").unwrap();
        assert_eq!(release.version, "1.10");

        let releases: Vec<Release> = documents("version: 2.0\n---\nversion: 1.010\n").unwrap();
        let versions: Vec<&str> = releases.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["2.0", "1.010"]);
    }

    #[test]
    fn single_document_ignores_later_documents() {
        let release: Release = document("version: 1.0.0\n---\nfoo: [\n").unwrap();
        assert_eq!(release.version, "1.0.0");
    }

    #[test]
    fn rejects_non_scalar_strings() {
        assert!(document::<Release>("version: [1, 2]\n").is_err());
    }

    #[test]
    fn syntax_errors_propagate() {
        assert!(documents::<Release>("version: [unterminated\n").is_err());
    }
}
