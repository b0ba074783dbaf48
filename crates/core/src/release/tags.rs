//! Opaque, normalized tags for set-valued release attributes.
//!
//! Indexer flags, languages and qualities are open-ended vocabularies that
//! grow with every new indexer, so they are modelled as normalized strings
//! rather than closed enums or bitmasks. Matching is a set intersection.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

macro_rules! normalized_tag {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a tag, trimming and lowercasing the value.
            pub fn new(value: impl AsRef<str>) -> Self {
                Self(value.as_ref().trim().to_lowercase())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the value normalized to nothing.
            pub fn is_blank(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(tag: $name) -> Self {
                tag.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

normalized_tag!(
    /// A flag attached to a release by its indexer (freeleech, internal, ...).
    IndexerFlag
);

normalized_tag!(
    /// A spoken/audio language of a release, or of a media item.
    Language
);

normalized_tag!(
    /// A quality/format label such as `bluray-1080p` or `webdl-2160p`.
    Quality
);

/// Well-known indexer flag values.
pub mod flags {
    pub const FREELEECH: &str = "freeleech";
    pub const HALFLEECH: &str = "halfleech";
    pub const FREELEECH75: &str = "freeleech75";
    pub const FREELEECH25: &str = "freeleech25";
    pub const DOUBLE_UPLOAD: &str = "double_upload";
    pub const INTERNAL: &str = "internal";
    pub const SCENE: &str = "scene";
    pub const GOLDEN: &str = "golden";
    pub const APPROVED: &str = "approved";
    pub const USER_RELEASE: &str = "user_release";
}

impl Language {
    /// Placeholder that resolves to the media's original language.
    pub const ORIGINAL: &'static str = "original";
    /// Placeholder that matches every language.
    pub const ANY: &'static str = "any";

    pub fn is_original(&self) -> bool {
        self.0 == Self::ORIGINAL
    }

    pub fn is_any(&self) -> bool {
        self.0 == Self::ANY
    }
}

/// Build a tag set from string values. Blank values are dropped.
pub fn tag_set<T>(values: &[&str]) -> BTreeSet<T>
where
    T: for<'a> From<&'a str> + Ord + AsRef<str>,
{
    values
        .iter()
        .map(|v| T::from(*v))
        .filter(|t| !t.as_ref().is_empty())
        .collect()
}

/// Deserialize a tag set, dropping blank values.
pub(crate) fn deserialize_tag_set<'de, D, T>(deserializer: D) -> Result<BTreeSet<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Ord + AsRef<str>,
{
    let tags = Vec::<T>::deserialize(deserializer)?;
    Ok(tags.into_iter().filter(|t| !t.as_ref().is_empty()).collect())
}

/// Like [`deserialize_tag_set`], keeping `null` as unknown.
pub(crate) fn deserialize_optional_tag_set<'de, D, T>(
    deserializer: D,
) -> Result<Option<BTreeSet<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Ord + AsRef<str>,
{
    let tags = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(tags.map(|tags| tags.into_iter().filter(|t| !t.as_ref().is_empty()).collect()))
}

/// Deserialize a single tag. A blank value is unknown.
pub(crate) fn deserialize_optional_tag<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + AsRef<str>,
{
    let tag = Option::<T>::deserialize(deserializer)?;
    Ok(tag.filter(|t| !t.as_ref().is_empty()))
}

/// Render a set as `[a, b, c]` for rejection messages.
pub fn format_set<T: fmt::Display>(set: &BTreeSet<T>) -> String {
    let items: Vec<String> = set.iter().map(|t| t.to_string()).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_normalized() {
        assert_eq!(IndexerFlag::new("  FreeLeech "), IndexerFlag::new("freeleech"));
        assert_eq!(Quality::from("Bluray-1080p").as_str(), "bluray-1080p");
    }

    #[test]
    fn test_tag_deserialization_normalizes() {
        let flag: IndexerFlag = serde_json::from_str("\"Internal\"").unwrap();
        assert_eq!(flag.as_str(), flags::INTERNAL);
        assert_eq!(serde_json::to_string(&flag).unwrap(), "\"internal\"");
    }

    #[test]
    fn test_language_placeholders() {
        assert!(Language::new("Original").is_original());
        assert!(Language::new("ANY").is_any());
        assert!(!Language::new("english").is_any());
    }

    #[test]
    fn test_tag_set_drops_blank_values() {
        let set: BTreeSet<Language> = tag_set(&["english", "  ", ""]);
        assert_eq!(set, tag_set(&["english"]));
        assert!(Quality::new(" ").is_blank());
    }

    #[test]
    fn test_format_set() {
        let set: BTreeSet<IndexerFlag> = tag_set(&["scene", "freeleech"]);
        assert_eq!(format_set(&set), "[freeleech, scene]");
        assert_eq!(format_set(&BTreeSet::<IndexerFlag>::new()), "[]");
    }
}
