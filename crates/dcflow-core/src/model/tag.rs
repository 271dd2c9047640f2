//! Tags and logical resource identity
//!
//! Every resource the engine manages is identified by the value of its
//! `Name` tag. The declared name is kept apart from the free-form tag list
//! so that the identity tag can never be lost or duplicated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of the tag that carries a resource's logical identity
pub const NAME_TAG: &str = "Name";

/// A single provider tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn is_name(&self) -> bool {
        self.key == NAME_TAG
    }
}

/// Ordered tag list as declared in the configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(Vec<Tag>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: Tag) {
        self.0.push(tag);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value of the first tag with the given key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    /// Value of the `Name` tag, if any
    pub fn name(&self) -> Option<&str> {
        self.get(NAME_TAG)
    }

    /// The full tag set sent on creation: `Name` first, then the declared
    /// tags without any `Name` entry of their own.
    pub fn with_identity(&self, name: &LogicalName) -> Tags {
        let mut tags = Vec::with_capacity(self.0.len() + 1);
        tags.push(Tag::new(NAME_TAG, name.as_str()));
        tags.extend(self.0.iter().filter(|t| !t.is_name()).cloned());
        Tags(tags)
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Tags(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The logical identity of a declared resource (its `Name` tag value)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalName(String);

impl LogicalName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for LogicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LogicalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LogicalName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LogicalName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for LogicalName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LogicalName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_identity_puts_name_first() {
        let tags: Tags = [Tag::new("class", "webservices")].into_iter().collect();
        let full = tags.with_identity(&LogicalName::from("web-vpc"));

        assert_eq!(full.len(), 2);
        assert_eq!(full.iter().next().unwrap(), &Tag::new("Name", "web-vpc"));
        assert_eq!(full.get("class"), Some("webservices"));
    }

    #[test]
    fn test_with_identity_replaces_declared_name_tag() {
        let tags: Tags = [Tag::new("Name", "web-vpc"), Tag::new("env", "dev")]
            .into_iter()
            .collect();
        let full = tags.with_identity(&LogicalName::from("web-vpc"));

        assert_eq!(full.iter().filter(|t| t.is_name()).count(), 1);
        assert_eq!(full.name(), Some("web-vpc"));
    }

    #[test]
    fn test_name_tag_is_case_sensitive() {
        let tags: Tags = [Tag::new("name", "lower")].into_iter().collect();
        assert_eq!(tags.name(), None);
    }

    #[test]
    fn test_tags_deserialize_from_key_value_pairs() {
        let tags: Tags =
            serde_json::from_str(r#"[{"Key": "class", "Value": "webservices"}]"#).unwrap();
        assert_eq!(tags.get("class"), Some("webservices"));
    }
}
