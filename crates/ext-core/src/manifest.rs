//! Extension manifest model
//!
//! One manifest per extension description file. Parsing is total: malformed
//! text yields a `ParseFailure` value instead of panicking, and no semantic
//! validation happens at parse time. A syntactically valid but incomplete
//! document parses successfully and is scrutinized later by rules.

use serde::{Deserialize, Deserializer};

/// Metadata keys a rule can require before its body runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKey {
    Category,
    ScmUrl,
    ScmRevision,
    Depends,
}

impl ManifestKey {
    /// The key name as it appears in the description file.
    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestKey::Category => "category",
            ManifestKey::ScmUrl => "scm_url",
            ManifestKey::ScmRevision => "scm_revision",
            ManifestKey::Depends => "depends",
        }
    }
}

/// Presence of one metadata field.
///
/// Rules distinguish a key that is absent from one that is set to `null`,
/// so each field tracks three states rather than collapsing to `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The key does not appear in the document.
    Missing,
    /// The key appears but its value is `null`.
    Unset,
    /// The key carries a value.
    Present,
}

/// One metadata field with its three-state presence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field<T> {
    #[default]
    Missing,
    Unset,
    Value(T),
}

impl<T> Field<T> {
    /// The carried value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The presence state of this field.
    pub fn presence(&self) -> Presence {
        match self {
            Field::Missing => Presence::Missing,
            Field::Unset => Presence::Unset,
            Field::Value(_) => Presence::Present,
        }
    }

    fn from_raw(raw: Option<Option<T>>) -> Self {
        match raw {
            None => Field::Missing,
            Some(None) => Field::Unset,
            Some(Some(value)) => Field::Value(value),
        }
    }
}

/// Failure to parse one extension description file.
///
/// Carries the candidate's name (derived from the file path, not from the
/// content) and a diagnostic including the underlying syntax error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{details}")]
pub struct ParseFailure {
    /// Name of the candidate the failure belongs to.
    pub name: String,
    /// Human-readable diagnostic.
    pub details: String,
}

/// Parsed extension description.
///
/// Immutable once created; checks never write back into a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    name: String,
    category: Field<String>,
    scm_url: Field<String>,
    scm_revision: Field<String>,
    depends: Field<Vec<String>>,
}

/// Deserializes into `Some(None)` for an explicit `null`, letting the raw
/// form distinguish a missing key (`None`) from an unset value.
fn tri_state<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Recognized top-level fields of a description file. Unknown fields are
/// ignored.
#[derive(Debug, Default, Deserialize)]
struct RawManifest {
    #[serde(default, deserialize_with = "tri_state")]
    category: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    scm_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    scm_revision: Option<Option<String>>,
    #[serde(default, deserialize_with = "tri_state")]
    depends: Option<Option<Vec<String>>>,
}

impl Manifest {
    /// Parse an extension description from its JSON text.
    ///
    /// `name` is the identifier derived from the source file stem. Returns a
    /// `ParseFailure` when the text is not well-formed; never panics.
    pub fn parse(name: &str, text: &str) -> Result<Self, ParseFailure> {
        if name.is_empty() {
            return Err(ParseFailure {
                name: String::new(),
                details: "extension name derived from the file path is empty".to_string(),
            });
        }
        let raw: RawManifest = serde_json::from_str(text).map_err(|err| ParseFailure {
            name: name.to_string(),
            details: format!("failed to parse extension description '{name}': {err}"),
        })?;
        Ok(Self {
            name: name.to_string(),
            category: Field::from_raw(raw.category),
            scm_url: Field::from_raw(raw.scm_url),
            scm_revision: Field::from_raw(raw.scm_revision),
            depends: Field::from_raw(raw.depends),
        })
    }

    /// The extension's unique name within a corpus. Never empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classification string, when set.
    pub fn category(&self) -> Option<&str> {
        self.category.value().map(String::as_str)
    }

    /// Source-control location, when set.
    pub fn scm_url(&self) -> Option<&str> {
        self.scm_url.value().map(String::as_str)
    }

    /// Revision/tag/branch pin; absence means the default branch.
    pub fn scm_revision(&self) -> Option<&str> {
        self.scm_revision.value().map(String::as_str)
    }

    /// Declared dependencies, in declaration order. Empty when the key is
    /// missing or unset.
    pub fn depends(&self) -> &[String] {
        match self.depends.value() {
            Some(depends) => depends,
            None => &[],
        }
    }

    /// Presence state of the given metadata key.
    pub fn presence(&self, key: ManifestKey) -> Presence {
        match key {
            ManifestKey::Category => self.category.presence(),
            ManifestKey::ScmUrl => self.scm_url.presence(),
            ManifestKey::ScmRevision => self.scm_revision.presence(),
            ManifestKey::Depends => self.depends.presence(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_full_description() {
        let manifest = Manifest::parse(
            "SlicerDemo",
            r#"{
                "category": "Segmentation",
                "scm_url": "https://github.com/org/SlicerDemo",
                "scm_revision": "v1.2",
                "depends": ["SlicerIGT", "SlicerOpenCV"]
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.name(), "SlicerDemo");
        assert_eq!(manifest.category(), Some("Segmentation"));
        assert_eq!(manifest.scm_url(), Some("https://github.com/org/SlicerDemo"));
        assert_eq!(manifest.scm_revision(), Some("v1.2"));
        assert_eq!(manifest.depends(), ["SlicerIGT", "SlicerOpenCV"]);
    }

    #[test]
    fn parse_reports_syntax_error_with_name() {
        let failure = Manifest::parse("Broken", "{not json").unwrap_err();
        assert_eq!(failure.name, "Broken");
        assert!(failure.details.contains("Broken"));
        assert!(failure.details.contains("failed to parse"));
    }

    #[test]
    fn missing_key_vs_null_value() {
        let manifest = Manifest::parse("X", r#"{"scm_url": null}"#).unwrap();
        assert_eq!(manifest.presence(ManifestKey::Category), Presence::Missing);
        assert_eq!(manifest.presence(ManifestKey::ScmUrl), Presence::Unset);
        assert_eq!(manifest.scm_url(), None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let manifest = Manifest::parse(
            "X",
            r#"{"category": "Examples", "build_subdirectory": ".", "tier": 3}"#,
        )
        .unwrap();
        assert_eq!(manifest.category(), Some("Examples"));
    }

    #[test]
    fn depends_defaults_to_empty() {
        let manifest = Manifest::parse("X", "{}").unwrap();
        assert!(manifest.depends().is_empty());
        assert_eq!(manifest.presence(ManifestKey::Depends), Presence::Missing);
    }

    #[test]
    fn empty_name_is_rejected() {
        let failure = Manifest::parse("", "{}").unwrap_err();
        assert!(failure.details.contains("empty"));
    }

    #[test]
    fn incomplete_document_parses_successfully() {
        // Semantic gaps are the rules' concern, not the parser's.
        let manifest = Manifest::parse("Sparse", r#"{"category": "Examples"}"#).unwrap();
        assert_eq!(manifest.scm_url(), None);
        assert_eq!(manifest.presence(ManifestKey::ScmUrl), Presence::Missing);
    }
}
