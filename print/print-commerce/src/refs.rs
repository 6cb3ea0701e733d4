//! Relationship references.

use serde::{Deserialize, Serialize};

/// A reference to another document, in any of the wire shapes the
/// backend emits.
///
/// Depending on population depth the same relationship arrives as a
/// bare id string, an embedded document carrying an `id`, or a wrapper
/// object with the reference under `value` (possibly itself embedded).
/// Every shape is parsed into one closed union; downstream code asks
/// for [`canonical_id`](Self::canonical_id) and never inspects shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipRef {
    /// A bare document id.
    Id(String),
    /// An embedded document; only the id is retained.
    Keyed {
        /// The embedded document's id.
        id: String,
    },
    /// A wrapper with the reference under `value`.
    Valued {
        /// The wrapped reference, any shape.
        value: Box<RelationshipRef>,
    },
}

impl RelationshipRef {
    /// The referenced document's id, whatever shape the reference
    /// arrived in.
    #[must_use]
    pub fn canonical_id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Keyed { id } => id,
            Self::Valued { value } => value.canonical_id(),
        }
    }
}

impl From<&str> for RelationshipRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_id_parses() {
        let parsed: RelationshipRef = serde_json::from_str(r#""user-1""#).unwrap();
        assert_eq!(parsed.canonical_id(), "user-1");
    }

    #[test]
    fn embedded_document_parses() {
        let parsed: RelationshipRef =
            serde_json::from_str(r#"{"id": "user-2", "email": "a@b.test"}"#).unwrap();
        assert_eq!(parsed.canonical_id(), "user-2");
    }

    #[test]
    fn wrapped_value_parses_bare_and_embedded() {
        let bare: RelationshipRef = serde_json::from_str(r#"{"value": "user-3"}"#).unwrap();
        assert_eq!(bare.canonical_id(), "user-3");

        let embedded: RelationshipRef =
            serde_json::from_str(r#"{"value": {"id": "user-4"}}"#).unwrap();
        assert_eq!(embedded.canonical_id(), "user-4");
    }

    #[test]
    fn round_trips_through_json() {
        let original = RelationshipRef::Keyed { id: "user-5".into() };
        let json = serde_json::to_string(&original).unwrap();
        let back: RelationshipRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back.canonical_id(), "user-5");
    }
}
