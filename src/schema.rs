use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Read-time projection of a user: only the username is ever exposed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Author {
    pub username: String,
}

/// A comment as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub post: String,
    // `None` when the referenced user no longer exists
    pub author: Option<Author>,
    pub contents: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The identifying columns of a removed comment, with the author left unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub contents: String,
}

/// JSON body shared by every non-listing response.
///
/// Serializes as `{ "message": "..." }` or `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    Message(String),
    Error(String),
}

impl Envelope {
    pub fn message(text: impl Into<String>) -> Self {
        Envelope::Message(text.into())
    }

    pub fn error(text: impl Into<String>) -> Self {
        Envelope::Error(text.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_uses_bare_keys() {
        assert_eq!(
            serde_json::to_value(Envelope::message("done")).unwrap(),
            json!({ "message": "done" })
        );
        assert_eq!(
            serde_json::to_value(Envelope::error("nope")).unwrap(),
            json!({ "error": "nope" })
        );
    }

    #[test]
    fn comment_exposes_only_username_for_author() {
        let comment = Comment {
            id: "c1".to_string(),
            post: "p1".to_string(),
            author: Some(Author {
                username: "alice".to_string(),
            }),
            contents: "first".to_string(),
            created_at: OffsetDateTime::from_unix_timestamp(0).unwrap(),
            updated_at: OffsetDateTime::from_unix_timestamp(60).unwrap(),
        };

        let value = serde_json::to_value(&comment).unwrap();
        assert_eq!(value["_id"], "c1");
        assert_eq!(value["post"], "p1");
        assert_eq!(value["author"], json!({ "username": "alice" }));
        assert_eq!(value["createdAt"], "1970-01-01T00:00:00Z");
        assert_eq!(value["updatedAt"], "1970-01-01T00:01:00Z");
    }
}
