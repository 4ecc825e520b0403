//! Typed carrier records and boundary normalization.
//!
//! Upstream supplies partially-populated reddit-style dumps in two shapes
//! (`{ post: … }` or `{ data: … }`) and payloads either bare or wrapped one
//! level. Both are normalized here at the serde boundary so the rest of the
//! crate operates on a single canonical form.

use serde::{Deserialize, Serialize};

/// One comment node in the reply forest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentNode {
    #[serde(default)]
    pub id: String,
    /// Parent link, typically `t1_`-prefixed for comments.
    #[serde(default)]
    pub parent_id: String,
    /// Thread root id, `t3_`-prefixed in reddit dumps.
    #[serde(default)]
    pub link_id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub replies: Vec<CommentNode>,
}

/// The public post the payload is hidden beneath.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub permalink: String,
    /// Attached search-result documents, already flattened to text upstream.
    #[serde(default)]
    pub search_results: Vec<String>,
    #[serde(default)]
    pub comments: Vec<CommentNode>,
}

/// Editorial pointer into one of the attached documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Angle {
    #[serde(default)]
    pub source_quote: String,
    #[serde(default)]
    pub tangent: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_document: Option<usize>,
}

impl PartialEq for Angle {
    /// Angles match on textual identity; the document link is advisory.
    fn eq(&self, other: &Self) -> bool {
        self.source_quote == other.source_quote
            && self.tangent == other.tangent
            && self.category == other.category
    }
}

/// Canonical carrier: a post plus per-document angle groups.
///
/// The alternative top-level shape `{ data: … }` is unwrapped by the field
/// alias; both sides of the protocol see the same record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Carrier {
    #[serde(alias = "data")]
    pub post: Post,
    #[serde(default)]
    pub angles: Vec<Vec<Angle>>,
}

/// Payload field as found on the wire: bare text or one wrapper level.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PayloadInput {
    Wrapped { payload: String },
    Bare(String),
}

impl PayloadInput {
    pub fn into_text(self) -> String {
        match self {
            PayloadInput::Wrapped { payload } => payload,
            PayloadInput::Bare(text) => text,
        }
    }
}

/// Comment projection carried on the output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRef {
    pub author: String,
    pub body: String,
    pub id: String,
    pub parent_id: String,
    pub permalink: String,
}

impl CommentRef {
    pub fn from_node(node: &CommentNode) -> Self {
        Self {
            author: if node.author.is_empty() {
                "unknown".to_string()
            } else {
                node.author.clone()
            },
            body: node.body.clone(),
            id: node.id.clone(),
            parent_id: node.parent_id.clone(),
            permalink: node.permalink.clone(),
        }
    }
}

/// Post projection carried on the output record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostContext {
    pub author: String,
    pub title: String,
    pub selftext: String,
    pub subreddit: String,
    pub url: String,
    pub permalink: String,
}

impl PostContext {
    pub fn from_post(post: &Post) -> Self {
        Self {
            author: if post.author.is_empty() {
                "unknown".to_string()
            } else {
                post.author.clone()
            },
            title: post.title.clone(),
            selftext: post.selftext.clone(),
            subreddit: post.subreddit.clone(),
            url: post.url.clone(),
            permalink: post.permalink.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_wrapper_unwraps_to_post() {
        let json = r#"{"data": {"id": "abc", "selftext": "hello"}, "angles": []}"#;
        let carrier: Carrier = serde_json::from_str(json).unwrap();
        assert_eq!(carrier.post.id, "abc");
        assert_eq!(carrier.post.selftext, "hello");
    }

    #[test]
    fn payload_accepts_both_shapes() {
        let bare: PayloadInput = serde_json::from_str(r#""secret""#).unwrap();
        assert_eq!(bare.into_text(), "secret");
        let wrapped: PayloadInput =
            serde_json::from_str(r#"{"payload": "secret"}"#).unwrap();
        assert_eq!(wrapped.into_text(), "secret");
    }

    #[test]
    fn angle_equality_ignores_document_link() {
        let a = Angle {
            source_quote: "q".into(),
            tangent: "t".into(),
            category: "c".into(),
            source_document: Some(0),
        };
        let b = Angle {
            source_document: Some(3),
            ..a.clone()
        };
        assert_eq!(a, b);
    }
}
