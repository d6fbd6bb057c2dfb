//! Post models (feed summary and detailed forms)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post author as embedded in post responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    /// Display name
    pub name: String,
    /// Avatar URL, if any
    pub photo: Option<String>,
}

/// A comment on a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Server-assigned id
    pub id: i64,
    /// Comment text
    pub comment: String,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
    /// Last edit
    pub updated_at: DateTime<Utc>,
}

/// A post as it appears in the feed listing
///
/// The listing form carries likes and comments as bare id lists; fetch the
/// [`DetailedPost`] for the full comment bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Server-assigned id
    pub id: i64,
    /// Id of the posting user
    pub user_id: i64,
    /// Cover image URL
    pub cover: String,
    /// Post text
    pub description: String,
    /// When the post was created
    pub created_at: DateTime<Utc>,
    /// Last server-side update
    pub updated_at: DateTime<Utc>,
    /// Author summary
    pub author: Author,
    /// Ids of users who liked the post
    pub likes: Vec<i64>,
    /// Ids of the comments on the post
    pub comments: Vec<i64>,
}

/// A post with its full comment list, as returned by `posts/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedPost {
    /// Server-assigned id
    pub id: i64,
    /// Id of the posting user
    pub user_id: i64,
    /// Cover image URL
    pub cover: String,
    /// Post text
    pub description: String,
    /// When the post was created
    pub created_at: DateTime<Utc>,
    /// Last server-side update
    pub updated_at: DateTime<Utc>,
    /// Author summary
    pub author: Author,
    /// Ids of users who liked the post
    pub likes: Vec<i64>,
    /// Full comment bodies
    pub comments: Vec<Comment>,
    /// The viewer's own comment, if they left one
    pub my_comment: Option<Comment>,
}

impl Post {
    /// Get a short preview of the description (for list display)
    pub fn preview(&self, max_len: usize) -> String {
        let description = self.description.replace('\n', " ");
        if description.len() <= max_len {
            description
        } else {
            format!("{}...", &description[..max_len.saturating_sub(3)])
        }
    }

    /// Get relative time string (e.g., "5m", "2h", "3d")
    pub fn relative_time(&self) -> String {
        let now = Utc::now();
        let duration = now.signed_duration_since(self.created_at);

        if duration.num_seconds() < 60 {
            format!("{}s", duration.num_seconds())
        } else if duration.num_minutes() < 60 {
            format!("{}m", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h", duration.num_hours())
        } else if duration.num_days() < 7 {
            format!("{}d", duration.num_days())
        } else {
            self.created_at.format("%b %d").to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(description: &str) -> Post {
        Post {
            id: 1,
            user_id: 7,
            cover: "https://cdn.example.com/cover.jpg".into(),
            description: description.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            author: Author {
                name: "Ayu".into(),
                photo: None,
            },
            likes: vec![2, 3],
            comments: vec![11],
        }
    }

    #[test]
    fn preview_truncates_long_descriptions() {
        let p = post("a very long description that should be cut off somewhere");
        let preview = p.preview(20);
        assert!(preview.len() <= 20);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn preview_flattens_newlines() {
        let p = post("line one\nline two");
        assert_eq!(p.preview(80), "line one line two");
    }
}
