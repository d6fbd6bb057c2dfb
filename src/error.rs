//! Shared error taxonomy for client operations
//!
//! Every failure a user can see falls into one of three categories:
//! preconditions checked before any request is issued, server rejections
//! mapped through one message table keyed by (operation, status code), and
//! transport failures. Nothing here is retried or treated as fatal.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Operation classes, used to key the status-code message table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `auth/login`
    Login,
    /// `auth/register`
    Register,
    /// `users/me` GET
    LoadProfile,
    /// `users/me` PUT
    UpdateProfile,
    /// `users/photo` multipart POST
    UpdatePhoto,
    /// `posts` GET
    LoadPosts,
    /// `posts/{id}` GET
    LoadPost,
    /// `posts` multipart POST
    AddPost,
    /// `posts/{id}` PUT
    UpdatePost,
    /// `posts/{id}/cover` multipart POST
    ChangeCover,
    /// `posts/{id}` DELETE
    DeletePost,
}

impl Operation {
    /// Verb phrase for generic failure messages ("Failed to <verb>: ...")
    const fn verb(self) -> &'static str {
        match self {
            Self::Login => "log in",
            Self::Register => "register",
            Self::LoadProfile => "load profile",
            Self::UpdateProfile => "update profile",
            Self::UpdatePhoto => "update photo",
            Self::LoadPosts => "load posts",
            Self::LoadPost => "load post",
            Self::AddPost => "add post",
            Self::UpdatePost => "update post",
            Self::ChangeCover => "change cover",
            Self::DeletePost => "delete post",
        }
    }

    /// Object phrase for 403 messages ("You are not authorized to <phrase>.")
    const fn forbidden(self) -> &'static str {
        match self {
            Self::Login | Self::Register => "do that",
            Self::LoadProfile => "view this profile",
            Self::UpdateProfile => "update this profile",
            Self::UpdatePhoto => "update this photo",
            Self::LoadPosts | Self::LoadPost => "view these posts",
            Self::AddPost => "create posts",
            Self::UpdatePost => "update this post",
            Self::ChangeCover => "change this cover",
            Self::DeletePost => "delete this post",
        }
    }

    /// Whether this operation addresses a single post
    const fn targets_post(self) -> bool {
        matches!(
            self,
            Self::LoadPost | Self::UpdatePost | Self::ChangeCover | Self::DeletePost
        )
    }
}

/// Error type for everything the client can fail at
#[derive(Debug, Error)]
pub enum Error {
    /// A token-requiring action was attempted without a token
    #[error("Authentication required. Please log in again.")]
    AuthRequired,

    /// The connectivity probe reports no network
    #[error("No internet connection. Please check your network.")]
    Offline,

    /// Local validation failed before any request was issued
    #[error("{0}")]
    Precondition(String),

    /// The server rejected the request with a non-success status
    #[error("{message}")]
    Rejected {
        /// Which operation was rejected
        op: Operation,
        /// HTTP status the server answered with
        status: StatusCode,
        /// User-facing message resolved from the shared table
        message: String,
    },

    /// The server answered 2xx but flagged the operation as failed
    #[error("{0}")]
    Api(String),

    /// Transport-level failure (timeout, DNS, TLS)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    /// Build a rejection error, resolving the user-facing message through
    /// the shared table
    pub fn rejected(op: Operation, status: StatusCode, body: String) -> Self {
        let message = rejection_message(op, status, &body);
        Self::Rejected {
            op,
            status,
            message,
        }
    }

    /// Build a precondition error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }
}

/// The one status-code-to-message table, shared by every operation.
///
/// Wording differs per operation class where the user needs different
/// guidance (which image, which input), but each (operation, status) pair
/// resolves here and nowhere else.
fn rejection_message(op: Operation, status: StatusCode, body: &str) -> String {
    use Operation::{AddPost, ChangeCover, Login, UpdatePhoto, UpdatePost, UpdateProfile};

    match (op, status.as_u16()) {
        (Login, 400 | 401) => "Invalid credentials".to_string(),
        (_, 401) => "Authentication failed. Please log in again.".to_string(),
        (_, 403) => format!("You are not authorized to {}.", op.forbidden()),
        (_, 404) if op.targets_post() => "Post not found.".to_string(),
        (UpdateProfile, 409) => {
            "Email already in use. Please use a different email.".to_string()
        }
        (_, 413) => "Image too large. Please choose a smaller file.".to_string(),
        (_, 429) => "Too many requests. Try again later.".to_string(),
        (UpdateProfile, 400) => {
            if body.to_lowercase().contains("email") {
                "Invalid email format. Please use a valid email (e.g., user@example.com)."
                    .to_string()
            } else {
                "Invalid data. Please check your input.".to_string()
            }
        }
        (UpdatePhoto | ChangeCover, 400) => {
            "Invalid image format or data. Please try another image.".to_string()
        }
        (AddPost, 400) => "Invalid data. Please check your image or description.".to_string(),
        (UpdatePost, 400) => "Invalid description. Please check your input.".to_string(),
        _ => format!("Failed to {}: {} - {}", op.verb(), status.as_u16(), body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(op: Operation, status: u16, body: &str) -> String {
        Error::rejected(op, StatusCode::from_u16(status).unwrap(), body.to_string()).to_string()
    }

    #[test]
    fn delete_404_is_post_not_found() {
        assert_eq!(msg(Operation::DeletePost, 404, ""), "Post not found.");
    }

    #[test]
    fn profile_load_404_falls_through_to_generic() {
        assert_eq!(
            msg(Operation::LoadProfile, 404, "gone"),
            "Failed to load profile: 404 - gone"
        );
    }

    #[test]
    fn upload_413_is_image_too_large() {
        assert_eq!(
            msg(Operation::UpdatePhoto, 413, ""),
            "Image too large. Please choose a smaller file."
        );
        assert_eq!(
            msg(Operation::ChangeCover, 413, ""),
            "Image too large. Please choose a smaller file."
        );
    }

    #[test]
    fn profile_400_sniffs_email_in_body() {
        assert_eq!(
            msg(Operation::UpdateProfile, 400, r#"{"message":"The email is invalid"}"#),
            "Invalid email format. Please use a valid email (e.g., user@example.com)."
        );
        assert_eq!(
            msg(Operation::UpdateProfile, 400, "bad name"),
            "Invalid data. Please check your input."
        );
    }

    #[test]
    fn forbidden_wording_names_the_operation() {
        assert_eq!(
            msg(Operation::DeletePost, 403, ""),
            "You are not authorized to delete this post."
        );
        assert_eq!(
            msg(Operation::UpdatePost, 403, ""),
            "You are not authorized to update this post."
        );
    }

    #[test]
    fn login_rejection_is_invalid_credentials() {
        assert_eq!(msg(Operation::Login, 401, ""), "Invalid credentials");
    }
}
