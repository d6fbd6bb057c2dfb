//! Application state

use crate::models::{DetailedPost, Post, ProfileUser, User};

use super::edit::EditTracker;
use super::worker::Event;

/// Observable application state, mutated only by applying worker events
#[derive(Debug, Default)]
pub struct AppState {
    /// The authenticated user from login
    pub session_user: Option<User>,
    /// Bearer token for this session (process memory only)
    pub token: Option<String>,
    /// Merged profile (server record plus local phone override)
    pub user: Option<ProfileUser>,
    /// Posts in the feed
    pub posts: Vec<Post>,
    /// Currently opened post detail
    pub detail: Option<DetailedPost>,
    /// Id of the most recently created post
    pub last_post_id: Option<i64>,
    /// Is an operation in flight?
    pub loading: bool,
    /// Last success/progress message
    pub status: Option<String>,
    /// Last error message
    pub error: Option<String>,
    /// In-flight combined edit; `Some` means the edit dialog is open
    pub edit: Option<EditTracker>,
}

impl AppState {
    /// Create empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the edit dialog is still open
    pub const fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Clear transient status and error messages
    pub fn clear_messages(&mut self) {
        self.status = None;
        self.error = None;
    }

    /// Fold one worker event into the state
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Loading => self.loading = true,
            Event::LoggedIn { user, token } => {
                self.session_user = Some(user);
                self.token = Some(token);
                self.loading = false;
            }
            Event::Registered { message } => {
                self.status = Some(message);
                self.loading = false;
            }
            Event::Profile(user) => {
                self.user = Some(user);
                self.loading = false;
            }
            Event::Posts(posts) => {
                self.posts = posts;
                self.loading = false;
            }
            Event::PostDetail(post) => {
                self.detail = Some(*post);
                self.loading = false;
            }
            Event::PostAdded { post_id } => {
                self.last_post_id = Some(post_id);
                self.loading = false;
            }
            Event::PostDeleted { message } => {
                self.status = Some(message);
                self.loading = false;
            }
            Event::EditStarted { parts } => {
                self.edit = Some(EditTracker::new(parts));
                self.loading = true;
            }
            Event::EditPartApplied { .. } => {
                if let Some(tracker) = self.edit.as_mut() {
                    tracker.record_success();
                    if tracker.is_complete() {
                        // Close the dialog only when every part landed
                        self.edit = None;
                        self.loading = false;
                        self.status = Some("Post updated successfully".to_string());
                    }
                }
            }
            Event::EditPartFailed { message, .. } => {
                self.error = Some(message);
                if let Some(tracker) = self.edit.as_mut() {
                    tracker.record_failure();
                    if tracker.is_settled() {
                        // Dialog stays open; the applied half is not rolled back
                        self.loading = false;
                    }
                }
            }
            Event::Status(message) => self.status = Some(message),
            Event::Error(message) => {
                self.error = Some(message);
                self.loading = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::edit::EditPart;
    use crate::models::Author;
    use chrono::Utc;

    fn post(id: i64) -> Post {
        Post {
            id,
            user_id: 7,
            cover: "https://cdn.example.com/cover.jpg".into(),
            description: "hello".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            author: Author {
                name: "Ayu".into(),
                photo: None,
            },
            likes: vec![],
            comments: vec![],
        }
    }

    #[test]
    fn failed_delete_leaves_the_feed_untouched() {
        let mut state = AppState::new();
        state.apply(Event::Posts(vec![post(1), post(2)]));

        state.apply(Event::Loading);
        state.apply(Event::Error("Post not found.".to_string()));

        assert_eq!(state.posts.len(), 2);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Post not found."));
    }

    #[test]
    fn edit_dialog_closes_only_after_both_parts_succeed() {
        let mut state = AppState::new();
        state.apply(Event::EditStarted { parts: 2 });
        assert!(state.is_editing());
        assert!(state.loading);

        state.apply(Event::EditPartApplied {
            part: EditPart::Description,
        });
        assert!(state.is_editing());

        state.apply(Event::EditPartApplied {
            part: EditPart::Cover,
        });
        assert!(!state.is_editing());
        assert!(!state.loading);
        assert_eq!(state.status.as_deref(), Some("Post updated successfully"));
    }

    #[test]
    fn cover_failure_after_description_success_keeps_dialog_open() {
        let mut state = AppState::new();
        state.apply(Event::EditStarted { parts: 2 });

        state.apply(Event::EditPartApplied {
            part: EditPart::Description,
        });
        state.apply(Event::EditPartFailed {
            part: EditPart::Cover,
            message: "Image too large. Please choose a smaller file.".to_string(),
        });

        // Dialog open, error surfaced, description change not rolled back
        assert!(state.is_editing());
        assert!(!state.loading);
        assert_eq!(
            state.error.as_deref(),
            Some("Image too large. Please choose a smaller file.")
        );
    }

    #[test]
    fn loading_clears_on_terminal_events() {
        let mut state = AppState::new();
        state.apply(Event::Loading);
        assert!(state.loading);

        state.apply(Event::Posts(vec![]));
        assert!(!state.loading);

        state.apply(Event::Loading);
        state.apply(Event::Error("boom".to_string()));
        assert!(!state.loading);
    }
}
