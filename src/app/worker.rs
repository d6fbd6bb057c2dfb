//! Async worker for the application layer
//!
//! Channels connect the front end to one background task that owns the API
//! client and the override store: commands in, events out. Every operation
//! has one transient state (loading) and two terminal outcomes, both
//! reported as events; nothing is retried or cancelled in flight.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::Client;
use crate::connectivity::Connectivity;
use crate::error::{Error, Result};
use crate::images;
use crate::models::{DetailedPost, Post, ProfileUser, User};
use crate::store::Store;

use super::edit::EditPart;
use super::profile::{ProfileForm, plan_save};

/// Commands sent from the front end to the async worker
#[derive(Debug, Clone)]
pub enum Command {
    /// Log in and install the bearer token on the session
    Login {
        /// Login email
        email: String,
        /// Login password
        password: String,
    },
    /// Register a new account
    Register {
        /// Display name
        name: String,
        /// Email address
        email: String,
        /// Password
        password: String,
    },
    /// Load the profile and merge the local phone override
    LoadProfile,
    /// Persist the phone locally and update name/email remotely if changed
    SaveProfile {
        /// Submitted form values
        form: ProfileForm,
    },
    /// Upload a new profile photo from a local file
    UpdatePhoto {
        /// Path to the image file
        path: PathBuf,
    },
    /// Refresh the post feed
    LoadPosts,
    /// Fetch one post with its comments
    LoadPost {
        /// Post id
        id: i64,
    },
    /// Create a post from a cover image and description
    AddPost {
        /// Path to the cover image
        cover: PathBuf,
        /// Post text
        description: String,
    },
    /// Save the edit dialog. `description`/`cover` are `None` when that half
    /// is unchanged; each `Some` half dispatches its own independent call.
    EditPost {
        /// Post id
        id: i64,
        /// New description, if changed
        description: Option<String>,
        /// New cover image path, if picked
        cover: Option<PathBuf>,
    },
    /// Delete a post
    DeletePost {
        /// Post id
        id: i64,
    },
    /// Shut down the worker
    Shutdown,
}

/// Events sent back from the async worker
#[derive(Debug)]
pub enum Event {
    /// An operation entered its loading state
    Loading,
    /// Session established
    LoggedIn {
        /// The authenticated user
        user: User,
        /// Bearer token now installed on the session
        token: String,
    },
    /// Registration accepted, server message attached
    Registered {
        /// Server confirmation message
        message: String,
    },
    /// Profile loaded, phone already merged from the local store
    Profile(ProfileUser),
    /// Feed refreshed
    Posts(Vec<Post>),
    /// Detailed post loaded
    PostDetail(Box<DetailedPost>),
    /// New post created
    PostAdded {
        /// Server-assigned id of the new post
        post_id: i64,
    },
    /// Post deleted, server message attached
    PostDeleted {
        /// Server confirmation message
        message: String,
    },
    /// Combined edit dispatched this many independent calls
    EditStarted {
        /// Number of dispatched calls
        parts: u32,
    },
    /// One edit call succeeded
    EditPartApplied {
        /// Which half succeeded
        part: EditPart,
    },
    /// One edit call failed; a half that already succeeded stays applied
    EditPartFailed {
        /// Which half failed
        part: EditPart,
        /// User-facing message
        message: String,
    },
    /// Progress or success message
    Status(String),
    /// Operation failed
    Error(String),
}

/// Channel handles for communicating with the async worker
pub struct WorkerHandle {
    /// Send commands to the worker
    pub commands: mpsc::Sender<Command>,
    /// Receive events from the worker
    pub events: mpsc::Receiver<Event>,
}

/// Spawn the async worker and return handles
pub fn spawn(
    client: Client,
    store: Store,
    probe: Arc<dyn Connectivity>,
    feed_mine: bool,
) -> WorkerHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(32);
    let (event_tx, event_rx) = mpsc::channel::<Event>(32);

    tokio::spawn(async move {
        let mut worker = Worker {
            client,
            store,
            probe,
            feed_mine,
            current_user: None,
            tx: event_tx,
        };

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                Command::Shutdown => break,
                cmd => worker.handle(cmd).await,
            }
        }
    });

    WorkerHandle {
        commands: cmd_tx,
        events: event_rx,
    }
}

struct Worker {
    client: Client,
    store: Store,
    probe: Arc<dyn Connectivity>,
    feed_mine: bool,
    /// Baseline for the unchanged-check in profile saves
    current_user: Option<ProfileUser>,
    tx: mpsc::Sender<Event>,
}

impl Worker {
    async fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Login { email, password } => self.on_login(&email, &password).await,
            Command::Register {
                name,
                email,
                password,
            } => self.on_register(&name, &email, &password).await,
            Command::LoadProfile => self.on_load_profile().await,
            Command::SaveProfile { form } => self.on_save_profile(&form).await,
            Command::UpdatePhoto { path } => self.on_update_photo(&path).await,
            Command::LoadPosts => self.on_load_posts().await,
            Command::LoadPost { id } => self.on_load_post(id).await,
            Command::AddPost { cover, description } => {
                self.on_add_post(&cover, &description).await;
            }
            Command::EditPost {
                id,
                description,
                cover,
            } => self.on_edit_post(id, description, cover).await,
            Command::DeletePost { id } => self.on_delete_post(id).await,
            Command::Shutdown => {}
        }
    }

    async fn send(&mut self, event: Event) {
        let _ = self.tx.send(event).await;
    }

    async fn fail(&mut self, error: &Error) {
        self.send(Event::Error(error.to_string())).await;
    }

    /// Token and connectivity preconditions shared by authorized operations
    fn guard(&self) -> Result<()> {
        if !self.client.is_authenticated() {
            return Err(Error::AuthRequired);
        }
        if !self.probe.is_online() {
            return Err(Error::Offline);
        }
        Ok(())
    }

    async fn on_login(&mut self, email: &str, password: &str) {
        if email.is_empty() || password.is_empty() {
            self.fail(&Error::precondition("Please fill all fields")).await;
            return;
        }

        self.send(Event::Loading).await;
        match self.client.login(email, password).await {
            Ok(session) => {
                self.client.set_token(session.token.clone());
                tracing::debug!(user = %session.user.email, "logged in");
                self.send(Event::LoggedIn {
                    user: session.user,
                    token: session.token,
                })
                .await;
                self.send(Event::Status("Login successful".to_string())).await;
            }
            Err(e) => self.fail(&e).await,
        }
    }

    async fn on_register(&mut self, name: &str, email: &str, password: &str) {
        if name.is_empty() || email.is_empty() || password.is_empty() {
            self.fail(&Error::precondition("Please fill all fields")).await;
            return;
        }

        self.send(Event::Loading).await;
        match self.client.register(name, email, password).await {
            Ok(message) => self.send(Event::Registered { message }).await,
            Err(e) => self.fail(&e).await,
        }
    }

    /// Fetch the profile and merge in the stored phone override
    async fn load_merged_profile(&mut self) -> Result<ProfileUser> {
        let user = self.client.profile().await?;
        let phone = self.store.phone().unwrap_or_else(|e| {
            tracing::warn!("failed to read phone override: {e}");
            None
        });
        Ok(user.with_phone(phone))
    }

    async fn on_load_profile(&mut self) {
        self.send(Event::Loading).await;
        match self.load_merged_profile().await {
            Ok(user) => {
                self.current_user = Some(user.clone());
                self.send(Event::Profile(user)).await;
            }
            Err(e) => self.fail(&e).await,
        }
    }

    async fn on_save_profile(&mut self, form: &ProfileForm) {
        let plan = match plan_save(self.current_user.as_ref(), form) {
            Ok(plan) => plan,
            Err(e) => {
                self.fail(&e).await;
                return;
            }
        };

        if let Err(e) = self.guard() {
            self.fail(&e).await;
            return;
        }

        // The phone is persisted locally whether or not a remote update runs
        if let Err(e) = self.store.set_phone(plan.phone.as_deref()) {
            self.fail(&Error::precondition(format!(
                "Failed to store phone locally: {e}"
            )))
            .await;
            return;
        }

        if let Some(remote) = plan.remote {
            self.send(Event::Loading).await;
            match self.client.update_profile(&remote.name, &remote.email).await {
                Ok(_) => {
                    self.send(Event::Status("Profile updated successfully".to_string()))
                        .await;
                    self.on_load_profile().await;
                }
                Err(e) => self.fail(&e).await,
            }
        } else {
            tracing::debug!("name and email unchanged, phone updated locally");
            self.send(Event::Status("Profile updated successfully".to_string()))
                .await;
            self.on_load_profile().await;
        }
    }

    async fn on_update_photo(&mut self, path: &std::path::Path) {
        let photo = match images::prepare_profile_photo(path) {
            Ok(photo) => photo,
            Err(e) => {
                self.fail(&e).await;
                return;
            }
        };

        if let Err(e) = self.guard() {
            self.fail(&e).await;
            return;
        }

        self.send(Event::Loading).await;
        match self.client.update_photo(photo).await {
            Ok(_) => {
                self.send(Event::Status("Photo updated successfully".to_string()))
                    .await;
                self.on_load_profile().await;
            }
            Err(e) => self.fail(&e).await,
        }
    }

    async fn on_load_posts(&mut self) {
        if let Err(e) = self.guard() {
            self.fail(&e).await;
            return;
        }

        self.send(Event::Loading).await;
        self.refresh_posts().await;
    }

    /// Fetch the feed and report it; failures surface like any other error
    async fn refresh_posts(&mut self) {
        match self.client.posts(self.feed_mine).await {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), "posts loaded");
                self.send(Event::Posts(posts)).await;
            }
            Err(e) => self.fail(&e).await,
        }
    }

    async fn on_load_post(&mut self, id: i64) {
        if let Err(e) = self.guard() {
            self.fail(&e).await;
            return;
        }

        self.send(Event::Loading).await;
        match self.client.post(id).await {
            Ok(post) => self.send(Event::PostDetail(Box::new(post))).await,
            Err(e) => self.fail(&e).await,
        }
    }

    async fn on_add_post(&mut self, cover: &std::path::Path, description: &str) {
        let cover = match images::prepare_cover(cover) {
            Ok(cover) => cover,
            Err(e) => {
                self.fail(&e).await;
                return;
            }
        };

        if description.trim().is_empty() {
            self.fail(&Error::precondition("Description cannot be empty"))
                .await;
            return;
        }

        if let Err(e) = self.guard() {
            self.fail(&e).await;
            return;
        }

        self.send(Event::Loading).await;
        match self.client.add_post(cover, description).await {
            Ok(post_id) => {
                self.send(Event::PostAdded { post_id }).await;
                self.send(Event::Status("Post added successfully".to_string()))
                    .await;
                self.refresh_posts().await;
            }
            Err(e) => self.fail(&e).await,
        }
    }

    async fn on_edit_post(&mut self, id: i64, description: Option<String>, cover: Option<PathBuf>) {
        // A blank description is never dispatched
        let description = description.filter(|d| !d.trim().is_empty());

        // An unreadable cover drops that half but the other still runs
        let cover = match cover {
            Some(path) => match images::prepare_cover(&path) {
                Ok(image) => Some(image),
                Err(e) => {
                    self.fail(&e).await;
                    None
                }
            },
            None => None,
        };

        let parts = u32::from(description.is_some()) + u32::from(cover.is_some());
        if parts == 0 {
            self.fail(&Error::precondition("No changes to save")).await;
            return;
        }

        if let Err(e) = self.guard() {
            self.fail(&e).await;
            return;
        }

        self.send(Event::EditStarted { parts }).await;

        let description_call = async {
            match description {
                Some(d) => Some(self.client.update_description(id, &d).await),
                None => None,
            }
        };
        let cover_call = async {
            match cover {
                Some(image) => Some(self.client.change_cover(id, image).await),
                None => None,
            }
        };

        let (description_result, cover_result) = tokio::join!(description_call, cover_call);

        let mut any_success = false;
        if let Some(result) = description_result {
            match result {
                Ok(_) => {
                    any_success = true;
                    self.send(Event::EditPartApplied {
                        part: EditPart::Description,
                    })
                    .await;
                }
                Err(e) => {
                    self.send(Event::EditPartFailed {
                        part: EditPart::Description,
                        message: e.to_string(),
                    })
                    .await;
                }
            }
        }
        if let Some(result) = cover_result {
            match result {
                Ok(_) => {
                    any_success = true;
                    self.send(Event::EditPartApplied {
                        part: EditPart::Cover,
                    })
                    .await;
                }
                Err(e) => {
                    self.send(Event::EditPartFailed {
                        part: EditPart::Cover,
                        message: e.to_string(),
                    })
                    .await;
                }
            }
        }

        if any_success {
            self.refresh_posts().await;
        }
    }

    async fn on_delete_post(&mut self, id: i64) {
        if let Err(e) = self.guard() {
            self.fail(&e).await;
            return;
        }

        self.send(Event::Loading).await;
        match self.client.delete_post(id).await {
            Ok(message) => {
                self.send(Event::PostDeleted { message }).await;
                self.refresh_posts().await;
            }
            // The feed is not refreshed on failure; the post stays listed
            Err(e) => self.fail(&e).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::AlwaysOnline;
    use std::time::Duration;
    use tempfile::{TempDir, tempdir};

    struct Offline;

    impl Connectivity for Offline {
        fn is_online(&self) -> bool {
            false
        }
    }

    fn test_store(dir: &TempDir) -> Store {
        Store::open_path(&dir.path().join("test.sqlite")).unwrap()
    }

    fn client(token: Option<&str>) -> Client {
        let mut client = Client::new("http://127.0.0.1:9", Duration::from_secs(1));
        if let Some(token) = token {
            client.set_token(token);
        }
        client
    }

    async fn drain(handle: &mut WorkerHandle) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(event) = handle.events.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn missing_token_short_circuits_before_any_request() {
        let dir = tempdir().unwrap();
        let mut handle = spawn(client(None), test_store(&dir), Arc::new(AlwaysOnline), true);

        handle.commands.send(Command::LoadPosts).await.unwrap();
        handle.commands.send(Command::Shutdown).await.unwrap();

        // A lone error event: no loading state was ever entered
        let events = drain(&mut handle).await;
        assert!(matches!(
            &events[..],
            [Event::Error(m)] if m.as_str() == "Authentication required. Please log in again."
        ));
    }

    #[tokio::test]
    async fn offline_probe_short_circuits_post_operations() {
        let dir = tempdir().unwrap();
        let mut handle = spawn(
            client(Some("token")),
            test_store(&dir),
            Arc::new(Offline),
            true,
        );

        handle
            .commands
            .send(Command::DeletePost { id: 1 })
            .await
            .unwrap();
        handle.commands.send(Command::Shutdown).await.unwrap();

        let events = drain(&mut handle).await;
        assert!(matches!(
            &events[..],
            [Event::Error(m)] if m.as_str() == "No internet connection. Please check your network."
        ));
    }

    #[tokio::test]
    async fn invalid_email_issues_no_network_call() {
        let dir = tempdir().unwrap();
        let mut handle = spawn(
            client(Some("token")),
            test_store(&dir),
            Arc::new(AlwaysOnline),
            true,
        );

        let form = ProfileForm {
            name: "Ayu".into(),
            email: "not-an-email".into(),
            phone: String::new(),
        };
        handle
            .commands
            .send(Command::SaveProfile { form })
            .await
            .unwrap();
        handle.commands.send(Command::Shutdown).await.unwrap();

        let events = drain(&mut handle).await;
        assert!(matches!(
            &events[..],
            [Event::Error(m)] if m.as_str() == "Please enter a valid email"
        ));
    }

    #[tokio::test]
    async fn blank_edit_reports_nothing_to_save() {
        let dir = tempdir().unwrap();
        let mut handle = spawn(
            client(Some("token")),
            test_store(&dir),
            Arc::new(AlwaysOnline),
            true,
        );

        handle
            .commands
            .send(Command::EditPost {
                id: 1,
                description: Some("   ".into()),
                cover: None,
            })
            .await
            .unwrap();
        handle.commands.send(Command::Shutdown).await.unwrap();

        let events = drain(&mut handle).await;
        assert!(matches!(
            &events[..],
            [Event::Error(m)] if m.as_str() == "No changes to save"
        ));
    }

    #[tokio::test]
    async fn empty_login_fields_fail_locally() {
        let dir = tempdir().unwrap();
        let mut handle = spawn(client(None), test_store(&dir), Arc::new(AlwaysOnline), true);

        handle
            .commands
            .send(Command::Login {
                email: String::new(),
                password: String::new(),
            })
            .await
            .unwrap();
        handle.commands.send(Command::Shutdown).await.unwrap();

        let events = drain(&mut handle).await;
        assert!(matches!(
            &events[..],
            [Event::Error(m)] if m.as_str() == "Please fill all fields"
        ));
    }
}
