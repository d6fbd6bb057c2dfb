//! Application layer: observable state plus the async worker
//!
//! The front end dispatches [`Command`]s, the worker answers with [`Event`]s,
//! and [`AppState::apply`] folds each event into the observable state. All
//! mutation happens on event application, so there is nothing to lock.

mod edit;
mod profile;
mod state;
mod worker;

pub use edit::{EditPart, EditTracker};
pub use profile::{ProfileForm, RemoteUpdate, SavePlan, normalize_phone, plan_save};
pub use state::AppState;
pub use worker::{Command, Event, WorkerHandle, spawn};

use std::sync::Arc;

use crate::api::Client;
use crate::connectivity::Connectivity;
use crate::store::Store;

/// The application: observable state plus a handle to the background worker
pub struct App {
    /// Observable state, mutated only by applying events
    pub state: AppState,
    handle: WorkerHandle,
}

impl App {
    /// Spawn the worker and start with empty state
    pub fn new(client: Client, store: Store, probe: Arc<dyn Connectivity>, feed_mine: bool) -> Self {
        Self {
            state: AppState::new(),
            handle: spawn(client, store, probe, feed_mine),
        }
    }

    /// Queue a command for the worker
    pub async fn dispatch(&self, command: Command) {
        let _ = self.handle.commands.send(command).await;
    }

    /// Receive the next event; `None` once the worker has shut down
    pub async fn next_event(&mut self) -> Option<Event> {
        self.handle.events.recv().await
    }

    /// Apply an event to the observable state
    pub fn apply(&mut self, event: Event) {
        self.state.apply(event);
    }
}
