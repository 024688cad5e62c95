use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::{ClientError, TodoApi};
use crate::core::{Todo, TodoId, TodoPatch};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

pub const LOAD_FAILED: &str = "Failed to load todos";
pub const CREATE_FAILED: &str = "Failed to create todo";
pub const UPDATE_FAILED: &str = "Failed to update todo";
pub const DELETE_FAILED: &str = "Failed to delete todo";
pub const CLEAR_FAILED: &str = "Failed to clear todos";

/// How local mutations are reconciled with the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconcilePolicy {
    /// Every mutation reaches the server. Toggle is applied optimistically
    /// and rolled back if the server refuses it; delete and clear-all wait
    /// for the server before touching the local list.
    #[default]
    ServerConfirmed,
    /// Toggle flips locally and fires an unchecked update; delete and
    /// clear-all never leave the client.
    Compatible,
}

/// Everything the view needs to draw itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoState {
    pub todos: Vec<Todo>,
    pub draft: String,
    pub loading: bool,
    pub error: Option<String>,
    pub confirm_clear: bool,
}

impl TodoState {
    pub fn find(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    fn find_mut(&mut self, id: &TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| &todo.id == id)
    }
}

/// Client-side mirror of the todo collection. State changes are published on
/// a watch channel so a view can re-render while requests are in flight.
pub struct TodoController<A: TodoApi> {
    api: Arc<A>,
    policy: ReconcilePolicy,
    state: watch::Sender<TodoState>,
    background: Vec<JoinHandle<()>>,
}

impl<A: TodoApi> TodoController<A> {
    pub fn new(api: Arc<A>, policy: ReconcilePolicy) -> Self {
        let (state, _) = watch::channel(TodoState::default());
        Self {
            api,
            policy,
            state,
            background: Vec::new(),
        }
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TodoState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TodoState> {
        self.state.subscribe()
    }

    fn update(&self, f: impl FnOnce(&mut TodoState)) {
        self.state.send_modify(f);
    }

    /// Fetches the full list once, replacing whatever is held locally.
    pub async fn load(&mut self) {
        self.update(|state| {
            state.loading = true;
            state.error = None;
        });
        let result = self.api.list().await;
        self.update(|state| {
            match result {
                Ok(todos) => state.todos = todos,
                Err(_) => {
                    state.todos.clear();
                    state.error = Some(LOAD_FAILED.to_string());
                }
            }
            state.loading = false;
        });
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.update(|state| state.draft = text);
    }

    /// Creates the drafted todo. The list only grows once the server has
    /// answered with the stored record.
    pub async fn add(&mut self) {
        let text = self.state.borrow().draft.trim().to_string();
        if text.is_empty() {
            return;
        }
        self.update(|state| state.error = None);
        let result = self.api.create(&text).await;
        self.update(|state| match result {
            Ok(todo) => {
                state.todos.push(todo);
                state.draft.clear();
            }
            Err(_) => state.error = Some(CREATE_FAILED.to_string()),
        });
    }

    /// Flips `completed` locally at once, then tells the server.
    pub async fn toggle(&mut self, id: &TodoId) {
        let Some(previous) = self.state.borrow().find(id).map(|todo| todo.completed) else {
            return;
        };
        let patch = TodoPatch::completed(!previous);
        self.update(|state| {
            if let Some(todo) = state.find_mut(id) {
                todo.completed = !previous;
            }
        });

        match self.policy {
            ReconcilePolicy::Compatible => {
                let api = Arc::clone(&self.api);
                let id = id.clone();
                self.spawn(async move {
                    if let Err(_e) = api.update(&id, &patch).await {
                        #[cfg(feature = "tracing")]
                        warn!(id = %id, error = %_e, "Background update failed");
                    }
                });
            }
            ReconcilePolicy::ServerConfirmed => {
                self.update(|state| state.error = None);
                let result = self.api.update(id, &patch).await;
                self.update(|state| match result {
                    Ok(server) => {
                        if let Some(todo) = state.find_mut(id) {
                            *todo = server;
                        }
                    }
                    Err(_) => {
                        if let Some(todo) = state.find_mut(id) {
                            todo.completed = previous;
                        }
                        state.error = Some(UPDATE_FAILED.to_string());
                    }
                });
            }
        }
    }

    pub async fn delete(&mut self, id: &TodoId) {
        if self.policy == ReconcilePolicy::ServerConfirmed {
            self.update(|state| state.error = None);
            match self.api.delete(id).await {
                Ok(()) => {}
                // Already gone on the server: drop the stale local copy too.
                Err(ClientError::Status { status: 404, .. }) => {
                    #[cfg(feature = "tracing")]
                    debug!(id = %id, "Todo already deleted on server");
                }
                Err(_) => {
                    self.update(|state| state.error = Some(DELETE_FAILED.to_string()));
                    return;
                }
            }
        }
        self.update(|state| state.todos.retain(|todo| &todo.id != id));
    }

    pub fn request_clear(&mut self) {
        self.update(|state| state.confirm_clear = true);
    }

    pub fn cancel_clear(&mut self) {
        self.update(|state| state.confirm_clear = false);
    }

    /// Answer "yes" on the clear-all dialog.
    pub async fn confirm_clear(&mut self) {
        self.update(|state| state.confirm_clear = false);
        if self.policy == ReconcilePolicy::ServerConfirmed {
            self.update(|state| state.error = None);
            if self.api.delete_all().await.is_err() {
                self.update(|state| state.error = Some(CLEAR_FAILED.to_string()));
                return;
            }
        }
        self.update(|state| state.todos.clear());
    }

    /// Waits for fire-and-forget requests still in flight.
    pub async fn settle(&mut self) {
        for handle in self.background.drain(..) {
            let _ = handle.await;
        }
    }

    fn spawn(&mut self, task: impl std::future::Future<Output = ()> + Send + 'static) {
        self.background.retain(|handle| !handle.is_finished());
        self.background.push(tokio::spawn(task));
    }
}
