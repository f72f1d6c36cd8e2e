use crate::error::AppError;
use crate::model::{Task, TimerChoice};
use crate::registry::Registry;
use crate::session::{self, Event, Reply, Session, StoreOp};
use crate::storage::TaskStore;
use std::collections::HashMap;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// What a processed event asks the runtime to do: deliver replies, and
/// optionally run a countdown before feeding `TimerExpired` back in.
#[derive(Debug)]
pub struct Outcome {
    pub replies: Vec<Reply>,
    pub countdown: Option<TimerChoice>,
}

/// Drives one state-machine step per inbound event: refreshes the registry
/// where the step needs a current view, runs the pure transition, executes
/// the requested store operations, and keeps one session per chat id.
///
/// Persistence errors never escape a step; they are logged, retried once,
/// and then surfaced to the user as a reply where it matters.
pub struct Engine {
    store: Box<dyn TaskStore + Send>,
    registry: Registry,
    sessions: HashMap<i64, Session>,
}

impl Engine {
    pub fn new(store: Box<dyn TaskStore + Send>) -> Self {
        Self {
            store,
            registry: Registry::new(),
            sessions: HashMap::new(),
        }
    }

    pub fn handle_text(&mut self, chat_id: i64, text: &str) -> Outcome {
        self.handle(chat_id, Event::Text(text))
    }

    pub fn handle_timer_expired(&mut self, chat_id: i64) -> Outcome {
        self.handle(chat_id, Event::TimerExpired)
    }

    pub fn handle(&mut self, chat_id: i64, event: Event<'_>) -> Outcome {
        let session = self.sessions.entry(chat_id).or_default().clone();

        if session::needs_refresh(&session, &event) {
            self.refresh_registry();
        }

        let transition = session::step(&session, event, &self.registry);
        let mut replies = transition.replies;

        for op in transition.store_ops {
            match op {
                StoreOp::Insert { name, timer } => {
                    let task = Task {
                        name,
                        timer,
                        created_at: rfc3339_now(),
                    };
                    if let Err(err) = self.insert_with_retry(&task) {
                        tracing::error!(error = %err, task = %task.name, "failed to persist task");
                        replies.push(Reply::plain(
                            "I could not save that task. Please try again.",
                        ));
                    }
                }
                StoreOp::Delete { name } => {
                    // The countdown proceeds even if the delete fails; the
                    // leftover record resurfaces on the next refresh.
                    if let Err(err) = self.delete_with_retry(&name) {
                        tracing::error!(error = %err, task = %name, "failed to delete started task");
                    }
                }
            }
        }

        if replies.is_empty() && transition.countdown.is_none() {
            tracing::debug!(chat_id, "message matched no command, state, or task name");
        }

        self.sessions.insert(chat_id, transition.session);
        Outcome {
            replies,
            countdown: transition.countdown,
        }
    }

    pub fn session(&self, chat_id: i64) -> Option<&Session> {
        self.sessions.get(&chat_id)
    }

    fn refresh_registry(&mut self) {
        let mut result = self.registry.refresh(self.store.as_ref());
        if result.is_err() {
            result = self.registry.refresh(self.store.as_ref());
        }
        if let Err(err) = result {
            tracing::warn!(error = %err, "registry refresh failed after retry, continuing with stale task list");
        }
    }

    fn insert_with_retry(&self, task: &Task) -> Result<(), AppError> {
        if let Err(err) = self.store.insert_one(task) {
            tracing::warn!(error = %err, "insert failed, retrying once");
            return self.store.insert_one(task);
        }
        Ok(())
    }

    fn delete_with_retry(&self, name: &str) -> Result<(), AppError> {
        if let Err(err) = self.store.delete_one(name) {
            tracing::warn!(error = %err, "delete failed, retrying once");
            return self.store.delete_one(name);
        }
        Ok(())
    }
}

fn rfc3339_now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
