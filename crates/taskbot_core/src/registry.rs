use crate::error::AppError;
use crate::model::{Task, TimerChoice};
use crate::storage::TaskStore;

/// Hard cap on the number of task names offered for selection at once.
/// Tasks beyond the cap stay invisible until a visible one is cleared.
pub const MAX_SELECTABLE: usize = 5;

/// In-memory view of the pending tasks, refreshed wholesale from the store.
/// Contents reflect the store at the moment of the last successful refresh;
/// staleness between refreshes is tolerated.
#[derive(Debug, Default)]
pub struct Registry {
    tasks: Vec<Task>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached list from the store. On a store error the previous
    /// list is kept and the error is returned; logging the failure is the
    /// caller's job, so one event produces one log line at most.
    pub fn refresh(&mut self, store: &dyn TaskStore) -> Result<(), AppError> {
        self.tasks = store.find_all()?;
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// First match by current order wins; duplicate names are disallowed at
    /// commit time but the store layer does not enforce that, so callers
    /// treat the first match as authoritative.
    pub fn lookup_timer(&self, name: &str) -> Option<TimerChoice> {
        self.tasks
            .iter()
            .find(|task| task.name == name)
            .map(|task| task.timer)
    }

    pub fn find_task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name == name)
    }

    /// Up to [`MAX_SELECTABLE`] names in registry order, skipping empties.
    pub fn selectable_names(&self) -> Vec<String> {
        self.tasks
            .iter()
            .filter(|task| !task.name.is_empty())
            .take(MAX_SELECTABLE)
            .map(|task| task.name.clone())
            .collect()
    }
}
