use crate::error::AppError;
use crate::model::Task;
use std::sync::Mutex;

mod json_store;
pub use json_store::{JsonStore, store_path};

/// Generic document persistence for pending tasks. Implementations hold no
/// business logic; uniqueness and ordering are the caller's concern.
pub trait TaskStore {
    fn insert_one(&self, task: &Task) -> Result<(), AppError>;

    fn find_all(&self) -> Result<Vec<Task>, AppError>;

    /// Deletes the first document whose name matches. Deleting a name that
    /// is not present is a successful no-op.
    fn delete_one(&self, name: &str) -> Result<(), AppError>;
}

/// Process-local store with no durability. Used by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryStore {
    fn insert_one(&self, task: &Task) -> Result<(), AppError> {
        let mut tasks = self
            .tasks
            .lock()
            .map_err(|_| AppError::store("memory store poisoned"))?;
        tasks.push(task.clone());
        Ok(())
    }

    fn find_all(&self) -> Result<Vec<Task>, AppError> {
        let tasks = self
            .tasks
            .lock()
            .map_err(|_| AppError::store("memory store poisoned"))?;
        Ok(tasks.clone())
    }

    fn delete_one(&self, name: &str) -> Result<(), AppError> {
        let mut tasks = self
            .tasks
            .lock()
            .map_err(|_| AppError::store("memory store poisoned"))?;
        if let Some(index) = tasks.iter().position(|task| task.name == name) {
            tasks.remove(index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryStore, TaskStore};
    use crate::model::{Task, TimerChoice};

    fn task(name: &str, timer: TimerChoice) -> Task {
        Task {
            name: name.to_string(),
            timer,
            created_at: String::new(),
        }
    }

    #[test]
    fn insert_then_find_returns_in_order() {
        let store = MemoryStore::new();
        store.insert_one(&task("a", TimerChoice::Min10)).unwrap();
        store.insert_one(&task("b", TimerChoice::Min20)).unwrap();

        let all = store.find_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "a");
        assert_eq!(all[1].name, "b");
    }

    #[test]
    fn delete_one_removes_only_first_match() {
        let store = MemoryStore::new();
        store.insert_one(&task("a", TimerChoice::Min10)).unwrap();
        store.insert_one(&task("a", TimerChoice::Min30)).unwrap();

        store.delete_one("a").unwrap();

        let all = store.find_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].timer, TimerChoice::Min30);
    }

    #[test]
    fn delete_one_missing_name_is_noop() {
        let store = MemoryStore::new();
        store.insert_one(&task("a", TimerChoice::Min10)).unwrap();

        store.delete_one("b").unwrap();
        assert_eq!(store.find_all().unwrap().len(), 1);
    }
}
