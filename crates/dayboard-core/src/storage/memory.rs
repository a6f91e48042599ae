use super::TaskStore;
use crate::error::{Result, ValidationError};
use crate::task::Task;

/// Vec-backed store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Vec<Task>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }
}

impl TaskStore for InMemoryTaskStore {
    fn create(&mut self, task: &Task) -> Result<()> {
        if self.position(&task.id).is_some() {
            return Err(ValidationError::InvalidValue {
                field: "id".into(),
                message: format!("task '{}' already exists", task.id),
            }
            .into());
        }
        self.tasks.push(task.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.position(id).map(|i| self.tasks[i].clone()))
    }

    fn list(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn update(&mut self, task: &Task) -> Result<bool> {
        match self.position(&task.id) {
            Some(i) => {
                self.tasks[i] = task.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        match self.position(id) {
            Some(i) => {
                self.tasks.remove(i);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
