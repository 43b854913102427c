use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry in the orchestration to-do list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub event: String,
    pub done: bool,
}

/// Request-scoped accumulator threaded through tag handlers.
///
/// Owned by exactly one in-flight request and mutated only through the
/// handlers that request executes — a single-writer contract by
/// construction, not by locking.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentState {
    /// Notebook title, if an `update-title` tag set one
    pub title: Option<String>,
    /// Variable store keyed by name
    pub variables: HashMap<String, Value>,
    /// Orchestration to-do list
    pub todos: Vec<TodoItem>,
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn add_todo(&mut self, event: impl Into<String>) {
        self.todos.push(TodoItem {
            event: event.into(),
            done: false,
        });
    }

    /// Mark the first matching to-do as done; returns whether one matched.
    pub fn complete_todo(&mut self, event: &str) -> bool {
        match self.todos.iter_mut().find(|t| t.event == event && !t.done) {
            Some(todo) => {
                todo.done = true;
                true
            }
            None => false,
        }
    }

    /// Remove all to-dos matching the event; returns whether any matched.
    pub fn remove_todo(&mut self, event: &str) -> bool {
        let before = self.todos.len();
        self.todos.retain(|t| t.event != event);
        self.todos.len() != before
    }
}
