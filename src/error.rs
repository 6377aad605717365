//! Error types for task execution.
//!
//! The only runtime failure the scheduler reports through values is a task
//! body that panicked; contract violations (wiring a handle after dispatch,
//! mixing handles across schedulers) abort with a panic instead.

/// Errors surfaced through a task's result channel
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TaskError {
    /// Task panicked during execution
    Panicked { task_id: usize, message: String },
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskError::Panicked { task_id, message } => {
                write!(
                    f,
                    "Task #{} panicked during execution: {}\n\
                     \n\
                     The panic was captured in the task's result channel; the rest of \
                     the graph ran to completion.",
                    task_id, message
                )
            }
        }
    }
}

impl std::error::Error for TaskError {}

/// Result type for task-channel operations
pub type TaskResult<T> = Result<T, TaskError>;
