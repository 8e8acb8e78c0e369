//! Task infrastructure: storage-backed repository and service

mod repository;
mod service;

pub use repository::StorageTaskRepository;
pub use service::{CreateTaskRequest, TaskDetails, TaskService, TeamRef};
