//! Infrastructure layer - Storage backends, repositories and services

pub mod auth;
pub mod logging;
pub mod observability;
pub mod storage;
pub mod task;
pub mod team;
pub mod user;
