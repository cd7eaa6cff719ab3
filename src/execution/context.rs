//! Execution Context
//!
//! Per-statement state that expressions read while evaluating: the session's
//! connection id and user, and the statement start time.

use crate::common::constants::DEFAULT_HOST;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Execution context for evaluating a single statement
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Connection (session) id, reported by CONNECTION_ID() and used as lock owner
    pub connection_id: u32,
    /// Authenticated user, reported by USER() / CURRENT_USER()
    pub user: String,
    /// Host the user connected from
    pub host: String,
    /// Statement start time; NOW() is stable for the whole statement
    pub query_time: DateTime<Utc>,
    /// Unique id of the current statement
    pub query_id: Uuid,
}

impl ExecutionContext {
    /// Create a new execution context for a connection
    pub fn new(connection_id: u32, user: impl Into<String>) -> Self {
        Self {
            connection_id,
            user: user.into(),
            host: DEFAULT_HOST.to_string(),
            query_time: Utc::now(),
            query_id: Uuid::new_v4(),
        }
    }

    /// Context used during DDL and catalog loading, where no session exists
    pub fn empty() -> Self {
        Self::new(0, "")
    }

    /// Start a new statement on the same session
    pub fn next_statement(&self) -> Self {
        Self {
            query_time: Utc::now(),
            query_id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    pub fn with_query_time(mut self, query_time: DateTime<Utc>) -> Self {
        self.query_time = query_time;
        self
    }

    /// `user@host`, the form USER() returns
    pub fn user_at_host(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::empty()
    }
}
