//! Recording host fixture.

use serde_json::{Map, Value};
use toolset_core::{Operation, OperationId, ToolHost};

/// A tool that is nothing but its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTool(pub &'static str);

/// Create a fresh [`NamedTool`] operation.
pub fn named(name: &'static str) -> Operation<NamedTool> {
    Operation::new(NamedTool(name))
}

/// One registration the host accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub id: OperationId,
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

/// Error returned when the host is configured to reject a call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("host rejected registration #{attempt} ({id})")]
pub struct HostRejected {
    pub attempt: usize,
    pub id: OperationId,
}

/// Host that records every registration, optionally failing the n-th attempt.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Vec<RecordedCall>,
    attempts: usize,
    fail_on: Option<usize>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the `attempt`-th registration (1-based).
    pub fn failing_on(attempt: usize) -> Self {
        Self {
            fail_on: Some(attempt),
            ..Self::default()
        }
    }

    /// Accepted registrations in order.
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    pub fn ids(&self) -> Vec<OperationId> {
        self.calls.iter().map(|call| call.id).collect()
    }

    /// Number of times `register` was called, including the rejected one.
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl<T: ?Sized> ToolHost<T> for RecordingHost {
    type Error = HostRejected;

    fn register(
        &mut self,
        operation: &Operation<T>,
        args: &[Value],
        kwargs: &Map<String, Value>,
    ) -> Result<(), HostRejected> {
        self.attempts += 1;
        if self.fail_on == Some(self.attempts) {
            return Err(HostRejected {
                attempt: self.attempts,
                id: operation.id(),
            });
        }
        self.calls.push(RecordedCall {
            id: operation.id(),
            args: args.to_vec(),
            kwargs: kwargs.clone(),
        });
        Ok(())
    }
}
