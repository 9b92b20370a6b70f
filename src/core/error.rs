//! Error types for the simulation engine.

use super::types::{NodeId, ObjectId, Timestamp};
use thiserror::Error;

/// Errors raised while building or running a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// An event was delivered to an object it is not addressed to.
    #[error("event at t={timestamp} addressed to {receiver} was delivered to {object}")]
    MisroutedEvent {
        timestamp: Timestamp,
        receiver: ObjectId,
        object: ObjectId,
    },

    /// The graph has no node with this id.
    #[error("unknown graph node {0}")]
    UnknownNode(NodeId),

    /// No simulation object is registered under this id.
    #[error("unknown simulation object {0}")]
    UnknownObject(ObjectId),

    /// Two simulation objects share an id.
    #[error("simulation object {0} registered twice")]
    DuplicateObject(ObjectId),

    /// Declared port counts disagree with the graph degree.
    #[error(
        "{object} declares {declared_outputs} outputs / {declared_inputs} inputs \
         but the graph has {graph_outputs} / {graph_inputs}"
    )]
    DegreeMismatch {
        object: ObjectId,
        declared_outputs: usize,
        declared_inputs: usize,
        graph_outputs: usize,
        graph_inputs: usize,
    },

    /// A produced event is timestamped before the current simulation time.
    #[error("{sender} produced an event at t={timestamp}, before current time {now}")]
    CausalityViolation {
        sender: ObjectId,
        timestamp: Timestamp,
        now: Timestamp,
    },

    /// The rayon thread pool could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(String),
}
