pub mod core;

// Re-export commonly used types
pub use crate::core::error::SimError;
pub use crate::core::event::Event;
pub use crate::core::execution::{SimulationConfig, SimulationEngine};
pub use crate::core::graph::{AdjacencyGraph, DependencyGraph, OutEdge};
pub use crate::core::ordered_sim_object::OrderedSimObject;
pub use crate::core::send_wrapper::SendWrapper;
pub use crate::core::sim_object::{SimModel, SimObjectInfo};
pub use crate::core::types::{NodeId, ObjectId, Timestamp};
