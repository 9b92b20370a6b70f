pub mod error;
pub mod event;
pub mod execution;
pub mod graph;
pub mod ordered_sim_object;
pub mod send_wrapper;
pub mod sim_object;
pub mod types;
