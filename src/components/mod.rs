//! UI components.

pub mod contact_graph;
