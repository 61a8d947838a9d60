//! Interactive 3D contact graph viewer.
//!
//! Draws a molecular contact graph (residues or atoms as nodes, spatial
//! contacts as edges) onto an HTML canvas with:
//! - A hand-rolled orbit camera and perspective projection
//! - Painter's-algorithm depth sorting instead of a depth buffer
//! - Pointer hit-testing, hover and click selection
//! - Segment highlights that pull in first-degree neighbors
//! - Configurable theming and visual scaling
//!
//! # Example
//!
//! ```ignore
//! use contact_graph::{ContactGraphCanvas, GraphData, GraphHandle};
//!
//! let data = GraphData::from_json(r#"{
//!     "nodes": [
//!         {"x": 0, "y": 0, "z": 0, "label": "A:TRP:42"},
//!         {"x": 4, "y": 1, "z": 0, "label": "A:LEU:43"}
//!     ],
//!     "edges": [[0, 1]]
//! }"#)?;
//! let handle = GraphHandle::new();
//!
//! view! { <ContactGraphCanvas data=data handle=handle.clone() fullscreen=true /> }
//!
//! // Later, from any control:
//! handle.with(|r| r.highlight_segment("42"));
//! ```

mod adjacency;
pub mod camera;
mod component;
pub mod config;
pub mod interaction;
pub mod label;
pub mod render;
mod renderer;
pub mod scale;
pub mod selection;
pub mod theme;
mod types;

pub use adjacency::AdjacencyIndex;
pub use component::{ContactGraphCanvas, GraphHandle, SelectionInfo};
pub use config::RendererConfig;
pub use renderer::{ContactGraphRenderer, VisibilityUpdate};
pub use selection::{SegmentMatch, SelectionListener};
pub use theme::Theme;
pub use types::{BoundingBox, GraphData, GraphEdge, GraphMetadata, GraphNode};
