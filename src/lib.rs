//! contact-graph: Interactive 3D contact graph viewer for molecular structures.
//!
//! This crate provides a WASM-based viewer that renders residue/atom contact
//! graphs with a hand-rolled orbit camera, depth-sorted canvas drawing,
//! hover/click selection and segment highlighting.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlScriptElement, MouseEvent, Window};

pub mod components;

pub use components::contact_graph::{
	ContactGraphCanvas, ContactGraphRenderer, GraphData, GraphEdge, GraphHandle, GraphNode,
	RendererConfig, SegmentMatch, SelectionInfo, VisibilityUpdate,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("contact-graph: logging initialized");
}

/// Text content of the `<script>` element with the given id.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [[i, j], ...], graphMetadata: {...} }
fn load_graph_data() -> Option<GraphData> {
	let json_text = script_text("graph-data")?;

	match GraphData::from_json(&json_text) {
		Ok(data) => {
			info!(
				"contact-graph: read {} nodes, {} edges from page",
				data.nodes.len(),
				data.edges.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("contact-graph: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Load optional renderer settings from a script element with id="renderer-config".
fn load_renderer_config() -> RendererConfig {
	let Some(json_text) = script_text("renderer-config") else {
		return RendererConfig::default();
	};
	RendererConfig::from_json(&json_text).unwrap_or_else(|e| {
		warn!("contact-graph: failed to parse renderer config: {}", e);
		RendererConfig::default()
	})
}

/// Human-readable result of a segment query.
fn describe_match(id: &str, found: SegmentMatch) -> String {
	if found.found {
		format!(
			"Segment {}: {} nodes, {} neighbors",
			id.trim(),
			found.count,
			found.neighbor_count
		)
	} else {
		format!("Segment {} not found", id.trim())
	}
}

/// Main application component.
/// Loads graph data from DOM and renders the viewer with its controls.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	// Load graph data and settings from the DOM
	let graph_data = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());
	let config = load_renderer_config();

	let handle = GraphHandle::new();
	let selection = RwSignal::new(None::<SelectionInfo>);
	let segment = RwSignal::new(String::new());
	let status = RwSignal::new(String::new());

	let handle_seg = handle.clone();
	let on_highlight = move |_: MouseEvent| {
		let id = segment.get_untracked();
		if let Some(found) = handle_seg.with(|r| r.highlight_segment(&id)) {
			debug!("contact-graph: segment query {:?} -> {:?}", id, found);
			status.set(describe_match(&id, found));
		}
	};

	let handle_clear = handle.clone();
	let on_clear = move |_: MouseEvent| {
		handle_clear.with(|r| r.clear_segment_highlight());
		status.set(String::new());
	};

	let handle_nodes = handle.clone();
	let on_toggle_nodes = move |ev: Event| {
		let nodes = event_target_checked(&ev);
		handle_nodes.with(|r| {
			r.set_visibility(VisibilityUpdate {
				nodes: Some(nodes),
				edges: None,
			})
		});
	};

	let handle_edges = handle.clone();
	let on_toggle_edges = move |ev: Event| {
		let edges = event_target_checked(&ev);
		handle_edges.with(|r| {
			r.set_visibility(VisibilityUpdate {
				nodes: None,
				edges: Some(edges),
			})
		});
	};

	let (handle_in, handle_out, handle_reset) = (handle.clone(), handle.clone(), handle.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Contact Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ContactGraphCanvas
				data=graph_signal
				handle=handle
				config=config
				selection=selection
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Contact Graph"</h1>
				<p class="subtitle">
					"Drag to rotate. Right-drag to pan. Scroll to zoom. Double-click to reset."
				</p>
				<div class="graph-controls">
					<input
						type="text"
						placeholder="Segment, e.g. 42"
						prop:value=move || segment.get()
						on:input=move |ev| segment.set(event_target_value(&ev))
					/>
					<button on:click=on_highlight>"Highlight"</button>
					<button on:click=on_clear>"Clear"</button>
					<p class="status">{move || status.get()}</p>
					<label>
						<input type="checkbox" checked=true on:change=on_toggle_nodes />
						" Nodes"
					</label>
					<label>
						<input type="checkbox" checked=true on:change=on_toggle_edges />
						" Edges"
					</label>
					<button on:click=move |_: MouseEvent| {
						handle_in.with(|r| r.zoom_in());
					}>"+"</button>
					<button on:click=move |_: MouseEvent| {
						handle_out.with(|r| r.zoom_out());
					}>"-"</button>
					<button on:click=move |_: MouseEvent| {
						handle_reset.with(|r| r.reset_view());
					}>"Reset"</button>
				</div>
			</div>
			<InfoPanel selection=selection />
		</div>
	}
}

/// Shows the selected node and its contacts.
#[component]
fn InfoPanel(selection: RwSignal<Option<SelectionInfo>>) -> impl IntoView {
	move || match selection.get() {
		None => view! { <div class="info-panel empty">"Click a node for details"</div> }.into_any(),
		Some(info) => {
			let (x, y, z) = info.position;
			let element = info.element.unwrap_or_else(|| "-".to_string());
			let count = info.connections.len();
			let rows = info
				.connections
				.into_iter()
				.map(|c| {
					view! {
						<li>
							<span class="contact-label">{c.label}</span>
							<span class="contact-distance">{format!("{:.2} Å", c.distance)}</span>
						</li>
					}
				})
				.collect_view();
			view! {
				<div class="info-panel">
					<h2>{info.label}</h2>
					<p>{format!("#{} · element {} · ({:.2}, {:.2}, {:.2})", info.index, element, x, y, z)}</p>
					<h3>{format!("{} contacts", count)}</h3>
					<ul>{rows}</ul>
				</div>
			}
			.into_any()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn describes_segment_queries() {
		let found = SegmentMatch {
			found: true,
			count: 2,
			neighbor_count: 5,
		};
		assert_eq!(describe_match(" 42", found), "Segment 42: 2 nodes, 5 neighbors");
		assert_eq!(describe_match("7", SegmentMatch::NOT_FOUND), "Segment 7 not found");
	}
}
