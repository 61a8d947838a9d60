//! Leptos component wrapping the contact graph canvas.
//!
//! The component creates an HTML canvas element, binds a
//! [`ContactGraphRenderer`] to it and forwards mouse/wheel events through the
//! renderer's gesture controller. There is no animation loop: every event
//! redraws synchronously. Host controls reach the renderer through a shared
//! [`GraphHandle`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::{info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::RendererConfig;
use super::interaction::{InputEvent, PointerButton};
use super::render::CanvasSurface;
use super::renderer::ContactGraphRenderer;
use super::selection::{Connection, NoopListener, SelectedNode, SelectionListener};
use super::types::GraphData;

/// Renderer bound to a live canvas, plus the window listener it owns.
struct Mounted {
	renderer: ContactGraphRenderer<CanvasSurface>,
	on_resize: Option<Closure<dyn FnMut()>>,
}

/// Shared access to the renderer behind a [`ContactGraphCanvas`].
///
/// Cheap to clone. Empty until the canvas mounts; every call is a no-op
/// returning `None` until then.
#[derive(Clone, Default)]
pub struct GraphHandle(Rc<RefCell<Option<Mounted>>>);

impl GraphHandle {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_mounted(&self) -> bool {
		self.0.borrow().is_some()
	}

	/// Runs `f` against the renderer. Returns `None` when nothing is mounted
	/// or the renderer is already in use further up the stack.
	pub fn with<R>(
		&self,
		f: impl FnOnce(&mut ContactGraphRenderer<CanvasSurface>) -> R,
	) -> Option<R> {
		let mut mounted = self.0.try_borrow_mut().ok()?;
		mounted.as_mut().map(|m| f(&mut m.renderer))
	}

	/// Detaches the window listener and releases the canvas. Later calls do nothing.
	pub fn destroy(&self) {
		let Some(mounted) = self.0.borrow_mut().take() else {
			return;
		};
		if let (Some(cb), Some(window)) = (&mounted.on_resize, web_sys::window()) {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		mounted.renderer.destroy();
	}

	fn input(&self, event: InputEvent) {
		self.with(|r| {
			r.handle_input(event);
			r.surface().set_cursor(r.cursor());
		});
	}

	fn mount(&self, renderer: ContactGraphRenderer<CanvasSurface>) {
		*self.0.borrow_mut() = Some(Mounted {
			renderer,
			on_resize: None,
		});

		let weak: Weak<RefCell<Option<Mounted>>> = Rc::downgrade(&self.0);
		let on_resize = Closure::<dyn FnMut()>::new(move || {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			if let Ok(mut mounted) = inner.try_borrow_mut() {
				if let Some(ref mut m) = *mounted {
					m.renderer.resize();
				}
			}
		});
		let Some(window): Option<Window> = web_sys::window() else {
			return;
		};
		let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
		if let Some(m) = self.0.borrow_mut().as_mut() {
			m.on_resize = Some(on_resize);
		}
	}
}

/// What the info panel shows about the selected node.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionInfo {
	pub index: usize,
	pub label: String,
	pub element: Option<String>,
	pub position: (f64, f64, f64),
	/// Direct contacts, nearest first.
	pub connections: Vec<Connection>,
}

impl SelectionInfo {
	fn from_selected(selected: &SelectedNode<'_>) -> Self {
		let node = selected.node;
		Self {
			index: selected.index,
			label: node.label.clone(),
			element: node.element.clone(),
			position: (node.x, node.y, node.z),
			connections: selected.connections.clone(),
		}
	}
}

/// Writes selection changes into a signal the host view reads.
struct PanelHook {
	info: RwSignal<Option<SelectionInfo>>,
}

impl SelectionListener for PanelHook {
	fn on_node_selected(&mut self, selected: &SelectedNode<'_>) {
		self.info.set(Some(SelectionInfo::from_selected(selected)));
	}

	fn on_selection_cleared(&mut self) {
		self.info.set(None);
	}
}

/// Canvas-relative pointer position.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders an interactive 3D contact graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal; every change reloads the
/// scene and refits the camera. The canvas sizes itself to its parent
/// container by default; set `fullscreen = true` to fill the window. Both
/// follow window resizes. When `selection` is given it receives the selected
/// node and its contacts, and `None` when the view is reset or the data
/// changes. Unmounting destroys the renderer and detaches the resize listener.
#[component]
pub fn ContactGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	handle: GraphHandle,
	#[prop(optional)] config: Option<RendererConfig>,
	#[prop(optional)] selection: Option<RwSignal<Option<SelectionInfo>>>,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let handle_init = handle.clone();
	let handle_cleanup = SendWrapper::new(handle.clone());
	on_cleanup(move || handle_cleanup.destroy());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let data = data.get();
		if handle_init.is_mounted() {
			handle_init.with(|r| r.load_graph(data));
			return;
		}

		let canvas: HtmlCanvasElement = canvas.into();
		let Some(surface) = CanvasSurface::new(canvas, fullscreen) else {
			warn!("contact-graph: canvas has no 2d context");
			return;
		};
		let listener: Box<dyn SelectionListener> = match selection {
			Some(info) => Box::new(PanelHook { info }),
			None => Box::new(NoopListener),
		};
		let mut renderer =
			ContactGraphRenderer::new(surface, config.clone().unwrap_or_default(), listener);
		renderer.load_graph(data);
		info!(
			"contact-graph: mounted at {}x{}",
			renderer.viewport().width,
			renderer.viewport().height
		);
		handle_init.mount(renderer);
	});

	let handle_md = handle.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		handle_md.input(InputEvent::PointerDown {
			x,
			y,
			button: PointerButton::from_dom(ev.button()),
		});
	};

	let handle_mm = handle.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			handle_mm.input(InputEvent::PointerMove { x, y });
		}
	};

	let handle_mu = handle.clone();
	let on_mouseup = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			handle_mu.input(InputEvent::PointerUp {
				x,
				y,
				button: PointerButton::from_dom(ev.button()),
			});
		}
	};

	let handle_ml = handle.clone();
	let on_mouseleave = move |_: MouseEvent| handle_ml.input(InputEvent::PointerLeave);

	let handle_wh = handle.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		handle_wh.input(InputEvent::Wheel {
			delta_y: ev.delta_y(),
		});
	};

	let handle_dc = handle;
	let on_dblclick = move |ev: MouseEvent| {
		ev.prevent_default();
		handle_dc.input(InputEvent::DoubleClick);
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="contact-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dblclick=on_dblclick
			on:contextmenu=|ev: MouseEvent| ev.prevent_default()
			style="display: block; cursor: grab;"
		/>
	}
}
