//! Pointer gesture interpretation.
//!
//! The [`InteractionController`] owns all transient pointer state (which
//! button is held, where the press started, whether it turned into a drag)
//! and turns raw [`InputEvent`]s into [`Command`]s. It never touches the
//! camera or selection itself; the renderer consumes the commands, which
//! keeps the gesture state machine testable without a browser.
//!
//! ```text
//!            press                 move > threshold
//!   Idle ───────────▶ Pressed ─────────────────────▶ Rotating (primary)
//!    ▲                   │                           Panning  (secondary)
//!    │   release/leave   │ release (primary) = Click      │
//!    └───────────────────┴────────────────────────────────┘
//! ```

use super::config::InteractionConfig;

/// Which pointer button an event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
	Primary,
	/// Right or middle button: pans.
	Secondary,
	Other,
}

impl PointerButton {
	/// From `MouseEvent.button`.
	pub fn from_dom(button: i16) -> Self {
		match button {
			0 => PointerButton::Primary,
			1 | 2 => PointerButton::Secondary,
			_ => PointerButton::Other,
		}
	}
}

/// Raw input, in canvas-relative pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
	PointerDown { x: f64, y: f64, button: PointerButton },
	PointerMove { x: f64, y: f64 },
	PointerUp { x: f64, y: f64, button: PointerButton },
	PointerLeave,
	/// Positive `delta_y` scrolls away from the viewer (zoom out).
	Wheel { delta_y: f64 },
	DoubleClick,
}

/// Closed set of state transitions the renderer understands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
	/// Orbit by the given angles (radians).
	Rotate { dyaw: f64, dpitch: f64 },
	/// Drag the scene by a screen-space delta (pixels).
	Pan { dx: f64, dy: f64 },
	/// Multiply the orbit distance.
	Zoom { factor: f64 },
	/// Resolve the node under the pointer and hover it.
	HoverProbe { x: f64, y: f64 },
	/// The pointer left the surface.
	HoverClear,
	/// Select the node under the pointer, if any.
	Click { x: f64, y: f64 },
	/// Restore the load-time camera and drop selection.
	Reset,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Gesture {
	Idle,
	Pressed {
		button: PointerButton,
		origin: (f64, f64),
	},
	Rotating {
		last: (f64, f64),
	},
	Panning {
		last: (f64, f64),
	},
}

/// Converts pointer events into [`Command`]s.
#[derive(Clone, Debug)]
pub struct InteractionController {
	config: InteractionConfig,
	gesture: Gesture,
	/// Set once the current press turns into a rotate/pan; suppresses the click.
	dragging: bool,
}

impl InteractionController {
	pub fn new(config: InteractionConfig) -> Self {
		Self {
			config,
			gesture: Gesture::Idle,
			dragging: false,
		}
	}

	pub fn config(&self) -> &InteractionConfig {
		&self.config
	}

	pub fn is_dragging(&self) -> bool {
		self.dragging
	}

	pub fn is_idle(&self) -> bool {
		self.gesture == Gesture::Idle
	}

	/// CSS cursor matching the current gesture.
	pub fn cursor(&self) -> &'static str {
		match self.gesture {
			Gesture::Rotating { .. } => "grabbing",
			Gesture::Panning { .. } => "move",
			Gesture::Idle | Gesture::Pressed { .. } => "grab",
		}
	}

	/// Process one input event and return zero or one commands.
	pub fn handle(&mut self, event: InputEvent) -> Option<Command> {
		match event {
			InputEvent::PointerDown { x, y, button } => {
				if button != PointerButton::Other {
					self.gesture = Gesture::Pressed {
						button,
						origin: (x, y),
					};
					self.dragging = false;
				}
				None
			}
			InputEvent::PointerMove { x, y } => self.handle_move(x, y),
			InputEvent::PointerUp { x, y, button } => {
				let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
				match gesture {
					Gesture::Pressed {
						button: PointerButton::Primary,
						..
					} if button == PointerButton::Primary && !self.dragging => {
						Some(Command::Click { x, y })
					}
					_ => None,
				}
			}
			InputEvent::PointerLeave => {
				self.gesture = Gesture::Idle;
				Some(Command::HoverClear)
			}
			InputEvent::Wheel { delta_y } => {
				if delta_y > 0.0 {
					Some(Command::Zoom {
						factor: self.config.wheel_zoom_out,
					})
				} else if delta_y < 0.0 {
					Some(Command::Zoom {
						factor: self.config.wheel_zoom_in,
					})
				} else {
					None
				}
			}
			InputEvent::DoubleClick => {
				self.gesture = Gesture::Idle;
				Some(Command::Reset)
			}
		}
	}

	fn handle_move(&mut self, x: f64, y: f64) -> Option<Command> {
		match self.gesture {
			Gesture::Idle => Some(Command::HoverProbe { x, y }),
			Gesture::Pressed { button, origin } => {
				let (dx, dy) = (x - origin.0, y - origin.1);
				if (dx * dx + dy * dy).sqrt() <= self.config.drag_threshold {
					return None;
				}
				self.dragging = true;
				if button == PointerButton::Primary {
					self.gesture = Gesture::Rotating { last: (x, y) };
					Some(self.rotate(dx, dy))
				} else {
					self.gesture = Gesture::Panning { last: (x, y) };
					Some(Command::Pan { dx, dy })
				}
			}
			Gesture::Rotating { last } => {
				self.gesture = Gesture::Rotating { last: (x, y) };
				Some(self.rotate(x - last.0, y - last.1))
			}
			Gesture::Panning { last } => {
				self.gesture = Gesture::Panning { last: (x, y) };
				Some(Command::Pan {
					dx: x - last.0,
					dy: y - last.1,
				})
			}
		}
	}

	fn rotate(&self, dx: f64, dy: f64) -> Command {
		Command::Rotate {
			dyaw: dx * self.config.rotate_speed,
			dpitch: dy * self.config.rotate_speed,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn controller() -> InteractionController {
		InteractionController::new(InteractionConfig::default())
	}

	fn down(x: f64, y: f64, button: PointerButton) -> InputEvent {
		InputEvent::PointerDown { x, y, button }
	}

	fn up(x: f64, y: f64, button: PointerButton) -> InputEvent {
		InputEvent::PointerUp { x, y, button }
	}

	fn mv(x: f64, y: f64) -> InputEvent {
		InputEvent::PointerMove { x, y }
	}

	#[test]
	fn idle_move_probes_hover() {
		let mut c = controller();
		assert_eq!(c.handle(mv(5.0, 6.0)), Some(Command::HoverProbe { x: 5.0, y: 6.0 }));
	}

	#[test]
	fn press_release_is_a_click() {
		let mut c = controller();
		assert_eq!(c.handle(down(10.0, 10.0, PointerButton::Primary)), None);
		assert_eq!(c.handle(mv(11.0, 11.0)), None, "jitter under threshold");
		assert_eq!(
			c.handle(up(11.0, 11.0, PointerButton::Primary)),
			Some(Command::Click { x: 11.0, y: 11.0 })
		);
		assert!(c.is_idle());
	}

	#[test]
	fn primary_drag_rotates_and_suppresses_click() {
		let mut c = controller();
		c.handle(down(0.0, 0.0, PointerButton::Primary));
		assert_eq!(
			c.handle(mv(20.0, -10.0)),
			Some(Command::Rotate {
				dyaw: 0.2,
				dpitch: -0.1
			})
		);
		assert!(c.is_dragging());
		assert_eq!(c.cursor(), "grabbing");
		assert_eq!(
			c.handle(mv(30.0, -10.0)),
			Some(Command::Rotate {
				dyaw: 0.1,
				dpitch: 0.0
			})
		);
		assert_eq!(c.handle(up(30.0, -10.0, PointerButton::Primary)), None);
		assert!(c.is_idle());
		assert_eq!(c.handle(mv(31.0, -10.0)), Some(Command::HoverProbe { x: 31.0, y: -10.0 }));
	}

	#[test]
	fn secondary_drag_pans_and_never_clicks() {
		let mut c = controller();
		c.handle(down(0.0, 0.0, PointerButton::Secondary));
		assert_eq!(c.handle(mv(5.0, 0.0)), Some(Command::Pan { dx: 5.0, dy: 0.0 }));
		assert_eq!(c.handle(mv(5.0, 7.0)), Some(Command::Pan { dx: 0.0, dy: 7.0 }));
		assert_eq!(c.cursor(), "move");
		assert_eq!(c.handle(up(5.0, 7.0, PointerButton::Secondary)), None);

		c.handle(down(0.0, 0.0, PointerButton::Secondary));
		assert_eq!(c.handle(up(0.0, 0.0, PointerButton::Secondary)), None);
	}

	#[test]
	fn leave_ends_gesture_and_clears_hover() {
		let mut c = controller();
		c.handle(down(0.0, 0.0, PointerButton::Primary));
		c.handle(mv(50.0, 0.0));
		assert_eq!(c.handle(InputEvent::PointerLeave), Some(Command::HoverClear));
		assert!(c.is_idle());
		assert_eq!(c.handle(up(50.0, 0.0, PointerButton::Primary)), None);
	}

	#[test]
	fn new_press_resets_drag_flag() {
		let mut c = controller();
		c.handle(down(0.0, 0.0, PointerButton::Primary));
		c.handle(mv(50.0, 0.0));
		c.handle(up(50.0, 0.0, PointerButton::Primary));
		assert!(c.is_dragging());
		c.handle(down(50.0, 0.0, PointerButton::Primary));
		assert!(!c.is_dragging());
		assert_eq!(
			c.handle(up(50.0, 0.0, PointerButton::Primary)),
			Some(Command::Click { x: 50.0, y: 0.0 })
		);
	}

	#[test]
	fn wheel_and_double_click() {
		let mut c = controller();
		assert_eq!(
			c.handle(InputEvent::Wheel { delta_y: 120.0 }),
			Some(Command::Zoom { factor: 1.15 })
		);
		assert_eq!(
			c.handle(InputEvent::Wheel { delta_y: -3.0 }),
			Some(Command::Zoom { factor: 0.87 })
		);
		assert_eq!(c.handle(InputEvent::Wheel { delta_y: 0.0 }), None);
		assert_eq!(c.handle(InputEvent::DoubleClick), Some(Command::Reset));
	}

	#[test]
	fn other_buttons_are_ignored() {
		let mut c = controller();
		assert_eq!(PointerButton::from_dom(3), PointerButton::Other);
		c.handle(down(0.0, 0.0, PointerButton::Other));
		assert!(c.is_idle());
		assert_eq!(c.handle(mv(40.0, 0.0)), Some(Command::HoverProbe { x: 40.0, y: 0.0 }));
	}
}
