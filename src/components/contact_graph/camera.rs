//! Orbit camera and perspective projection.
//!
//! The camera orbits a pivot (`target`) at `distance`, facing it, with two
//! rotation angles. World points are mapped to screen coordinates with a
//! hand-rolled perspective divide. `glam` supplies only the vector type.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: the structure's own coordinates (usually Ångström).
//! - **Camera-space**: world minus pivot, rotated by yaw (about the vertical
//!   axis) then pitch (about the horizontal axis). `+z` points away from the
//!   viewer.
//! - **Screen-space**: canvas pixels, origin top-left, `y` growing downward.

use glam::DVec3;

use super::types::BoundingBox;

/// Closest the camera may get to its pivot.
pub const MIN_DISTANCE: f64 = 10.0;
/// Farthest the camera may get from its pivot.
pub const MAX_DISTANCE: f64 = 2000.0;
/// Distance multiplier for one zoom-in step.
pub const ZOOM_IN_RATIO: f64 = 0.85;
/// Distance multiplier for one zoom-out step.
pub const ZOOM_OUT_RATIO: f64 = 1.18;

/// Viewport width used when the container reports no area.
pub const DEFAULT_WIDTH: f64 = 800.0;
/// Viewport height used when the container reports no area.
pub const DEFAULT_HEIGHT: f64 = 600.0;

/// Guards the perspective divide as points approach the camera plane.
const DEPTH_EPSILON: f64 = 1e-3;
/// Screen coordinates are clamped to this magnitude so far-off points stay finite.
const SCREEN_LIMIT: f64 = 1e9;
const FOCAL_FACTOR: f64 = 0.9;
const FIT_DISTANCE_FACTOR: f64 = 1.8;
const FIT_ZOOM_FACTOR: f64 = 1.5;
const PAN_REFERENCE_DISTANCE: f64 = 600.0;
const MIN_PAN_SPEED: f64 = 0.15;
/// Mild tilt applied on every fit so depth is readable from the first frame.
const DEFAULT_YAW: f64 = 0.35;
const DEFAULT_PITCH: f64 = 0.25;
const DEFAULT_DISTANCE: f64 = 500.0;

/// Drawing surface dimensions and the focal length derived from them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
	/// `0.9 * min(width, height)`, recalibrated on every resize.
	pub focal_length: f64,
}

impl Viewport {
	/// Builds a viewport, substituting [`DEFAULT_WIDTH`]/[`DEFAULT_HEIGHT`]
	/// for dimensions that are zero, negative or not finite.
	pub fn new(width: f64, height: f64) -> Self {
		let width = if width.is_finite() && width >= 1.0 {
			width
		} else {
			DEFAULT_WIDTH
		};
		let height = if height.is_finite() && height >= 1.0 {
			height
		} else {
			DEFAULT_HEIGHT
		};
		Self {
			width,
			height,
			focal_length: FOCAL_FACTOR * width.min(height),
		}
	}

	/// The shorter of the two sides.
	pub fn min_side(&self) -> f64 {
		self.width.min(self.height)
	}
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
	}
}

/// A world point after projection. Recomputed every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	/// Camera-space z. Larger is farther away.
	pub depth: f64,
	/// Screen pixels per world unit at this depth. Always positive.
	pub scale: f64,
}

/// Everything `reset_view` needs to put the camera back where the last load left it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSnapshot {
	pub yaw: f64,
	pub pitch: f64,
	pub distance: f64,
	pub zoom: f64,
	pub lens: f64,
	pub target: DVec3,
}

/// Orbit camera state.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
	yaw: f64,
	pitch: f64,
	distance: f64,
	zoom: f64,
	/// Normalizes the perspective divide so a point at the pivot projects at
	/// exactly `zoom` pixels per world unit right after a fit.
	lens: f64,
	target: DVec3,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			yaw: DEFAULT_YAW,
			pitch: DEFAULT_PITCH,
			distance: DEFAULT_DISTANCE,
			zoom: 1.0,
			lens: DEFAULT_DISTANCE / Viewport::default().focal_length,
			target: DVec3::ZERO,
		}
	}
}

impl Camera {
	pub fn yaw(&self) -> f64 {
		self.yaw
	}

	pub fn pitch(&self) -> f64 {
		self.pitch
	}

	pub fn distance(&self) -> f64 {
		self.distance
	}

	pub fn zoom(&self) -> f64 {
		self.zoom
	}

	pub fn target(&self) -> DVec3 {
		self.target
	}

	/// Sets the orbit distance, clamped to [`MIN_DISTANCE`]..=[`MAX_DISTANCE`].
	/// Non-finite values are ignored.
	pub fn set_distance(&mut self, distance: f64) {
		if distance.is_finite() {
			self.distance = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
		}
	}

	/// Frames `bbox` in `viewport`: pivot on its center, distance and zoom
	/// scaled by its largest side, rotation back to the default tilt.
	pub fn fit(&mut self, bbox: &BoundingBox, viewport: &Viewport) {
		let extent = bbox.max_extent();
		let extent = if extent.is_finite() && extent > 0.0 {
			extent
		} else {
			1.0
		};
		self.yaw = DEFAULT_YAW;
		self.pitch = DEFAULT_PITCH;
		self.target = bbox.center();
		self.set_distance(FIT_DISTANCE_FACTOR * extent);
		self.zoom = viewport.min_side() / (FIT_ZOOM_FACTOR * extent);
		self.lens = self.distance / viewport.focal_length;
	}

	/// Moves the pivot to `target` and orbits at `distance` (clamped).
	pub fn focus(&mut self, target: DVec3, distance: f64) {
		if target.is_finite() {
			self.target = target;
		}
		self.set_distance(distance);
	}

	pub fn zoom_in(&mut self) {
		self.zoom_by(ZOOM_IN_RATIO);
	}

	pub fn zoom_out(&mut self) {
		self.zoom_by(ZOOM_OUT_RATIO);
	}

	/// Multiplies the orbit distance by `factor`, clamped.
	pub fn zoom_by(&mut self, factor: f64) {
		if factor > 0.0 {
			self.set_distance(self.distance * factor);
		}
	}

	/// Adds to yaw and pitch. No clamping: rotation is fully free.
	pub fn rotate(&mut self, dyaw: f64, dpitch: f64) {
		if dyaw.is_finite() && dpitch.is_finite() {
			self.yaw += dyaw;
			self.pitch += dpitch;
		}
	}

	/// Drags the scene by a screen-space delta. The pivot moves along the
	/// camera's right/up axes, faster when zoomed out.
	pub fn pan(&mut self, dx: f64, dy: f64) {
		if !(dx.is_finite() && dy.is_finite()) {
			return;
		}
		let speed = (self.distance / PAN_REFERENCE_DISTANCE).max(MIN_PAN_SPEED);
		let (right, up) = self.basis();
		self.target = self.target - right * (dx * speed) + up * (dy * speed);
	}

	/// World-space directions of the screen's right and up axes.
	pub fn basis(&self) -> (DVec3, DVec3) {
		let (sy, cy) = self.yaw.sin_cos();
		let (sp, cp) = self.pitch.sin_cos();
		let right = DVec3::new(cy, 0.0, -sy);
		let up = DVec3::new(-sp * sy, cp, -sp * cy);
		(right, up)
	}

	/// Maps a world point to screen space.
	pub fn project(&self, point: DVec3, viewport: &Viewport) -> Projected {
		let rel = point - self.target;
		let (sy, cy) = self.yaw.sin_cos();
		let x1 = rel.x * cy - rel.z * sy;
		let z1 = rel.x * sy + rel.z * cy;
		let (sp, cp) = self.pitch.sin_cos();
		let y2 = rel.y * cp - z1 * sp;
		let z2 = rel.y * sp + z1 * cp;

		// f64::max also maps a NaN depth to the epsilon.
		let denominator = (self.distance + z2).max(DEPTH_EPSILON);
		let scale = self.zoom * viewport.focal_length * self.lens / denominator;
		let scale = if scale.is_finite() {
			scale.max(f64::MIN_POSITIVE)
		} else {
			f64::MIN_POSITIVE
		};

		Projected {
			x: screen_coord(viewport.width / 2.0 + x1 * scale),
			y: screen_coord(viewport.height / 2.0 - y2 * scale),
			depth: z2,
			scale,
		}
	}

	pub fn snapshot(&self) -> CameraSnapshot {
		CameraSnapshot {
			yaw: self.yaw,
			pitch: self.pitch,
			distance: self.distance,
			zoom: self.zoom,
			lens: self.lens,
			target: self.target,
		}
	}

	pub fn restore(&mut self, snapshot: &CameraSnapshot) {
		self.yaw = snapshot.yaw;
		self.pitch = snapshot.pitch;
		self.distance = snapshot.distance;
		self.zoom = snapshot.zoom;
		self.lens = snapshot.lens;
		self.target = snapshot.target;
	}
}

/// Clamps to a finite screen range. NaN lands on the origin.
fn screen_coord(v: f64) -> f64 {
	if v.is_nan() {
		0.0
	} else {
		v.clamp(-SCREEN_LIMIT, SCREEN_LIMIT)
	}
}
