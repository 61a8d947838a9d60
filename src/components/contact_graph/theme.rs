//! Visual theming for the contact graph.
//!
//! Provides the classification palette, highlight colors and background style.

use super::label::{Element, NodeClass, ResidueClass};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Multiplies the alpha channel, clamped to [0, 1].
	pub fn fade(self, factor: f64) -> Self {
		Self {
			a: (self.a * factor).clamp(0.0, 1.0),
			..self
		}
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Colors keyed on [`NodeClass`].
#[derive(Clone, Debug)]
pub struct ClassPalette {
	pub carbon: Color,
	pub nitrogen: Color,
	pub oxygen: Color,
	pub sulfur: Color,
	pub phosphorus: Color,
	pub hydrogen: Color,
	pub metal: Color,
	pub other_element: Color,
	pub hydrophobic: Color,
	pub aromatic: Color,
	pub polar: Color,
	pub positive: Color,
	pub negative: Color,
	pub special: Color,
	pub nucleotide: Color,
	pub water: Color,
	pub other_residue: Color,
	/// Nodes whose label could not be decoded.
	pub generic: Color,
}

impl ClassPalette {
	/// CPK-style element colors and muted side-chain classes.
	pub fn standard() -> Self {
		Self {
			carbon: Color::rgb(144, 164, 174),
			nitrogen: Color::rgb(92, 128, 230),
			oxygen: Color::rgb(230, 84, 84),
			sulfur: Color::rgb(235, 200, 70),
			phosphorus: Color::rgb(240, 150, 60),
			hydrogen: Color::rgb(225, 225, 225),
			metal: Color::rgb(160, 110, 200),
			other_element: Color::rgb(220, 120, 200),
			hydrophobic: Color::rgb(120, 170, 120),
			aromatic: Color::rgb(110, 150, 110),
			polar: Color::rgb(110, 180, 190),
			positive: Color::rgb(100, 130, 220),
			negative: Color::rgb(215, 95, 95),
			special: Color::rgb(190, 170, 120),
			nucleotide: Color::rgb(200, 140, 90),
			water: Color::rgb(120, 170, 230),
			other_residue: Color::rgb(180, 130, 190),
			generic: Color::rgb(136, 160, 175),
		}
	}

	pub fn color(&self, class: NodeClass) -> Color {
		match class {
			NodeClass::Element(element) => match element {
				Element::Carbon => self.carbon,
				Element::Nitrogen => self.nitrogen,
				Element::Oxygen => self.oxygen,
				Element::Sulfur => self.sulfur,
				Element::Phosphorus => self.phosphorus,
				Element::Hydrogen => self.hydrogen,
				Element::Metal => self.metal,
				Element::Other => self.other_element,
			},
			NodeClass::Residue(residue) => match residue {
				ResidueClass::Hydrophobic => self.hydrophobic,
				ResidueClass::Aromatic => self.aromatic,
				ResidueClass::Polar => self.polar,
				ResidueClass::Positive => self.positive,
				ResidueClass::Negative => self.negative,
				ResidueClass::Special => self.special,
				ResidueClass::Nucleotide => self.nucleotide,
				ResidueClass::Water => self.water,
				ResidueClass::Other => self.other_residue,
			},
			NodeClass::Generic => self.generic,
		}
	}
}

/// Colors for the highlight tiers. These override the palette entirely.
#[derive(Clone, Debug)]
pub struct HighlightStyle {
	pub selected: Color,
	pub hovered: Color,
	pub segment: Color,
	pub segment_neighbor: Color,
	/// Alpha multiplier for everything outside an active segment.
	pub dimmed_alpha: f64,
	/// Ring drawn around the selected and hovered nodes.
	pub ring: Color,
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Base edge color
	pub color: Color,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes are shaded with an off-center radial gradient
	pub use_gradient: bool,
	/// Border/stroke width in pixels (0 = no border)
	pub border_width: f64,
	/// Border color
	pub border_color: Color,
}

/// Stats overlay text style.
#[derive(Clone, Debug)]
pub struct OverlayStyle {
	pub color: Color,
	pub font: &'static str,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub highlight: HighlightStyle,
	pub overlay: OverlayStyle,
	pub palette: ClassPalette,
}

impl Theme {
	/// Dark theme (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
				vignette: 0.15,
			},
			edge: EdgeStyle {
				color: Color::rgba(140, 160, 180, 0.55),
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
			},
			highlight: HighlightStyle {
				selected: Color::rgb(255, 200, 60),
				hovered: Color::rgb(120, 220, 255),
				segment: Color::rgb(255, 110, 170),
				segment_neighbor: Color::rgb(250, 175, 120),
				dimmed_alpha: 0.15,
				ring: Color::rgba(255, 255, 255, 0.85),
			},
			overlay: OverlayStyle {
				color: Color::rgba(220, 228, 236, 0.75),
				font: "12px sans-serif",
			},
			palette: ClassPalette::standard(),
		}
	}

	/// Light theme for print and screenshots
	pub fn paper() -> Self {
		Self {
			name: "paper",
			background: BackgroundStyle {
				color: Color::rgb(250, 250, 248),
				color_secondary: Color::rgb(250, 250, 248),
				use_gradient: false,
				vignette: 0.0,
			},
			edge: EdgeStyle {
				color: Color::rgba(70, 80, 95, 0.5),
			},
			node: NodeStyle {
				use_gradient: false,
				border_width: 1.0,
				border_color: Color::rgba(40, 40, 40, 0.6),
			},
			highlight: HighlightStyle {
				selected: Color::rgb(230, 150, 0),
				hovered: Color::rgb(0, 140, 200),
				segment: Color::rgb(200, 30, 110),
				segment_neighbor: Color::rgb(230, 120, 60),
				dimmed_alpha: 0.2,
				ring: Color::rgba(20, 20, 20, 0.8),
			},
			overlay: OverlayStyle {
				color: Color::rgba(40, 45, 55, 0.8),
				font: "12px sans-serif",
			},
			palette: ClassPalette::standard(),
		}
	}

	/// Looks a theme up by name, falling back to the default theme.
	pub fn by_name(name: &str) -> Self {
		match name.trim().to_ascii_lowercase().as_str() {
			"paper" | "light" => Self::paper(),
			_ => Self::default_theme(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.500)");
		assert_eq!(Color::rgb(10, 10, 10).fade(0.25).a, 0.25);
	}

	#[test]
	fn lighten_and_darken_hit_the_ends() {
		let c = Color::rgb(100, 50, 0);
		assert_eq!(c.lighten(1.0), Color::rgb(255, 255, 255));
		assert_eq!(c.darken(1.0), Color::rgb(0, 0, 0));
		assert_eq!(c.lerp(Color::rgb(200, 150, 100), 0.5), Color::rgb(150, 100, 50));
	}

	#[test]
	fn theme_lookup_falls_back() {
		assert_eq!(Theme::by_name("Paper").name, "paper");
		assert_eq!(Theme::by_name("nope").name, "default");
	}

	#[test]
	fn palette_distinguishes_generic_labels() {
		let palette = ClassPalette::standard();
		assert_ne!(
			palette.color(NodeClass::Generic),
			palette.color(NodeClass::Element(Element::Oxygen))
		);
		assert_eq!(
			palette.color(NodeClass::Residue(ResidueClass::Aromatic)),
			palette.aromatic
		);
	}
}
