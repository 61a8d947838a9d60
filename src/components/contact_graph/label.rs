//! Node label grammar and structural classification.
//!
//! Labels follow `CHAIN:RES:POSITION[:ATOM]`, e.g. `A:TRP:42` for a residue
//! node or `A:TRP:42:CA` for an atom node. The position may carry a PDB
//! insertion code (`42A`) or be negative. Anything else decodes to
//! [`NodeLabel::Unrecognized`] and is drawn with the generic color.

/// Decoded node label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeLabel {
	/// `CHAIN:RES:POSITION`
	Residue {
		chain: String,
		residue: String,
		position: String,
	},
	/// `CHAIN:RES:POSITION:ATOM`
	Atom {
		chain: String,
		residue: String,
		position: String,
		atom: String,
	},
	/// Any other shape, kept verbatim.
	Unrecognized(String),
}

impl NodeLabel {
	pub fn parse(label: &str) -> Self {
		let parts: Vec<&str> = label.trim().split(':').map(str::trim).collect();
		let well_formed = |chain: &str, residue: &str, position: &str| {
			!chain.is_empty()
				&& !residue.is_empty()
				&& residue.chars().all(|c| c.is_ascii_alphanumeric())
				&& is_position(position)
		};
		match parts.as_slice() {
			[chain, residue, position] if well_formed(*chain, *residue, *position) => {
				NodeLabel::Residue {
					chain: (*chain).to_string(),
					residue: (*residue).to_string(),
					position: (*position).to_string(),
				}
			}
			[chain, residue, position, atom]
				if well_formed(*chain, *residue, *position) && !atom.is_empty() =>
			{
				NodeLabel::Atom {
					chain: (*chain).to_string(),
					residue: (*residue).to_string(),
					position: (*position).to_string(),
					atom: (*atom).to_string(),
				}
			}
			_ => NodeLabel::Unrecognized(label.to_string()),
		}
	}

	pub fn chain(&self) -> Option<&str> {
		match self {
			NodeLabel::Residue { chain, .. } | NodeLabel::Atom { chain, .. } => Some(chain),
			NodeLabel::Unrecognized(_) => None,
		}
	}

	pub fn residue(&self) -> Option<&str> {
		match self {
			NodeLabel::Residue { residue, .. } | NodeLabel::Atom { residue, .. } => Some(residue),
			NodeLabel::Unrecognized(_) => None,
		}
	}

	pub fn position(&self) -> Option<&str> {
		match self {
			NodeLabel::Residue { position, .. } | NodeLabel::Atom { position, .. } => {
				Some(position)
			}
			NodeLabel::Unrecognized(_) => None,
		}
	}

	pub fn atom(&self) -> Option<&str> {
		match self {
			NodeLabel::Atom { atom, .. } => Some(atom),
			_ => None,
		}
	}

	/// True when chain, residue and position all equal the given values.
	pub fn is_residue(&self, chain: &str, residue: &str, position: &str) -> bool {
		self.chain() == Some(chain)
			&& self.residue() == Some(residue)
			&& self.position() == Some(position)
	}
}

/// `-?[0-9]+[A-Za-z]?`
fn is_position(s: &str) -> bool {
	let digits = s.strip_prefix('-').unwrap_or(s);
	let body = match digits.chars().last() {
		Some(c) if c.is_ascii_alphabetic() => &digits[..digits.len() - 1],
		_ => digits,
	};
	!body.is_empty() && body.chars().all(|c| c.is_ascii_digit())
}

/// Chemical element, coarse enough for coloring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Element {
	Carbon,
	Nitrogen,
	Oxygen,
	Sulfur,
	Phosphorus,
	Hydrogen,
	Metal,
	Other,
}

const METALS: &[&str] = &[
	"ZN", "MG", "FE", "MN", "NA", "K", "CU", "CO", "NI", "CD", "HG", "LI",
];

impl Element {
	/// From an element symbol such as `"C"`, `"Zn"` or `"FE"`.
	pub fn from_symbol(symbol: &str) -> Self {
		let upper = symbol.trim().to_ascii_uppercase();
		match upper.as_str() {
			"C" => Element::Carbon,
			"N" => Element::Nitrogen,
			"O" => Element::Oxygen,
			"S" | "SE" => Element::Sulfur,
			"P" => Element::Phosphorus,
			"H" | "D" => Element::Hydrogen,
			s if METALS.contains(&s) || s == "CA" => Element::Metal,
			_ => Element::Other,
		}
	}

	/// Guesses the element from a PDB atom name (`CA`, `OG1`, `1HB`, ...).
	/// Atom names in polymer residues start with the element letter, so `CA`
	/// is alpha carbon here, not calcium.
	pub fn from_atom_name(name: &str) -> Self {
		match name.trim().chars().find(|c| c.is_ascii_alphabetic()) {
			Some('C' | 'c') => Element::Carbon,
			Some('N' | 'n') => Element::Nitrogen,
			Some('O' | 'o') => Element::Oxygen,
			Some('S' | 's') => Element::Sulfur,
			Some('P' | 'p') => Element::Phosphorus,
			Some('H' | 'h' | 'D' | 'd') => Element::Hydrogen,
			_ => Element::Other,
		}
	}
}

/// Side-chain chemistry of a residue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResidueClass {
	Hydrophobic,
	Aromatic,
	Polar,
	Positive,
	Negative,
	/// Gly, Pro and Cys: backbone-shaping residues.
	Special,
	Nucleotide,
	Water,
	/// Ligands, ions and non-standard residues.
	Other,
}

impl ResidueClass {
	pub fn from_code(code: &str) -> Self {
		match code.trim().to_ascii_uppercase().as_str() {
			"ALA" | "VAL" | "LEU" | "ILE" | "MET" => ResidueClass::Hydrophobic,
			"PHE" | "TRP" | "TYR" => ResidueClass::Aromatic,
			"SER" | "THR" | "ASN" | "GLN" => ResidueClass::Polar,
			"LYS" | "ARG" | "HIS" => ResidueClass::Positive,
			"ASP" | "GLU" => ResidueClass::Negative,
			"GLY" | "PRO" | "CYS" => ResidueClass::Special,
			"A" | "C" | "G" | "U" | "DA" | "DC" | "DG" | "DT" => ResidueClass::Nucleotide,
			"HOH" | "WAT" | "DOD" => ResidueClass::Water,
			_ => ResidueClass::Other,
		}
	}
}

/// Palette key for a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeClass {
	Element(Element),
	Residue(ResidueClass),
	Generic,
}

impl NodeClass {
	/// An explicit element tag wins; atom labels color by element, residue
	/// labels by side-chain chemistry, anything else is generic.
	pub fn classify(element: Option<&str>, label: &NodeLabel) -> Self {
		if let Some(symbol) = element.filter(|s| !s.trim().is_empty()) {
			return NodeClass::Element(Element::from_symbol(symbol));
		}
		match label {
			NodeLabel::Atom { atom, .. } => NodeClass::Element(Element::from_atom_name(atom)),
			NodeLabel::Residue { residue, .. } => {
				NodeClass::Residue(ResidueClass::from_code(residue))
			}
			NodeLabel::Unrecognized(_) => NodeClass::Generic,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_residue_and_atom_labels() {
		assert_eq!(
			NodeLabel::parse("A:TRP:42"),
			NodeLabel::Residue {
				chain: "A".into(),
				residue: "TRP".into(),
				position: "42".into(),
			}
		);
		let atom = NodeLabel::parse("B:LEU:-3:CD1");
		assert_eq!(atom.chain(), Some("B"));
		assert_eq!(atom.position(), Some("-3"));
		assert_eq!(atom.atom(), Some("CD1"));
		assert!(atom.is_residue("B", "LEU", "-3"));
		assert_eq!(NodeLabel::parse(" A:GLY:100A ").position(), Some("100A"));
	}

	#[test]
	fn odd_shapes_fall_back() {
		for label in ["", "node-7", "A:TRP", "A:TRP:x42", "A::42", "A:TRP:42:CA:extra", "A:TRP:42:"] {
			assert!(
				matches!(NodeLabel::parse(label), NodeLabel::Unrecognized(_)),
				"{label:?} should not decode"
			);
		}
	}

	#[test]
	fn classification_prefers_element_tag() {
		let label = NodeLabel::parse("A:HIS:57:NE2");
		assert_eq!(
			NodeClass::classify(None, &label),
			NodeClass::Element(Element::Nitrogen)
		);
		assert_eq!(
			NodeClass::classify(Some("Zn"), &label),
			NodeClass::Element(Element::Metal)
		);
		assert_eq!(
			NodeClass::classify(None, &NodeLabel::parse("A:ASP:12")),
			NodeClass::Residue(ResidueClass::Negative)
		);
		assert_eq!(
			NodeClass::classify(Some("  "), &NodeLabel::parse("whatever")),
			NodeClass::Generic
		);
	}

	#[test]
	fn atom_names_skip_leading_digits() {
		assert_eq!(Element::from_atom_name("1HB"), Element::Hydrogen);
		assert_eq!(Element::from_atom_name("CA"), Element::Carbon);
		assert_eq!(Element::from_atom_name("SG"), Element::Sulfur);
		assert_eq!(Element::from_atom_name("42"), Element::Other);
	}
}
