//! Molecular graph representation.
//!
//! Atoms and bonds live in contiguous arrays; the index into those arrays is
//! the atom/bond identity everywhere else in this crate. Graphs are never
//! mutated by the matcher: all search bookkeeping lives in matcher-owned
//! side tables keyed by index.

use murex_core::{hash, Annotated, ContentAddressable, MurexError, Result, Summarizable};

/// Bond order classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Numeric bond order for valence calculations.
    pub fn as_f64(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }
}

/// An atom in a molecular graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MolAtom {
    pub atomic_number: u8,
    pub formal_charge: i8,
    pub isotope: Option<u16>,
    pub is_aromatic: bool,
    pub implicit_hydrogens: u8,
}

impl MolAtom {
    /// An uncharged, non-aromatic atom of the given element.
    pub fn of_element(atomic_number: u8) -> Self {
        MolAtom {
            atomic_number,
            formal_charge: 0,
            isotope: None,
            is_aromatic: false,
            implicit_hydrogens: 0,
        }
    }
}

/// A bond between two atoms, referencing its endpoints by index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
    pub is_aromatic: bool,
}

/// A molecular graph with atoms, bonds, and adjacency information.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub name: String,
    pub atoms: Vec<MolAtom>,
    pub bonds: Vec<Bond>,
    /// adjacency[atom_idx] = Vec<(neighbor_atom_idx, bond_idx)>
    pub adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    /// Create a new molecule, building the adjacency list from atoms and bonds.
    ///
    /// # Errors
    ///
    /// Returns [`MurexError::MalformedGraph`] if any bond references an atom
    /// outside the graph.
    pub fn new(name: String, atoms: Vec<MolAtom>, bonds: Vec<Bond>) -> Result<Self> {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            if bond.atom1 >= atoms.len() || bond.atom2 >= atoms.len() {
                return Err(MurexError::MalformedGraph(format!(
                    "bond {} references an atom outside the graph ({}-{}, {} atoms)",
                    bi,
                    bond.atom1,
                    bond.atom2,
                    atoms.len()
                )));
            }
            adjacency[bond.atom1].push((bond.atom2, bi));
            adjacency[bond.atom2].push((bond.atom1, bi));
        }
        Ok(Molecule { name, atoms, bonds, adjacency })
    }

    /// Number of atoms.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Number of bonds.
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Bonds incident to an atom, as `(neighbor, bond index)` pairs in bond
    /// insertion order. This order is the candidate order the matcher
    /// enumerates, so it must stay stable for a given graph.
    pub fn incident(&self, atom_idx: usize) -> &[(usize, usize)] {
        &self.adjacency[atom_idx]
    }

    /// Re-check structural consistency of a graph whose public fields may
    /// have been edited after construction.
    ///
    /// # Errors
    ///
    /// Returns [`MurexError::MalformedGraph`] if the adjacency table does not
    /// cover every atom or a bond endpoint is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.adjacency.len() != self.atoms.len() {
            return Err(MurexError::MalformedGraph(format!(
                "adjacency table covers {} atoms, graph has {}",
                self.adjacency.len(),
                self.atoms.len()
            )));
        }
        for (bi, bond) in self.bonds.iter().enumerate() {
            if bond.atom1 >= self.atoms.len() || bond.atom2 >= self.atoms.len() {
                return Err(MurexError::MalformedGraph(format!(
                    "bond {} references an atom outside the graph",
                    bi
                )));
            }
        }
        Ok(())
    }
}

impl Annotated for Molecule {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Summarizable for Molecule {
    fn summary(&self) -> String {
        format!(
            "{}: {} atoms, {} bonds",
            if self.name.is_empty() { "Molecule" } else { &self.name },
            self.atom_count(),
            self.bond_count()
        )
    }
}

impl ContentAddressable for Molecule {
    fn content_hash(&self) -> String {
        let mut buf = Vec::with_capacity(self.atoms.len() * 6 + self.bonds.len() * 17);
        // Sort atoms by (atomic_number, charge, isotope, aromatic, implicit_h)
        let mut sorted_atoms: Vec<_> = self.atoms.iter().collect();
        sorted_atoms.sort_by_key(|a| {
            (a.atomic_number, a.formal_charge, a.isotope, a.is_aromatic, a.implicit_hydrogens)
        });
        for atom in &sorted_atoms {
            buf.push(atom.atomic_number);
            buf.extend_from_slice(&atom.formal_charge.to_le_bytes());
            buf.push(atom.implicit_hydrogens);
            if let Some(iso) = atom.isotope {
                buf.extend_from_slice(&iso.to_le_bytes());
            }
            buf.push(atom.is_aromatic as u8);
        }
        // Sort bonds by (min_atom, max_atom, order)
        let mut sorted_bonds: Vec<_> = self.bonds.iter().collect();
        sorted_bonds.sort_by_key(|b| {
            let (a, c) = if b.atom1 <= b.atom2 { (b.atom1, b.atom2) } else { (b.atom2, b.atom1) };
            (a, c, b.order as u8)
        });
        for bond in &sorted_bonds {
            buf.extend_from_slice(&bond.atom1.to_le_bytes());
            buf.extend_from_slice(&bond.atom2.to_le_bytes());
            buf.push(bond.order as u8);
        }
        hash::sha256(&buf)
    }
}
