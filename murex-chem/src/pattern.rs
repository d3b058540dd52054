//! Query patterns: a molecular graph plus optional per-atom / per-bond
//! match predicates.
//!
//! The matcher never inspects atom or bond labels itself; every label
//! comparison goes through the pattern's predicates. When no predicate is
//! attached, atoms compare by atomic number and bonds by order (aromatic
//! matches aromatic only).

use murex_core::{MurexError, Result};

use crate::molecule::{Bond, BondOrder, MolAtom, Molecule};
use crate::smiles::parse_smiles;

/// Caller-supplied atom test, invoked as `(pattern_atom, target_atom)`.
///
/// Returning `Err` aborts the search; the matcher reports it as
/// [`MurexError::Predicate`] and does not try further candidates.
pub type AtomPredicate =
    dyn Fn(&MolAtom, &MolAtom) -> std::result::Result<bool, String> + Send + Sync;

/// Caller-supplied bond test, invoked as `(pattern_bond, target_bond)`.
pub type BondPredicate =
    dyn Fn(&Bond, &Bond) -> std::result::Result<bool, String> + Send + Sync;

/// A substructure query: a molecule with optional predicate overrides.
pub struct Pattern {
    mol: Molecule,
    atom_preds: Vec<Option<Box<AtomPredicate>>>,
    bond_preds: Vec<Option<Box<BondPredicate>>>,
}

impl Pattern {
    /// Wrap a molecule as a pattern with the default label predicates.
    ///
    /// # Errors
    ///
    /// Returns [`MurexError::InvalidInput`] for an empty pattern and
    /// [`MurexError::MalformedGraph`] if the graph is inconsistent.
    pub fn new(mol: Molecule) -> Result<Self> {
        if mol.atom_count() == 0 {
            return Err(MurexError::InvalidInput("empty pattern".into()));
        }
        mol.validate()?;
        let atom_preds = (0..mol.atom_count()).map(|_| None).collect();
        let bond_preds = (0..mol.bond_count()).map(|_| None).collect();
        Ok(Pattern { mol, atom_preds, bond_preds })
    }

    /// Parse a SMILES string directly into a pattern.
    pub fn from_smiles(smiles: &str) -> Result<Self> {
        Pattern::new(parse_smiles(smiles)?)
    }

    /// The underlying molecular graph.
    pub fn molecule(&self) -> &Molecule {
        &self.mol
    }

    /// Number of pattern atoms.
    pub fn atom_count(&self) -> usize {
        self.mol.atom_count()
    }

    /// Number of pattern bonds.
    pub fn bond_count(&self) -> usize {
        self.mol.bond_count()
    }

    /// Replace the match test for one pattern atom.
    pub fn set_atom_predicate<F>(&mut self, atom_idx: usize, pred: F) -> Result<()>
    where
        F: Fn(&MolAtom, &MolAtom) -> std::result::Result<bool, String> + Send + Sync + 'static,
    {
        if atom_idx >= self.mol.atom_count() {
            return Err(MurexError::InvalidInput(format!(
                "pattern atom {} out of range",
                atom_idx
            )));
        }
        self.atom_preds[atom_idx] = Some(Box::new(pred));
        Ok(())
    }

    /// Replace the match test for one pattern bond.
    pub fn set_bond_predicate<F>(&mut self, bond_idx: usize, pred: F) -> Result<()>
    where
        F: Fn(&Bond, &Bond) -> std::result::Result<bool, String> + Send + Sync + 'static,
    {
        if bond_idx >= self.mol.bond_count() {
            return Err(MurexError::InvalidInput(format!(
                "pattern bond {} out of range",
                bond_idx
            )));
        }
        self.bond_preds[bond_idx] = Some(Box::new(pred));
        Ok(())
    }

    /// Test pattern atom `p` against a target atom.
    pub(crate) fn atom_matches(&self, p: usize, target: &MolAtom) -> Result<bool> {
        let patt = &self.mol.atoms[p];
        match &self.atom_preds[p] {
            Some(pred) => pred(patt, target).map_err(MurexError::Predicate),
            None => Ok(patt.atomic_number == target.atomic_number),
        }
    }

    /// Test pattern bond `b` against a target bond.
    pub(crate) fn bond_matches(&self, b: usize, target: &Bond) -> Result<bool> {
        let patt = &self.mol.bonds[b];
        match &self.bond_preds[b] {
            Some(pred) => pred(patt, target).map_err(MurexError::Predicate),
            None => Ok(order_compatible(patt.order, target.order)),
        }
    }
}

impl std::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pattern")
            .field("atoms", &self.mol.atom_count())
            .field("bonds", &self.mol.bond_count())
            .field("atom_overrides", &self.atom_preds.iter().filter(|p| p.is_some()).count())
            .field("bond_overrides", &self.bond_preds.iter().filter(|p| p.is_some()).count())
            .finish()
    }
}

/// Default bond compatibility: aromatic matches aromatic; otherwise exact.
fn order_compatible(pattern: BondOrder, target: BondOrder) -> bool {
    pattern == target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_rejected() {
        let mol = Molecule::new(String::new(), vec![], vec![]).unwrap();
        assert!(matches!(
            Pattern::new(mol).unwrap_err(),
            MurexError::InvalidInput(_)
        ));
    }

    #[test]
    fn default_atom_predicate_is_element_equality() {
        let patt = Pattern::from_smiles("C").unwrap();
        let carbon = MolAtom::of_element(6);
        let nitrogen = MolAtom::of_element(7);
        assert!(patt.atom_matches(0, &carbon).unwrap());
        assert!(!patt.atom_matches(0, &nitrogen).unwrap());
    }

    #[test]
    fn default_bond_predicate_is_order_equality() {
        let patt = Pattern::from_smiles("C=C").unwrap();
        let double = Bond { atom1: 0, atom2: 1, order: BondOrder::Double, is_aromatic: false };
        let single = Bond { atom1: 0, atom2: 1, order: BondOrder::Single, is_aromatic: false };
        assert!(patt.bond_matches(0, &double).unwrap());
        assert!(!patt.bond_matches(0, &single).unwrap());
    }

    #[test]
    fn predicate_override() {
        let mut patt = Pattern::from_smiles("C").unwrap();
        // Accept any halogen regardless of the pattern's element
        patt.set_atom_predicate(0, |_, t| Ok(matches!(t.atomic_number, 9 | 17 | 35 | 53)))
            .unwrap();
        assert!(patt.atom_matches(0, &MolAtom::of_element(17)).unwrap());
        assert!(!patt.atom_matches(0, &MolAtom::of_element(6)).unwrap());
    }

    #[test]
    fn predicate_argument_order_is_pattern_then_target() {
        let mut patt = Pattern::from_smiles("N").unwrap();
        patt.set_atom_predicate(0, |p, t| {
            Ok(p.atomic_number == 7 && t.atomic_number == 6)
        })
        .unwrap();
        // Asymmetric on purpose: only (pattern N, target C) passes.
        assert!(patt.atom_matches(0, &MolAtom::of_element(6)).unwrap());
        assert!(!patt.atom_matches(0, &MolAtom::of_element(7)).unwrap());
    }

    #[test]
    fn predicate_failure_is_typed() {
        let mut patt = Pattern::from_smiles("C").unwrap();
        patt.set_atom_predicate(0, |_, _| Err("boom".to_string())).unwrap();
        let err = patt.atom_matches(0, &MolAtom::of_element(6)).unwrap_err();
        assert!(matches!(err, MurexError::Predicate(ref m) if m == "boom"));
    }

    #[test]
    fn out_of_range_override_rejected() {
        let mut patt = Pattern::from_smiles("CC").unwrap();
        assert!(patt.set_atom_predicate(2, |_, _| Ok(true)).is_err());
        assert!(patt.set_bond_predicate(1, |_, _| Ok(true)).is_err());
    }
}
