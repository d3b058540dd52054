//! SMILES string parser.
//!
//! Split into a byte [`Scanner`] over the text and a graph [`Assembler`]
//! that accumulates atoms and bonds; hydrogen counts are filled in from
//! element-table valences after the whole graph is known. Stereo markers
//! are consumed and ignored.

use std::collections::BTreeMap;

use murex_core::{MurexError, Result};

use crate::element::{element_by_number, element_by_symbol};
use crate::molecule::{Bond, BondOrder, MolAtom, Molecule};

/// Elements that may be written bare, outside brackets. Two-letter symbols
/// must be tried before their one-letter prefixes.
const ORGANIC_SUBSET: &[&str] = &["Cl", "Br", "B", "C", "N", "O", "P", "S", "F", "I"];

/// Parse a SMILES string into a `Molecule`.
pub fn parse_smiles(smiles: &str) -> Result<Molecule> {
    parse_smiles_named(smiles, "")
}

/// Parse a SMILES string into a `Molecule` with a given name.
pub fn parse_smiles_named(smiles: &str, name: &str) -> Result<Molecule> {
    let mut scan = Scanner::new(smiles);
    let mut asm = Assembler::default();

    while let Some(ch) = scan.peek() {
        match ch {
            b'(' => {
                scan.bump();
                asm.open_branch()?;
            }
            b')' => {
                scan.bump();
                asm.close_branch()?;
            }
            b'-' => {
                scan.bump();
                asm.next_order = Some(BondOrder::Single);
            }
            b'=' => {
                scan.bump();
                asm.next_order = Some(BondOrder::Double);
            }
            b'#' => {
                scan.bump();
                asm.next_order = Some(BondOrder::Triple);
            }
            b':' => {
                scan.bump();
                asm.next_order = Some(BondOrder::Aromatic);
            }
            b'/' | b'\\' => {
                // Stereo bond markers carry no graph information here.
                scan.bump();
            }
            b'.' => {
                scan.bump();
                asm.break_fragment();
            }
            b'%' => {
                scan.bump();
                let label = match (scan.bump(), scan.bump()) {
                    (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
                        (a - b'0') as u16 * 10 + (b - b'0') as u16
                    }
                    _ => return Err(scan.fail("expected two digits after '%'")),
                };
                asm.ring_label(label)?;
            }
            d if d.is_ascii_digit() => {
                scan.bump();
                asm.ring_label((d - b'0') as u16)?;
            }
            b'[' => bracket_atom(&mut scan, &mut asm)?,
            _ => bare_atom(&mut scan, &mut asm)?,
        }
    }

    asm.finish(name)
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Byte cursor over the SMILES text.
struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Scanner { bytes: text.as_bytes(), pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    /// Consume the next byte when it equals `ch`.
    fn eat(&mut self, ch: u8) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
    }

    fn rest(&self) -> &[u8] {
        &self.bytes[self.pos..]
    }

    /// Consume a run of decimal digits.
    fn digits(&mut self) -> Option<u32> {
        let mut n: u32 = 0;
        let mut found = false;
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            self.pos += 1;
            n = n * 10 + (ch - b'0') as u32;
            found = true;
        }
        found.then_some(n)
    }

    fn fail(&self, msg: &str) -> MurexError {
        MurexError::Parse(format!("{msg} at position {}", self.pos))
    }
}

// ---------------------------------------------------------------------------
// Assembler
// ---------------------------------------------------------------------------

/// Accumulates the molecular graph while the scanner walks the text.
#[derive(Default)]
struct Assembler {
    atoms: Vec<MolAtom>,
    bonds: Vec<Bond>,
    /// Hydrogen counts declared in brackets; `None` means fill from valence.
    declared_h: Vec<Option<u8>>,
    /// label -> (atom index, bond order written at the opening)
    open_rings: BTreeMap<u16, (usize, Option<BondOrder>)>,
    /// Atoms to return to when branches close.
    branches: Vec<usize>,
    /// The atom the next bond attaches to.
    tail: Option<usize>,
    /// Bond order written since the last atom.
    next_order: Option<BondOrder>,
}

impl Assembler {
    /// Append an atom, bonding it to the current tail.
    fn place_atom(&mut self, atom: MolAtom, declared_h: Option<u8>) {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        self.declared_h.push(declared_h);
        if let Some(prev) = self.tail {
            let order = self.next_order.take();
            self.join(prev, idx, order);
        }
        self.next_order = None;
        self.tail = Some(idx);
    }

    /// Add a bond, defaulting the order from the endpoints' aromaticity
    /// when none was written. The same rule serves chain and ring bonds.
    fn join(&mut self, a: usize, b: usize, requested: Option<BondOrder>) {
        let both_aromatic = self.atoms[a].is_aromatic && self.atoms[b].is_aromatic;
        let order = requested.unwrap_or(if both_aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        });
        self.bonds.push(Bond {
            atom1: a,
            atom2: b,
            order,
            is_aromatic: both_aromatic && order == BondOrder::Aromatic,
        });
    }

    /// A ring digit either opens a ring at the tail or closes one opened
    /// earlier under the same label.
    fn ring_label(&mut self, label: u16) -> Result<()> {
        let here = self
            .tail
            .ok_or_else(|| MurexError::Parse("ring closure without a preceding atom".into()))?;
        match self.open_rings.remove(&label) {
            Some((there, opened)) => {
                let closed = self.next_order.take();
                let order = match (opened, closed) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(MurexError::Parse(format!(
                            "ring {label} opened and closed with different bond orders"
                        )));
                    }
                    (a, b) => b.or(a),
                };
                self.join(there, here, order);
            }
            None => {
                self.open_rings.insert(label, (here, self.next_order.take()));
            }
        }
        Ok(())
    }

    fn open_branch(&mut self) -> Result<()> {
        let tail = self
            .tail
            .ok_or_else(|| MurexError::Parse("branch before any atom".into()))?;
        self.branches.push(tail);
        Ok(())
    }

    fn close_branch(&mut self) -> Result<()> {
        let fork = self
            .branches
            .pop()
            .ok_or_else(|| MurexError::Parse("unmatched ')'".into()))?;
        self.tail = Some(fork);
        self.next_order = None;
        Ok(())
    }

    fn break_fragment(&mut self) {
        self.tail = None;
        self.next_order = None;
    }

    /// Check balance, fill implicit hydrogens, and build the molecule.
    fn finish(mut self, name: &str) -> Result<Molecule> {
        if !self.open_rings.is_empty() {
            let open: Vec<u16> = self.open_rings.keys().copied().collect();
            return Err(MurexError::Parse(format!("unclosed ring label(s) {:?}", open)));
        }
        if !self.branches.is_empty() {
            return Err(MurexError::Parse(format!(
                "{} unclosed '(' in SMILES",
                self.branches.len()
            )));
        }

        // One pass over the finished bond list gives each atom its degree
        // and its valence load.
        let mut degree = vec![0usize; self.atoms.len()];
        let mut load = vec![0.0f64; self.atoms.len()];
        for bond in &self.bonds {
            for end in [bond.atom1, bond.atom2] {
                degree[end] += 1;
                load[end] += bond.order.as_f64();
            }
        }

        for (i, atom) in self.atoms.iter_mut().enumerate() {
            if let Some(h) = self.declared_h[i] {
                atom.implicit_hydrogens = h;
                continue;
            }
            let elem = match element_by_number(atom.atomic_number) {
                Some(e) => e,
                None => continue,
            };
            if !ORGANIC_SUBSET.contains(&elem.symbol) {
                continue;
            }
            // An aromatic atom gives one valence electron to the pi
            // system and each of its ring bonds fills a single sigma slot.
            let (capacity, used) = if atom.is_aromatic {
                ((elem.valence as usize).saturating_sub(1), degree[i])
            } else {
                (elem.valence as usize, load[i].round() as usize)
            };
            atom.implicit_hydrogens = capacity.saturating_sub(used) as u8;
        }

        Molecule::new(name.to_string(), self.atoms, self.bonds)
    }
}

// ---------------------------------------------------------------------------
// Atom syntax
// ---------------------------------------------------------------------------

/// An atom written without brackets: an organic-subset symbol, lowercase
/// for the aromatic forms.
fn bare_atom(scan: &mut Scanner, asm: &mut Assembler) -> Result<()> {
    for sym in ORGANIC_SUBSET.iter().filter(|s| s.len() == 2) {
        if scan.rest().starts_with(sym.as_bytes()) {
            let elem = element_by_symbol(sym)
                .ok_or_else(|| scan.fail(&format!("unknown element '{sym}'")))?;
            scan.skip(2);
            asm.place_atom(MolAtom::of_element(elem.atomic_number), None);
            return Ok(());
        }
    }

    let ch = match scan.bump() {
        Some(c) => c,
        None => return Err(scan.fail("expected an atom")),
    };
    let aromatic = ch.is_ascii_lowercase();
    if aromatic && !matches!(ch, b'b' | b'c' | b'n' | b'o' | b'p' | b's') {
        return Err(scan.fail(&format!("unexpected character '{}'", ch as char)));
    }
    let symbol = (ch.to_ascii_uppercase() as char).to_string();
    if !ORGANIC_SUBSET.contains(&symbol.as_str()) {
        return Err(scan.fail(&format!("unexpected character '{}'", ch as char)));
    }
    let elem = element_by_symbol(&symbol)
        .ok_or_else(|| scan.fail(&format!("unknown element '{symbol}'")))?;

    let mut atom = MolAtom::of_element(elem.atomic_number);
    atom.is_aromatic = aromatic;
    asm.place_atom(atom, None);
    Ok(())
}

/// A bracket atom: `[` isotope? symbol chirality? hcount? charge? `]`.
fn bracket_atom(scan: &mut Scanner, asm: &mut Assembler) -> Result<()> {
    scan.bump(); // '['

    let isotope = scan.digits().map(|n| n as u16);

    let first = match scan.bump() {
        Some(c) if c.is_ascii_alphabetic() => c,
        _ => return Err(scan.fail("expected an element symbol")),
    };
    let aromatic = first.is_ascii_lowercase();
    let mut symbol = String::from(first.to_ascii_uppercase() as char);
    // A following lowercase letter extends the symbol when the pair names
    // a known element, so [Cl-] reads chlorine rather than carbon.
    if let Some(next) = scan.peek() {
        if next.is_ascii_lowercase() {
            let mut two = symbol.clone();
            two.push(next as char);
            if element_by_symbol(&two).is_some() {
                scan.bump();
                symbol = two;
            }
        }
    }
    let elem = element_by_symbol(&symbol)
        .ok_or_else(|| scan.fail(&format!("unknown element '{symbol}'")))?;

    // Chirality marks are out of scope for matching.
    while scan.eat(b'@') {}

    let hydrogens = if scan.eat(b'H') {
        scan.digits().unwrap_or(1) as u8
    } else {
        0
    };

    let charge = if scan.eat(b'+') {
        signed_charge(scan, 1)
    } else if scan.eat(b'-') {
        signed_charge(scan, -1)
    } else {
        0
    };

    if !scan.eat(b']') {
        return Err(scan.fail("expected ']' in bracket atom"));
    }

    let atom = MolAtom {
        atomic_number: elem.atomic_number,
        formal_charge: charge,
        isotope,
        is_aromatic: aromatic,
        implicit_hydrogens: 0, // declared count applied in finish()
    };
    asm.place_atom(atom, Some(hydrogens));
    Ok(())
}

/// Charge magnitude: either one digit run (`[Fe+2]`) or a run of repeated
/// signs (`[Ca++]`).
fn signed_charge(scan: &mut Scanner, sign: i8) -> i8 {
    if let Some(n) = scan.digits() {
        return sign * n as i8;
    }
    let mark = if sign > 0 { b'+' } else { b'-' };
    let mut total = sign;
    while scan.eat(mark) {
        total += sign;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_targets_build() {
        for (smi, atoms, bonds) in [
            ("CC", 2, 1),
            ("CCO", 3, 2),
            ("CCCC", 4, 3),
            ("C1CCCC1C(Cl)=O", 8, 8),
            ("c1ccc2ccccc2c1", 10, 11),
        ] {
            let mol = parse_smiles(smi).unwrap();
            assert_eq!(mol.atom_count(), atoms, "{smi}");
            assert_eq!(mol.bond_count(), bonds, "{smi}");
        }
    }

    #[test]
    fn acyl_chloride_incidence_order() {
        // The carbonyl carbon's incidence list is what the matcher walks:
        // first the double bond to O, then the single bond to Cl.
        let mol = parse_smiles("C(=O)Cl").unwrap();
        let inc = mol.incident(0);
        assert_eq!(inc.len(), 2);

        let (o, to_o) = inc[0];
        assert_eq!(mol.atoms[o].atomic_number, 8);
        assert_eq!(mol.bonds[to_o].order, BondOrder::Double);

        let (cl, to_cl) = inc[1];
        assert_eq!(mol.atoms[cl].atomic_number, 17);
        assert_eq!(mol.bonds[to_cl].order, BondOrder::Single);
    }

    #[test]
    fn aromatic_ring_vs_aliphatic_ring() {
        let benzene = parse_smiles("c1ccccc1").unwrap();
        assert!(benzene
            .bonds
            .iter()
            .all(|b| b.order == BondOrder::Aromatic && b.is_aromatic));
        assert!(benzene
            .atoms
            .iter()
            .all(|a| a.is_aromatic && a.implicit_hydrogens == 1));

        let cyclohexane = parse_smiles("C1CCCCC1").unwrap();
        assert!(cyclohexane.bonds.iter().all(|b| b.order == BondOrder::Single));
        assert!(cyclohexane.atoms.iter().all(|a| !a.is_aromatic));
    }

    #[test]
    fn hydrogen_fill_follows_element_valence() {
        let ethanol = parse_smiles("CCO").unwrap();
        let h: Vec<u8> = ethanol.atoms.iter().map(|a| a.implicit_hydrogens).collect();
        assert_eq!(h, vec![3, 2, 1]);

        assert_eq!(parse_smiles("C").unwrap().atoms[0].implicit_hydrogens, 4);
        // A triple bond loads three valence slots.
        assert_eq!(parse_smiles("C#N").unwrap().atoms[0].implicit_hydrogens, 1);
    }

    #[test]
    fn bracket_atoms_keep_their_declared_hydrogens() {
        assert_eq!(parse_smiles("[CH3]").unwrap().atoms[0].implicit_hydrogens, 3);

        let ammonium = parse_smiles("[NH4+]").unwrap();
        assert_eq!(ammonium.atoms[0].formal_charge, 1);
        assert_eq!(ammonium.atoms[0].implicit_hydrogens, 4);
    }

    #[test]
    fn isotopes_and_multi_charges() {
        assert_eq!(parse_smiles("[13C]").unwrap().atoms[0].isotope, Some(13));
        assert_eq!(parse_smiles("[Fe+2]").unwrap().atoms[0].formal_charge, 2);
        assert_eq!(parse_smiles("[O--]").unwrap().atoms[0].formal_charge, -2);
    }

    #[test]
    fn two_letter_symbols_win_over_prefixes() {
        let mol = parse_smiles("ClBr").unwrap();
        assert_eq!(mol.atoms[0].atomic_number, 17);
        assert_eq!(mol.atoms[1].atomic_number, 35);
    }

    #[test]
    fn branches_return_to_the_fork() {
        let mol = parse_smiles("CC(C)C").unwrap();
        assert_eq!(mol.incident(1).len(), 3);
        assert_eq!(mol.incident(0).len(), 1);
        assert_eq!(mol.incident(3).len(), 1);
    }

    #[test]
    fn fragments_share_no_bonds() {
        let mol = parse_smiles("C.O").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 0);
    }

    #[test]
    fn ring_labels_pair_up() {
        let mol = parse_smiles("C%11CCCC%11").unwrap();
        assert_eq!(mol.atom_count(), 5);
        assert_eq!(mol.bond_count(), 5);

        // An order written at either end applies to the closing bond.
        let mol = parse_smiles("C1CCCCC=1").unwrap();
        assert_eq!(mol.bonds.last().unwrap().order, BondOrder::Double);
        let mol = parse_smiles("C=1CCCCC1").unwrap();
        assert_eq!(mol.bonds.last().unwrap().order, BondOrder::Double);
    }

    #[test]
    fn conflicting_ring_bond_orders_rejected() {
        assert!(parse_smiles("C=1CCCCC#1").is_err());
    }

    #[test]
    fn malformed_inputs_are_parse_errors() {
        for bad in ["C(", ")C", "C1CC", "[", "[Zz]", "C%1C", "1CC", "Cq"] {
            assert!(
                matches!(parse_smiles(bad).unwrap_err(), MurexError::Parse(_)),
                "{bad} should fail to parse"
            );
        }
    }
}
