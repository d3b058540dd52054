//! Match iteration, duplicate suppression, and the public matcher API.
//!
//! [`Matcher`] drives the engine across every anchor atom of the target and
//! yields matches one at a time. Two policies shape what counts as a
//! distinct match: `permute` controls whether two mappings onto the same
//! target atoms/bonds in different orders are both reported, and `overlap`
//! controls whether two reported matches may share a target atom at all.

use std::collections::{HashSet, VecDeque};
use std::str::FromStr;

use murex_core::{BitSet, MurexError, Result};
use tracing::{debug, trace};

use crate::engine::{Advance, Engine};
use crate::molecule::Molecule;
use crate::pattern::Pattern;
use crate::plan::{flatten, Step};

/// Duplicate-suppression policy for a [`Matcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// May two yielded matches share a target atom? Default `true`.
    pub overlap: bool,
    /// Report permutations of one atom/bond set separately? Default `false`.
    pub permute: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions { overlap: true, permute: false }
    }
}

impl FromStr for MatchOptions {
    type Err = MurexError;

    /// Parse the fixture-file option syntax, e.g. `"overlap=1 permute=0"`.
    ///
    /// Unknown keys are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let mut opts = MatchOptions::default();
        for tok in s.split_whitespace() {
            let (key, value) = tok.split_once('=').ok_or_else(|| {
                MurexError::Parse(format!("expected key=value in options, got '{tok}'"))
            })?;
            let value = match value {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => {
                    return Err(MurexError::Parse(format!(
                        "invalid option value '{value}' for '{key}'"
                    )))
                }
            };
            match key {
                "overlap" => opts.overlap = value,
                "permute" => opts.permute = value,
                _ => {
                    return Err(MurexError::InvalidInput(format!(
                        "unknown option key '{key}'"
                    )))
                }
            }
        }
        Ok(opts)
    }
}

/// One substructure match: target atom/bond indices in pattern order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// atom_map[pattern_atom] = target atom index.
    pub atom_map: Vec<usize>,
    /// bond_map[pattern_bond] = target bond index.
    pub bond_map: Vec<usize>,
}

/// A resumable substructure matcher bound to one pattern.
///
/// Construct with [`Matcher::new`], attach a target with [`Matcher::bind`],
/// then pull matches with [`Matcher::next_match`] until it returns `None`.
/// Rebinding resets all iteration state. A matcher is single-threaded;
/// run several matchers over the same (immutable) graphs for parallelism.
pub struct Matcher<'p, 't> {
    pattern: &'p Pattern,
    plan: Vec<Step>,
    options: MatchOptions,
    target: Option<&'t Molecule>,
    engine: Option<Engine>,
    engine_live: bool,
    /// Target atoms not yet tried as the anchor, in insertion order.
    pending: VecDeque<usize>,
    /// Canonical keys of every yielded match.
    yielded: HashSet<(Vec<usize>, Vec<usize>)>,
    /// Target atoms consumed by yielded matches (non-overlap mode only).
    reserved: BitSet,
    last: Option<Match>,
}

impl<'p, 't> Matcher<'p, 't> {
    /// Create a matcher for `pattern`. The pattern is flattened once here.
    pub fn new(pattern: &'p Pattern, options: MatchOptions) -> Self {
        let plan = flatten(pattern.molecule());
        Matcher {
            pattern,
            plan,
            options,
            target: None,
            engine: None,
            engine_live: false,
            pending: VecDeque::new(),
            yielded: HashSet::new(),
            reserved: BitSet::new(0),
            last: None,
        }
    }

    /// The options this matcher was built with.
    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// (Re)bind a target graph, resetting all iteration state.
    ///
    /// # Errors
    ///
    /// Returns [`MurexError::MalformedGraph`] if the target graph is
    /// inconsistent.
    pub fn bind(&mut self, target: &'t Molecule) -> Result<()> {
        target.validate()?;
        debug!(
            atoms = target.atom_count(),
            bonds = target.bond_count(),
            "binding target"
        );
        self.target = Some(target);
        self.engine = Some(Engine::new(self.pattern, target));
        self.engine_live = false;
        self.pending = (0..target.atom_count()).collect();
        self.yielded.clear();
        self.reserved = BitSet::new(target.atom_count());
        self.last = None;
        Ok(())
    }

    /// Advance to the next match, or `None` once exhausted.
    ///
    /// Exhaustion is idempotent: once `None` is returned, every further
    /// call returns `None`.
    ///
    /// # Errors
    ///
    /// Returns [`MurexError::InvalidInput`] if no target is bound and
    /// [`MurexError::Predicate`] if a caller-supplied predicate fails (the
    /// search stops; no further candidates are tried).
    pub fn next_match(&mut self) -> Result<Option<Match>> {
        let target = self
            .target
            .ok_or_else(|| MurexError::InvalidInput("no target bound".into()))?;

        // A pattern bigger than the target can never match.
        if self.pattern.atom_count() > target.atom_count()
            || self.pattern.bond_count() > target.bond_count()
        {
            return Ok(None);
        }

        loop {
            if !self.engine_live {
                let Some(anchor) = self.next_anchor() else {
                    debug!("matcher exhausted");
                    return Ok(None);
                };
                trace!(anchor, "seeding anchor");
                let reserved = if self.options.overlap { None } else { Some(&self.reserved) };
                self.engine.as_mut().unwrap().seed(anchor, reserved);
                self.engine_live = true;
            }

            let engine = self.engine.as_mut().unwrap();
            match engine.advance(self.pattern, &self.plan, target)? {
                Advance::Exhausted => {
                    self.engine_live = false;
                }
                Advance::Matched => {
                    let atom_map: Vec<usize> =
                        engine.atom_map().iter().map(|m| m.unwrap()).collect();
                    let bond_map: Vec<usize> =
                        engine.bond_map().iter().map(|m| m.unwrap()).collect();
                    if !self.yielded.insert(self.match_key(&atom_map, &bond_map)) {
                        continue;
                    }
                    if !self.options.overlap {
                        for &t in &atom_map {
                            self.reserved.set(t);
                        }
                        // The engine's remaining state could reuse consumed
                        // atoms; restart from the next free anchor instead.
                        self.engine_live = false;
                    }
                    debug!(?atom_map, "match yielded");
                    let m = Match { atom_map, bond_map };
                    self.last = Some(m.clone());
                    return Ok(Some(m));
                }
            }
        }
    }

    /// Target atom indices of the most recent match, in pattern order.
    pub fn current_atom_map(&self) -> Option<&[usize]> {
        self.last.as_ref().map(|m| m.atom_map.as_slice())
    }

    /// Target bond indices of the most recent match, in pattern order.
    pub fn current_bond_map(&self) -> Option<&[usize]> {
        self.last.as_ref().map(|m| m.bond_map.as_slice())
    }

    fn next_anchor(&mut self) -> Option<usize> {
        while let Some(a) = self.pending.pop_front() {
            if !self.options.overlap && self.reserved.get(a) {
                continue;
            }
            return Some(a);
        }
        None
    }

    /// The dedup key: the mapping itself when permutations are distinct,
    /// otherwise its order-independent canonical form.
    fn match_key(&self, atoms: &[usize], bonds: &[usize]) -> (Vec<usize>, Vec<usize>) {
        let mut a = atoms.to_vec();
        let mut b = bonds.to_vec();
        if !self.options.permute {
            a.sort_unstable();
            b.sort_unstable();
        }
        (a, b)
    }
}

/// Whether `target` contains `pattern` as a substructure.
pub fn has_substructure(target: &Molecule, pattern: &Pattern) -> Result<bool> {
    let mut matcher = Matcher::new(pattern, MatchOptions::default());
    matcher.bind(target)?;
    Ok(matcher.next_match()?.is_some())
}

/// Collect every match of `pattern` in `target` under `options`.
pub fn find_matches(
    target: &Molecule,
    pattern: &Pattern,
    options: MatchOptions,
) -> Result<Vec<Match>> {
    let mut matcher = Matcher::new(pattern, options);
    matcher.bind(target)?;
    let mut out = Vec::new();
    while let Some(m) = matcher.next_match()? {
        out.push(m);
    }
    Ok(out)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::smiles::parse_smiles;
    use proptest::prelude::*;

    fn chain_smiles() -> impl Strategy<Value = String> {
        let atoms = prop_oneof![Just("C"), Just("N"), Just("O")];
        proptest::collection::vec(atoms, 1..=10).prop_map(|parts| parts.join(""))
    }

    fn small_pattern() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("C"), Just("CC"), Just("CN"), Just("CO"), Just("CCC")]
    }

    fn all_options() -> impl Strategy<Value = MatchOptions> {
        (any::<bool>(), any::<bool>())
            .prop_map(|(overlap, permute)| MatchOptions { overlap, permute })
    }

    proptest! {
        #[test]
        fn matching_is_deterministic(
            target in chain_smiles(),
            pattern in small_pattern(),
            opts in all_options(),
        ) {
            let tgt = parse_smiles(&target).unwrap();
            let patt = Pattern::from_smiles(pattern).unwrap();
            let a = find_matches(&tgt, &patt, opts).unwrap();
            let b = find_matches(&tgt, &patt, opts).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn yielded_matches_satisfy_the_mapping_invariants(
            target in chain_smiles(),
            pattern in small_pattern(),
            opts in all_options(),
        ) {
            let tgt = parse_smiles(&target).unwrap();
            let patt = Pattern::from_smiles(pattern).unwrap();
            let pmol = patt.molecule();

            let mut images: Vec<Vec<usize>> = Vec::new();
            for m in find_matches(&tgt, &patt, opts).unwrap() {
                prop_assert_eq!(m.atom_map.len(), pmol.atom_count());
                prop_assert_eq!(m.bond_map.len(), pmol.bond_count());

                // Injectivity on both maps.
                let distinct: std::collections::HashSet<_> = m.atom_map.iter().collect();
                prop_assert_eq!(distinct.len(), m.atom_map.len());
                let distinct: std::collections::HashSet<_> = m.bond_map.iter().collect();
                prop_assert_eq!(distinct.len(), m.bond_map.len());

                // Incidence: each mapped bond joins the mapped endpoints.
                for (pb, &tb) in m.bond_map.iter().enumerate() {
                    let pbond = &pmol.bonds[pb];
                    let tbond = &tgt.bonds[tb];
                    let want = [m.atom_map[pbond.atom1], m.atom_map[pbond.atom2]];
                    let got = [tbond.atom1, tbond.atom2];
                    prop_assert!(
                        want == got || want == [got[1], got[0]],
                        "bond image endpoints mismatch"
                    );
                }

                // Labels: the default predicates accept every mapped pair.
                for (pa, &ta) in m.atom_map.iter().enumerate() {
                    prop_assert_eq!(
                        pmol.atoms[pa].atomic_number,
                        tgt.atoms[ta].atomic_number
                    );
                }

                images.push(m.atom_map);
            }

            // Dedup and overlap discipline across the yielded sequence.
            if !opts.permute {
                let mut sets: Vec<Vec<usize>> = images
                    .iter()
                    .map(|m| { let mut s = m.clone(); s.sort_unstable(); s })
                    .collect();
                let before = sets.len();
                sets.sort();
                sets.dedup();
                prop_assert_eq!(sets.len(), before, "duplicate atom set yielded");
            }
            if !opts.overlap {
                let mut seen = std::collections::HashSet::new();
                for image in &images {
                    for &t in image {
                        prop_assert!(seen.insert(t), "overlapping match images");
                    }
                }
            }
        }
    }
}
