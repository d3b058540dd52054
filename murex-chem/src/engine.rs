//! The backtracking search engine.
//!
//! The engine walks the DFS plan against one anchor atom of the target. It
//! owns the partial atom/bond mapping, the paint tables marking target
//! atoms/bonds used by the in-progress mapping, and an explicit stack of
//! frames, one per consumed plan step. `advance` runs until the plan is
//! complete (a match) or the stack underflows (this anchor is exhausted);
//! a completed match leaves the stack parked so the next call resumes the
//! search for alternative mappings.

use murex_core::{BitSet, Result};
use tracing::trace;

use crate::molecule::Molecule;
use crate::pattern::Pattern;
use crate::plan::Step;

/// Outcome of one `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Advance {
    /// The plan is fully mapped; the mapping is readable until the next call.
    Matched,
    /// No further mapping exists from the current anchor.
    Exhausted,
}

/// One entry of the exploration stack.
///
/// A frame remembers where its step is in the plan, which candidate to try
/// next, and exactly what it painted, so that undoing it is O(1).
struct Frame {
    step: usize,
    cursor: usize,
    /// (pattern atom, target atom) painted by this frame.
    atom: Option<(usize, usize)>,
    /// (pattern bond, target bond) painted by this frame.
    bond: Option<(usize, usize)>,
}

impl Frame {
    fn at(step: usize) -> Self {
        Frame { step, cursor: 0, atom: None, bond: None }
    }
}

pub(crate) struct Engine {
    anchor: usize,
    /// atom_map[pattern_atom] = target atom, while mapped.
    atom_map: Vec<Option<usize>>,
    /// bond_map[pattern_bond] = target bond, while mapped.
    bond_map: Vec<Option<usize>>,
    painted_atoms: BitSet,
    painted_bonds: BitSet,
    stack: Vec<Frame>,
}

impl Engine {
    /// An engine sized for one pattern/target pair, not yet seeded.
    pub(crate) fn new(pattern: &Pattern, target: &Molecule) -> Self {
        Engine {
            anchor: 0,
            atom_map: vec![None; pattern.atom_count()],
            bond_map: vec![None; pattern.bond_count()],
            painted_atoms: BitSet::new(target.atom_count()),
            painted_bonds: BitSet::new(target.bond_count()),
            stack: Vec::new(),
        }
    }

    /// Reset the engine to start a fresh descent from `anchor`.
    ///
    /// `reserved` pre-paints target atoms that must not participate (the
    /// images of already-yielded matches when overlapping matches are
    /// disallowed).
    pub(crate) fn seed(&mut self, anchor: usize, reserved: Option<&BitSet>) {
        self.anchor = anchor;
        self.atom_map.fill(None);
        self.bond_map.fill(None);
        match reserved {
            Some(r) => self.painted_atoms.copy_from(r),
            None => self.painted_atoms.clear_all(),
        }
        self.painted_bonds.clear_all();
        self.stack.clear();
        self.stack.push(Frame::at(0));
    }

    /// The current mapping, valid after `Matched`.
    pub(crate) fn atom_map(&self) -> &[Option<usize>] {
        &self.atom_map
    }

    pub(crate) fn bond_map(&self) -> &[Option<usize>] {
        &self.bond_map
    }

    /// Run the search until the next match or exhaustion of this anchor.
    pub(crate) fn advance(
        &mut self,
        pattern: &Pattern,
        plan: &[Step],
        target: &Molecule,
    ) -> Result<Advance> {
        loop {
            if self.stack.is_empty() {
                return Ok(Advance::Exhausted);
            }
            // Undo whatever the top frame bound last time around, then try
            // its remaining candidates. This uniformly covers the first
            // visit (nothing to undo), resumption after a match, and
            // re-entry after a pop.
            self.unbind_top();
            let depth = self.stack.len() - 1;
            let step = plan[self.stack[depth].step];
            let bound = match step {
                Step::Anchor { atom } => self.try_anchor(pattern, target, depth, atom)?,
                Step::ComponentAnchor { atom } => {
                    self.try_component_anchor(pattern, target, depth, atom)?
                }
                Step::Edge { bond, from, to } => {
                    self.try_edge(pattern, target, depth, bond, from, to)?
                }
                Step::RingClose { bond, from, to } => {
                    self.try_ring_close(pattern, target, depth, bond, from, to)?
                }
            };
            if !bound {
                self.stack.pop();
                trace!(depth, "backtrack");
                continue;
            }
            let step_idx = self.stack[depth].step;
            if step_idx + 1 == plan.len() {
                return Ok(Advance::Matched);
            }
            self.stack.push(Frame::at(step_idx + 1));
        }
    }

    /// The pattern's first atom only ever has one candidate: the anchor.
    fn try_anchor(
        &mut self,
        pattern: &Pattern,
        target: &Molecule,
        depth: usize,
        p_atom: usize,
    ) -> Result<bool> {
        if self.stack[depth].cursor > 0 {
            return Ok(false);
        }
        self.stack[depth].cursor = 1;
        let t_atom = self.anchor;
        if self.painted_atoms.get(t_atom) {
            return Ok(false);
        }
        if !pattern.atom_matches(p_atom, &target.atoms[t_atom])? {
            return Ok(false);
        }
        self.bind_atom(depth, p_atom, t_atom);
        Ok(true)
    }

    /// First atom of a later pattern component: any unused target atom.
    fn try_component_anchor(
        &mut self,
        pattern: &Pattern,
        target: &Molecule,
        depth: usize,
        p_atom: usize,
    ) -> Result<bool> {
        let mut k = self.stack[depth].cursor;
        while k < target.atom_count() {
            let t_atom = k;
            k += 1;
            if self.painted_atoms.get(t_atom) {
                continue;
            }
            if !pattern.atom_matches(p_atom, &target.atoms[t_atom])? {
                continue;
            }
            self.stack[depth].cursor = k;
            self.bind_atom(depth, p_atom, t_atom);
            return Ok(true);
        }
        self.stack[depth].cursor = k;
        Ok(false)
    }

    /// Forward bond: extend the mapping along an unused bond of the image
    /// of `from` to an unused, label-compatible atom.
    fn try_edge(
        &mut self,
        pattern: &Pattern,
        target: &Molecule,
        depth: usize,
        p_bond: usize,
        from: usize,
        to: usize,
    ) -> Result<bool> {
        // Plan invariant: `from` was placed by an earlier step.
        let t_from = self.atom_map[from].unwrap();
        let incident = target.incident(t_from);
        let mut k = self.stack[depth].cursor;
        while k < incident.len() {
            let (t_other, t_bond) = incident[k];
            k += 1;
            if self.painted_bonds.get(t_bond) || self.painted_atoms.get(t_other) {
                continue;
            }
            if !pattern.bond_matches(p_bond, &target.bonds[t_bond])? {
                continue;
            }
            if !pattern.atom_matches(to, &target.atoms[t_other])? {
                continue;
            }
            self.stack[depth].cursor = k;
            self.bind_atom(depth, to, t_other);
            self.bind_bond(depth, p_bond, t_bond);
            return Ok(true);
        }
        self.stack[depth].cursor = k;
        Ok(false)
    }

    /// Back bond: both endpoints are mapped; find the unused target bond
    /// joining their images.
    fn try_ring_close(
        &mut self,
        pattern: &Pattern,
        target: &Molecule,
        depth: usize,
        p_bond: usize,
        from: usize,
        to: usize,
    ) -> Result<bool> {
        let t_from = self.atom_map[from].unwrap();
        let t_to = self.atom_map[to].unwrap();
        let incident = target.incident(t_from);
        let mut k = self.stack[depth].cursor;
        while k < incident.len() {
            let (t_other, t_bond) = incident[k];
            k += 1;
            if t_other != t_to || self.painted_bonds.get(t_bond) {
                continue;
            }
            if !pattern.bond_matches(p_bond, &target.bonds[t_bond])? {
                continue;
            }
            self.stack[depth].cursor = k;
            self.bind_bond(depth, p_bond, t_bond);
            return Ok(true);
        }
        self.stack[depth].cursor = k;
        Ok(false)
    }

    fn bind_atom(&mut self, depth: usize, p_atom: usize, t_atom: usize) {
        self.painted_atoms.set(t_atom);
        self.atom_map[p_atom] = Some(t_atom);
        self.stack[depth].atom = Some((p_atom, t_atom));
    }

    fn bind_bond(&mut self, depth: usize, p_bond: usize, t_bond: usize) {
        self.painted_bonds.set(t_bond);
        self.bond_map[p_bond] = Some(t_bond);
        self.stack[depth].bond = Some((p_bond, t_bond));
    }

    /// Undo the top frame's paint and map entries, leaving its cursor alone.
    fn unbind_top(&mut self) {
        let frame = self.stack.last_mut().unwrap();
        if let Some((p_atom, t_atom)) = frame.atom.take() {
            self.atom_map[p_atom] = None;
            self.painted_atoms.clear(t_atom);
        }
        if let Some((p_bond, t_bond)) = frame.bond.take() {
            self.bond_map[p_bond] = None;
            self.painted_bonds.clear(t_bond);
        }
    }
}
