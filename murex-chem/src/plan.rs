//! Pattern flattening: turn a pattern graph into a linear DFS plan.
//!
//! The matcher never recurses over the pattern at search time. Instead the
//! pattern is flattened once into an ordered list of [`Step`]s that the
//! engine walks iteratively, which is what makes the search resumable: the
//! engine can stop at any step, hand a match to the caller, and pick up
//! exactly where it left off.

use crate::molecule::Molecule;

/// One step of the DFS plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The first pattern atom. Its image is the current anchor atom of the
    /// target.
    Anchor { atom: usize },
    /// The first pattern atom of a later connected component. Ranges over
    /// every target atom not already in use.
    ComponentAnchor { atom: usize },
    /// A forward DFS bond: `from` is already mapped, `to` is not yet.
    Edge { bond: usize, from: usize, to: usize },
    /// A back bond closing a ring: both endpoints are already mapped.
    RingClose { bond: usize, from: usize, to: usize },
}

/// Flatten a pattern graph into its DFS plan.
///
/// Traversal starts at atom 0 and follows adjacency-list order, so the plan
/// is fully determined by the pattern's insertion order. Every atom appears
/// in DFS pre-order (via its `Anchor`/`ComponentAnchor`/`Edge` step) and
/// every bond appears exactly once, as `Edge` or `RingClose`.
pub fn flatten(mol: &Molecule) -> Vec<Step> {
    let mut plan = Vec::with_capacity(mol.atom_count() + mol.bond_count());
    let mut seen_atom = vec![false; mol.atom_count()];
    let mut seen_bond = vec![false; mol.bond_count()];

    for root in 0..mol.atom_count() {
        if seen_atom[root] {
            continue;
        }
        plan.push(if plan.is_empty() {
            Step::Anchor { atom: root }
        } else {
            Step::ComponentAnchor { atom: root }
        });
        seen_atom[root] = true;

        // Iterative DFS; each stack entry is (atom, next incidence slot).
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some(top) = stack.last_mut() {
            let (atom, slot) = *top;
            if slot == mol.incident(atom).len() {
                stack.pop();
                continue;
            }
            top.1 += 1;
            let (nbr, bond) = mol.incident(atom)[slot];
            if seen_bond[bond] {
                continue;
            }
            seen_bond[bond] = true;
            if seen_atom[nbr] {
                plan.push(Step::RingClose { bond, from: atom, to: nbr });
            } else {
                seen_atom[nbr] = true;
                plan.push(Step::Edge { bond, from: atom, to: nbr });
                stack.push((nbr, 0));
            }
        }
    }

    plan
}
