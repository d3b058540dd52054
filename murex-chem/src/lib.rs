//! Chemical substructure matching for the murex ecosystem.
//!
//! Provides a molecular graph representation, a SMILES parser, and a
//! deterministic, resumable subgraph-isomorphism matcher with pluggable
//! atom/bond predicates and configurable duplicate suppression (overlap
//! and permutation policies).
//!
//! # Example
//!
//! ```
//! use murex_chem::{parse_smiles, MatchOptions, Matcher, Pattern};
//!
//! // Search for an ethane-like probe in butane
//! let target = parse_smiles("CCCC").unwrap();
//! let pattern = Pattern::from_smiles("CC").unwrap();
//!
//! let mut matcher = Matcher::new(&pattern, MatchOptions::default());
//! matcher.bind(&target).unwrap();
//!
//! let first = matcher.next_match().unwrap().unwrap();
//! assert_eq!(first.atom_map, vec![0, 1]);
//!
//! // Matches stream one at a time until exhaustion
//! let mut rest = 0;
//! while matcher.next_match().unwrap().is_some() {
//!     rest += 1;
//! }
//! assert_eq!(rest, 2);
//! ```

pub mod element;
pub mod fixture;
pub mod matcher;
pub mod molecule;
pub mod pattern;
pub mod plan;
pub mod smiles;

mod engine;

pub use element::{element_by_number, element_by_symbol, Element};
pub use fixture::{format_match, parse_scenario, run_scenario, Scenario};
pub use matcher::{find_matches, has_substructure, Match, MatchOptions, Matcher};
pub use molecule::{Bond, BondOrder, MolAtom, Molecule};
pub use pattern::{AtomPredicate, BondPredicate, Pattern};
pub use plan::{flatten, Step};
pub use smiles::{parse_smiles, parse_smiles_named};
