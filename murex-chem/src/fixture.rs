//! Scenario fixture files for the matcher.
//!
//! One scenario per file: a pattern SMILES, an option string, a target
//! SMILES, then one expected match per line as a parenthesized list of
//! 1-based target atom ids in pattern order (`(a1 a2)`), terminated by the
//! empty-list sentinel `()`. Lines starting with `#` are comments.

use murex_core::{MurexError, Result};

use crate::matcher::{MatchOptions, Matcher};
use crate::pattern::Pattern;
use crate::smiles::parse_smiles;

/// A parsed scenario file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub pattern: String,
    pub options: MatchOptions,
    pub target: String,
    /// Expected atom maps, 0-based, in yield order.
    pub expected: Vec<Vec<usize>>,
}

/// Parse a scenario fixture.
pub fn parse_scenario(text: &str) -> Result<Scenario> {
    let mut pattern = None;
    let mut options = None;
    let mut target = None;
    let mut expected = Vec::new();
    let mut terminated = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if terminated {
            return Err(MurexError::Parse(format!(
                "unexpected line after the () sentinel: '{line}'"
            )));
        }
        if let Some(rest) = line.strip_prefix("pattern:") {
            pattern = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("options:") {
            options = Some(rest.trim().parse::<MatchOptions>()?);
        } else if let Some(rest) = line.strip_prefix("target:") {
            target = Some(rest.trim().to_string());
        } else if line.starts_with('(') {
            let ids = parse_id_list(line)?;
            if ids.is_empty() {
                terminated = true;
            } else {
                expected.push(ids);
            }
        } else {
            return Err(MurexError::Parse(format!(
                "unrecognized scenario line: '{line}'"
            )));
        }
    }

    if !terminated {
        return Err(MurexError::Parse("scenario is missing the () sentinel".into()));
    }
    Ok(Scenario {
        pattern: pattern.ok_or_else(|| MurexError::Parse("scenario has no pattern".into()))?,
        options: options.ok_or_else(|| MurexError::Parse("scenario has no options".into()))?,
        target: target.ok_or_else(|| MurexError::Parse("scenario has no target".into()))?,
        expected,
    })
}

/// Run a scenario's matcher, returning the yielded atom maps (0-based).
pub fn run_scenario(sc: &Scenario) -> Result<Vec<Vec<usize>>> {
    let target = parse_smiles(&sc.target)?;
    let pattern = Pattern::from_smiles(&sc.pattern)?;
    let mut matcher = Matcher::new(&pattern, sc.options);
    matcher.bind(&target)?;
    let mut out = Vec::new();
    while let Some(m) = matcher.next_match()? {
        out.push(m.atom_map);
    }
    Ok(out)
}

/// Render an atom map in fixture syntax: `(a1 a2)`, or `()` for the
/// exhaustion sentinel.
pub fn format_match(atoms: &[usize]) -> String {
    let ids: Vec<String> = atoms.iter().map(|&a| format!("a{}", a + 1)).collect();
    format!("({})", ids.join(" "))
}

fn parse_id_list(line: &str) -> Result<Vec<usize>> {
    let inner = line
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| MurexError::Parse(format!("malformed match line: '{line}'")))?;
    inner
        .split_whitespace()
        .map(|tok| {
            let n: usize = tok
                .strip_prefix('a')
                .and_then(|d| d.parse().ok())
                .filter(|&n| n >= 1)
                .ok_or_else(|| MurexError::Parse(format!("malformed atom id '{tok}'")))?;
            Ok(n - 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# sliding a two-carbon probe along butane
pattern: CC
options: overlap=1 permute=0
target: CCCC
(a1 a2)
(a2 a3)
(a3 a4)
()
";

    #[test]
    fn parse_sample_scenario() {
        let sc = parse_scenario(SAMPLE).unwrap();
        assert_eq!(sc.pattern, "CC");
        assert_eq!(sc.target, "CCCC");
        assert!(sc.options.overlap);
        assert!(!sc.options.permute);
        assert_eq!(sc.expected, vec![vec![0, 1], vec![1, 2], vec![2, 3]]);
    }

    #[test]
    fn run_matches_expectations() {
        let sc = parse_scenario(SAMPLE).unwrap();
        assert_eq!(run_scenario(&sc).unwrap(), sc.expected);
    }

    #[test]
    fn format_match_syntax() {
        assert_eq!(format_match(&[0, 2, 1]), "(a1 a3 a2)");
        assert_eq!(format_match(&[]), "()");
    }

    #[test]
    fn missing_sentinel_rejected() {
        let text = "pattern: C\noptions:\ntarget: C\n(a1)\n";
        assert!(parse_scenario(text).is_err());
    }

    #[test]
    fn unknown_option_key_rejected() {
        let text = "pattern: C\noptions: verbose=1\ntarget: C\n()\n";
        assert!(matches!(
            parse_scenario(text).unwrap_err(),
            MurexError::InvalidInput(_)
        ));
    }

    #[test]
    fn malformed_match_line_rejected() {
        assert!(parse_id_list("(a1 b2)").is_err());
        assert!(parse_id_list("(a0)").is_err());
        assert!(parse_id_list("a1 a2").is_err());
    }

    mod scenario_files {
        use super::*;

        fn check(text: &str) {
            let sc = parse_scenario(text).unwrap();
            assert_eq!(run_scenario(&sc).unwrap(), sc.expected);
        }

        #[test]
        fn chain_overlap() {
            check(include_str!("../fixtures/chain_overlap.txt"));
        }

        #[test]
        fn chain_no_overlap() {
            check(include_str!("../fixtures/chain_no_overlap.txt"));
        }

        #[test]
        fn ethane_permute() {
            check(include_str!("../fixtures/ethane_permute.txt"));
        }

        #[test]
        fn ethane_dedup() {
            check(include_str!("../fixtures/ethane_dedup.txt"));
        }

        #[test]
        fn acyl_chloride() {
            check(include_str!("../fixtures/acyl_chloride.txt"));
        }

        #[test]
        fn no_match() {
            check(include_str!("../fixtures/no_match.txt"));
        }

        #[test]
        fn disconnected_pattern() {
            check(include_str!("../fixtures/disconnected.txt"));
        }

        #[test]
        fn fused_rings() {
            check(include_str!("../fixtures/naphthalene.txt"));
        }
    }
}
