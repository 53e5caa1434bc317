//! Resolution strategies for package-declared paths
//!
//! Each strategy inspects one declared path and either claims it (returning a
//! verdict) or passes. Strategies run in the order of [`STRATEGIES`]; the first
//! claim wins.

use crate::index::FileIndex;
use crate::layout::{board_config_root, BOARDS_PREFIX, CUSTO_PREFIX, PSEUDO_PATHS};

/// Inputs shared by every strategy
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub board_id: &'a str,
    pub index: &'a FileIndex,
}

/// Outcome of a strategy that claimed a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Index key the path resolved to
    Resolved(String),
    /// Not a real file for this snapshot; ignore silently
    Skip,
    /// Claimed but no matching entry exists
    Unresolved,
}

pub type StrategyFn = fn(&str, &ResolveContext<'_>) -> Option<Verdict>;

/// A named resolution strategy
#[derive(Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    pub apply: StrategyFn,
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy").field("name", &self.name).finish()
    }
}

/// Resolution order; first claim wins
pub const STRATEGIES: [Strategy; 5] = [
    Strategy {
        name: "pseudo-path",
        apply: pseudo_path,
    },
    Strategy {
        name: "exact",
        apply: exact,
    },
    Strategy {
        name: "custo-overlay",
        apply: custo_overlay,
    },
    Strategy {
        name: "board-overlay",
        apply: board_overlay,
    },
    Strategy {
        name: "case-insensitive",
        apply: case_insensitive,
    },
];

/// Run the strategies in order
///
/// Returns the verdict and the name of the strategy that produced it.
/// A path no strategy claims is unresolved.
pub fn resolve(path: &str, ctx: &ResolveContext<'_>) -> (Verdict, Option<&'static str>) {
    for strategy in STRATEGIES.iter() {
        if let Some(verdict) = (strategy.apply)(path, ctx) {
            return (verdict, Some(strategy.name));
        }
    }
    (Verdict::Unresolved, None)
}

fn lookup(candidate: &str, ctx: &ResolveContext<'_>) -> Verdict {
    if ctx.index.contains_key(candidate) {
        Verdict::Resolved(candidate.to_string())
    } else {
        Verdict::Unresolved
    }
}

/// opkg bookkeeping entries that never exist on disk
pub fn pseudo_path(path: &str, _ctx: &ResolveContext<'_>) -> Option<Verdict> {
    PSEUDO_PATHS.contains(&path).then_some(Verdict::Skip)
}

pub fn exact(path: &str, ctx: &ResolveContext<'_>) -> Option<Verdict> {
    ctx.index
        .contains_key(path)
        .then(|| Verdict::Resolved(path.to_string()))
}

/// `/etc/custo/x` is installed as `/etc/x`
pub fn custo_overlay(path: &str, ctx: &ResolveContext<'_>) -> Option<Verdict> {
    let rest = path.strip_prefix(CUSTO_PREFIX)?;
    Some(lookup(&format!("/etc/{}", rest), ctx))
}

/// `/etc/boards/<BOARD>/config/x` is installed as `/x` on that board
///
/// Paths for other boards are skipped.
pub fn board_overlay(path: &str, ctx: &ResolveContext<'_>) -> Option<Verdict> {
    let rest = path.strip_prefix(BOARDS_PREFIX)?;
    let board = rest.split('/').next().unwrap_or_default();
    if board != ctx.board_id {
        return Some(Verdict::Skip);
    }

    let config_root = board_config_root(ctx.board_id);
    match path.strip_prefix(config_root.as_str()) {
        Some(stripped) if stripped.starts_with('/') => Some(lookup(stripped, ctx)),
        _ => Some(Verdict::Unresolved),
    }
}

/// Linear scan in index order for a key equal ignoring Unicode case
pub fn case_insensitive(path: &str, ctx: &ResolveContext<'_>) -> Option<Verdict> {
    ctx.index
        .keys()
        .find(|key| eq_ignore_case(key, path))
        .map(|key| Verdict::Resolved(key.clone()))
}

/// Char-wise comparison folding each pair through upper then lower case
fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.eq_ignore_ascii_case(b) {
        return true;
    }
    let mut left = a.chars();
    let mut right = b.chars();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) => {
                if x != y
                    && !x.to_uppercase().eq(y.to_uppercase())
                    && !x.to_lowercase().eq(y.to_lowercase())
                {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
