use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::hash::BuildHasher;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::*;

/// Classification of a grid against the states seen so far in a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Convergence {
    Continuing,
    /// No live cells remain.
    Extinct,
    /// The exact same grid occurred before. `first_seen` is only known when the
    /// history tracks generations, see [`History`].
    Cyclical { first_seen: Option<Generation> },
}

impl Convergence {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Continuing)
    }

    /// Terminal kind of this outcome when observed at `generation`.
    pub fn kind_at(self, generation: Generation) -> Option<ConvergenceKind> {
        match self {
            Self::Continuing => None,
            Self::Extinct => Some(ConvergenceKind::Extinct),
            Self::Cyclical { first_seen } => Some(ConvergenceKind::Cyclical {
                period: first_seen.and_then(|first| generation.checked_sub(first)),
            }),
        }
    }
}

/// How a finished run converged. A period of 1 is a still life.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvergenceKind {
    Extinct,
    Cyclical { period: Option<Generation> },
}

/// Collection of previously observed fingerprints.
pub trait SeenStates {
    fn contains(&self, fingerprint: &Fingerprint) -> bool;

    /// Generation at which `fingerprint` was first observed, when tracked.
    fn first_seen(&self, _fingerprint: &Fingerprint) -> Option<Generation> {
        None
    }
}

impl<S: BuildHasher> SeenStates for HashSet<Fingerprint, S> {
    fn contains(&self, fingerprint: &Fingerprint) -> bool {
        HashSet::contains(self, fingerprint)
    }
}

impl SeenStates for BTreeSet<Fingerprint> {
    fn contains(&self, fingerprint: &Fingerprint) -> bool {
        BTreeSet::contains(self, fingerprint)
    }
}

/// Classifies `grid` without recording it.
///
/// Extinction is reported first, even when the all-dead fingerprint is already part
/// of `seen`.
pub fn check_convergence<S: SeenStates + ?Sized>(grid: &Grid, seen: &S) -> Convergence {
    if grid.population() == 0 {
        return Convergence::Extinct;
    }
    classify_fingerprint(&Fingerprint::of(grid), seen)
}

/// Same as [`check_convergence`] for callers that already hold the grid's fingerprint.
pub fn check_fingerprinted<S: SeenStates + ?Sized>(
    grid: &Grid,
    fingerprint: &Fingerprint,
    seen: &S,
) -> Convergence {
    if grid.population() == 0 {
        return Convergence::Extinct;
    }
    classify_fingerprint(fingerprint, seen)
}

fn classify_fingerprint<S: SeenStates + ?Sized>(fingerprint: &Fingerprint, seen: &S) -> Convergence {
    if seen.contains(fingerprint) {
        Convergence::Cyclical {
            first_seen: seen.first_seen(fingerprint),
        }
    } else {
        Convergence::Continuing
    }
}

/// Ordered fingerprint log of one run; entry `n` belongs to generation `n`.
///
/// Serializes as the plain list of fingerprints so it can be stored next to a board
/// and restored later.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Fingerprint>", into = "Vec<Fingerprint>")]
pub struct History {
    entries: Vec<Fingerprint>,
    first_seen: HashMap<Fingerprint, Generation>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the fingerprint of the next generation and returns that generation.
    pub fn record(&mut self, fingerprint: Fingerprint) -> Generation {
        // A run never outlives `Generation::MAX` steps.
        let generation = self.entries.len() as Generation;
        self.first_seen
            .entry(fingerprint.clone())
            .or_insert(generation);
        self.entries.push(fingerprint);
        generation
    }

    pub fn record_grid(&mut self, grid: &Grid) -> Generation {
        self.record(Fingerprint::of(grid))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fingerprint> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&Fingerprint> {
        self.entries.last()
    }
}

impl SeenStates for History {
    fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.first_seen.contains_key(fingerprint)
    }

    fn first_seen(&self, fingerprint: &Fingerprint) -> Option<Generation> {
        self.first_seen.get(fingerprint).copied()
    }
}

impl From<Vec<Fingerprint>> for History {
    fn from(entries: Vec<Fingerprint>) -> Self {
        let mut history = Self::new();
        for fingerprint in entries {
            history.record(fingerprint);
        }
        history
    }
}

impl From<History> for Vec<Fingerprint> {
    fn from(history: History) -> Self {
        history.entries
    }
}

impl FromIterator<Fingerprint> for History {
    fn from_iter<I: IntoIterator<Item = Fingerprint>>(iter: I) -> Self {
        let mut history = Self::new();
        for fingerprint in iter {
            history.record(fingerprint);
        }
        history
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn grid(text: &str) -> Grid {
        Grid::parse(text).unwrap()
    }

    #[test]
    fn all_dead_grid_is_extinct_whatever_the_history() {
        let dead = grid("...\n...");
        let mut seen: HashSet<Fingerprint> = HashSet::new();

        assert_eq!(check_convergence(&dead, &seen), Convergence::Extinct);
        seen.insert(Fingerprint::of(&dead));
        assert_eq!(check_convergence(&dead, &seen), Convergence::Extinct);
        assert_eq!(check_convergence(&Grid::empty((0, 0)), &seen), Convergence::Extinct);
    }

    #[test]
    fn seen_grid_is_cyclical() {
        let blinker = grid("...\n###\n...");
        let seen: BTreeSet<_> = [Fingerprint::of(&blinker)].into();

        assert_eq!(
            check_convergence(&blinker, &seen),
            Convergence::Cyclical { first_seen: None }
        );
    }

    #[test]
    fn unseen_grid_continues_and_history_is_untouched() {
        let blinker = grid("...\n###\n...");
        let other = grid(".#.\n.#.\n.#.");
        let seen: HashSet<_> = [Fingerprint::of(&other)].into_iter().collect();

        assert_eq!(check_convergence(&blinker, &seen), Convergence::Continuing);
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn history_reports_first_occurrence() {
        let horizontal = grid("...\n###\n...");
        let vertical = grid(".#.\n.#.\n.#.");
        let mut history = History::new();

        assert_eq!(history.record_grid(&horizontal), 0);
        assert_eq!(history.record_grid(&vertical), 1);
        assert_eq!(history.record_grid(&horizontal), 2);

        assert_eq!(
            check_convergence(&horizontal, &history),
            Convergence::Cyclical { first_seen: Some(0) }
        );
        assert_eq!(history.first_seen(&Fingerprint::of(&vertical)), Some(1));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn kind_at_derives_the_period() {
        let cyclical = Convergence::Cyclical { first_seen: Some(3) };

        assert_eq!(
            cyclical.kind_at(7),
            Some(ConvergenceKind::Cyclical { period: Some(4) })
        );
        assert_eq!(
            Convergence::Cyclical { first_seen: None }.kind_at(7),
            Some(ConvergenceKind::Cyclical { period: None })
        );
        assert_eq!(Convergence::Extinct.kind_at(1), Some(ConvergenceKind::Extinct));
        assert_eq!(Convergence::Continuing.kind_at(1), None);
    }

    #[test]
    fn history_serializes_as_ordered_list() {
        let history: History = vec![
            Fingerprint::from_encoded("gA==".into()),
            Fingerprint::from_encoded("QA==".into()),
        ]
        .into();

        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(json, r#"["gA==","QA=="]"#);

        let restored: History = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, history);
        assert_eq!(restored.first_seen(&Fingerprint::from_encoded("QA==".into())), Some(1));
    }
}
