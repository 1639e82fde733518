use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::*;

/// Largest neighbor count a cell can observe in a Moore neighborhood.
pub const MAX_NEIGHBORS: u8 = 8;

/// Set of neighbor counts, bit `n` set meaning `n` is a member.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
struct NeighborMask(u16);

impl NeighborMask {
    fn from_counts(counts: &[u8]) -> Result<Self> {
        let mut mask = 0;
        for &count in counts {
            if count > MAX_NEIGHBORS {
                return Err(LifeError::NeighborCountOutOfRange(count));
            }
            mask |= 1 << count;
        }
        Ok(Self(mask))
    }

    const fn contains(self, count: u8) -> bool {
        count <= MAX_NEIGHBORS && self.0 & (1 << count) != 0
    }

    fn iter(self) -> impl Iterator<Item = u8> {
        (0..=MAX_NEIGHBORS).filter(move |&count| self.contains(count))
    }

    fn insert_digit(&mut self, c: char) -> Result<()> {
        let count = c.to_digit(10).ok_or(LifeError::InvalidRuleString)?;
        // A single decimal digit always fits.
        let count = count as u8;
        if count > MAX_NEIGHBORS {
            return Err(LifeError::NeighborCountOutOfRange(count));
        }
        self.0 |= 1 << count;
        Ok(())
    }

    fn parse(digits: &str) -> Result<Self> {
        let mut mask = Self::default();
        for c in digits.chars() {
            mask.insert_digit(c)?;
        }
        Ok(mask)
    }
}

/// Life-like transition rule: which neighbor counts keep a live cell alive and which
/// bring a dead cell to life.
///
/// Rules are validated on construction so the engine never has to look at a count
/// outside `0..=8`. Textual form is the usual `B3/S23` rulestring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleSet {
    survival: NeighborMask,
    birth: NeighborMask,
}

impl RuleSet {
    pub fn new(survival: &[u8], birth: &[u8]) -> Result<Self> {
        Ok(Self {
            survival: NeighborMask::from_counts(survival)?,
            birth: NeighborMask::from_counts(birth)?,
        })
    }

    /// B3/S23
    pub const fn conway() -> Self {
        Self {
            survival: NeighborMask(1 << 2 | 1 << 3),
            birth: NeighborMask(1 << 3),
        }
    }

    /// B36/S23
    pub const fn high_life() -> Self {
        Self {
            survival: NeighborMask(1 << 2 | 1 << 3),
            birth: NeighborMask(1 << 3 | 1 << 6),
        }
    }

    /// B3678/S34678
    pub const fn day_and_night() -> Self {
        Self {
            survival: NeighborMask(1 << 3 | 1 << 4 | 1 << 6 | 1 << 7 | 1 << 8),
            birth: NeighborMask(1 << 3 | 1 << 6 | 1 << 7 | 1 << 8),
        }
    }

    /// Resolves a preset name, falling back to rulestring notation.
    pub fn lookup(name: &str) -> Result<Self> {
        match name.parse::<Preset>() {
            Ok(preset) => Ok(preset.rules()),
            Err(_) => name.parse(),
        }
    }

    pub const fn survives(&self, neighbors: u8) -> bool {
        self.survival.contains(neighbors)
    }

    pub const fn is_born(&self, neighbors: u8) -> bool {
        self.birth.contains(neighbors)
    }

    pub const fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        if alive {
            self.survives(neighbors)
        } else {
            self.is_born(neighbors)
        }
    }

    pub fn survival(&self) -> impl Iterator<Item = u8> {
        self.survival.iter()
    }

    pub fn birth(&self) -> impl Iterator<Item = u8> {
        self.birth.iter()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::conway()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("B")?;
        for count in self.birth() {
            write!(f, "{count}")?;
        }
        f.write_str("/S")?;
        for count in self.survival() {
            write!(f, "{count}")?;
        }
        Ok(())
    }
}

impl FromStr for RuleSet {
    type Err = LifeError;

    /// Accepts `B3/S23`, `S23/B3` and the older survival-first `23/3` form.
    fn from_str(s: &str) -> Result<Self> {
        let (left, right) = s.trim().split_once('/').ok_or(LifeError::InvalidRuleString)?;

        let mut birth = None;
        let mut survival = None;
        for part in [left, right] {
            let mut chars = part.chars();
            match chars.next() {
                Some('B' | 'b') if birth.is_none() => {
                    birth = Some(NeighborMask::parse(chars.as_str())?);
                }
                Some('S' | 's') if survival.is_none() => {
                    survival = Some(NeighborMask::parse(chars.as_str())?);
                }
                Some(c) if c.is_ascii_digit() => {}
                None => {}
                Some(_) => return Err(LifeError::InvalidRuleString),
            }
        }

        match (birth, survival) {
            (Some(birth), Some(survival)) => Ok(Self { survival, birth }),
            (None, None) => Ok(Self {
                survival: NeighborMask::parse(left)?,
                birth: NeighborMask::parse(right)?,
            }),
            _ => Err(LifeError::InvalidRuleString),
        }
    }
}

impl TryFrom<String> for RuleSet {
    type Error = LifeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RuleSet> for String {
    fn from(rules: RuleSet) -> Self {
        use alloc::string::ToString;
        rules.to_string()
    }
}

/// Named rule sets a caller can select without spelling out a rulestring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    Conway,
    HighLife,
    DayAndNight,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Self::Conway, Self::HighLife, Self::DayAndNight];

    pub const fn rules(self) -> RuleSet {
        match self {
            Self::Conway => RuleSet::conway(),
            Self::HighLife => RuleSet::high_life(),
            Self::DayAndNight => RuleSet::day_and_night(),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Conway => "conway",
            Self::HighLife => "highlife",
            Self::DayAndNight => "daynight",
        }
    }
}

impl FromStr for Preset {
    type Err = LifeError;

    /// Case-insensitive; punctuation and spacing are ignored, so `Day & Night` and
    /// `day-and-night` both resolve.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "conway" | "life" | "gameoflife" => Ok(Self::Conway),
            "highlife" => Ok(Self::HighLife),
            "daynight" | "dayandnight" => Ok(Self::DayAndNight),
            _ => Err(LifeError::UnknownPreset),
        }
    }
}

impl From<Preset> for RuleSet {
    fn from(preset: Preset) -> Self {
        preset.rules()
    }
}
