use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DlError, DlResult};

/// One of the five narrative phases. The order is the only order a session can move in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeStage {
    /// Stage 0.
    #[default]
    Peace,
    /// Stage 1.
    Unease,
    /// Stage 2.
    Dread,
    /// Stage 3.
    Terror,
    /// Stage 4, terminal.
    Horror,
}

impl NarrativeStage {
    /// All stages in progression order.
    pub const ALL: [NarrativeStage; 5] = [
        Self::Peace,
        Self::Unease,
        Self::Dread,
        Self::Terror,
        Self::Horror,
    ];

    /// Numeric index, 0 for Peace through 4 for Horror.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a stage by index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The stage after this one, if any.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Whether this is the last stage.
    pub fn is_final(self) -> bool {
        self.next().is_none()
    }

    /// Lowercase stage name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Peace => "peace",
            Self::Unease => "unease",
            Self::Dread => "dread",
            Self::Terror => "terror",
            Self::Horror => "horror",
        }
    }

    /// The one-step forward transition out of this stage.
    ///
    /// This is the only way a [`StageTransition`] is constructed, so every
    /// transition in the game moves exactly one stage forward.
    pub fn advance(self) -> DlResult<StageTransition> {
        let to = self.next().ok_or(DlError::FinalStage)?;
        Ok(StageTransition { from: self, to })
    }
}

impl fmt::Display for NarrativeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for NarrativeStage {
    type Err = DlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        if let Ok(index) = lowered.parse::<usize>() {
            return Self::from_index(index).ok_or_else(|| DlError::InvalidStage(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|stage| stage.name() == lowered)
            .ok_or_else(|| DlError::InvalidStage(s.to_string()))
    }
}

/// A single forward step between two adjacent stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageTransition {
    from: NarrativeStage,
    to: NarrativeStage,
}

impl StageTransition {
    /// The stage being left.
    pub fn from(&self) -> NarrativeStage {
        self.from
    }

    /// The stage being entered.
    pub fn to(&self) -> NarrativeStage {
        self.to
    }
}

impl fmt::Display for StageTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_ordered() {
        for (i, stage) in NarrativeStage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
            assert_eq!(NarrativeStage::from_index(i), Some(*stage));
        }
        assert!(NarrativeStage::from_index(5).is_none());
    }

    #[test]
    fn advance_moves_one_step() {
        let t = NarrativeStage::Unease.advance().unwrap();
        assert_eq!(t.from(), NarrativeStage::Unease);
        assert_eq!(t.to(), NarrativeStage::Dread);
        assert!(t.to() > t.from());
    }

    #[test]
    fn horror_is_terminal() {
        assert!(NarrativeStage::Horror.is_final());
        assert!(matches!(
            NarrativeStage::Horror.advance(),
            Err(DlError::FinalStage)
        ));
    }

    #[test]
    fn parse_by_name_or_index() {
        assert_eq!("Dread".parse::<NarrativeStage>().unwrap(), NarrativeStage::Dread);
        assert_eq!("4".parse::<NarrativeStage>().unwrap(), NarrativeStage::Horror);
        assert!("7".parse::<NarrativeStage>().is_err());
        assert!("calm".parse::<NarrativeStage>().is_err());
    }

    #[test]
    fn display_transition() {
        let t = NarrativeStage::Peace.advance().unwrap();
        assert_eq!(t.to_string(), "peace -> unease");
    }
}
