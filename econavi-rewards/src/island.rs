//! Eco island progress stages
use serde::{Deserialize, Serialize};

/// The five growth stages of the eco island, derived from the persisted
/// sort counter and never stored themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IslandStage {
    BarrenPlot,
    Sprout,
    Growing,
    Thriving,
    Paradise,
}

impl IslandStage {
    /// Stage for a given sort count. Total over all counts, monotonic
    /// non-decreasing as the counter grows.
    #[must_use]
    pub const fn for_count(count: u32) -> Self {
        match count {
            50.. => IslandStage::Paradise,
            30..=49 => IslandStage::Thriving,
            15..=29 => IslandStage::Growing,
            5..=14 => IslandStage::Sprout,
            0..=4 => IslandStage::BarrenPlot,
        }
    }

    /// Stage index, 0 through 4.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            IslandStage::BarrenPlot => 0,
            IslandStage::Sprout => 1,
            IslandStage::Growing => 2,
            IslandStage::Thriving => 3,
            IslandStage::Paradise => 4,
        }
    }

    /// Display label matching the island art tiers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            IslandStage::BarrenPlot => "Barren Plot",
            IslandStage::Sprout => "First Sprout",
            IslandStage::Growing => "Growing Village",
            IslandStage::Thriving => "Thriving Town",
            IslandStage::Paradise => "Island Paradise",
        }
    }
}

impl std::fmt::Display for IslandStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Level {}: {}", self.index(), self.label())
    }
}
