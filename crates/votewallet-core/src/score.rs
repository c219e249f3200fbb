use serde::{Deserialize, Serialize};

/// Coarse bucket for an impact score, used for coloring and labels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScoreBand {
    /// Score 70-100
    Strong,
    /// Score 40-69
    Moderate,
    /// Score 0-39
    Developing,
}

/// Below this score the detail view points at better-rated alternatives
pub const ALTERNATIVES_THRESHOLD: u8 = 50;

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => ScoreBand::Strong,
            40..=69 => ScoreBand::Moderate,
            _ => ScoreBand::Developing,
        }
    }

    pub fn color_code(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "green",
            ScoreBand::Moderate => "yellow",
            ScoreBand::Developing => "red",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "✓",
            ScoreBand::Moderate => "○",
            ScoreBand::Developing => "✗",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "Strong",
            ScoreBand::Moderate => "Moderate",
            ScoreBand::Developing => "Developing",
        }
    }
}

/// Whether a company scores low enough to suggest alternatives
pub fn should_suggest_alternatives(score: u8) -> bool {
    score < ALTERNATIVES_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(70), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(69), ScoreBand::Moderate);
        assert_eq!(ScoreBand::from_score(40), ScoreBand::Moderate);
        assert_eq!(ScoreBand::from_score(39), ScoreBand::Developing);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Developing);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ScoreBand::Strong.label(), "Strong");
        assert_eq!(ScoreBand::Developing.color_code(), "red");
    }

    #[test]
    fn test_alternatives_threshold() {
        assert!(should_suggest_alternatives(32));
        assert!(should_suggest_alternatives(49));
        assert!(!should_suggest_alternatives(50));
    }
}
