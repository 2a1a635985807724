use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Agent / Lead
// ---------------------------------------------------------------------------

/// A sales representative eligible to receive leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: String,
    pub name: String,
}

impl Agent {
    pub fn new(agent_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            name: name.into(),
        }
    }
}

/// A prospective customer not yet converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub lead_id: String,
    /// Predicted conversion probability in `[0, 1]`, if the model scored it.
    #[serde(default)]
    pub score: Option<f64>,
}

impl Lead {
    pub fn new(lead_id: impl Into<String>, score: Option<f64>) -> Self {
        Self {
            lead_id: lead_id.into(),
            score,
        }
    }

    /// Score used for tiering. Missing and non-finite scores count as 0.
    pub fn effective_score(&self) -> f64 {
        match self.score {
            Some(s) if s.is_finite() => s,
            _ => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Platinum,
    Gold,
    Silver,
}

impl Tier {
    /// Distribution order: platinum leads are handed out first.
    pub fn all() -> &'static [Tier] {
        &[Tier::Platinum, Tier::Gold, Tier::Silver]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Platinum => "platinum",
            Tier::Gold => "gold",
            Tier::Silver => "silver",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds (inclusive) for the platinum and gold tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    #[serde(default = "default_platinum")]
    pub platinum: f64,
    #[serde(default = "default_gold")]
    pub gold: f64,
}

fn default_platinum() -> f64 {
    0.8
}

fn default_gold() -> f64 {
    0.5
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            platinum: default_platinum(),
            gold: default_gold(),
        }
    }
}

impl TierThresholds {
    pub fn classify(&self, lead: &Lead) -> Tier {
        let score = lead.effective_score();
        if score >= self.platinum {
            Tier::Platinum
        } else if score >= self.gold {
            Tier::Gold
        } else {
            Tier::Silver
        }
    }
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Link between one lead and one agent. Only the newest batch is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub agent_id: String,
    pub lead_id: String,
    pub is_active: bool,
    pub assigned_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// DistributionSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub platinum: usize,
    pub gold: usize,
    pub silver: usize,
}

impl TierCounts {
    pub fn get(&self, tier: Tier) -> usize {
        match tier {
            Tier::Platinum => self.platinum,
            Tier::Gold => self.gold,
            Tier::Silver => self.silver,
        }
    }
}

/// Outcome of one distribution run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub total_leads: usize,
    pub total_agents: usize,
    pub distribution: TierCounts,
    /// Rows the store reported as written.
    pub assigned: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_boundaries_are_inclusive_below() {
        let t = TierThresholds::default();
        assert_eq!(t.classify(&Lead::new("a", Some(0.8))), Tier::Platinum);
        assert_eq!(t.classify(&Lead::new("b", Some(0.79))), Tier::Gold);
        assert_eq!(t.classify(&Lead::new("c", Some(0.5))), Tier::Gold);
        assert_eq!(t.classify(&Lead::new("d", Some(0.49))), Tier::Silver);
        assert_eq!(t.classify(&Lead::new("e", Some(1.0))), Tier::Platinum);
        assert_eq!(t.classify(&Lead::new("f", Some(0.0))), Tier::Silver);
    }

    #[test]
    fn missing_or_nan_score_is_silver() {
        let t = TierThresholds::default();
        assert_eq!(t.classify(&Lead::new("a", None)), Tier::Silver);
        assert_eq!(t.classify(&Lead::new("b", Some(f64::NAN))), Tier::Silver);
        assert_eq!(Lead::new("c", Some(f64::INFINITY)).effective_score(), 0.0);
    }

    #[test]
    fn custom_thresholds() {
        let t = TierThresholds {
            platinum: 0.9,
            gold: 0.3,
        };
        assert_eq!(t.classify(&Lead::new("a", Some(0.85))), Tier::Gold);
        assert_eq!(t.classify(&Lead::new("b", Some(0.3))), Tier::Gold);
        assert_eq!(t.classify(&Lead::new("c", Some(0.29))), Tier::Silver);
    }

    #[test]
    fn summary_serializes_with_snake_case_keys() {
        let summary = DistributionSummary {
            total_leads: 4,
            total_agents: 3,
            distribution: TierCounts {
                platinum: 2,
                gold: 1,
                silver: 1,
            },
            assigned: 4,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_leads"], 4);
        assert_eq!(json["total_agents"], 3);
        assert_eq!(json["distribution"]["platinum"], 2);
        assert_eq!(json["distribution"]["silver"], 1);
        assert_eq!(json["assigned"], 4);
    }

    #[test]
    fn tier_display_and_order() {
        assert_eq!(Tier::Gold.to_string(), "gold");
        assert_eq!(Tier::all(), &[Tier::Platinum, Tier::Gold, Tier::Silver]);
    }
}
