//! Decision protocol selection

use crate::core::error::DomainError;
use crate::elimination::skin::EliminationSkin;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// How candidate responses are turned into one decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecisionProtocol {
    /// Keep every response ("None")
    #[default]
    Aggregate,
    /// A single judge decides
    Arbiter,
    /// Instant-runoff voting among the agents
    RankedChoice,
    /// Ranked choice reviewed by a judge, with mistrials
    JudgeAndJury,
    /// Peer elimination under a narrative skin
    Elimination(EliminationSkin),
}

impl DecisionProtocol {
    pub const ALL: [DecisionProtocol; 6] = [
        DecisionProtocol::Aggregate,
        DecisionProtocol::Arbiter,
        DecisionProtocol::RankedChoice,
        DecisionProtocol::JudgeAndJury,
        DecisionProtocol::Elimination(EliminationSkin::BattleRoyale),
        DecisionProtocol::Elimination(EliminationSkin::RetirementLounge),
    ];

    /// Protocols that cannot run their own logic without a judge model
    pub fn requires_judge(&self) -> bool {
        matches!(self, DecisionProtocol::Arbiter | DecisionProtocol::JudgeAndJury)
    }

    /// Stable configuration identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionProtocol::Aggregate => "none",
            DecisionProtocol::Arbiter => "arbiter",
            DecisionProtocol::RankedChoice => "ranked_choice",
            DecisionProtocol::JudgeAndJury => "judge_and_jury",
            DecisionProtocol::Elimination(EliminationSkin::BattleRoyale) => "fight_to_the_death",
            DecisionProtocol::Elimination(EliminationSkin::RetirementLounge) => {
                "retirement_lounge"
            }
        }
    }

    /// Human-readable name
    pub fn title(&self) -> &'static str {
        match self {
            DecisionProtocol::Aggregate => "None",
            DecisionProtocol::Arbiter => "Arbiter",
            DecisionProtocol::RankedChoice => "Ranked Choice",
            DecisionProtocol::JudgeAndJury => "Judge & Jury",
            DecisionProtocol::Elimination(skin) => skin.labels().title,
        }
    }
}

impl std::fmt::Display for DecisionProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DecisionProtocol {
    type Err = DomainError;

    /// Accepts identifiers (`ranked_choice`) as well as display names
    /// (`Ranked Choice`, `Judge & Jury`, `The Retirement Lounge`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        let key = key.strip_prefix("the_").unwrap_or(&key);
        match key {
            "none" | "aggregate" | "standard" => Ok(DecisionProtocol::Aggregate),
            "arbiter" | "judge" => Ok(DecisionProtocol::Arbiter),
            "ranked_choice" | "irv" => Ok(DecisionProtocol::RankedChoice),
            "judge_and_jury" | "jury" => Ok(DecisionProtocol::JudgeAndJury),
            "fight_to_the_death" | "battle_royale" => {
                Ok(DecisionProtocol::Elimination(EliminationSkin::BattleRoyale))
            }
            "retirement_lounge" => Ok(DecisionProtocol::Elimination(
                EliminationSkin::RetirementLounge,
            )),
            _ => Err(DomainError::UnknownProtocol(s.to_string())),
        }
    }
}

fn normalize(s: &str) -> String {
    let lowered = s.trim().to_lowercase().replace('&', " and ");
    lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

impl Serialize for DecisionProtocol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DecisionProtocol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
