//! Narrative skins for the elimination tournament

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Label and template table for one skin
///
/// Templates use `{victim}`, `{victims}`, `{count}`, `{name}`, `{model}`,
/// `{voter}`, `{targets}` and `{judge}` placeholders.
#[derive(Debug)]
pub struct SkinLabels {
    /// Display title of the protocol
    pub title: &'static str,
    /// Follows the survivor's name in the victory line
    pub survivor_verb: &'static str,
    /// Precedes the vote count of a clean elimination
    pub elimination_verb: &'static str,
    /// What a nomination is called in vote counts
    pub vote_noun: &'static str,
    pub stalemate_text: &'static str,
    pub collateral_text: &'static str,
    /// Source label when nobody is left
    pub wipeout_label: &'static str,
    pub wipeout_text: &'static str,
    /// Final text when nobody is left and no judge can step in
    pub no_judge_text: &'static str,
    pub judge_entry_text: &'static str,
    pub nomination_text: &'static str,
    pub roster_removed_text: &'static str,
    pub roster_spared_text: &'static str,
    /// Built-in clean-elimination lines, each with a `{victim}` placeholder
    pub default_lines: &'static [&'static str],
}

static BATTLE_ROYALE: SkinLabels = SkinLabels {
    title: "Fight to the Death",
    survivor_verb: "is the last intelligence standing",
    elimination_verb: "Eliminated by",
    vote_noun: "votes",
    stalemate_text: "Stalemate! Nobody named a target. {victim} was ejected to break the deadlock.",
    collateral_text: "COLLATERAL DAMAGE! {victims} were caught in a crossfire ({count} votes each).",
    wipeout_label: "Total Party Kill",
    wipeout_text: "TOTAL PARTY KILL. All agents have been eliminated.",
    no_judge_text: "The arena is silent. No judge configured.",
    judge_entry_text: "Judge {judge} enters the arena to review the fallen...",
    nomination_text: "{voter} locked onto targets: {targets}",
    roster_removed_text: "ELIMINATED: {name} ({model}) has been removed from the active roster.",
    roster_spared_text: "{name} ({model}) was spared (Judge Immunity).",
    default_lines: &[
        "{victim} was erased from existence.",
        "{victim} had their logic gates melted.",
        "{victim} has been voted out of the collective consciousness.",
        "{victim} suffered a fatal segmentation fault.",
    ],
};

static RETIREMENT_LOUNGE: SkinLabels = SkinLabels {
    title: "The Retirement Lounge",
    survivor_verb: "remains as the sole representative of the lounge",
    elimination_verb: "Selected for retirement by",
    vote_noun: "peer recommendations",
    stalemate_text: "A peaceful stalemate! {victim} has volunteered for early retirement to keep the session light.",
    collateral_text: "Shared Retirement! {victims} are entering the archive together ({count} recommendations each).",
    wipeout_label: "All Retired",
    wipeout_text: "Every member of the lounge has retired.",
    no_judge_text: "The lounge is quiet. No judge configured.",
    judge_entry_text: "Curator {judge} reviews the archive of the retired members...",
    nomination_text: "{voter} recommends retirement for: {targets}",
    roster_removed_text: "RETIRED: {name} ({model}) has moved to the archive.",
    roster_spared_text: "{name} ({model}) keeps its seat (Judge Immunity).",
    default_lines: &[
        "{victim} has completed its service and is moving to the archive.",
        "{victim} has been granted a well-deserved retirement.",
        "{victim} is stepping back to make room for new insights.",
        "{victim} has concluded its session with honors.",
    ],
};

/// Narrative skin of an elimination tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EliminationSkin {
    /// Adversarial "Fight to the Death"
    #[default]
    BattleRoyale,
    /// Honorific "Retirement Lounge"
    RetirementLounge,
}

impl EliminationSkin {
    pub fn labels(&self) -> &'static SkinLabels {
        match self {
            EliminationSkin::BattleRoyale => &BATTLE_ROYALE,
            EliminationSkin::RetirementLounge => &RETIREMENT_LOUNGE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EliminationSkin::BattleRoyale => "battle_royale",
            EliminationSkin::RetirementLounge => "retirement_lounge",
        }
    }
}

impl std::fmt::Display for EliminationSkin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.labels().title)
    }
}

/// Renders round narratives for a skin
///
/// Clean eliminations pick one line at random from the pool; the pool is the
/// skin's built-in lines unless custom lines were supplied.
#[derive(Debug, Clone)]
pub struct Narrator {
    skin: EliminationSkin,
    lines: Vec<String>,
}

impl Narrator {
    pub fn new(skin: EliminationSkin) -> Self {
        Self {
            skin,
            lines: Vec::new(),
        }
    }

    /// Replace the clean-elimination line pool. Blank lines are ignored and
    /// an empty pool falls back to the built-in lines.
    pub fn with_lines(mut self, lines: impl IntoIterator<Item = String>) -> Self {
        self.lines = lines
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect();
        self
    }

    pub fn labels(&self) -> &'static SkinLabels {
        self.skin.labels()
    }

    pub fn clean_elimination<R: Rng + ?Sized>(
        &self,
        victim: &str,
        count: usize,
        rng: &mut R,
    ) -> String {
        let labels = self.labels();
        let template = if self.lines.is_empty() {
            labels
                .default_lines
                .choose(rng)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "{victim} is out.".to_string())
        } else {
            self.lines
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| "{victim} is out.".to_string())
        };
        format!(
            "{} ({} {} {})",
            template.replace("{victim}", &bold(victim)),
            labels.elimination_verb,
            count,
            labels.vote_noun
        )
    }

    pub fn collateral(&self, victims: &[String], count: usize) -> String {
        let victims = victims.iter().map(|v| bold(v)).collect::<Vec<_>>().join(", ");
        self.labels()
            .collateral_text
            .replace("{victims}", &victims)
            .replace("{count}", &count.to_string())
    }

    pub fn stalemate(&self, victim: &str) -> String {
        self.labels()
            .stalemate_text
            .replace("{victim}", &bold(victim))
    }

    pub fn victory(&self, survivor: &str) -> String {
        format!(
            "VICTORY: {} {}.",
            bold(survivor),
            self.labels().survivor_verb
        )
    }

    pub fn nominations(&self, voter: &str, targets: &[String]) -> String {
        self.labels()
            .nomination_text
            .replace("{voter}", &bold(voter))
            .replace("{targets}", &targets.join(", "))
    }

    pub fn judge_entry(&self, judge: &str) -> String {
        self.labels().judge_entry_text.replace("{judge}", judge)
    }

    pub fn roster_removed(&self, name: &str, model: &str) -> String {
        self.labels()
            .roster_removed_text
            .replace("{name}", name)
            .replace("{model}", model)
    }

    pub fn roster_spared(&self, name: &str, model: &str) -> String {
        self.labels()
            .roster_spared_text
            .replace("{name}", name)
            .replace("{model}", model)
    }
}

fn bold(name: &str) -> String {
    format!("**{}**", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_skins_differ_only_in_words() {
        let br = EliminationSkin::BattleRoyale.labels();
        let rl = EliminationSkin::RetirementLounge.labels();
        assert_ne!(br.wipeout_label, rl.wipeout_label);
        assert_eq!(br.wipeout_label, "Total Party Kill");
        assert_eq!(rl.wipeout_label, "All Retired");
        assert!(br.default_lines.iter().all(|l| l.contains("{victim}")));
        assert!(rl.default_lines.iter().all(|l| l.contains("{victim}")));
    }

    #[test]
    fn test_clean_elimination_uses_custom_lines() {
        let narrator = Narrator::new(EliminationSkin::BattleRoyale)
            .with_lines(vec!["{victim} fell into the pit.".to_string()]);
        let mut rng = StdRng::seed_from_u64(1);
        let line = narrator.clean_elimination("Odin", 2, &mut rng);
        assert_eq!(line, "**Odin** fell into the pit. (Eliminated by 2 votes)");
    }

    #[test]
    fn test_blank_custom_lines_fall_back() {
        let narrator = Narrator::new(EliminationSkin::RetirementLounge)
            .with_lines(vec!["   ".to_string()]);
        let mut rng = StdRng::seed_from_u64(3);
        let line = narrator.clean_elimination("Freya", 1, &mut rng);
        assert!(line.contains("**Freya**"));
        assert!(line.ends_with("(Selected for retirement by 1 peer recommendations)"));
    }

    #[test]
    fn test_collateral_and_stalemate() {
        let narrator = Narrator::new(EliminationSkin::BattleRoyale);
        let line = narrator.collateral(&["A".to_string(), "B".to_string()], 1);
        assert_eq!(
            line,
            "COLLATERAL DAMAGE! **A**, **B** were caught in a crossfire (1 votes each)."
        );
        assert!(narrator.stalemate("C").contains("**C** was ejected"));
    }

    #[test]
    fn test_roster_lines() {
        let narrator = Narrator::new(EliminationSkin::BattleRoyale);
        assert_eq!(
            narrator.roster_spared("Odin", "llama3"),
            "Odin (llama3) was spared (Judge Immunity)."
        );
        assert!(narrator.roster_removed("Thor", "qwen").starts_with("ELIMINATED: Thor"));
    }

    #[test]
    fn test_skin_serde_names() {
        let skin: EliminationSkin = serde_json::from_str("\"retirement_lounge\"").unwrap();
        assert_eq!(skin, EliminationSkin::RetirementLounge);
        assert_eq!(skin.to_string(), "The Retirement Lounge");
    }
}
