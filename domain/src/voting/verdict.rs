//! Judge verdict parsing
//!
//! The judge is asked to answer with exactly one word, UPHOLD or OVERTURN.
//! Matching is by substring on the uppercased response.

use serde::{Deserialize, Serialize};

/// A judge's ruling on the jury's recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Uphold,
    Overturn,
    /// Neither keyword, or both
    Ambiguous,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Uphold => "UPHOLD",
            Verdict::Overturn => "OVERTURN",
            Verdict::Ambiguous => "AMBIGUOUS",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a judge response into a [`Verdict`].
///
/// # Examples
///
/// ```
/// use conclave_domain::{parse_verdict, Verdict};
///
/// assert_eq!(parse_verdict("uphold"), Verdict::Uphold);
/// assert_eq!(parse_verdict("I must OVERTURN this."), Verdict::Overturn);
/// assert_eq!(parse_verdict("Hmm, hard to say."), Verdict::Ambiguous);
/// ```
pub fn parse_verdict(response: &str) -> Verdict {
    let upper = response.trim().to_uppercase();
    let uphold = upper.contains("UPHOLD");
    let overturn = upper.contains("OVERTURN");

    match (uphold, overturn) {
        (true, false) => Verdict::Uphold,
        (false, true) => Verdict::Overturn,
        _ => Verdict::Ambiguous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_keywords() {
        assert_eq!(parse_verdict("UPHOLD"), Verdict::Uphold);
        assert_eq!(parse_verdict("OVERTURN"), Verdict::Overturn);
    }

    #[test]
    fn test_case_and_surrounding_text() {
        assert_eq!(parse_verdict("  Upheld? I Uphold.\n"), Verdict::Uphold);
        assert_eq!(parse_verdict("**overturn**"), Verdict::Overturn);
    }

    #[test]
    fn test_both_keywords_is_ambiguous() {
        assert_eq!(
            parse_verdict("I would not OVERTURN, I UPHOLD"),
            Verdict::Ambiguous
        );
    }

    #[test]
    fn test_no_keyword_is_ambiguous() {
        assert_eq!(parse_verdict(""), Verdict::Ambiguous);
        assert_eq!(parse_verdict("The jury chose well."), Verdict::Ambiguous);
        assert_ne!(parse_verdict("maybe"), Verdict::Uphold);
    }
}
