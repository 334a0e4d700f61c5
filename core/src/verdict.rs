//! Verdicts, regions, and the typed outcome every check returns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a decision. Declaration order is the severity order,
/// so `Ord` gives `Allowed < ManualProcessing < Prohibited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Allowed,
    ManualProcessing,
    Prohibited,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [
        Verdict::Allowed,
        Verdict::ManualProcessing,
        Verdict::Prohibited,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Allowed          => "ALLOWED",
            Verdict::ManualProcessing => "MANUAL_PROCESSING",
            Verdict::Prohibited       => "PROHIBITED",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verdict::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown verdict '{s}'"))
    }
}

/// World region a transaction originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Eap,  // East Asia and Pacific
    Eca,  // Europe and Central Asia
    Hic,  // High-Income countries
    Lac,  // Latin America and the Caribbean
    Mena, // Middle East and North Africa
    Sa,   // South Asia
    Ssa,  // Sub-Saharan Africa
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Eap,
        Region::Eca,
        Region::Hic,
        Region::Lac,
        Region::Mena,
        Region::Sa,
        Region::Ssa,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Eap  => "EAP",
            Region::Eca  => "ECA",
            Region::Hic  => "HIC",
            Region::Lac  => "LAC",
            Region::Mena => "MENA",
            Region::Sa   => "SA",
            Region::Ssa  => "SSA",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown region '{s}'"))
    }
}

/// Why a check fired. The string form is what callers see in `info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReasonTag {
    Amount,
    CardNumber,
    Ip,
    IpCorrelation,
    RegionCorrelation,
}

impl ReasonTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonTag::Amount            => "amount",
            ReasonTag::CardNumber        => "card-number",
            ReasonTag::Ip                => "ip",
            ReasonTag::IpCorrelation     => "ip-correlation",
            ReasonTag::RegionCorrelation => "region-correlation",
        }
    }
}

impl fmt::Display for ReasonTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub verdict: Verdict,
    pub reason: ReasonTag,
}

impl CheckOutcome {
    pub fn new(verdict: Verdict, reason: ReasonTag) -> Self {
        Self { verdict, reason }
    }
}

/// Fold a set of outcomes into the final verdict and its `info` string.
///
/// The verdict is the maximum severity observed. Only checks that reached
/// that severity contribute their tag; an `Allowed` result reports `"none"`.
pub fn combine(outcomes: &[CheckOutcome]) -> (Verdict, String) {
    let verdict = outcomes
        .iter()
        .map(|o| o.verdict)
        .max()
        .unwrap_or(Verdict::Allowed);

    if verdict == Verdict::Allowed {
        return (verdict, "none".to_string());
    }

    let mut tags: Vec<&'static str> = outcomes
        .iter()
        .filter(|o| o.verdict == verdict)
        .map(|o| o.reason.as_str())
        .collect();
    tags.sort_unstable();
    tags.dedup();

    (verdict, tags.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_order_is_declaration_order() {
        assert!(Verdict::Allowed < Verdict::ManualProcessing);
        assert!(Verdict::ManualProcessing < Verdict::Prohibited);
    }

    #[test]
    fn verdict_tokens_round_trip_through_serde() {
        let json = serde_json::to_string(&Verdict::ManualProcessing).unwrap();
        assert_eq!(json, "\"MANUAL_PROCESSING\"");
        let region: Region = serde_json::from_str("\"MENA\"").unwrap();
        assert_eq!(region, Region::Mena);
        assert!("NORTH".parse::<Region>().is_err());
    }

    #[test]
    fn combine_only_reports_tags_at_final_severity() {
        let outcomes = [
            CheckOutcome::new(Verdict::ManualProcessing, ReasonTag::Amount),
            CheckOutcome::new(Verdict::Prohibited, ReasonTag::Ip),
            CheckOutcome::new(Verdict::Allowed, ReasonTag::CardNumber),
            CheckOutcome::new(Verdict::Prohibited, ReasonTag::IpCorrelation),
            CheckOutcome::new(Verdict::ManualProcessing, ReasonTag::RegionCorrelation),
        ];
        let (verdict, info) = combine(&outcomes);
        assert_eq!(verdict, Verdict::Prohibited);
        assert_eq!(info, "ip, ip-correlation");
    }

    #[test]
    fn combine_sorts_lexicographically_and_dedups() {
        let outcomes = [
            CheckOutcome::new(Verdict::ManualProcessing, ReasonTag::RegionCorrelation),
            CheckOutcome::new(Verdict::ManualProcessing, ReasonTag::Amount),
            CheckOutcome::new(Verdict::ManualProcessing, ReasonTag::Amount),
        ];
        assert_eq!(
            combine(&outcomes),
            (Verdict::ManualProcessing, "amount, region-correlation".to_string())
        );
    }

    #[test]
    fn all_allowed_reports_none() {
        let outcomes = [
            CheckOutcome::new(Verdict::Allowed, ReasonTag::Amount),
            CheckOutcome::new(Verdict::Allowed, ReasonTag::Ip),
        ];
        assert_eq!(combine(&outcomes), (Verdict::Allowed, "none".to_string()));
        assert_eq!(combine(&[]), (Verdict::Allowed, "none".to_string()));
    }
}
