use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Generation date in zh-TW display form, e.g. `2026/10/17`.
    pub date: String,
    pub market_sentiment: String,
    pub stocks: Vec<StockRecommendation>,
    /// Citation URLs, unique, in first-seen order.
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecommendation {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    /// Free text; the model may answer "約 120" instead of a number.
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub technical_signal: String,
    #[serde(default)]
    pub chip_signal: String,
    #[serde(default)]
    pub risk_level: RiskLevel,
}

/// Coarse risk label attached by the model.
///
/// Values outside the three known tiers are kept as-is in `Unrecognized`
/// and round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    Unrecognized(String),
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
            RiskLevel::Unrecognized(raw) => raw,
        }
    }

    pub const KNOWN: [&'static str; 3] = ["High", "Medium", "Low"];
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Unrecognized(String::new())
    }
}

impl From<String> for RiskLevel {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "High" => RiskLevel::High,
            "Medium" => RiskLevel::Medium,
            "Low" => RiskLevel::Low,
            _ => RiskLevel::Unrecognized(raw),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
