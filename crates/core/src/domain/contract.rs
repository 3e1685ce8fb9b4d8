use crate::domain::report::{AnalysisReport, StockRecommendation};
use serde::{Deserialize, Serialize};

/// Number of picks the prompt asks for. Not enforced on the reply.
pub const EXPECTED_PICKS: usize = 10;

/// Shape of the JSON text the model is constrained to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAnalysisPayload {
    pub market_sentiment: String,
    pub stocks: Vec<StockRecommendation>,
}

impl ModelAnalysisPayload {
    /// Stocks are carried over as returned: no truncation, padding or
    /// risk-level normalization.
    pub fn into_report(self, date: String, sources: Vec<String>) -> AnalysisReport {
        if self.stocks.len() != EXPECTED_PICKS {
            tracing::warn!(
                expected = EXPECTED_PICKS,
                got = self.stocks.len(),
                "model returned an unexpected number of picks"
            );
        }

        AnalysisReport {
            date,
            market_sentiment: self.market_sentiment,
            stocks: self.stocks,
            sources,
        }
    }
}
