use crate::domain::contract::ModelAnalysisPayload;
use crate::llm::error::AnalysisError;

/// Parses the model's text payload.
///
/// The endpoint is asked for `application/json`, so the text is decoded as-is:
/// no fence stripping or repair. Item fields are lenient, the two top-level
/// keys are not.
pub fn parse_payload(text: &str) -> Result<ModelAnalysisPayload, AnalysisError> {
    if text.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    Ok(serde_json::from_str::<ModelAnalysisPayload>(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::RiskLevel;
    use serde_json::json;

    #[test]
    fn parses_valid_payload() {
        let text = json!({
            "marketSentiment": "盤勢偏多",
            "stocks": [{
                "code": "2330",
                "name": "台積電",
                "price": "600",
                "sector": "半導體",
                "reason": "...",
                "technicalSignal": "MACD黃金交叉",
                "chipSignal": "外資買超",
                "riskLevel": "Low",
            }],
        })
        .to_string();

        let payload = parse_payload(&text).unwrap();
        assert_eq!(payload.market_sentiment, "盤勢偏多");
        assert_eq!(payload.stocks.len(), 1);
        assert_eq!(payload.stocks[0].risk_level, RiskLevel::Low);
    }

    #[test]
    fn rejects_non_json_text() {
        let err = parse_payload("今日盤勢偏多，建議觀察台積電").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn rejects_fenced_json() {
        let err = parse_payload("```json\n{\"marketSentiment\":\"x\",\"stocks\":[]}\n```").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn rejects_missing_top_level_keys() {
        let err = parse_payload("{\"marketSentiment\":\"x\"}").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn empty_text_is_empty_response() {
        let err = parse_payload("").unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyResponse));
    }

    #[test]
    fn whitespace_only_is_a_parse_failure() {
        let err = parse_payload("  \n").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn keeps_unknown_risk_level() {
        let text = json!({
            "marketSentiment": "x",
            "stocks": [{"code": "3008", "name": "大立光", "riskLevel": "Extreme"}],
        })
        .to_string();

        let payload = parse_payload(&text).unwrap();
        assert_eq!(
            payload.stocks[0].risk_level,
            RiskLevel::Unrecognized("Extreme".to_string())
        );
    }
}
