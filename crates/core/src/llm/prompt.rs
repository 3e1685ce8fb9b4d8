use crate::domain::report::RiskLevel;
use serde_json::{json, Value};

pub fn system_instruction() -> String {
    [
        "You are an expert Taiwan Stock Market Analyst (AI Financial Assistant).",
        "Your goal is to identify 10 promising stocks based on technical analysis (moving averages, MACD, RSI) and chip analysis (institutional buying, insider moves) from the last 3 months.",
        "",
        "You MUST use the 'googleSearch' tool to find the most recent market data, news, and analyst reports for the Taiwan Stock Exchange (TWSE/TPEX).",
        "",
        "Strictly Output JSON format.",
        "Do not provide investment advice; provide educational analysis only.",
        "Use Traditional Chinese (繁體中文).",
    ]
    .join("\n")
}

pub fn task_prompt() -> String {
    [
        "請搜尋台灣股市最近三個月的熱門股票資訊。",
        "",
        "請幫我篩選出 10 檔「技術面強勢」（例如均線多頭排列、MACD 黃金交叉）或「籌碼面優良」（外資投信連續買超）的潛力上漲股票。",
        "",
        "對於每一檔股票，請提供：",
        "1. 股票代號 (Code)",
        "2. 股票名稱 (Name)",
        "3. 近期參考價格 (Price)",
        "4. 產業類別 (Sector)",
        "5. 看好理由 (Reason - 請詳細說明技術或籌碼面依據)",
        "6. 主要技術指標訊號 (Technical Signal)",
        "7. 主要籌碼訊號 (Chip Signal)",
        "8. 風險等級 (Risk Level - High/Medium/Low)",
        "",
        "同時，請總結一段目前的大盤市場情緒 (Market Sentiment)。",
    ]
    .join("\n")
}

/// Gemini `responseSchema` (OpenAPI subset, upper-case type names).
///
/// Item-level `required` is only a hint to the model; parsing does not
/// enforce it.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "marketSentiment": {
                "type": "STRING",
                "description": "Overview of current market trend"
            },
            "stocks": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "code": {"type": "STRING"},
                        "name": {"type": "STRING"},
                        "price": {"type": "STRING"},
                        "sector": {"type": "STRING"},
                        "reason": {"type": "STRING"},
                        "technicalSignal": {"type": "STRING"},
                        "chipSignal": {"type": "STRING"},
                        "riskLevel": {"type": "STRING", "enum": RiskLevel::KNOWN}
                    },
                    "required": ["code", "name", "reason", "technicalSignal", "chipSignal"]
                }
            }
        },
        "required": ["marketSentiment", "stocks"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_restricts_risk_level_to_three_tiers() {
        let schema = response_schema();
        let risk = &schema["properties"]["stocks"]["items"]["properties"]["riskLevel"];
        assert_eq!(risk["enum"], json!(["High", "Medium", "Low"]));
    }

    #[test]
    fn schema_declares_all_eight_fields() {
        let schema = response_schema();
        let props = schema["properties"]["stocks"]["items"]["properties"]
            .as_object()
            .unwrap();
        assert_eq!(props.len(), 8);
        for key in ["code", "name", "price", "sector", "reason", "technicalSignal", "chipSignal"] {
            assert_eq!(props[key]["type"], json!("STRING"), "{key}");
        }
    }

    #[test]
    fn prompts_mention_search_and_ten_picks() {
        assert!(system_instruction().contains("googleSearch"));
        assert!(system_instruction().contains("last 3 months"));
        assert!(task_prompt().contains("10 檔"));
        assert!(task_prompt().contains("Market Sentiment"));
    }
}
