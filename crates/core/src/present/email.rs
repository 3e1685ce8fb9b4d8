use crate::domain::report::AnalysisReport;
use serde::Serialize;
use std::fmt::Write;

const SEPARATOR: &str = "----------------------------------------";
const DISCLAIMER: &str = "*本信件由 AI 生成，僅供研究參考，非投資建議。*";

/// Plain-text email draft derived from a report. Same report, same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    pub fn from_report(report: &AnalysisReport) -> Self {
        Self {
            subject: format!("台股 AI 每日分析報告 - {}", report.date),
            body: render_body(report),
        }
    }

    /// `mailto:` link with percent-encoded subject and body and no recipient.
    pub fn mailto_url(&self) -> String {
        format!(
            "mailto:?subject={}&body={}",
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

fn render_body(report: &AnalysisReport) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "【每日台股 AI 趨勢快報】 {}\n", report.date);
    let _ = writeln!(body, "市場情緒概況：\n{}\n", report.market_sentiment);
    let _ = writeln!(body, "{SEPARATOR}");
    let _ = writeln!(body, "今日精選 10 檔潛力股：\n");

    for (idx, stock) in report.stocks.iter().enumerate() {
        let _ = writeln!(body, "{}. {} ({}) - {}", idx + 1, stock.name, stock.code, stock.price);
        let _ = writeln!(body, "   理由: {}", stock.reason);
        let _ = writeln!(
            body,
            "   訊號: Tech[{}] / Chip[{}]\n",
            stock.technical_signal, stock.chip_signal
        );
    }

    let _ = writeln!(body, "{SEPARATOR}");
    let _ = writeln!(body, "資料來源 (Gemini Search Grounding)：");
    for source in &report.sources {
        let _ = writeln!(body, "- {source}");
    }

    let _ = writeln!(body, "\n{DISCLAIMER}");
    body
}
