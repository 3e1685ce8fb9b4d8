use crate::domain::report::{AnalysisReport, RiskLevel, StockRecommendation};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Danger,
    Caution,
    Safe,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskBadge {
    pub label: &'static str,
    pub tone: BadgeTone,
}

impl RiskBadge {
    pub fn for_level(level: &RiskLevel) -> Self {
        match level {
            RiskLevel::High => Self {
                label: "高風險",
                tone: BadgeTone::Danger,
            },
            RiskLevel::Medium => Self {
                label: "中風險",
                tone: BadgeTone::Caution,
            },
            RiskLevel::Low => Self {
                label: "低風險",
                tone: BadgeTone::Safe,
            },
            RiskLevel::Unrecognized(_) => Self {
                label: "風險未評級",
                tone: BadgeTone::Neutral,
            },
        }
    }
}

pub fn render_sentiment_banner(report: &AnalysisReport) -> String {
    format!("市場情緒總結\n{}\n", report.market_sentiment)
}

pub fn render_source_strip(report: &AnalysisReport) -> String {
    let mut out = String::new();
    for (i, source) in report.sources.iter().enumerate() {
        let _ = writeln!(out, "參考來源 {}: {}", i + 1, source);
    }
    out
}

/// `index` is zero-based; cards are numbered from 1.
pub fn render_card(index: usize, stock: &StockRecommendation) -> String {
    let badge = RiskBadge::for_level(&stock.risk_level);
    let mut out = String::new();
    let _ = writeln!(out, "#{} {} {}", index + 1, stock.name, stock.code);
    let _ = writeln!(out, "   產業: {}  價格: {}  [{}]", stock.sector, stock.price, badge.label);
    let _ = writeln!(out, "   {}", stock.reason);
    let _ = writeln!(out, "   技術面訊號: {}", stock.technical_signal);
    let _ = writeln!(out, "   籌碼面訊號: {}", stock.chip_signal);
    out
}

pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = format!("TWStock AI 趨勢獵手  {}\n\n", report.date);
    out.push_str(&render_sentiment_banner(report));

    let strip = render_source_strip(report);
    if !strip.is_empty() {
        out.push('\n');
        out.push_str(&strip);
    }

    for (i, stock) in report.stocks.iter().enumerate() {
        out.push('\n');
        out.push_str(&render_card(i, stock));
    }
    out
}
