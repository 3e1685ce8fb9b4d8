//! Pure renderings of an [`AnalysisReport`](crate::domain::report::AnalysisReport).

pub mod card;
pub mod email;
