//! Dual-path fact extraction: a primary semantic service, with the
//! deterministic heuristics of [`fallback`] whenever it yields no result.

pub mod fallback;
pub mod semantic;

pub use semantic::{LlmSemanticService, SemanticService};

use intake_types::Summary;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Why the primary strategy produced no usable summary
#[derive(Debug, Clone, PartialEq)]
pub enum DegradedReason {
    NotConfigured,
    Timeout(Duration),
    Upstream(String),
    Malformed(String),
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedReason::NotConfigured => write!(f, "semantic service not configured"),
            DegradedReason::Timeout(after) => write!(f, "semantic service timed out after {after:?}"),
            DegradedReason::Upstream(e) => write!(f, "semantic service failed: {e}"),
            DegradedReason::Malformed(e) => write!(f, "semantic service reply unusable: {e}"),
        }
    }
}

/// Outcome of one extraction. Both variants carry a complete summary.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Extracted(Summary),
    Degraded { summary: Summary, reason: DegradedReason },
}

impl Extraction {
    pub fn summary(&self) -> &Summary {
        match self {
            Extraction::Extracted(summary) | Extraction::Degraded { summary, .. } => summary,
        }
    }

    pub fn into_summary(self) -> Summary {
        match self {
            Extraction::Extracted(summary) | Extraction::Degraded { summary, .. } => summary,
        }
    }

    pub fn degraded_reason(&self) -> Option<&DegradedReason> {
        match self {
            Extraction::Extracted(_) => None,
            Extraction::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded_reason().is_some()
    }
}

pub struct FactExtractor {
    service: Option<Arc<dyn SemanticService>>,
    timeout: Duration,
}

impl FactExtractor {
    pub fn new(service: Option<Arc<dyn SemanticService>>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    /// Extractor that always runs the deterministic heuristics
    pub fn fallback_only() -> Self {
        Self::new(None, Duration::ZERO)
    }

    pub fn has_primary(&self) -> bool {
        self.service.is_some()
    }

    /// Never fails: any primary-path problem becomes `Extraction::Degraded`
    pub async fn extract(&self, raw_text: &str, document_names: &[String]) -> Extraction {
        let Some(service) = &self.service else {
            return self.degrade(raw_text, document_names, DegradedReason::NotConfigured);
        };

        let prompt = semantic::build_prompt(raw_text, document_names);
        let schema = semantic::summary_schema();

        let reply = match tokio::time::timeout(self.timeout, service.complete(&prompt, &schema)).await
        {
            Err(_) => {
                return self.degrade(raw_text, document_names, DegradedReason::Timeout(self.timeout))
            }
            Ok(Err(e)) => {
                return self.degrade(
                    raw_text,
                    document_names,
                    DegradedReason::Upstream(format!("{e:#}")),
                )
            }
            Ok(Ok(reply)) => reply,
        };

        match semantic::parse_summary(&reply, document_names) {
            Ok(summary) => Extraction::Extracted(summary),
            Err(e) => self.degrade(
                raw_text,
                document_names,
                DegradedReason::Malformed(format!("{e:#}")),
            ),
        }
    }

    fn degrade(&self, raw_text: &str, document_names: &[String], reason: DegradedReason) -> Extraction {
        if reason == DegradedReason::NotConfigured {
            tracing::debug!("Using fallback extraction; no semantic service configured");
        } else {
            tracing::warn!(reason = %reason, "Extraction degraded to fallback heuristics");
        }

        Extraction::Degraded {
            summary: fallback::extract(raw_text, document_names),
            reason,
        }
    }
}
