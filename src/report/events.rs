use std::fmt;

use tracing::{info, warn};

/// A recoverable condition met while scoring.
///
/// Scoring code reports these instead of logging, so substitutions stay
/// visible to the operator without making the run fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringEvent {
    FuzzyMatched {
        query: String,
        matched: String,
        score: f64,
    },
    DefaultRecordUsed {
        meal: String,
    },
    PreferenceSubstituted {
        given: String,
    },
    SampleDatasetCreated {
        path: String,
    },
    VisitLogMissing {
        path: String,
    },
    KnowledgeBaseDiscarded {
        path: String,
        reason: String,
    },
    LookupMissed {
        query: String,
    },
    PlaceholderSkipped {
        meal: String,
    },
}

impl fmt::Display for ScoringEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringEvent::FuzzyMatched {
                query,
                matched,
                score,
            } => write!(f, "Matched '{}' with '{}' ({:.1})", query, matched, score),
            ScoringEvent::DefaultRecordUsed { meal } => {
                write!(f, "No match found for '{}', using defaults", meal)
            }
            ScoringEvent::PreferenceSubstituted { given } => {
                write!(f, "Invalid preference '{}'. Using 'balanced' as default.", given)
            }
            ScoringEvent::SampleDatasetCreated { path } => {
                write!(f, "Sample dining halls CSV created at '{}'", path)
            }
            ScoringEvent::VisitLogMissing { path } => write!(
                f,
                "Dining visits CSV '{}' not found. Using neutral variety and recency.",
                path
            ),
            ScoringEvent::KnowledgeBaseDiscarded { path, reason } => write!(
                f,
                "Discarded nutrition database '{}': {}",
                path, reason
            ),
            ScoringEvent::LookupMissed { query } => {
                write!(f, "No nutrients found for '{}'", query)
            }
            ScoringEvent::PlaceholderSkipped { meal } => {
                write!(f, "Skipped placeholder menu entry '{}'", meal)
            }
        }
    }
}

/// Receives scoring events.
pub trait EventSink {
    fn record(&mut self, event: ScoringEvent);
}

/// Collects events for the end-of-run summary and logs each one.
#[derive(Debug, Default)]
pub struct RunSummary {
    events: Vec<ScoringEvent>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ScoringEvent] {
        &self.events
    }

    fn count(&self, pred: impl Fn(&ScoringEvent) -> bool) -> usize {
        self.events.iter().filter(|&e| pred(e)).count()
    }

    /// Meals that fell back to the default record.
    pub fn unmatched_meals(&self) -> usize {
        self.count(|e| matches!(e, ScoringEvent::DefaultRecordUsed { .. }))
    }

    pub fn fuzzy_matches(&self) -> usize {
        self.count(|e| matches!(e, ScoringEvent::FuzzyMatched { .. }))
    }

    pub fn substituted_preferences(&self) -> usize {
        self.count(|e| matches!(e, ScoringEvent::PreferenceSubstituted { .. }))
    }

    /// Missing or corrupt input files that were replaced by a fallback.
    pub fn file_fallbacks(&self) -> usize {
        self.count(|e| {
            matches!(
                e,
                ScoringEvent::SampleDatasetCreated { .. }
                    | ScoringEvent::VisitLogMissing { .. }
                    | ScoringEvent::KnowledgeBaseDiscarded { .. }
            )
        })
    }

    pub fn lookup_misses(&self) -> usize {
        self.count(|e| matches!(e, ScoringEvent::LookupMissed { .. }))
    }

    pub fn skipped_placeholders(&self) -> usize {
        self.count(|e| matches!(e, ScoringEvent::PlaceholderSkipped { .. }))
    }
}

impl EventSink for RunSummary {
    fn record(&mut self, event: ScoringEvent) {
        match &event {
            ScoringEvent::FuzzyMatched { .. } | ScoringEvent::PlaceholderSkipped { .. } => {
                info!("{}", event)
            }
            _ => warn!("{}", event),
        }
        self.events.push(event);
    }
}
