//! The run-wide collection of session outcomes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::PipelineConfig;

use super::models::{FALLBACK_DATE, OmissionReason, SessionOutcome, SessionRecord};
use super::pipeline::process_session;

/// Session outcomes in processing order.
///
/// Outcomes can only be appended; an outcome is never changed once added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    sessions: Vec<SessionOutcome>,
}

/// Totals over a whole transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranscriptStats {
    pub sessions: usize,
    /// Accepted blocks, session headers excluded.
    pub blocks: usize,
    pub omissions: BTreeMap<OmissionReason, usize>,
}

impl TranscriptStats {
    pub fn total_omitted(&self) -> usize {
        self.omissions.values().sum()
    }

    pub fn omitted(&self, reason: OmissionReason) -> usize {
        self.omissions.get(&reason).copied().unwrap_or(0)
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: SessionOutcome) {
        self.sessions.push(outcome);
    }

    pub fn outcomes(&self) -> &[SessionOutcome] {
        &self.sessions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SessionOutcome> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Returns `true` if any session omitted at least one message.
    pub fn has_omissions(&self) -> bool {
        self.sessions.iter().any(SessionOutcome::has_omissions)
    }

    /// `"Sessions 1 - N"`, or `None` for an empty transcript.
    pub fn session_range_label(&self) -> Option<String> {
        (!self.is_empty()).then(|| format!("Sessions 1 - {}", self.len()))
    }

    /// `"<first date> - <last date>"`, using the fallback label for sessions
    /// without a date.
    pub fn date_range_label(&self) -> Option<String> {
        let first = self.sessions.first()?;
        let last = self.sessions.last()?;
        Some(format!("{} - {}", first.date_label(), last.date_label()))
    }

    pub fn stats(&self) -> TranscriptStats {
        let mut stats = TranscriptStats {
            sessions: self.len(),
            ..TranscriptStats::default()
        };
        for outcome in &self.sessions {
            stats.blocks += outcome.blocks.len().saturating_sub(1);
            for omission in &outcome.omissions {
                *stats.omissions.entry(omission.reason).or_insert(0) += 1;
            }
        }
        stats
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a SessionOutcome;
    type IntoIter = std::slice::Iter<'a, SessionOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Processes every session in order. Sessions are numbered from 1.
pub fn build_transcript(sessions: &[SessionRecord], config: &PipelineConfig) -> Transcript {
    let mut transcript = Transcript::new();
    for (i, session) in sessions.iter().enumerate() {
        transcript.push(process_session(i + 1, session, config));
    }
    transcript
}

/// Label shown in place of a missing date range.
pub fn fallback_range() -> String {
    format!("{FALLBACK_DATE} - {FALLBACK_DATE}")
}
