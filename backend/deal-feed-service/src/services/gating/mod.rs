use crate::models::{Candidate, RawCandidate};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct GateOutcome {
    pub candidates: Vec<Candidate>,
    pub dropped_malformed: usize,
    pub dropped_blocked: usize,
}

/// Content gate - drops blocked and malformed rows, keeps retrieval order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentGate;

impl ContentGate {
    pub fn new() -> Self {
        Self
    }

    pub fn filter(
        &self,
        rows: Vec<Option<RawCandidate>>,
        blocked_deal_ids: &HashSet<String>,
    ) -> GateOutcome {
        let mut outcome = GateOutcome {
            candidates: Vec::with_capacity(rows.len()),
            ..Default::default()
        };

        for row in rows {
            let Some(candidate) = row.and_then(normalize) else {
                outcome.dropped_malformed += 1;
                continue;
            };

            if blocked_deal_ids.contains(&candidate.deal_id) {
                debug!(deal_id = %candidate.deal_id, "Dropping blocked deal");
                outcome.dropped_blocked += 1;
                continue;
            }

            outcome.candidates.push(candidate);
        }

        if outcome.dropped_malformed > 0 {
            warn!(
                dropped = outcome.dropped_malformed,
                "Dropped malformed deal rows at content gate"
            );
        }

        outcome
    }
}

/// `None` when the row lacks an id or title. Bad optional fields are cleared, not fatal.
fn normalize(raw: RawCandidate) -> Option<Candidate> {
    let deal_id = non_blank(raw.deal_id)?;
    let title = non_blank(raw.title)?;

    let distance_miles = raw
        .distance_miles
        .filter(|d| d.is_finite() && *d >= 0.0);

    let created_at = raw
        .created_at
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.with_timezone(&Utc));

    Some(Candidate {
        deal_id,
        title,
        cuisine_id: non_blank(raw.cuisine_id),
        restaurant_id: non_blank(raw.restaurant_id),
        distance_miles,
        created_at,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
