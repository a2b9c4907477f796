//! Overlap resolution for detected entities

use std::cmp::Ordering;

use crate::entity::DetectedEntity;
use crate::priority::entity_priority;

/// Order two entities by type priority, then score, then span length
pub fn compare_priority(a: &DetectedEntity, b: &DetectedEntity) -> Ordering {
    entity_priority(&a.entity_type)
        .cmp(&entity_priority(&b.entity_type))
        .then_with(|| a.score.total_cmp(&b.score))
        .then_with(|| a.span_len().cmp(&b.span_len()))
}

/// Reduce possibly overlapping detections to a non-overlapping set.
///
/// Candidates are scanned by start offset. A candidate overlapping already
/// accepted entities replaces them only when it outranks every one of them;
/// on a tie the accepted entity stays. The result is sorted by start and
/// does not depend on the order of `entities`.
pub fn resolve_conflicts(entities: &[DetectedEntity]) -> Vec<DetectedEntity> {
    let mut candidates = entities.to_vec();
    candidates.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| compare_priority(b, a))
            .then_with(|| a.entity_type.cmp(&b.entity_type))
            .then_with(|| a.end.cmp(&b.end))
    });

    let mut accepted: Vec<DetectedEntity> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let mut overlapping = accepted.iter().filter(|e| e.overlaps(&candidate)).peekable();

        if overlapping.peek().is_none() {
            accepted.push(candidate);
            continue;
        }

        let wins = overlapping.all(|e| compare_priority(&candidate, e) == Ordering::Greater);
        if wins {
            accepted.retain(|e| !e.overlaps(&candidate));
            accepted.push(candidate);
        }
    }

    accepted.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));
    accepted
}
