//! Analysis result: ordered records plus derived counts.

use serde::Serialize;
use staticsocket_core::types::{Direction, FxHashSet};

use super::SocketRecord;

/// Records in discovery order with counts derived from them.
///
/// The counts are never bumped independently: every mutation ends with
/// [`AnalysisResult::recompute_counts`], a full pass over `records`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    records: Vec<SocketRecord>,
    total_count: usize,
    ingress_count: usize,
    egress_count: usize,
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<SocketRecord>) -> Self {
        let mut result = Self {
            records,
            ..Default::default()
        };
        result.recompute_counts();
        result
    }

    /// Append one file's records in order, then recompute counts.
    pub fn merge_file(&mut self, records: impl IntoIterator<Item = SocketRecord>) {
        self.records.extend(records);
        self.recompute_counts();
    }

    pub fn push(&mut self, record: SocketRecord) {
        self.records.push(record);
        self.recompute_counts();
    }

    /// Drop records the predicate rejects.
    pub fn retain(&mut self, keep: impl FnMut(&SocketRecord) -> bool) {
        self.records.retain(keep);
        self.recompute_counts();
    }

    /// Remove repeated detections of the same call site, keeping the first.
    pub fn dedup(&mut self) {
        let mut seen = FxHashSet::default();
        self.records.retain(|r| {
            seen.insert((
                r.source_file.clone(),
                r.source_line,
                r.pattern_id.clone(),
                r.raw_value.clone(),
            ))
        });
        self.recompute_counts();
    }

    /// Recount from scratch. Idempotent.
    pub fn recompute_counts(&mut self) {
        let mut ingress = 0;
        let mut egress = 0;
        for record in &self.records {
            match record.direction {
                Direction::Ingress => ingress += 1,
                Direction::Egress => egress += 1,
            }
        }
        self.total_count = self.records.len();
        self.ingress_count = ingress;
        self.egress_count = egress;
    }

    pub fn records(&self) -> &[SocketRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<SocketRecord> {
        self.records
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn ingress_count(&self) -> usize {
        self.ingress_count
    }

    pub fn egress_count(&self) -> usize {
        self.egress_count
    }

    pub fn resolved_count(&self) -> usize {
        self.records.iter().filter(|r| r.resolved).count()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use staticsocket_core::types::Protocol;

    use super::*;
    use crate::catalog::PatternDescriptor;

    fn record(direction: Direction, line: u32) -> SocketRecord {
        let descriptor = match direction {
            Direction::Ingress => PatternDescriptor::ingress(Protocol::Tcp, 1),
            Direction::Egress => PatternDescriptor::egress(Protocol::Tcp, 1),
        };
        let mut r = SocketRecord::new("net.X", &descriptor);
        r.source_line = line;
        r
    }

    #[test]
    fn test_empty_result_counts() {
        let result = AnalysisResult::new();
        assert_eq!(result.total_count(), 0);
        assert_eq!(result.ingress_count() + result.egress_count(), 0);
    }

    #[test]
    fn test_merge_preserves_order_and_counts() {
        let mut result = AnalysisResult::new();
        result.merge_file(vec![record(Direction::Ingress, 1), record(Direction::Egress, 2)]);
        result.merge_file(vec![record(Direction::Egress, 3)]);

        let lines: Vec<u32> = result.records().iter().map(|r| r.source_line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
        assert_eq!(result.total_count(), 3);
        assert_eq!(result.ingress_count(), 1);
        assert_eq!(result.egress_count(), 2);
    }

    #[test]
    fn test_resolved_count_follows_records() {
        let mut resolved = record(Direction::Ingress, 1);
        assert!(resolved.apply_address(":8080", false));
        let result = AnalysisResult::from_records(vec![resolved, record(Direction::Egress, 2)]);
        assert_eq!(result.resolved_count(), 1);
        assert_eq!(result.total_count(), 2);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut result = AnalysisResult::from_records(vec![record(Direction::Ingress, 1)]);
        let before = result.clone();
        result.recompute_counts();
        result.recompute_counts();
        assert_eq!(result, before);
    }

    #[test]
    fn test_retain_and_dedup_keep_counts_in_sync() {
        let mut result = AnalysisResult::from_records(vec![
            record(Direction::Ingress, 1),
            record(Direction::Ingress, 1),
            record(Direction::Egress, 2),
        ]);
        result.dedup();
        assert_eq!(result.total_count(), 2);
        result.retain(|r| r.is_egress());
        assert_eq!(result.total_count(), 1);
        assert_eq!(result.ingress_count(), 0);
        assert_eq!(result.egress_count(), 1);
    }
}
