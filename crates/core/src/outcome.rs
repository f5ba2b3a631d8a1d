//! Per-finding results of writing review comments.

use crate::{diff::NotInDiff, errors::CommenterError, existing::PostedComment, finding::Finding};

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;

/// Why a finding was not placed on the pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The finding's lines are not part of the diff as read at session start.
    NotInDiff(NotInDiff),

    /// The platform refused the anchor, e.g. because the lines were force-pushed away.
    RemoteRejected(String),
}

/// The kind of a [`WriteOutcome`], for callers that only need to branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Posted,
    Duplicate,
    Rejected,
    Failed,
}

/// The result of writing one finding.
///
/// Only `Failed` is an error. `Duplicate` and `Rejected` are expected results of
/// re-runs and of findings on lines the pull request does not touch.
#[derive(Debug)]
pub enum WriteOutcome {
    Posted(PostedComment),
    Duplicate,
    Rejected(RejectReason),
    Failed(CommenterError),
}

impl WriteOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            WriteOutcome::Posted(_) => OutcomeKind::Posted,
            WriteOutcome::Duplicate => OutcomeKind::Duplicate,
            WriteOutcome::Rejected(_) => OutcomeKind::Rejected,
            WriteOutcome::Failed(_) => OutcomeKind::Failed,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, WriteOutcome::Failed(_))
    }
}

/// A finding together with what happened to it.
#[derive(Debug)]
pub struct FindingReport {
    pub finding: Finding,
    pub outcome: WriteOutcome,
}

/// The outcomes of a batch of findings, in the order they were processed.
#[derive(Debug, Default)]
pub struct BatchSummary {
    reports: Vec<FindingReport>,
}

impl BatchSummary {
    pub fn push(&mut self, finding: Finding, outcome: WriteOutcome) {
        self.reports.push(FindingReport { finding, outcome });
    }

    pub fn reports(&self) -> &[FindingReport] {
        &self.reports
    }

    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome.kind() == kind)
            .count()
    }

    /// The findings that failed, with the error that caused each failure.
    pub fn failures(&self) -> impl Iterator<Item = (&Finding, &CommenterError)> {
        self.reports.iter().filter_map(|r| match &r.outcome {
            WriteOutcome::Failed(e) => Some((&r.finding, e)),
            _ => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.reports.iter().any(|r| r.outcome.is_failed())
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
