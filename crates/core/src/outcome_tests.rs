use super::*;
use crate::fingerprint::Fingerprint;
use pr_commenter_developer_platforms::errors::Error;

fn posted(path: &str) -> WriteOutcome {
    WriteOutcome::Posted(PostedComment {
        path: path.to_string(),
        start_line: 1,
        end_line: 1,
        fingerprint: Fingerprint::of("X"),
        position: Some(1),
        id: Some(1),
        commit_id: Some("abc123".to_string()),
    })
}

#[test]
fn test_outcome_kind() {
    assert_eq!(posted("main.tf").kind(), OutcomeKind::Posted);
    assert_eq!(WriteOutcome::Duplicate.kind(), OutcomeKind::Duplicate);
    assert_eq!(
        WriteOutcome::Rejected(RejectReason::NotInDiff(NotInDiff::OutsideHunks)).kind(),
        OutcomeKind::Rejected
    );
    assert_eq!(
        WriteOutcome::Failed(Error::RateLimitExceeded.into()).kind(),
        OutcomeKind::Failed
    );
}

#[test]
fn test_batch_summary_counts_and_failures() {
    let mut summary = BatchSummary::default();
    summary.push(Finding::new("a.tf", 1, 1, "X"), posted("a.tf"));
    summary.push(Finding::new("b.tf", 2, 2, "X"), WriteOutcome::Duplicate);
    summary.push(
        Finding::new("c.tf", 3, 3, "X"),
        WriteOutcome::Failed(Error::ApiError("Server Error".to_string()).into()),
    );
    summary.push(
        Finding::new("d.tf", 4, 4, "X"),
        WriteOutcome::Rejected(RejectReason::RemoteRejected("outside".to_string())),
    );

    assert_eq!(summary.len(), 4);
    assert_eq!(summary.count(OutcomeKind::Posted), 1);
    assert_eq!(summary.count(OutcomeKind::Duplicate), 1);
    assert_eq!(summary.count(OutcomeKind::Rejected), 1);
    assert_eq!(summary.count(OutcomeKind::Failed), 1);
    assert!(summary.has_failures());

    let failures: Vec<&str> = summary.failures().map(|(f, _)| f.path.as_str()).collect();
    assert_eq!(failures, vec!["c.tf"]);
}

#[test]
fn test_empty_batch_summary_has_no_failures() {
    let summary = BatchSummary::default();

    assert!(summary.is_empty());
    assert!(!summary.has_failures());
    assert_eq!(summary.failures().count(), 0);
}
