use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

const REPORT: &str = r#"{
  "results": [
    {
      "rule_id": "AVD-AWS-0086",
      "long_id": "aws-s3-block-public-acls",
      "legacy_rule_id": "AWS074",
      "rule_description": "S3 Access block should block public ACL",
      "description": "No public access block so not blocking public acls",
      "severity": "HIGH",
      "links": [
        "https://aquasecurity.github.io/tfsec/latest/checks/aws/s3/block-public-acls/",
        "https://registry.terraform.io/providers/hashicorp/aws/latest/docs/resources/s3_bucket_public_access_block"
      ],
      "location": {
        "filename": "/github/workspace/modules/storage/main.tf",
        "start_line": 12,
        "end_line": 15
      }
    },
    {
      "rule_id": "AVD-GEN-0001",
      "description": "Sensitive value in variable default",
      "severity": "MEDIUM",
      "location": {
        "filename": "variables.tf",
        "start_line": 3,
        "end_line": 3
      }
    }
  ]
}"#;

fn result() -> TfsecResult {
    TfsecResult {
        rule_id: "AVD-AWS-0086".to_string(),
        legacy_rule_id: "AWS074".to_string(),
        description: "No public access block so not blocking public acls".to_string(),
        severity: "HIGH".to_string(),
        links: vec!["https://example.com/aws-s3-block-public-acls".to_string()],
        location: Location {
            filename: "/github/workspace/main.tf".to_string(),
            start_line: 12,
            end_line: 15,
        },
    }
}

#[test]
fn test_parse_report() {
    let results = parse_report(REPORT).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].rule_id, "AVD-AWS-0086");
    assert_eq!(results[0].links.len(), 2);
    assert_eq!(
        results[0].location,
        Location {
            filename: "/github/workspace/modules/storage/main.tf".to_string(),
            start_line: 12,
            end_line: 15,
        }
    );
    assert_eq!(results[1].legacy_rule_id, "");
    assert!(results[1].links.is_empty());
}

#[test]
fn test_parse_report_without_results() {
    assert!(parse_report(r#"{"results": null}"#).unwrap().is_empty());
    assert!(parse_report("{}").unwrap().is_empty());
}

#[test]
fn test_parse_report_rejects_malformed_json() {
    assert!(matches!(
        parse_report("{\"results\": ["),
        Err(CliError::InvalidArguments(_))
    ));
}

#[test]
fn test_comment_body() {
    let body = comment_body(&result());

    assert!(body.starts_with("## result\ntfsec check AVD-AWS-0086 failed.\n"));
    assert!(body.contains("## severity\n⚠️HIGH\n"));
    assert!(body.contains("## reason\nNo public access block so not blocking public acls\n"));
    assert!(body.contains(
        "## how to ignore\n`#tfsec:ignore:AWS074`([refs](https://github.com/aquasecurity/tfsec#ignoring-warnings))\n"
    ));
    assert!(body.ends_with(
        "\nFor more information, [see](https://example.com/aws-s3-block-public-acls)\n"
    ));
}

#[test]
fn test_comment_body_without_links() {
    let body = comment_body(&TfsecResult {
        links: Vec::new(),
        ..result()
    });

    assert!(!body.contains("For more information"));
    assert!(body.contains("## how to ignore"));
}

#[test]
fn test_comment_body_is_stable() {
    assert_eq!(comment_body(&result()), comment_body(&result()));
}

#[test]
fn test_relative_path() {
    assert_eq!(
        relative_path("/github/workspace/main.tf", Some("/github/workspace")),
        "main.tf"
    );
    assert_eq!(
        relative_path("/github/workspace/main.tf", Some("/github/workspace/")),
        "main.tf"
    );
    assert_eq!(
        relative_path("modules/main.tf", Some("/github/workspace")),
        "modules/main.tf"
    );
    assert_eq!(relative_path("/abs/main.tf", None), "/abs/main.tf");
    assert_eq!(relative_path("/abs/main.tf", Some("")), "/abs/main.tf");
}

#[test]
fn test_to_finding() {
    let finding = to_finding(&result(), Some("/github/workspace"));

    assert_eq!(finding.path, "main.tf");
    assert_eq!(finding.start_line, 12);
    assert_eq!(finding.end_line, 15);
    assert_eq!(finding.body, comment_body(&result()));
}

#[test]
fn test_load_findings() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", REPORT).unwrap();

    let findings = load_findings(file.path(), Some("/github/workspace")).unwrap();

    let locations: Vec<(&str, u32, u32)> = findings
        .iter()
        .map(|f| (f.path.as_str(), f.start_line, f.end_line))
        .collect();
    assert_eq!(
        locations,
        vec![("modules/storage/main.tf", 12, 15), ("variables.tf", 3, 3)]
    );
}

#[test]
fn test_load_findings_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    assert!(matches!(
        load_findings(&dir.path().join("results.json"), None),
        Err(CliError::ConfigError(_))
    ));
}
