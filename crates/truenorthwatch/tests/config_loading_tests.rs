//! Table-driven tests for configuration loading and validation.

use std::io::Write;

use truenorthwatch::config::{load_config, load_config_from_str, ScorerKind};
use truenorthwatch::stance::ScoringFailurePolicy;
use truenorthwatch::ConfigError;

/// Represents a single config loading test case.
struct ConfigTestCase {
    /// Test case name for identification.
    name: &'static str,
    /// The config JSON content to test.
    config_json: &'static str,
    /// Whether loading should succeed.
    should_succeed: bool,
    /// Expected error substring (if should_succeed is false).
    expected_error: Option<&'static str>,
}

const JSON_CONFIG_TESTS: &[ConfigTestCase] = &[
    ConfigTestCase {
        name: "valid_minimal",
        config_json: r#"{ "version": "1.0" }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "valid_full",
        config_json: r#"{
            "version": "1.0",
            "database_path": "/var/lib/truenorthwatch/stances.db",
            "fetch": {
                "url_template": "https://{party}.ca/platform/{year}",
                "use_archive": true,
                "archive_template": "https://web.archive.org/web/{year}*/{url}",
                "timeout_secs": 15,
                "user_agent": "test-agent"
            },
            "scorer": {
                "kind": "http",
                "endpoint": "https://api-inference.example.com/models/sentiment",
                "api_token_env": "HF_TOKEN",
                "timeout_secs": 20,
                "max_retries": 2
            },
            "pipeline": {
                "fetch_timeout_secs": 30,
                "scoring_timeout_secs": 90,
                "on_scoring_failure": "neutral"
            }
        }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "missing_version",
        config_json: r#"{ "fetch": { "use_archive": false } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "unsupported_version",
        config_json: r#"{ "version": "2.0" }"#,
        should_succeed: false,
        expected_error: Some("Unsupported config version"),
    },
    ConfigTestCase {
        name: "unknown_top_level_field",
        config_json: r#"{ "version": "1.0", "workers": 4 }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "unknown_scorer_kind",
        config_json: r#"{ "version": "1.0", "scorer": { "kind": "oracle" } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "http_scorer_without_endpoint",
        config_json: r#"{ "version": "1.0", "scorer": { "kind": "http" } }"#,
        should_succeed: false,
        expected_error: Some("scorer.endpoint is required"),
    },
    ConfigTestCase {
        name: "url_template_without_year",
        config_json: r#"{ "version": "1.0", "fetch": { "url_template": "https://{party}.ca/platform" } }"#,
        should_succeed: false,
        expected_error: Some("must contain '{year}'"),
    },
    ConfigTestCase {
        name: "archive_template_without_url",
        config_json: r#"{ "version": "1.0", "fetch": { "archive_template": "https://web.archive.org/{year}" } }"#,
        should_succeed: false,
        expected_error: Some("must contain '{url}'"),
    },
    ConfigTestCase {
        name: "zero_timeout",
        config_json: r#"{ "version": "1.0", "pipeline": { "fetch_timeout_secs": 0 } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "excessive_max_retries",
        config_json: r#"{ "version": "1.0", "scorer": { "kind": "lexicon", "max_retries": 64 } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "unknown_failure_policy",
        config_json: r#"{ "version": "1.0", "pipeline": { "on_scoring_failure": "retry" } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "malformed_json",
        config_json: r#"{ "version": "1.0", "#,
        should_succeed: false,
        expected_error: Some("Failed to parse config JSON"),
    },
];

#[test]
fn test_json_config_loading() {
    for test_case in JSON_CONFIG_TESTS {
        let result = load_config_from_str(test_case.config_json);

        if test_case.should_succeed {
            assert!(
                result.is_ok(),
                "Test '{}': Expected success but got error: {:?}",
                test_case.name,
                result.err()
            );
        } else {
            let err = match result {
                Ok(_) => panic!("Test '{}': Expected failure but succeeded", test_case.name),
                Err(e) => e.to_string(),
            };
            if let Some(expected) = test_case.expected_error {
                assert!(
                    err.contains(expected),
                    "Test '{}': Expected error containing '{}', got '{}'",
                    test_case.name,
                    expected,
                    err
                );
            }
        }
    }
}

#[test]
fn test_full_config_values() {
    let config = load_config_from_str(JSON_CONFIG_TESTS[1].config_json).unwrap();

    assert_eq!(
        config.database_path.as_deref(),
        Some("/var/lib/truenorthwatch/stances.db")
    );
    assert_eq!(config.fetch.timeout_secs, 15);
    assert_eq!(config.scorer.kind, ScorerKind::Http);
    assert_eq!(config.scorer.api_token_env.as_deref(), Some("HF_TOKEN"));
    assert_eq!(config.scorer.max_retries, 2);
    assert_eq!(config.pipeline.scoring_timeout_secs, 90);
    assert_eq!(
        config.pipeline.on_scoring_failure,
        ScoringFailurePolicy::Neutral
    );
}

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "version": "1.0", "fetch": {{ "use_archive": false }} }}"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert!(!config.fetch.use_archive);
    assert_eq!(config.scorer.kind, ScorerKind::Lexicon);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = load_config(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}
