//! Tests for argument parsing, dispatch and exit codes

mod common;

use budgetctl::cli::commands::execute_command_to;
use budgetctl::cli::{Cli, CliError, Commands};
use budgetctl::config::Settings;
use budgetctl::exitcode;
use budgetctl::infrastructure::di::ServiceContainer;
use clap::Parser;
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

use common::{Harness, RecordingApi, MODEL_UUID};

fn stub_container(harness: &Harness, settings: Settings) -> ServiceContainer {
    ServiceContainer::with_deps(
        settings,
        harness.resolver.clone(),
        harness.resolver.clone(),
        harness.sessions.clone(),
        harness.api_factory.clone(),
    )
}

fn run(container: &ServiceContainer, argv: &[&str]) -> (Result<(), CliError>, String) {
    let cli = Cli::try_parse_from(argv.iter().copied()).expect("arguments parse");
    let mut out = Vec::new();
    let result = execute_command_to(&cli, container, &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn given_negative_value_when_parsing_update_allocation_then_kept_as_positional() {
    let cli = Cli::try_parse_from(["budgetctl", "update-allocation", "wordpress", "-5"]).unwrap();

    match cli.command {
        Some(Commands::UpdateAllocation { args }) => assert_eq!(args, vec!["wordpress", "-5"]),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_model_flag_after_subcommand_when_parsing_then_global_flag_applies() {
    let cli = Cli::try_parse_from([
        "budgetctl",
        "allocate",
        "b:1",
        "db",
        "-m",
        "prod:default",
        "-vv",
    ])
    .unwrap();

    assert_eq!(cli.model.as_deref(), Some("prod:default"));
    assert_eq!(cli.verbose, 2);
}

#[test]
fn given_allocate_when_dispatching_then_prints_service_message() {
    let harness = Harness::new(RecordingApi::replying("Allocation created."));
    let container = stub_container(&harness, Settings::default());

    let (result, stdout) = run(
        &container,
        &["budgetctl", "-m", "prod:default", "allocate", "somebudget:42", "db"],
    );

    result.unwrap();
    assert_eq!(stdout, "Allocation created.");
    let selectors = harness.resolver.selectors.lock().unwrap();
    assert_eq!(selectors[0].controller.as_deref(), Some("prod"));
    assert_eq!(selectors[0].model.as_deref(), Some("default"));
    assert_eq!(harness.created()[0].model, MODEL_UUID);
}

#[test]
fn given_configured_model_and_account_when_no_flag_then_settings_are_used() {
    let harness = Harness::new(RecordingApi::replying("ok"));
    let settings = Settings {
        model: Some("lab:staging".into()),
        account: Some("bob@local".into()),
        ..Settings::default()
    };
    let container = stub_container(&harness, settings);

    let (result, _) = run(&container, &["budgetctl", "update-allocation", "wordpress", "10"]);

    result.unwrap();
    let selectors = harness.resolver.selectors.lock().unwrap();
    assert_eq!(selectors[0].controller.as_deref(), Some("lab"));
    assert_eq!(selectors[0].account.as_deref(), Some("bob@local"));
    assert_eq!(selectors[0].model.as_deref(), Some("staging"));
}

#[rstest]
#[case::allocate_arity(&["budgetctl", "allocate", "b:1"], exitcode::USAGE)]
#[case::allocate_spec(&["budgetctl", "allocate", "badtoken", "db"], exitcode::USAGE)]
#[case::update_value(&["budgetctl", "update-allocation", "wordpress", "ten"], exitcode::USAGE)]
#[case::update_extra(&["budgetctl", "update-allocation", "wordpress", "1", "x"], exitcode::USAGE)]
#[case::bad_model(&["budgetctl", "-m", "prod:", "allocate", "b:1", "db"], exitcode::USAGE)]
fn given_invalid_input_when_dispatching_then_usage_exit_code(
    #[case] argv: &[&str],
    #[case] code: i32,
) {
    let harness = Harness::new(RecordingApi::replying("unused"));
    let container = stub_container(&harness, Settings::default());

    let (result, stdout) = run(&container, argv);

    assert_eq!(result.unwrap_err().exit_code(), code);
    assert!(stdout.is_empty());
    assert_eq!(harness.sessions_opened(), 0);
}

#[test]
fn given_remote_failure_when_dispatching_then_unavailable_exit_code() {
    let harness = Harness::new(RecordingApi::failing("budget not found"));
    let container = stub_container(&harness, Settings::default());

    let (result, _) = run(&container, &["budgetctl", "allocate", "b:1", "db"]);

    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), exitcode::UNAVAILABLE);
    assert_eq!(err.to_string(), "failed to create allocation: budget not found");
}

#[test]
fn given_identity_failure_when_dispatching_then_config_exit_code() {
    let harness =
        Harness::new(RecordingApi::replying("unused")).with_resolver_failure("no model selected");
    let container = stub_container(&harness, Settings::default());

    let (result, _) = run(&container, &["budgetctl", "allocate", "b:1", "db"]);

    assert_eq!(result.unwrap_err().exit_code(), exitcode::CONFIG);
}

#[test]
fn given_missing_credentials_when_dispatching_then_noperm_exit_code() {
    let harness =
        Harness::new(RecordingApi::replying("unused")).with_session_failure("token is empty");
    let container = stub_container(&harness, Settings::default());

    let (result, _) = run(&container, &["budgetctl", "update-allocation", "wordpress", "1"]);

    assert_eq!(result.unwrap_err().exit_code(), exitcode::NOPERM);
}

#[test]
fn given_config_show_when_dispatching_then_prints_settings_as_toml() {
    let harness = Harness::new(RecordingApi::replying("unused"));
    let settings = Settings {
        api_url: "http://localhost:9999/v2".into(),
        token: Some("secret".into()),
        ..Settings::default()
    };
    let container = stub_container(&harness, settings);

    let (result, stdout) = run(&container, &["budgetctl", "config", "show"]);

    result.unwrap();
    assert!(stdout.contains("api_url = \"http://localhost:9999/v2\""));
    assert!(!stdout.contains("secret"));
}

#[test]
fn given_completion_when_dispatching_then_writes_script() {
    let harness = Harness::new(RecordingApi::replying("unused"));
    let container = stub_container(&harness, Settings::default());

    let (result, stdout) = run(&container, &["budgetctl", "completion", "bash"]);

    result.unwrap();
    assert!(stdout.contains("budgetctl"));
}

#[test]
fn given_real_container_when_allocating_then_full_pipeline_reaches_service() {
    // Arrange: local store, token file and a mock budget service
    budgetctl::util::testing::init_test_setup();
    let data = TempDir::new().unwrap();
    std::fs::write(
        data.path().join("models.yaml"),
        "current-controller: prod\ncontrollers:\n  prod:\n    current-account: admin@local\n    accounts:\n      admin@local:\n        current-model: default\n        models:\n          default:\n            model-uuid: abc-123\n",
    )
    .unwrap();
    std::fs::write(data.path().join("budget-token"), "macaroon-from-file\n").unwrap();

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v2/budget/somebudget/allocation")
            .header("authorization", "Macaroon macaroon-from-file")
            .json_body(json!({ "limit": "42", "model": "abc-123", "services": ["db"] }));
        then.status(201).json_body(json!("Allocation created."));
    });

    let container = ServiceContainer::new(Settings {
        api_url: server.url("/v2"),
        data_dir: data.path().to_path_buf(),
        token: None,
        ..Settings::default()
    });

    // Act
    let (result, stdout) = run(&container, &["budgetctl", "allocate", "somebudget:42", "db"]);

    // Assert
    result.unwrap();
    mock.assert();
    assert_eq!(stdout, "Allocation created.");
}

#[test]
fn given_current_model_in_store_when_updating_without_model_flag_then_resolves_it() {
    // Arrange: current model recorded in models.yaml, endpoint info for it
    budgetctl::util::testing::init_test_setup();
    let data = TempDir::new().unwrap();
    std::fs::write(
        data.path().join("models.yaml"),
        "current-controller: prod\ncontrollers:\n  prod:\n    current-account: admin@local\n    accounts:\n      admin@local:\n        current-model: default\n        models:\n          default:\n            model-uuid: abc-123\n",
    )
    .unwrap();
    std::fs::create_dir_all(data.path().join("environments")).unwrap();
    std::fs::write(
        data.path().join("environments/default.jenv"),
        "endpoint:\n  model-uuid: abc-123\n",
    )
    .unwrap();

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/v2/model/abc-123/service/wordpress/allocation")
            .json_body(json!({ "update": { "limit": "10" } }));
        then.status(200).json_body(json!("Allocation updated."));
    });

    let container = ServiceContainer::new(Settings {
        api_url: server.url("/v2"),
        data_dir: data.path().to_path_buf(),
        token: Some("macaroon".into()),
        ..Settings::default()
    });

    // Act
    let (result, stdout) = run(
        &container,
        &["budgetctl", "update-allocation", "wordpress", "10"],
    );

    // Assert
    result.unwrap();
    mock.assert();
    assert_eq!(stdout, "Allocation updated.");
}
