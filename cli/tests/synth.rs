use clap::Parser;
use infra::cli::{run, Cli};
use serde_json::Value;
use std::fs;

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn synth_all_writes_a_template_per_stack() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    let cli = Cli::try_parse_from([
        "infra",
        "synth",
        "--all",
        "--out",
        out.to_str().unwrap(),
        "--json",
    ])
    .unwrap();

    run(cli).unwrap();

    for stack in ["ParameterStoreStack", "SecretsManagerStack", "SnsStack", "SqsStack"] {
        let template = read_json(&out.join(format!("{stack}.template.json")));
        assert!(template["Resources"].is_object(), "{stack} has no resources");
    }
}

#[test]
fn endpoint_and_out_come_from_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("cdk.out");
    let config = dir.path().join("infra.toml");

    fs::write(
        &config,
        format!(
            "[sns]\nendpoint = \"https://1234abcd.ngrok.io/testTopic\"\n\n[synth]\nout = {:?}\n",
            out.to_str().unwrap()
        ),
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "infra",
        "synth",
        "sns",
        "--stack-id",
        "MySnsStack",
        "--config",
        config.to_str().unwrap(),
        "--json",
    ])
    .unwrap();

    run(cli).unwrap();

    let template = read_json(&out.join("MySnsStack.template.json"));
    let resources = &template["Resources"];

    assert_eq!(
        resources["SnsUrlSubscription"]["Properties"]["Endpoint"],
        "https://1234abcd.ngrok.io/testTopic"
    );

    assert_eq!(
        resources["SnsQueue"]["Properties"]["QueueName"],
        "MySnsStack-sns-queue"
    );
}

#[test]
fn stack_id_with_several_apps_is_rejected() {
    let cli =
        Cli::try_parse_from(["infra", "synth", "sqs", "sns", "--stack-id", "Shared"]).unwrap();

    let err = run(cli).unwrap_err();
    assert_eq!(err.message(), "Stack id is ambiguous");
}

#[test]
fn invalid_stack_id_is_a_declaration_error() {
    let cli = Cli::try_parse_from(["infra", "synth", "sqs", "--stack-id", "not_valid"]).unwrap();
    let err = run(cli).unwrap_err();
    assert_eq!(err.message(), "Invalid stack declaration");
}

#[test]
fn missing_settings_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("absent.toml");

    let cli = Cli::try_parse_from([
        "infra",
        "synth",
        "sqs",
        "--config",
        config.to_str().unwrap(),
    ])
    .unwrap();

    let err = run(cli).unwrap_err();
    assert_eq!(err.message(), "Invalid settings");
}
