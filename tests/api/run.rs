use crate::helpers::{run_with, write_env_file};
use crate::test_data::TEST_SERVICE_KEY;
use claims::{assert_err, assert_none, assert_some};
use std::collections::HashMap;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn missing_configuration_is_reported_without_any_request() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");

    let output = run_with(&env_file, &HashMap::new()).await;

    assert_none!(output.summary);
    assert_eq!(
        output.report,
        format!(
            "No {} file found\nERROR: Missing SUPABASE_URL or SUPABASE_SERVICE_KEY\n",
            env_file.display()
        )
    );
}

#[tokio::test]
async fn missing_service_key_alone_still_stops_the_run() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let env_file = write_env_file(&format!("SUPABASE_URL={}\n", server.uri()));

    let output = run_with(env_file.path(), &HashMap::new()).await;

    assert_none!(output.summary);
    assert!(output.report.contains("ERROR: Missing SUPABASE_URL or SUPABASE_SERVICE_KEY"));
    assert!(!output.report.contains("=== TEST"));
}

#[tokio::test]
async fn environment_variables_are_used_when_there_is_no_env_file() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(5)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let process_env = HashMap::from([
        ("SUPABASE_URL".to_string(), server.uri()),
        (
            "SUPABASE_SERVICE_KEY".to_string(),
            TEST_SERVICE_KEY.to_string(),
        ),
    ]);

    let env_file = dir.path().join(".env");

    let output = run_with(&env_file, &process_env).await;

    assert_some!(output.summary);
    let expected_start = format!("No {} file found\nUsing URL: ", env_file.display());
    assert!(output.report.starts_with(&expected_start));
}

#[tokio::test]
async fn malformed_env_file_is_an_error() {
    let env_file = write_env_file("SUPABASE_URL\n");
    let mut out = Vec::new();

    let outcome = supabase_probe::run(env_file.path(), &HashMap::new(), &mut out).await;

    assert_err!(outcome);
    assert!(out.is_empty());
}
