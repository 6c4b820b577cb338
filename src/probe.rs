//! The probe run: one select, two inserts and two lookups, printed as-is.
use crate::configuration::Settings;
use crate::domain::{Prefer, TestUser};
use crate::rest_client::{RestClient, RestClientError, RestResponse};
use crate::utils::error_chain_fmt;
use reqwest::StatusCode;
use std::io::Write;

#[derive(thiserror::Error)]
pub enum ProbeError {
    #[error(transparent)]
    Rest(#[from] RestClientError),
    #[error("Failed to serialize the test user.")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to write the probe report.")]
    Output(#[from] std::io::Error),
}

impl std::fmt::Debug for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// What a completed run sent and got back. Nothing in it is judged.
#[derive(Debug)]
pub struct ProbeSummary {
    pub first_user: TestUser,
    pub second_user: TestUser,
    pub select_status: StatusCode,
    pub first_insert_status: StatusCode,
    pub second_insert_status: StatusCode,
    pub first_lookup_status: StatusCode,
    pub second_lookup_status: StatusCode,
}

fn section<W: Write>(out: &mut W, title: &str) -> std::io::Result<()> {
    writeln!(out, "\n=== {} ===", title)
}

fn print_response<W: Write>(
    out: &mut W,
    status_label: &str,
    response: &RestResponse,
) -> std::io::Result<()> {
    writeln!(out, "{}: {}", status_label, response.status.as_u16())?;
    writeln!(out, "Response: {}", response.body)
}

#[tracing::instrument(
    name = "Probing Supabase REST API",
    skip_all,
    fields(supabase_url = %settings.supabase_url)
)]
pub async fn run_probe<W: Write>(
    settings: &Settings,
    out: &mut W,
) -> Result<ProbeSummary, ProbeError> {
    writeln!(out, "Using URL: {}", settings.supabase_url)?;
    writeln!(out, "Service key length: {}", settings.key_length())?;
    writeln!(out, "Key prefix: {}...", settings.key_prefix())?;

    let mut client = RestClient::new(&settings.supabase_url, &settings.service_key)?;

    section(out, "TEST 1: SELECT FROM USERS")?;
    let select = client.select_users().await?;
    print_response(out, "Status", &select)?;

    section(out, "TEST 2: INSERT TEST USER")?;
    let first_user = TestUser::first();
    writeln!(out, "Inserting: {}", first_user.to_json()?)?;
    let first_insert = client.insert_user(&first_user).await?;
    print_response(out, "Status", &first_insert)?;
    writeln!(out, "Headers: {:?}", first_insert.header_summary())?;

    section(out, "TEST 3: INSERT WITH MINIMAL PREFER")?;
    client.set_prefer(Prefer::ReturnMinimal);
    let second_user = TestUser::second();
    let second_insert = client.insert_user(&second_user).await?;
    print_response(out, "Status", &second_insert)?;

    section(out, "TEST 4: VERIFY INSERTS")?;
    client.set_prefer(Prefer::ReturnRepresentation);
    let first_lookup = client.find_user_by_id(first_user.id).await?;
    print_response(out, "First user lookup - Status", &first_lookup)?;
    let second_lookup = client.find_user_by_id(second_user.id).await?;
    print_response(out, "Second user lookup - Status", &second_lookup)?;

    Ok(ProbeSummary {
        first_user,
        second_user,
        select_status: select.status,
        first_insert_status: first_insert.status,
        second_insert_status: second_insert.status,
        first_lookup_status: first_lookup.status,
        second_lookup_status: second_lookup.status,
    })
}
