use std::collections::HashMap;
use std::path::PathBuf;
use supabase_probe::configuration::{DEFAULT_ENV_FILE, ENV_FILE_VAR};
use supabase_probe::telemetry::{get_subscriber, init_subscriber};

// Requests go out one at a time, a single thread is all we need.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, the report owns stdout
    let subscriber = get_subscriber("supabase-probe".into(), "warn".into(), std::io::stderr);
    init_subscriber(subscriber);

    let env_file = std::env::var(ENV_FILE_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ENV_FILE));
    // Non UTF-8 variables cannot hold a usable URL or key
    let process_env: HashMap<String, String> = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect();

    let mut stdout = std::io::stdout().lock();
    supabase_probe::run(&env_file, &process_env, &mut stdout).await?;
    Ok(())
}
