use backend_api::{run_server, AppState, JsonFileRepository};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment variables with sane defaults for local use.
    let data_path = env::var("DATA_PATH").unwrap_or_else(|_| "data/finance.json".to_string());
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);
    let api_token = env::var("API_TOKEN").ok().filter(|t| !t.is_empty());

    println!("Finance Tracker API Server");
    println!("==========================");
    println!("Data file: {}", data_path);
    println!("Listening on: {}:{}", host, port);
    if api_token.is_none() {
        eprintln!("[WARN] API_TOKEN not set; financial routes are unauthenticated.");
        eprintln!("       Set API_TOKEN to require a bearer token on /api routes.");
    }
    println!();

    let repo = Arc::new(JsonFileRepository::new(&data_path));
    let state = AppState { repo, api_token };

    run_server(state, &host, port).await?;

    Ok(())
}
