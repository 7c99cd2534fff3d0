use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "inspector-cli")]
#[command(about = "Command-line client for a running webhook inspector", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved config names
    Configs,
    /// Print the rules of one config
    Get { name: String },
    /// Save a config from a JSON file containing a rules array
    Save { name: String, file: PathBuf },
    /// Delete a config
    Delete { name: String },
    /// Post a JSON payload to this inspector's receive endpoint
    Fire { payload: String },
    /// Ask the inspector to relay a JSON payload to another URL
    Relay { target: String, payload: String },
    /// Follow the live event stream
    Tail,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}/api", cli.url.trim_end_matches('/'));

    match cli.command {
        Commands::Configs => {
            let res = client.get(format!("{}/configs", api)).send().await?;
            print_response(res).await?;
        }
        Commands::Get { name } => {
            let res = client.get(config_url(&api, &name)?).send().await?;
            print_response(res).await?;
        }
        Commands::Save { name, file } => {
            let rules: Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let res = client
                .post(format!("{}/configs", api))
                .json(&json!({ "name": name, "rules": rules }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Delete { name } => {
            let res = client.delete(config_url(&api, &name)?).send().await?;
            print_response(res).await?;
        }
        Commands::Fire { payload } => {
            let payload: Value = serde_json::from_str(&payload)?;
            let res = client
                .post(format!("{}/webhook/receive", api))
                .json(&payload)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Relay { target, payload } => {
            let payload: Value = serde_json::from_str(&payload)?;
            let res = client
                .post(format!("{}/webhook/send", api))
                .json(&json!({ "url": target, "payload": payload }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Tail => {
            let mut res = client.get(format!("{}/events", api)).send().await?;
            if !res.status().is_success() {
                return print_response(res).await;
            }
            while let Some(chunk) = res.chunk().await? {
                print!("{}", String::from_utf8_lossy(&chunk));
            }
        }
    }

    Ok(())
}

/// `<api>/configs/<name>` with the name percent-encoded as one segment.
fn config_url(api: &str, name: &str) -> Result<reqwest::Url, Box<dyn std::error::Error>> {
    let mut url = reqwest::Url::parse(&format!("{}/configs", api))?;
    url.path_segments_mut()
        .map_err(|_| format!("cannot build config URLs from {}", api))?
        .push(name);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: inspector returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
