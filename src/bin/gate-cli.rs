use std::path::PathBuf;
use std::process::ExitCode;

use admin_gate::config::{load_config, ConfigError, GateConfig};
use admin_gate::guard::GuardState;
use clap::{Parser, Subcommand};
use reqwest::header::{COOKIE, LOCATION};
use serde_json::json;

#[derive(Parser)]
#[command(name = "gate-cli")]
#[command(about = "Inspect and exercise admin-gate decisions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the guard offline for a path and cookie set
    Check {
        #[arg(short, long)]
        path: String,

        /// Cookie as name=value; repeatable
        #[arg(long = "cookie")]
        cookies: Vec<String>,

        /// Config file; defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Load and validate a config file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Send a request through a running gate and report what came back
    Probe {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,

        #[arg(short, long)]
        path: String,

        #[arg(long = "cookie")]
        cookies: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            path,
            cookies,
            config,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => GateConfig::default(),
            };
            let state = GuardState::from_config(&config)?;

            let mut builder = axum::http::Request::builder().uri(path.as_str());
            if !cookies.is_empty() {
                builder = builder.header(COOKIE, cookies.join("; "));
            }
            let request = builder.body(())?;

            let output = match state.evaluate(&request) {
                Some(decision) => json!({ "path": path, "guarded": true, "result": decision }),
                None => json!({ "path": path, "guarded": false, "result": { "decision": "forward" } }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Validate { config } => match load_config(&config) {
            Ok(_) => println!("{}: ok", config.display()),
            Err(ConfigError::Validation(errors)) => {
                for error in errors {
                    eprintln!("{}: {}", config.display(), error);
                }
                return Ok(ExitCode::FAILURE);
            }
            Err(e) => {
                eprintln!("{}: {}", config.display(), e);
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Probe { url, path, cookies } => {
            let client = reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()?;

            let mut request = client.get(format!("{}{}", url.trim_end_matches('/'), path));
            if !cookies.is_empty() {
                request = request.header(COOKIE, cookies.join("; "));
            }
            let res = request.send().await?;

            let location = res
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let output = json!({
                "path": path,
                "status": res.status().as_u16(),
                "location": location,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
