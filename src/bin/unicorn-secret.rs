use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use unicorn_proxy::config::{load_or_default, ProxyConfig};
use unicorn_proxy::fingerprint::{Secret, SecretProvider, SecretSource};

#[derive(Parser)]
#[command(name = "unicorn-secret")]
#[command(about = "Compute and verify the unicorn proxy shared secret", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Artifacts {
    /// Proxy configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Code directory holding the artifacts (overrides config and CODE_DIR).
    #[arg(long)]
    code_dir: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the secret for the local code
    Compute {
        #[command(flatten)]
        artifacts: Artifacts,
    },
    /// Check that a running proxy echoes the locally computed secret
    Verify {
        #[command(flatten)]
        artifacts: Artifacts,

        #[arg(short, long, default_value = "http://localhost:5000")]
        proxy: String,

        /// Unicorn to fetch for the check.
        #[arg(short, long, default_value = "1")]
        unicorn: String,
    },
}

fn load(artifacts: &Artifacts) -> Result<ProxyConfig, Box<dyn std::error::Error>> {
    let mut config = load_or_default(artifacts.config.as_deref())?;
    if let Some(dir) = &artifacts.code_dir {
        config.artifacts.code_dir = dir.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compute { artifacts } => {
            let config = load(&artifacts)?;
            let secret = SecretProvider::for_deployment(&config.artifacts).get_secret()?;
            println!("{}", secret);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify {
            artifacts,
            proxy,
            unicorn,
        } => {
            let config = load(&artifacts)?;
            let expected = SecretProvider::for_deployment(&config.artifacts).get_secret()?;

            let url = format!("{}/unicorns/{}", proxy.trim_end_matches('/'), unicorn);
            let res = reqwest::Client::new().get(&url).send().await?;
            let status = res.status();

            let echoed = res
                .headers()
                .get(config.backend.secret_header.as_str())
                .and_then(|v| v.to_str().ok())
                .map(Secret::from_hex);

            match echoed {
                Some(actual) if actual == expected => {
                    println!("OK: proxy echoed the expected secret (status {})", status);
                    Ok(ExitCode::SUCCESS)
                }
                Some(actual) => {
                    eprintln!("MISMATCH: expected {} got {}", expected, actual);
                    Ok(ExitCode::FAILURE)
                }
                None => {
                    eprintln!(
                        "Error: no {} header in response (status {})",
                        config.backend.secret_header, status
                    );
                    if let Ok(text) = res.text().await {
                        eprintln!("Response: {}", text);
                    }
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
