mod config;

use clap::{Parser, Subcommand};
use config::{LogFormat, RelayConfig};
use relay_artifacts::{ArtifactParser, ArtifactSession, RevealPolicy};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::info;

#[derive(Parser)]
#[command(name = "relay", about = "Relay — artifact handoffs between agents")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "relay.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hand off agent outputs in order, within one session
    Handoff {
        /// Files holding one agent output each ("-" or none reads stdin)
        inputs: Vec<PathBuf>,
        /// Reveal policy of the receiver (overrides config)
        #[arg(short, long)]
        policy: Option<RevealPolicy>,
        /// Name recorded as the producer of stored artifacts
        #[arg(long)]
        created_by: Option<String>,
        /// Also print every output after the final expansion pass
        #[arg(long = "final")]
        final_pass: bool,
    },
    /// Check whether a file holds an artifact block
    Parse {
        /// File to inspect ("-" reads stdin)
        input: PathBuf,
    },
}

async fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        return Ok(buf);
    }
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read '{}': {}", path.display(), e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = RelayConfig::load(&cli.config).await?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }

    match cli.command {
        Commands::Handoff {
            inputs,
            policy,
            created_by,
            final_pass,
        } => {
            let session = ArtifactSession::from_config(&config.artifacts)?;
            let policy = policy.unwrap_or(session.default_policy());
            let inputs = if inputs.is_empty() {
                vec![PathBuf::from("-")]
            } else {
                inputs
            };

            let mut outputs = Vec::with_capacity(inputs.len());
            for path in &inputs {
                let text = read_input(path).await?;
                let out = session.handoff(&text, policy, created_by.as_deref());
                outputs.push(out.text);
            }
            println!("{}", outputs.join("\n\n"));

            if final_pass {
                let expanded: Vec<String> = outputs
                    .iter()
                    .map(|text| session.final_pass().run(text))
                    .collect();
                println!("\n{}", expanded.join("\n\n"));
            }

            info!(
                session_id = %session.id(),
                hops = inputs.len(),
                artifacts = %serde_json::to_string(&session.store().list())?,
                "Handoff session complete"
            );
        }
        Commands::Parse { input } => {
            let text = read_input(&input).await?;
            let parser = ArtifactParser::with_format(config.artifacts.format());
            let report = match parser.parse(&text) {
                Ok(parsed) => serde_json::json!({
                    "artifact": true,
                    "summary": parsed.summary,
                    "content": parsed.content,
                }),
                Err(reason) => serde_json::json!({
                    "artifact": false,
                    "reason": reason.to_string(),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
