use std::process::ExitCode;

use clap::{Parser, Subcommand};
use opsflow_rust::config::{init_dotenv, AppConfig};
use opsflow_rust::errors::AppError;
use opsflow_rust::runner::{http_collaborators, read_request, run_create_channel, run_create_org};
use serde_json::Value;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "opsflow")]
#[command(version, about = "Playbooks de aprovisionamiento: organizaciones y canales de chat")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crea una organización con su grupo, owner y permisos
    CreateOrg {
        /// Fichero JSON del request, o `-` para stdin
        #[arg(long, default_value = "-")]
        request: String,
    },
    /// Crea un canal de chat, invita a los miembros y responde al solicitante
    CreateChannel {
        #[arg(long, default_value = "-")]
        request: String,
    },
}

fn main() -> ExitCode {
    init_dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr)
                             .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env()
                                 .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")))
                             .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok((ok, output)) => {
            println!("{output}");
            if ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(command: Commands) -> Result<(bool, Value), AppError> {
    let config = AppConfig::from_env()?;
    let collaborators = http_collaborators(&config)?;
    match command {
        Commands::CreateOrg { request } => {
            info!("running create-org from '{request}'");
            let output = run_create_org(collaborators, config.permission_policy, read_request(&request)?)?;
            Ok((true, output))
        }
        Commands::CreateChannel { request } => {
            info!("running create-channel from '{request}'");
            run_create_channel(collaborators, read_request(&request)?)
        }
    }
}
