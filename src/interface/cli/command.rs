//! CLI 명령 파싱 모듈.

use clap::{Parser, Subcommand};

use crate::domain::release::RunOptions;

#[derive(Debug, Parser)]
#[command(name = "shippilot")]
#[command(about = "Release orchestration: version negotiation, branch sync, and build handoff")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Dump full error details and raise the log level
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the release flow against the project in the current directory
    Publish {
        /// Mark the build as a production release
        #[arg(long)]
        prod: bool,

        /// Build command to validate and hand to the executor (default: npm run build)
        #[arg(long = "build-cmd")]
        build_cmd: Option<String>,

        /// Stop after pushing the working branch; skip the build handoff
        #[arg(long)]
        git_only: bool,

        /// Re-prompt for the hosting platform even if cached
        #[arg(long)]
        refresh_server: bool,

        /// Re-prompt for the access token even if cached
        #[arg(long)]
        refresh_token: bool,

        /// Re-prompt for the owner kind and login even if cached
        #[arg(long)]
        refresh_owner: bool,
    },
    /// Show the cache root and per-slot state as JSON
    Config,
}

pub enum CliAction {
    Publish(RunOptions),
    InspectConfig,
}

impl Cli {
    /// 파싱 결과를 (실행할 동작, debug 여부)로 변환한다.
    pub fn parse_action() -> Result<(CliAction, bool), String> {
        let cli = Cli::parse();

        let action = match cli.command {
            Commands::Config => CliAction::InspectConfig,
            Commands::Publish {
                prod,
                build_cmd,
                git_only,
                refresh_server,
                refresh_token,
                refresh_owner,
            } => {
                let dir = std::env::current_dir()
                    .map_err(|err| format!("cannot resolve current directory: {err}"))?;
                CliAction::Publish(RunOptions {
                    dir,
                    prod,
                    build_command: build_cmd,
                    git_only,
                    refresh_provider: refresh_server,
                    refresh_token,
                    refresh_owner,
                })
            }
        };

        Ok((action, cli.debug))
    }
}
