//! `shippilot` 바이너리 진입점.

use shippilot::interface::AppComposition;
use shippilot::interface::cli::{Cli, CliAction};

#[tokio::main]
async fn main() {
    let (action, debug) = match Cli::parse_action() {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| if debug { "debug".into() } else { "warn".into() }),
        )
        .init();

    let composition = AppComposition::default();

    match action {
        CliAction::InspectConfig => match composition.inspect_config_usecase().execute() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err:#}");
                std::process::exit(1);
            }
        },
        CliAction::Publish(options) => {
            if let Err(err) = composition.publish_usecase().execute(options).await {
                eprintln!("error: {err:#}");
                if debug {
                    eprintln!("{err:?}");
                }
                std::process::exit(1);
            }
        }
    }
}
