use std::path::PathBuf;
use std::process;

use clap::Parser;
use pc_assembler::report::BuildResponse;
use pc_assembler::service::AssemblerService;
use pc_assembler::settings::Settings;

/// Recommends a PC build for a budget and usage goal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Total budget in USD
    #[arg(long, value_name = "AMOUNT")]
    budget: f64,

    /// games | office | graphics | video | programming | universal
    #[arg(long, default_value = "universal")]
    goal: String,

    /// Path to an alternative configuration file
    #[arg(long, value_name = "PATH")]
    config_path: Option<String>,

    /// Overrides `catalog.data_dir`
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut settings = Settings::new(args.config_path).expect("Can't read config.");
    if let Some(dir) = args.data_dir {
        settings.catalog.data_dir = dir.to_string_lossy().into_owned();
    }

    std::env::set_var("RUST_LOG", settings.log_level.as_deref().unwrap_or("INFO"));
    env_logger::init();
    settings.validate_and_warn();

    let service = match AssemblerService::from_settings(&settings) {
        Ok(service) => service,
        Err(err) => {
            log::error!("Invalid configuration: {err}");
            process::exit(2);
        }
    };

    let response = service.respond(args.budget, &args.goal).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&response).expect("Can't serialize response.")
    );

    if matches!(response, BuildResponse::Error { .. }) {
        process::exit(1);
    }
}
