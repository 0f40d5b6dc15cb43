use crate::generator::context::GeneratorContext;
use crate::generator::workflow::launch;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod generator;
mod llm;
mod research;
mod resume;
mod session;
mod types;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = cli::Args::parse();
    let config = args.into_config()?;

    let directive = if config.verbose {
        "company_brief=debug"
    } else {
        "company_brief=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    let request = match args.into_request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("⚠️ {}", e);
            std::process::exit(2);
        }
    };

    let context = GeneratorContext::new(config)?;

    if args.interactive {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        return cli::run_interactive(&context, &request, stdin).await;
    }

    let url = match args.target_url() {
        Ok(url) => url,
        Err(e) => {
            eprintln!("⚠️ {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = launch(&context, &url, &request).await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}
