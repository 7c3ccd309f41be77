//! Orchestrator CLI
//!
//! Runs single completions and health checks against a provider configuration.

#![allow(missing_docs)]

use ai_orchestrator::utils::logging::{LogFormat, init_tracing};
use ai_orchestrator::{Config, NormalizedRequest, Orchestrator, RoutingPolicy};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "orchestrator", version, about = "Multi-provider LLM orchestration")]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "ORCHESTRATOR_CONFIG", default_value = "config/orchestrator.yaml")]
    config: PathBuf,

    /// Log output format (pretty or json)
    #[arg(long, env = "ORCHESTRATOR_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one completion and print the result as JSON
    Complete {
        /// User prompt
        prompt: String,
        /// System prompt
        #[arg(long)]
        system: Option<String>,
        /// Provider to try first
        #[arg(long)]
        provider: Option<String>,
        /// Only use these providers, in this order
        #[arg(long = "fallback", value_delimiter = ',')]
        fallback_order: Vec<String>,
        /// Required capability tags
        #[arg(long = "require", value_delimiter = ',')]
        capabilities: Vec<String>,
        /// Cost ceiling in USD
        #[arg(long)]
        max_cost: Option<f64>,
        #[arg(long)]
        max_tokens: Option<u32>,
        /// Overall deadline in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        #[arg(long)]
        tenant: Option<String>,
        /// Request a JSON object response
        #[arg(long)]
        json: bool,
    },
    /// Probe every provider once and print the health snapshot
    Status,
    /// Validate the configuration file
    Validate,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_format, "info");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_file(&cli.config)
        .await
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Command::Validate => {
            println!(
                "{}: ok ({} providers)",
                cli.config.display(),
                config.providers().len()
            );
            Ok(())
        }
        Command::Status => {
            let orchestrator = Orchestrator::new(&config)?;
            let status = orchestrator.probe_all().await;
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(())
        }
        Command::Complete {
            prompt,
            system,
            provider,
            fallback_order,
            capabilities,
            max_cost,
            max_tokens,
            timeout_ms,
            tenant,
            json,
        } => {
            let mut builder = NormalizedRequest::builder();
            if let Some(system) = system {
                builder = builder.system(system);
            }
            builder = builder.user(prompt);
            for capability in capabilities {
                builder = builder.require(capability);
            }
            if let Some(ceiling) = max_cost {
                builder = builder.max_cost(ceiling);
            }
            if let Some(tokens) = max_tokens {
                builder = builder.max_output_tokens(tokens);
            }
            if let Some(ms) = timeout_ms {
                builder = builder.timeout(Duration::from_millis(ms));
            }
            if let Some(tenant) = tenant {
                builder = builder.tenant(tenant);
            }
            if json {
                builder = builder.json_output();
            }
            let request = builder.build()?;

            let mut policy = RoutingPolicy::new().fallback_order(fallback_order);
            if let Some(provider) = provider {
                policy = policy.prefer(provider);
            }

            let orchestrator = Orchestrator::new(&config)?;
            let result = orchestrator.complete(&request, &policy).await;
            match result {
                Ok(result) => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                    Ok(())
                }
                Err(error) => {
                    eprintln!("{}", serde_json::to_string_pretty(&error)?);
                    Err(error.into())
                }
            }
        }
    }
}
