use clap::{CommandFactory, Parser};
use cluster_cli::cli::errors::print_error_with_json;
use cluster_cli::cli::tokenizer::tokenize;
use cluster_cli::cli::tracing_init::init_tracing;
use cluster_cli::cli::Cli;
use cluster_cli::config::{get_config_dir, load_global_config, ConnectionResolver};
use cluster_cli::constants;
use cluster_cli::engine::{dispatch, Outcome};
use cluster_cli::error::Error;
use cluster_cli::format::{default_filter, TableLayout};
use cluster_cli::invocation::Invocation;
use cluster_cli::transport::HttpTransport;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;
    init_tracing(cli.verbosity);

    if let Err(e) = run(&cli).await {
        print_error_with_json(&e, json_errors);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), Error> {
    if cli.args.is_empty() {
        Cli::command().print_long_help()?;
        return Ok(());
    }

    let target_override = std::env::var(constants::ENV_TARGET)
        .ok()
        .filter(|t| !t.trim().is_empty());
    let (target, command) = tokenize(&cli.tokens(), target_override.as_deref());

    let config = load_global_config(&get_config_dir()?)?;
    let connection = ConnectionResolver::new()
        .with_global_config(&config)
        .resolve(&target, &command)?;
    let invocation = Invocation {
        target,
        command,
        connection,
    };

    let transport = HttpTransport::new()?;
    let filter = default_filter();
    let layout = TableLayout::from_env();

    let outcome = dispatch(&invocation, &transport, filter.as_ref(), &layout).await?;
    match &outcome {
        Outcome::Commands { names, .. } => {
            println!("Available commands:");
            for name in names {
                println!("  {name}");
            }
        }
        Outcome::Help(text) => println!("{text}"),
        Outcome::Response(text) if text.is_empty() => {}
        Outcome::Response(text) => println!("{text}"),
    }

    outcome.unresolved_error().map_or(Ok(()), Err)
}
