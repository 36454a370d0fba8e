pub mod errors;
pub mod tokenizer;
pub mod tracing_init;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cluster-cli: dynamic command dispatch for the cluster management API",
    long_about = "cluster-cli discovers the operations a cluster exposes from its management\n\
                  API description and runs them from human-typed command phrases.\n\n\
                  Examples:\n  \
                  cluster-cli https://locator:7070 commands\n  \
                  cluster-cli prod list members -t\n  \
                  cluster-cli prod describe member --id server1 --jq .result\n  \
                  cluster-cli prod create region --body @region.json\n\n\
                  Every command accepts -h/--help, -t/--table [expr], --jq <expr>,\n\
                  -u/--user and -p/--password.",
    disable_help_flag = true
)]
pub struct Cli {
    /// Output all errors as structured JSON to stderr
    #[arg(long, help = "Output errors in JSON format")]
    pub json_errors: bool,

    /// Increase logging verbosity
    #[arg(
        short = 'v',
        action = ArgAction::Count,
        help = "Increase logging verbosity (-v for debug, -vv for trace)"
    )]
    pub verbosity: u8,

    /// Target, command words and command options, passed through untouched
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "TARGET COMMAND [OPTIONS]"
    )]
    pub args: Vec<String>,
}

impl Cli {
    /// The raw token list handed to the tokenizer: program name first.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        std::iter::once(env!("CARGO_PKG_NAME").to_string())
            .chain(self.args.iter().cloned())
            .collect()
    }
}
