use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sporecart_core::selection::DefaultPolicy;

#[derive(Debug, Parser)]
#[command(name = "sporecart")]
#[command(bin_name = "sporecart")]
#[command(version)]
#[command(about = "Checkout and returns flow coordinator for the spore storefront")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[arg(long, global = true, help = "Log flow transitions and fetches to stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Run configuration checks")]
    Doctor,
    #[command(about = "Show shipping rates and the default selection for a flow")]
    Rates {
        #[arg(long, help = "JSON snapshot of storefront API data")]
        fixture: PathBuf,
        #[arg(long, value_enum, default_value_t = FlowArg::Checkout)]
        flow: FlowArg,
        #[arg(long, value_enum, help = "Override the configured default policy")]
        policy: Option<PolicyArg>,
    },
    #[command(about = "Walk the checkout flow against a fixture and place the order")]
    Checkout {
        #[arg(long, help = "JSON snapshot of storefront API data")]
        fixture: PathBuf,
        #[arg(long, help = "Shipping rate id to choose instead of the default")]
        rate: Option<String>,
        #[arg(long, default_value = "")]
        note: String,
    },
    #[command(about = "List returns, newest first")]
    Returns {
        #[arg(long, help = "JSON snapshot of storefront API data")]
        fixture: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlowArg {
    Checkout,
    Returns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    First,
    Cheapest,
}

impl From<PolicyArg> for DefaultPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::First => Self::First,
            PolicyArg::Cheapest => Self::Cheapest,
        }
    }
}
