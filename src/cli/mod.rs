use crate::core::{Address, ChainId};
use clap::{Args, Parser, Subcommand};

pub mod commands;
pub mod display;

#[derive(Parser)]
#[command(name = "dex-panel")]
#[command(about = "Headless DEX client: readiness gate, routes and admin token lists", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate what the client would render for a wallet
    Gate(GateArgs),

    /// Resolve a trading path against the route table
    Route(RouteArgs),

    /// Inspect and edit the deployment's token lists
    TokenList(TokenListArgs),
}

#[derive(Parser)]
pub struct GateArgs {
    /// Connected chain id (defaults to the wallet provider's chain)
    #[arg(short, long)]
    pub chain_id: Option<ChainId>,

    /// Connected account (defaults to ACCOUNT)
    #[arg(short, long, value_parser = parse_address)]
    pub account: Option<Address>,

    /// Treat the wallet as disconnected
    #[arg(long)]
    pub inactive: bool,

    /// Open the admin panel instead of the trading UI
    #[arg(long)]
    pub manage: bool,

    /// Skip the first-run greeting
    #[arg(long)]
    pub skip_greeting: bool,

    /// Switch the color scheme to dark
    #[arg(long)]
    pub dark: bool,
}

#[derive(Parser)]
pub struct RouteArgs {
    /// Path such as /add/ETH or /remove/0xA-0xB
    pub path: String,
}

#[derive(Parser)]
pub struct TokenListArgs {
    #[command(subcommand)]
    pub action: TokenListAction,
}

#[derive(Subcommand)]
pub enum TokenListAction {
    /// Print the stored token lists
    Show {
        /// Only lists for this chain id
        #[arg(short, long)]
        chain_id: Option<String>,
    },

    /// Add a token to a list and save it
    Add {
        #[command(flatten)]
        list: ListRef,

        /// Token contract address
        #[arg(value_parser = parse_address)]
        address: Address,

        /// Token logo URL
        #[arg(long)]
        logo: Option<String>,

        /// List name, required when the list does not exist yet
        #[arg(long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Remove a token from a list and save it
    Remove {
        #[command(flatten)]
        list: ListRef,

        #[arg(value_parser = parse_address)]
        address: Address,

        #[arg(long)]
        yes: bool,
    },

    /// Change list details (name, logo, id or chain) and save
    Save {
        #[command(flatten)]
        list: ListRef,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        logo: Option<String>,

        /// Move the list to another chain id
        #[arg(long)]
        new_chain_id: Option<String>,

        /// Store the list under another id
        #[arg(long)]
        new_list_id: Option<String>,

        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Clone)]
pub struct ListRef {
    /// Chain id the list belongs to
    pub chain_id: String,

    /// List id within the chain
    pub list_id: String,
}

fn parse_address(s: &str) -> Result<Address, String> {
    s.parse::<Address>().map_err(|e| e.to_string())
}
