use clap::{Args, Parser, Subcommand};
use engine::Money;

#[derive(Parser, Debug)]
#[command(name = "evenup")]
#[command(about = "Balances and settle-up plans for expense-sharing groups")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the database connection URL.
    #[arg(long, global = true)]
    pub database_url: Option<String>,
    /// Override the log level (e.g. debug).
    #[arg(long, global = true)]
    pub level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show balances and the proposed transfers of a group.
    Balances(BalancesArgs),
    /// Record a settlement between two members.
    Settle(SettleArgs),
}

#[derive(Args, Debug)]
pub struct BalancesArgs {
    #[arg(long)]
    pub group: String,
    /// Print JSON instead of text. Amounts are integer minor units (cents).
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SettleArgs {
    #[arg(long)]
    pub group: String,
    /// Member who paid.
    #[arg(long, required_unless_present = "all", conflicts_with = "all")]
    pub from: Option<String>,
    /// Member who received the payment.
    #[arg(long, required_unless_present = "all", conflicts_with = "all")]
    pub to: Option<String>,
    #[arg(long, required_unless_present = "all", conflicts_with = "all")]
    pub amount: Option<Money>,
    /// Member confirming the payment; must be the payer or the receiver.
    #[arg(long = "as")]
    pub acting: Option<String>,
    /// Confirm every proposed transfer involving `--as`.
    #[arg(long, requires = "acting")]
    pub all: bool,
    /// Print the new balances as JSON. Amounts are integer minor units (cents).
    #[arg(long)]
    pub json: bool,
}
