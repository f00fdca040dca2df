use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Get token balances for all holder accounts
    Balances,

    /// Get planted balances for all accounts
    Planted,
}
