use clap::{Args, Parser, Subcommand};
use ruint::aliases::U256;

#[derive(Parser, Debug)]
#[command(about = "Garble computation results into FairSwap trees and decode them back")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Garble a computation result and print the root digest followed by every garbled leaf.
    Encode(EncodeParams),
    /// Print the root digest of a garbled tree.
    Root(TreeParams),
    /// Decode a garbled tree, printing the result, the decoded leaves and any mismatches.
    Decode(DecodeParams),
}

#[derive(Clone, Debug, Args)]
pub struct EncodeParams {
    /// The computation result. Decimal, or hex with a `0x` prefix.
    #[arg(long, required_unless_present = "data")]
    pub result: Option<U256>,

    /// The nonce appended to the result.
    #[arg(long, required_unless_present = "data")]
    pub nonce: Option<U256>,

    /// The garbling key.
    #[arg(long)]
    pub key: U256,

    /// The number of slices the payload is split into.
    ///
    /// Must be a power of two and every slice must be a multiple of 32 bytes.
    #[clap(default_value = "2")]
    #[arg(long = "slices", short = 's')]
    pub slices: usize,

    /// Garble this hex payload instead of `result ++ nonce`.
    #[arg(long, conflicts_with_all = ["result", "nonce"])]
    pub data: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct TreeParams {
    /// Hex of an encrypted data leaf. Repeat for every leaf, left to right.
    #[arg(long = "leaf", short = 'l', required = true)]
    pub leaves: Vec<String>,

    /// Hex of an encrypted digest leaf, the sentinel included. Repeat for every leaf.
    #[arg(long = "hash-leaf", short = 'H', required = true)]
    pub hash_leaves: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct DecodeParams {
    #[clap(flatten)]
    pub tree: TreeParams,

    /// The garbling key.
    #[arg(long)]
    pub key: U256,
}
