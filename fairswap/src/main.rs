use anyhow::{Context as _, Result};
use clap::Parser;
use fairswap::{ComputationResult, Encoding, Options};

use cli::{Cli, Command, DecodeParams, EncodeParams, TreeParams};

mod cli;

fn main() -> Result<()> {
    fairswap::logging::init()?;
    let cli = Cli::parse();
    match cli.command {
        Command::Encode(params) => encode(params),
        Command::Root(params) => root(params),
        Command::Decode(params) => decode(params),
    }
}

fn encode(params: EncodeParams) -> Result<()> {
    let mut options = Options::new();
    options.slice_count(params.slices);

    let encoding = match params.data {
        Some(data) => {
            let data = hex::decode(data.strip_prefix("0x").unwrap_or(&data))
                .context("payload is not valid hex")?;
            fairswap::encode_payload(&data, &params.key.to_be_bytes::<32>(), &options)?
        }
        None => fairswap::encode_computation(
            &ComputationResult {
                result: params.result.context("missing --result")?,
                nonce: params.nonce.context("missing --nonce")?,
                key: params.key,
            },
            &options,
        )?,
    };
    print_encoding(&encoding);
    Ok(())
}

fn root(params: TreeParams) -> Result<()> {
    let root = fairswap::root_digest(&params.leaves, &params.hash_leaves)
        .with_context(|| "failed to build the tree")?;
    println!("{root}");
    Ok(())
}

fn decode(params: DecodeParams) -> Result<()> {
    let decoded =
        fairswap::decode_computation(&params.tree.leaves, &params.tree.hash_leaves, params.key)?;
    match decoded.result {
        Some(result) => println!("result {result}"),
        None => println!("result too large"),
    }
    for leaf in &decoded.decoded {
        println!("leaf {leaf}");
    }
    for mismatch in &decoded.mismatches {
        println!(
            "mismatch {:?} in {} out {} expected {} actual {}",
            mismatch.level,
            mismatch.index_in,
            mismatch.index_out,
            mismatch.expected_digest,
            mismatch.actual_digest,
        );
    }
    if !decoded.mismatches.is_empty() {
        anyhow::bail!("{} digest mismatches", decoded.mismatches.len());
    }
    Ok(())
}

fn print_encoding(encoding: &Encoding) {
    println!("root {}", encoding.root);
    let (leaves, hash_leaves) = encoding.split();
    for leaf in leaves {
        println!("leaf {leaf}");
    }
    for leaf in hash_leaves {
        println!("hash-leaf {leaf}");
    }
}
