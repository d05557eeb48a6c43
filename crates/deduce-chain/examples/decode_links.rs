//! Decodes packed chain-link words and prints them as a chain.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example decode_links -- 0x15 0x1a5 -- -0x14a5
//! ```
//!
//! Words are decimal or `0x`-prefixed hex; a leading `-` marks a branch.
//! Print the buddy cells of every link as well:
//!
//! ```sh
//! cargo run --example decode_links -- --buddies 0x15 0x1a5
//! ```
//!
//! Decoding problems are logged; set `RUST_LOG=debug` for more detail.

use std::process;

use clap::{Parser, ValueEnum};
use deduce_chain::{AlmostBuddies, AlmostStructure, Chain, NodeKind, PackedLink};
use deduce_core::CellMask;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// One rendered link per line.
    Text,
    /// Field-by-field decoding.
    Fields,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Output format.
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    format: Format,

    /// Also print the buddy cells of every link.
    #[arg(long)]
    buddies: bool,

    /// Packed link words.
    #[arg(value_name = "WORD", required = true, value_parser = parse_word, allow_negative_numbers = true)]
    words: Vec<PackedLink>,
}

/// Side array used when none is available: every reference is unresolved.
struct NoSideArray;

impl AlmostStructure for NoSideArray {
    fn cell_count(&self) -> usize {
        0
    }
}

impl AlmostBuddies for NoSideArray {
    fn buddies_for(&self, _digit: u8) -> Option<CellMask> {
        None
    }
}

fn parse_word(s: &str) -> Result<PackedLink, String> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    // unsigned parse so a second sign is rejected
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse::<u32>(),
    }
    .map_err(|err| format!("invalid link word {s:?}: {err}"))?;
    let magnitude = i32::try_from(magnitude)
        .map_err(|_| format!("invalid link word {s:?}: magnitude exceeds 31 bits"))?;
    Ok(PackedLink::from_word(if negative { -magnitude } else { magnitude }))
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    for link in &args.words {
        match args.format {
            Format::Text => println!("{link}"),
            Format::Fields => print_fields(*link),
        }
        if args.buddies {
            let buddies = link.buddies::<NoSideArray>(link.digit(), &[]);
            println!("  buddies: {buddies}");
        }
    }

    match Chain::from_packed(&args.words) {
        Ok(chain) => println!("length: {}", chain.length()),
        Err(err) => {
            eprintln!("cannot build chain: {err}");
            process::exit(1);
        }
    }
}

fn print_fields(link: PackedLink) {
    println!("{:#010x}:", link.word());
    match link.kind() {
        Ok(kind) => println!("  kind: {kind:?}"),
        Err(err) => println!("  kind: {err}"),
    }
    println!("  digit: {}", link.digit());
    println!("  strong: {}", link.is_strong());
    println!("  branch: {}", link.is_branch());
    println!("  cell: {}", link.cell());
    println!("  index2: {:?}", link.index2());
    println!("  index3: {:?}", link.index3());
    if link.kind().is_ok_and(NodeKind::is_almost) {
        println!("  almost index: {}", link.almost_index());
    }
}
