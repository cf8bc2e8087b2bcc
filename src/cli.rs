use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::matcher::{DEFAULT_MAX_DEPTH, MAX_DEPTH};

fn parse_max_depth(text: &str) -> Result<usize, String> {
    let depth: usize = text.parse().map_err(|e| format!("{}", e))?;
    if depth == 0 || depth > MAX_DEPTH {
        return Err(format!("must be between 1 and {}", MAX_DEPTH));
    }
    Ok(depth)
}

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar (default: type rules in, ending with `done`)
    pub grammar: Option<PathBuf>,

    /// Tokens to parse, separated by whitespace (default: read a line from stdin)
    #[arg(short, long, value_name = "TOKENS")]
    pub input: Option<String>,

    /// Start symbol (default: head of the first rule)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<String>,

    /// How deep expansions may nest before giving up
    #[arg(long, value_name = "DEPTH", default_value_t = DEFAULT_MAX_DEPTH, value_parser = parse_max_depth)]
    pub max_depth: usize,

    /// Write the derivation tree to this file as graphviz dot
    #[arg(long, value_name = "PATH")]
    pub dot: Option<PathBuf>,

    /// Increase message verbosity
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence all log output
    #[arg(short, long)]
    pub quiet: bool
}
