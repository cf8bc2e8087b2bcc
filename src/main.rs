mod cli;
mod error_handling;
mod grammar;
mod matcher;
mod rules;
mod tree;

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info, warn, LevelFilter};

use cli::Cli;
use grammar::Grammar;
use matcher::{Matcher, Parse};

const REJECTED: u8 = 1;
const FAILED: u8 = 2;

fn init_logger(cli: &Cli) {
    let mut builder = pretty_env_logger::formatted_builder();

    if cli.quiet {
        builder.filter_level(LevelFilter::Off);
    } else if cli.verbose > 0 {
        builder.filter_level(match cli.verbose {
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace
        });
    } else if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    } else {
        builder.filter_level(LevelFilter::Warn);
    }

    builder.init();
}

fn load_grammar(cli: &Cli) -> Option<Grammar> {
    match &cli.grammar {
        Some(path) => match rules::parse_file(path) {
            Ok(grammar) => Some(grammar),
            Err(errors) => {
                let _ = error_handling::report(&mut io::stderr(), &errors);
                None
            }
        },
        None => {
            println!("Enter grammar rules (e.g. `S -> A | B` or `A -> {}`), then `done`:", grammar::EPSILON);
            let grammar = rules::read_rules(io::stdin().lock(), Path::new("<stdin>"), |error| {
                warn!("skipping rule at {}", error.location);
                let _ = error_handling::report(&mut io::stderr(), std::slice::from_ref(&error));
            });
            Some(grammar)
        }
    }
}

fn read_input(cli: &Cli) -> io::Result<String> {
    if let Some(input) = &cli.input {
        return Ok(input.clone());
    }

    print!("Enter a string to parse (tokens separated by spaces, or empty for {}): ", grammar::EPSILON);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(&cli);

    let Some(grammar) = load_grammar(&cli) else {
        return ExitCode::from(FAILED);
    };
    debug!("grammar:\n{}", grammar);
    debug!("terminals: {}", grammar.terminals().join(" "));

    let Some(start) = cli.start.as_deref().or(grammar.start_symbol()) else {
        eprintln!("The grammar has no rules");
        return ExitCode::from(FAILED);
    };

    let input = match read_input(&cli) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Could not read the input: {}", e);
            return ExitCode::from(FAILED);
        }
    };
    let tokens = matcher::tokenize(&input);

    let parse = Matcher::new(&grammar)
        .with_max_depth(cli.max_depth)
        .parse(start, &tokens);

    match parse {
        Ok(Parse::Accepted(tree)) => {
            println!("Valid string!");
            print!("{}", tree);
            debug!("matched tokens: {}", tree.terminals().join(" "));
            info!(
                "{} token(s), {} leaves ({} epsilon), {} levels deep",
                tokens.len(),
                tree.count_leaves(),
                tree.count_epsilons(),
                tree.depth()
            );

            if let Some(path) = &cli.dot {
                if let Err(e) = std::fs::write(path, tree.to_dot()) {
                    eprintln!("Could not write {}: {}", path.display(), e);
                    return ExitCode::from(FAILED);
                }
                info!("derivation tree written to {}", path.display());
            }

            ExitCode::SUCCESS
        }
        Ok(Parse::Rejected) => {
            println!("Invalid string!");
            ExitCode::from(REJECTED)
        }
        Err(e) => {
            let _ = error_handling::report_bare(&mut io::stderr(), "matcher", &e);
            ExitCode::from(FAILED)
        }
    }
}
