/*
    This module decides whether a grammar derives a token sequence, using
    top-down recursive descent with backtracking
*/

use std::fmt::Display;
use std::thread;

use log::trace;

use crate::error_handling::ErrorType;
use crate::grammar::*;
use crate::tree::DerivationNode;

// How deep the matcher may recurse before it gives up on a derivation
pub const DEFAULT_MAX_DEPTH: usize = 1024;

// Larger budgets are clamped to this
pub const MAX_DEPTH: usize = 1 << 15;

// Stack reserved for the matching thread: a fixed base plus room for each
// level of nesting, generous enough for unoptimised builds
const STACK_BASE: usize = 256 * 1024;
const STACK_PER_LEVEL: usize = 8 * 1024;

#[derive(Debug, PartialEq)]
pub enum MatchError {
    // The recursion budget ran out, usually because of left recursion
    StackExhausted {
        symbol: Symbol,
        position: usize,
        depth: usize
    },
    // The thread that runs the match could not be started
    NoStack {
        size: usize,
        reason: String
    },
}

impl ErrorType for MatchError {}

impl Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchError::StackExhausted { symbol, position, depth } => write!(
                f,
                "Gave up expanding `{}` at token {} after {} nested expansions (is the grammar left-recursive?)",
                symbol, position, depth
            ),
            MatchError::NoStack { size, reason } => write!(
                f,
                "Could not reserve {} bytes of stack for matching: {}",
                size, reason
            ),
        }
    }
}

pub type MatchResult<T> = Result<T, MatchError>;

#[derive(Debug, PartialEq)]
pub enum Parse {
    Accepted(DerivationNode),
    Rejected,
}

impl Parse {
    #[cfg(test)]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Parse::Accepted(_))
    }
}

// Result of a single attempt to derive a span starting at some position
#[derive(Debug, PartialEq)]
enum Outcome {
    Success {
        tree: DerivationNode,
        next: usize
    },
    Failure,
}

pub fn tokenize(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

pub struct Matcher<'g> {
    grammar: &'g Grammar,
    max_depth: usize,
}

impl<'g> Matcher<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Matcher {
            grammar,
            max_depth: DEFAULT_MAX_DEPTH
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH);
        self
    }

    fn stack_size(&self) -> usize {
        STACK_BASE + self.max_depth * STACK_PER_LEVEL
    }

    // Accepts only when `start` derives the whole token sequence. A match
    // that leaves tokens over is a rejection.
    //
    // Matching runs on its own thread with a stack sized from the depth
    // budget, so the budget runs out before the stack does no matter which
    // thread calls this.
    pub fn parse(&self, start: &str, tokens: &[String]) -> MatchResult<Parse> {
        let size = self.stack_size();

        thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name("matcher".to_string())
                .stack_size(size)
                .spawn_scoped(scope, || self.parse_in_place(start, tokens))
                .map_err(|e| MatchError::NoStack { size, reason: e.to_string() })?;

            worker.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
        })
    }

    fn parse_in_place(&self, start: &str, tokens: &[String]) -> MatchResult<Parse> {
        match self.match_symbol(start, tokens, 0, 0)? {
            Outcome::Success { tree, next } if next == tokens.len() => Ok(Parse::Accepted(tree)),
            Outcome::Success { next, .. } => {
                trace!("`{}` only covers {} of {} tokens", start, next, tokens.len());
                Ok(Parse::Rejected)
            }
            Outcome::Failure => Ok(Parse::Rejected),
        }
    }

    fn match_symbol(&self, symbol: &str, tokens: &[String], pos: usize, depth: usize) -> MatchResult<Outcome> {
        if depth >= self.max_depth {
            return Err(MatchError::StackExhausted {
                symbol: symbol.to_string(),
                position: pos,
                depth
            });
        }

        if !self.grammar.is_nonterminal(symbol) {
            return Ok(match_terminal(symbol, tokens, pos));
        }

        // First production to succeed wins, so declaration order decides
        // between ambiguous derivations
        for production in self.grammar.productions_for(symbol) {
            if production.is_epsilon() {
                trace!("{} -> {} at {}", symbol, EPSILON, pos);
                return Ok(Outcome::Success {
                    tree: DerivationNode::epsilon(symbol),
                    next: pos
                });
            }

            trace!("trying {} -> {} at {}", symbol, production, pos);
            if let Some((children, next)) = self.match_production(production, tokens, pos, depth)? {
                return Ok(Outcome::Success {
                    tree: DerivationNode::new(symbol, children),
                    next
                });
            }
            trace!("backtracking out of {} -> {} to {}", symbol, production, pos);
        }

        Ok(Outcome::Failure)
    }

    // Partial children are dropped as soon as one symbol fails
    fn match_production(&self, production: &Production, tokens: &[String], pos: usize, depth: usize) -> MatchResult<Option<(Vec<DerivationNode>, usize)>> {
        let mut children = Vec::with_capacity(production.symbols().len());
        let mut next = pos;

        for symbol in production.symbols() {
            match self.match_symbol(symbol, tokens, next, depth + 1)? {
                Outcome::Success { tree, next: after } => {
                    children.push(tree);
                    next = after;
                }
                Outcome::Failure => return Ok(None),
            }
        }

        Ok(Some((children, next)))
    }
}

fn match_terminal(symbol: &str, tokens: &[String], pos: usize) -> Outcome {
    match tokens.get(pos) {
        Some(token) if symbol != EPSILON && token == symbol => Outcome::Success {
            tree: DerivationNode::leaf(symbol),
            next: pos + 1
        },
        _ => Outcome::Failure,
    }
}
