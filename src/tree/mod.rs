/*
    This module holds derivation trees produced by the matcher
*/

mod dot;

use std::fmt::Display;

use itertools::{Itertools, Position};

use crate::grammar::{Symbol, EPSILON};

// A terminal match is a leaf. An epsilon match is a node with a single `ε`
// leaf under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationNode {
    pub symbol: Symbol,
    pub children: Vec<DerivationNode>,
}

impl DerivationNode {
    pub fn new(symbol: impl Into<Symbol>, children: Vec<DerivationNode>) -> Self {
        DerivationNode {
            symbol: symbol.into(),
            children
        }
    }

    pub fn leaf(symbol: impl Into<Symbol>) -> Self {
        Self::new(symbol, Vec::new())
    }

    pub fn epsilon(symbol: impl Into<Symbol>) -> Self {
        Self::new(symbol, vec![Self::leaf(EPSILON)])
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn is_epsilon_leaf(&self) -> bool {
        self.is_leaf() && self.symbol == EPSILON
    }

    // Terminal matches and epsilon placeholders alike
    pub fn count_leaves(&self) -> usize {
        if self.is_leaf() {
            return 1;
        }
        self.children.iter().map(DerivationNode::count_leaves).sum()
    }

    pub fn count_epsilons(&self) -> usize {
        if self.is_epsilon_leaf() {
            return 1;
        }
        self.children.iter().map(DerivationNode::count_epsilons).sum()
    }

    // The matched tokens, read left to right
    pub fn terminals(&self) -> Vec<&str> {
        let mut terminals = Vec::new();
        self.collect_terminals(&mut terminals);
        terminals
    }

    fn collect_terminals<'a>(&'a self, terminals: &mut Vec<&'a str>) {
        if self.is_leaf() {
            if !self.is_epsilon_leaf() {
                terminals.push(&self.symbol);
            }
            return;
        }
        for child in &self.children {
            child.collect_terminals(terminals);
        }
    }

    // Number of nonterminal levels; a lone leaf has depth 0
    pub fn depth(&self) -> usize {
        match self.children.iter().map(DerivationNode::depth).max() {
            Some(deepest) => deepest + 1,
            None => 0
        }
    }

    fn fmt_children(&self, f: &mut std::fmt::Formatter<'_>, prefix: &str) -> std::fmt::Result {
        for (position, child) in self.children.iter().with_position() {
            let last = matches!(position, Position::Last | Position::Only);
            writeln!(f, "{}{}{}", prefix, if last { "└── " } else { "├── " }, child.symbol)?;
            child.fmt_children(f, &format!("{}{}", prefix, if last { "    " } else { "│   " }))?;
        }
        Ok(())
    }
}

impl Display for DerivationNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.symbol)?;
        self.fmt_children(f, "")
    }
}
