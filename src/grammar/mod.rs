/*
    This module is for storing and querying grammars
*/

use std::collections::HashMap;
use std::fmt::Display;

use itertools::Itertools;
use log::debug;

use crate::rules;

// Symbols are plain strings. Whether one is a terminal or a nonterminal is
// decided by `Grammar::is_nonterminal` alone.
pub type Symbol = String;

// Stands for the empty string. Never matched against an input token.
pub const EPSILON: &str = "ε";

// The symbols of a single alternative. Never empty; the epsilon production is
// the lone epsilon marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production(Vec<Symbol>);

impl Production {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        debug_assert!(!symbols.is_empty(), "productions need at least one symbol");
        Production(symbols)
    }

    pub fn epsilon() -> Self {
        Production(vec![EPSILON.to_string()])
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(&self.0[..], [symbol] if symbol == EPSILON)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

#[derive(Debug, Default)]
pub struct Grammar {
    // Fixed by the first rule ever added
    start_symbol: Option<Symbol>,
    rules: HashMap<Symbol, Vec<Production>>,
    // Heads in the order they were first declared, for display
    heads: Vec<Symbol>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    // Parses `text` as `HEAD -> BODY | BODY ...` and adds its productions.
    // On error the grammar is left untouched.
    //
    // Besides a missing `->`, an empty head or an empty alternative, a rule is
    // also refused when it has a second `->`, a `|` before the `->`, a head of
    // more than one symbol, `ε` as its head, or `ε` next to other symbols in
    // one alternative.
    pub fn add_rule(&mut self, text: &str) -> rules::Result<()> {
        let rule = rules::parse_rule(text)?;
        self.insert_rule(rule);
        Ok(())
    }

    pub fn insert_rule(&mut self, rule: rules::Rule) {
        let rules::Rule { head, productions } = rule;

        if self.start_symbol.is_none() {
            debug!("start symbol is `{}`", head);
            self.start_symbol = Some(head.clone());
        }

        debug!("adding {} production(s) for `{}`", productions.len(), head);
        if !self.rules.contains_key(&head) {
            self.heads.push(head.clone());
        }
        self.rules.entry(head).or_default().extend(productions);
    }

    pub fn start_symbol(&self) -> Option<&str> {
        self.start_symbol.as_deref()
    }

    pub fn is_nonterminal(&self, symbol: &str) -> bool {
        self.rules.contains_key(symbol)
    }

    // Empty for terminals
    pub fn productions_for(&self, symbol: &str) -> &[Production] {
        self.rules.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    // Every symbol used in a body that has no productions, in order of first
    // appearance
    pub fn terminals(&self) -> Vec<&str> {
        self.heads.iter()
            .flat_map(|head| self.productions_for(head))
            .flat_map(Production::symbols)
            .map(String::as_str)
            .filter(|symbol| *symbol != EPSILON && !self.is_nonterminal(symbol))
            .unique()
            .collect()
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for head in &self.heads {
            writeln!(f, "{} -> {}", head, self.productions_for(head).iter().join(" | "))?;
        }
        Ok(())
    }
}
