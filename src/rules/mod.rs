/*
    This module reads grammar rules of the form `HEAD -> BODY | BODY ...`
*/

mod lexer;

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error_handling::*;
use crate::grammar::*;
use itertools::Itertools;
use lexer::*;

#[derive(Debug)]
pub enum RuleErrorType {
    // A rule has no `->` separating its head from its body
    MissingArrow,
    // A rule has more than one `->`
    UnexpectedArrow,
    // An alternative separator shows up before the `->`
    UnexpectedOr,
    // Nothing before the `->`
    EmptyHead,
    // More than one symbol before the `->`
    CompoundHead(String),
    // The epsilon marker cannot have productions of its own
    EpsilonHead,
    // An alternative with no symbols in it (1-based position in the body)
    EmptyAlternative(usize),
    // The epsilon marker has to stand alone in its alternative
    MisplacedEpsilon(usize),
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for RuleErrorType {}

impl PartialEq for RuleErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RuleErrorType::FileError(a), RuleErrorType::FileError(b)) => a.kind() == b.kind(),
            (RuleErrorType::CompoundHead(a), RuleErrorType::CompoundHead(b)) => a == b,
            (RuleErrorType::EmptyAlternative(a), RuleErrorType::EmptyAlternative(b)) => a == b,
            (RuleErrorType::MisplacedEpsilon(a), RuleErrorType::MisplacedEpsilon(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other)
        }
    }
}

impl Display for RuleErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleErrorType::MissingArrow => write!(f, "Expected `->` between the head and the body of the rule"),
            RuleErrorType::UnexpectedArrow => write!(f, "Unexpected second `->` encountered"),
            RuleErrorType::UnexpectedOr => write!(f, "Unexpected `|` before `->`"),
            RuleErrorType::EmptyHead => write!(f, "Rule has no head symbol"),
            RuleErrorType::CompoundHead(head) => write!(f, "Rule head `{}` must be a single symbol", head),
            RuleErrorType::EpsilonHead => write!(f, "`{}` cannot be the head of a rule", EPSILON),
            RuleErrorType::EmptyAlternative(n) => write!(f, "Alternative {} is empty (write `{}` for the empty string)", n, EPSILON),
            RuleErrorType::MisplacedEpsilon(n) => write!(f, "Alternative {} mixes `{}` with other symbols", n, EPSILON),
            RuleErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type RuleError = Error<RuleErrorType>;
pub type RuleErrors = Errors<RuleErrorType>;

fn io_error(error: std::io::Error, source: &Path, line: usize) -> RuleError {
    RuleError::new(Location::new(source, line), RuleErrorType::FileError(error))
}

pub type Result<T> = std::result::Result<T, RuleErrorType>;
pub type FileResult<T> = std::result::Result<T, RuleErrors>;

#[derive(PartialEq, Debug)]
pub struct Rule {
    pub head: Symbol,
    pub productions: Vec<Production>
}

// `index` is the 0-based position of the alternative within the body
fn parse_alternative(tokens: &[Token], index: usize) -> Result<Production> {
    let symbols: Vec<Symbol> = tokens.iter().map(|t| match t {
        Token::Arrow => Err(RuleErrorType::UnexpectedArrow),
        Token::Or => Err(RuleErrorType::UnexpectedOr),
        Token::Symbol(s) => Ok(s.clone())
    }).collect::<Result<_>>()?;

    if symbols.is_empty() {
        return Err(RuleErrorType::EmptyAlternative(index + 1));
    }
    if symbols == [EPSILON] {
        return Ok(Production::epsilon());
    }
    if symbols.iter().any(|s| s == EPSILON) {
        return Err(RuleErrorType::MisplacedEpsilon(index + 1));
    }

    Ok(Production::new(symbols))
}

fn parse_head(tokens: &[Token]) -> Result<Symbol> {
    if tokens.contains(&Token::Or) {
        return Err(RuleErrorType::UnexpectedOr);
    }

    let head = match tokens {
        [] => Err(RuleErrorType::EmptyHead),
        [Token::Symbol(s)] => Ok(s.clone()),
        _ => Err(RuleErrorType::CompoundHead(tokens.iter().map(|t| match t {
            Token::Symbol(s) => s.as_str(),
            _ => "?"
        }).join(" ")))
    }?;

    if head == EPSILON {
        return Err(RuleErrorType::EpsilonHead);
    }

    Ok(head)
}

pub fn parse_rule(text: &str) -> Result<Rule> {
    let tokens = lex_line(text);

    let arrows = tokens.iter().positions(|t| *t == Token::Arrow).collect_vec();
    let arrow = match arrows[..] {
        [] => return Err(RuleErrorType::MissingArrow),
        [arrow] => arrow,
        _ => return Err(RuleErrorType::UnexpectedArrow)
    };

    let head = parse_head(&tokens[..arrow])?;
    let productions = tokens[arrow + 1..]
        .split(|t| *t == Token::Or)
        .enumerate()
        .map(|(index, alternative)| parse_alternative(alternative, index))
        .collect::<Result<Vec<_>>>()?;

    Ok(Rule {
        head,
        productions
    })
}

fn is_rule_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with(';')
}

// Marks the end of the grammar when rules are typed in by hand
pub fn is_terminator(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("done")
}

// Builds a grammar from the lines of `reader` until it runs out or a `done`
// line shows up. Bad rules are handed to `report` and skipped, so the rules
// before and after them still make it into the grammar.
pub fn read_rules<R: BufRead>(reader: R, source: &Path, mut report: impl FnMut(RuleError)) -> Grammar {
    let mut grammar = Grammar::new();

    for (num, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                report(io_error(e, source, num + 1));
                break;
            }
        };

        if is_terminator(&line) {
            break;
        }
        if !is_rule_line(&line) {
            continue;
        }

        if let Err(error) = grammar.add_rule(&line) {
            report(RuleError::new(Location::new(source, num + 1), error));
        }
    }

    grammar
}

pub fn parse_file(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path, 0)])?;

    let mut errors = Vec::new();
    let grammar = read_rules(BufReader::new(file), path, |error| errors.push(error));

    if errors.is_empty() {
        Ok(grammar)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::iter::zip;
    use std::path::PathBuf;

    use super::*;

    fn production(text: &str) -> Production {
        Production::new(text.split_whitespace().map(str::to_string).collect())
    }

    #[test]
    fn parse_normal_rule() {
        let lines = vec![
            "S -> a S | ε",
            "E -> T + E | T",
            "noun.phrase -> adjective noun"
        ];
        let answers = vec![
            Rule {
                head: "S".to_string(),
                productions: vec![production("a S"), Production::epsilon()]
            },
            Rule {
                head: "E".to_string(),
                productions: vec![production("T + E"), production("T")]
            },
            Rule {
                head: "noun.phrase".to_string(),
                productions: vec![production("adjective noun")]
            }
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(parse_rule(line), Ok(answer));
        }
    }

    #[test]
    fn parse_malformed_rule() {
        let lines = vec![
            "S a b",
            "",
            "S -> a -> b",
            "S | T -> a",
            " -> a",
            "S T -> a",
            "ε -> a",
            "S ->",
            "S -> a | | b",
            "S -> a |",
            "S -> a ε b"
        ];
        let answers = vec![
            RuleErrorType::MissingArrow,
            RuleErrorType::MissingArrow,
            RuleErrorType::UnexpectedArrow,
            RuleErrorType::UnexpectedOr,
            RuleErrorType::EmptyHead,
            RuleErrorType::CompoundHead("S T".to_string()),
            RuleErrorType::EpsilonHead,
            RuleErrorType::EmptyAlternative(1),
            RuleErrorType::EmptyAlternative(2),
            RuleErrorType::EmptyAlternative(2),
            RuleErrorType::MisplacedEpsilon(1)
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(parse_rule(line), Err(answer), "rule `{}`", line);
        }
    }

    #[test]
    fn read_rules_until_done() {
        let text = "; palindromes over a and b\n\
                    P -> a P a | b P b | ε\n\
                    \n\
                    P -> a | b\n\
                    DONE\n\
                    Q -> q\n";
        let mut errors = Vec::new();
        let grammar = read_rules(Cursor::new(text), Path::new("<stdin>"), |e| errors.push(e));

        assert!(errors.is_empty());
        assert_eq!(grammar.start_symbol(), Some("P"));
        assert_eq!(grammar.productions_for("P"), &[
            production("a P a"),
            production("b P b"),
            Production::epsilon(),
            production("a"),
            production("b")
        ]);
        assert!(!grammar.is_nonterminal("Q"));
    }

    #[test]
    fn read_rules_skips_bad_lines() {
        let text = "S -> A B\nA a\nA -> a\nB -> b | |\nB -> b\n";
        let mut errors = Vec::new();
        let grammar = read_rules(Cursor::new(text), Path::new("<stdin>"), |e| errors.push(e));

        assert_eq!(errors, vec![
            RuleError {
                location: Location::new("<stdin>", 2),
                error: RuleErrorType::MissingArrow
            },
            RuleError {
                location: Location::new("<stdin>", 4),
                error: RuleErrorType::EmptyAlternative(2)
            }
        ]);
        assert_eq!(grammar.productions_for("A"), &[production("a")]);
        assert_eq!(grammar.productions_for("B"), &[production("b")]);
    }

    #[test]
    fn parse_normal_file() {
        let example_path = PathBuf::from("example_data/expression.cfg");
        let grammar = parse_file(&example_path).unwrap();

        assert_eq!(grammar.start_symbol(), Some("E"));
        assert_eq!(grammar.productions_for("E"), &[production("T + E"), production("T")]);
        assert_eq!(grammar.productions_for("T"), &[production("F * T"), production("F")]);
        assert_eq!(grammar.productions_for("F"), &[production("( E )"), production("x")]);
    }

    #[test]
    fn parse_file_with_terminator() {
        let example_path = PathBuf::from("example_data/anbn.cfg");
        let grammar = parse_file(&example_path).unwrap();

        assert_eq!(grammar.start_symbol(), Some("S"));
        assert_eq!(grammar.productions_for("S"), &[production("a S b"), Production::epsilon()]);
    }

    #[test]
    fn parse_malformed_file() {
        let example_path = PathBuf::from("example_data/malformed.cfg");
        let errors = parse_file(&example_path).unwrap_err();

        assert_eq!(errors, vec![
            RuleError {
                location: Location::new(&example_path, 3),
                error: RuleErrorType::MissingArrow
            },
            RuleError {
                location: Location::new(&example_path, 5),
                error: RuleErrorType::EmptyAlternative(2)
            }
        ]);
    }

    #[test]
    fn parse_missing_file() {
        let example_path = PathBuf::from("example_data/does_not_exist.cfg");
        let errors = parse_file(&example_path).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location, Location::new(&example_path, 0));
        assert_eq!(errors[0].error, RuleErrorType::FileError(std::io::ErrorKind::NotFound.into()));
    }
}
