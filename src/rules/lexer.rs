use itertools::{multipeek, MultiPeek};

#[derive(PartialEq, Debug)]
pub enum Token {
    Arrow,
    Or,
    Symbol(String)
}

// Looks two characters ahead without consuming anything
fn at_arrow(line: &mut MultiPeek<impl Iterator<Item = char>>) -> bool {
    line.reset_peek();
    let first = line.peek().copied();
    let second = line.peek().copied();
    line.reset_peek();
    first == Some('-') && second == Some('>')
}

pub fn lex_symbol(line: &mut MultiPeek<impl Iterator<Item = char>>) -> Token {
    let mut text = String::new();

    while !at_arrow(line) {
        match line.peek() {
            Some(&c) if !c.is_whitespace() && c != '|' => {
                text.push(c);
                line.next();
            }
            _ => break
        }
    }

    Token::Symbol(text)
}

pub fn lex_line(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    let mut line_chars = multipeek(line.chars());

    loop {
        if at_arrow(&mut line_chars) {
            line_chars.next();
            line_chars.next();
            tokens.push(Token::Arrow);
            continue;
        }

        let Some(&c) = line_chars.peek() else {
            break;
        };

        if c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if c.is_whitespace() {
            line_chars.next();
        } else {
            tokens.push(lex_symbol(&mut line_chars));
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn t_symbol(text: &str) -> Token {
        Token::Symbol(text.to_string())
    }

    #[test]
    fn lex_normal_symbol() {
        let lines = vec![
            "alpha bravo charlie",
            "delta",
            "x|y",
            "lhs->rhs",
            "a-b"
        ];
        // (result from the function, rest of the iterator)
        let answers = vec![
            (t_symbol("alpha"), " bravo charlie"),
            (t_symbol("delta"), ""),
            (t_symbol("x"), "|y"),
            (t_symbol("lhs"), "->rhs"),
            (t_symbol("a-b"), "")
        ];

        for (line, (answer_token, answer_rest)) in zip(lines, answers) {
            let mut chars = multipeek(line.chars());
            assert_eq!(lex_symbol(&mut chars), answer_token);
            assert_eq!(chars.collect::<String>(), answer_rest);
        }
    }

    #[test]
    fn lex_normal_line() {
        let lines = vec![
            "S -> a S | ε",
            "E->T + E|T",
            "  F ->  ( E )   |   x  "
        ];
        let answers = vec![
            vec![
                t_symbol("S"),
                Token::Arrow,
                t_symbol("a"),
                t_symbol("S"),
                Token::Or,
                t_symbol("ε")
            ],
            vec![
                t_symbol("E"),
                Token::Arrow,
                t_symbol("T"),
                t_symbol("+"),
                t_symbol("E"),
                Token::Or,
                t_symbol("T")
            ],
            vec![
                t_symbol("F"),
                Token::Arrow,
                t_symbol("("),
                t_symbol("E"),
                t_symbol(")"),
                Token::Or,
                t_symbol("x")
            ]
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(lex_line(line), answer)
        }
    }

    #[test]
    fn lex_separators_only() {
        assert!(lex_line("").is_empty());
        assert_eq!(lex_line("->||->"), vec![Token::Arrow, Token::Or, Token::Or, Token::Arrow]);
        assert_eq!(lex_line("- >"), vec![t_symbol("-"), t_symbol(">")]);
    }
}
