use std::fmt::{Debug, Display};
use std::io::Write;
use std::path::PathBuf;

pub trait ErrorType: Display + PartialEq {}

// Where a rule came from. Line 0 means the whole source (e.g. it could not be
// opened at all).
#[derive(Debug, PartialEq, Clone)]
pub struct Location {
    pub source: PathBuf,
    pub line: usize
}

impl Location {
    pub fn new(source: impl Into<PathBuf>, line: usize) -> Self {
        Location {
            source: source.into(),
            line
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            0 => write!(f, "{}", self.source.display()),
            line => write!(f, "{}:{}", self.source.display(), line)
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T
}

impl<T: ErrorType> Error<T> {
    pub fn new(location: Location, error: T) -> Self {
        Error { location, error }
    }
}

const RED: &str = "\x1b[31;49;1m";
const BOLD: &str = "\x1b[39;49;1m";
const RESET: &str = "\x1b[0m";

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]{}  {}{}", RED, self.location, BOLD, self.error, RESET)
    }
}

impl<T: ErrorType + Debug> std::error::Error for Error<T> {}

pub type Errors<T> = Vec<Error<T>>;

// Errors without a location (the matcher works on tokens, not lines) are
// tagged with `what` instead
pub fn report_bare(out: &mut impl Write, what: &str, error: &impl ErrorType) -> std::io::Result<()> {
    writeln!(out, "{}[{}]{}  {}{}", RED, what, BOLD, error, RESET)
}

pub fn report<T: ErrorType>(out: &mut impl Write, errors: &[Error<T>]) -> std::io::Result<()> {
    for error in errors {
        writeln!(out, "{}", error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Oops;

    impl Display for Oops {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "oops")
        }
    }

    impl ErrorType for Oops {}

    fn plain(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
            .replace(RED, "")
            .replace(BOLD, "")
            .replace(RESET, "")
    }

    #[test]
    fn location_display() {
        assert_eq!(Location::new("rules.cfg", 3).to_string(), "rules.cfg:3");
        assert_eq!(Location::new("rules.cfg", 0).to_string(), "rules.cfg");
    }

    #[test]
    fn report_lists_every_error() {
        let errors = vec![
            Error::new(Location::new("<stdin>", 2), Oops),
            Error::new(Location::new("rules.cfg", 0), Oops)
        ];
        let mut out = Vec::new();
        report(&mut out, &errors).unwrap();

        assert_eq!(plain(out), "[<stdin>:2]  oops\n[rules.cfg]  oops\n");
    }

    #[test]
    fn report_bare_uses_tag() {
        let mut out = Vec::new();
        report_bare(&mut out, "matcher", &Oops).unwrap();

        assert_eq!(plain(out), "[matcher]  oops\n");
    }

    #[test]
    fn errors_box_into_std_error() {
        let boxed: Box<dyn std::error::Error> = Box::new(Error::new(Location::new("x", 1), Oops));

        assert!(boxed.to_string().contains("oops"));
    }
}
