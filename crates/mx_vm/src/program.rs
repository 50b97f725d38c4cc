//! Program loading from the hex-token text format.
//!
//! A program file is a list of base-16 byte tokens separated by single
//! spaces, e.g. `D1 2A D2 05 00`. Surrounding whitespace is ignored;
//! anything else that is not a byte token is an error.

use std::fmt;
use std::fs;
use std::ops::Deref;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Largest program the 8-bit program counter can address.
pub const MAX_PROGRAM_LEN: usize = 256;

#[derive(Error, Debug)]
pub enum ProgramError {
    #[error("invalid byte token {token:?} at position {index}")]
    InvalidToken { index: usize, token: String },
    #[error("program is {len} bytes, at most {max} are addressable", max = MAX_PROGRAM_LEN)]
    TooLong { len: usize },
    #[error("read program: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte image of a program, at most [`MAX_PROGRAM_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program(Vec<u8>);

impl Program {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ProgramError> {
        if bytes.len() > MAX_PROGRAM_LEN {
            return Err(ProgramError::TooLong { len: bytes.len() });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Content id of the byte image: `b3:` + hex BLAKE3.
    pub fn cid(&self) -> String {
        let hash = blake3::hash(&self.0);
        format!("b3:{}", hex::encode(hash.as_bytes()))
    }
}

impl Deref for Program {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Program {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

/// Parses hex-token text into a program.
///
/// Leading and trailing spaces, tabs, CR and LF are trimmed, then the text is
/// split on single spaces. Two spaces in a row produce an empty token, which
/// is rejected like any other malformed token.
pub fn parse_hex(text: &str) -> Result<Program, ProgramError> {
    let trimmed = text.trim_matches(&[' ', '\r', '\n', '\t'][..]);
    let bytes = trimmed
        .split(' ')
        .enumerate()
        .map(|(index, token)| {
            parse_token(token).ok_or_else(|| ProgramError::InvalidToken {
                index,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<u8>, _>>()?;
    Program::from_bytes(bytes)
}

/// Reads and parses a program file.
pub fn load(path: impl AsRef<Path>) -> Result<Program, ProgramError> {
    let text = fs::read_to_string(path)?;
    parse_hex(&text)
}

fn parse_token(token: &str) -> Option<u8> {
    // from_str_radix alone would also take a leading '+'
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(token, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens() {
        let p = parse_hex("D1 2A D2 05 00").unwrap();
        assert_eq!(p.as_bytes(), &[0xD1, 0x2A, 0xD2, 0x05, 0x00]);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let p = parse_hex("\t  c1 01 00\r\n").unwrap();
        assert_eq!(&*p, &[0xC1, 0x01, 0x00]);
    }

    #[test]
    fn accepts_short_and_zero_padded_tokens() {
        let p = parse_hex("0 f 00FF").unwrap();
        assert_eq!(&*p, &[0x00, 0x0F, 0xFF]);
    }

    #[test]
    fn rejects_bad_tokens() {
        for (text, bad_index) in [
            ("D1 2G", 1),
            ("100", 0),
            ("+1", 0),
            ("0x10", 0),
            ("C2  00", 1),
            ("C2\n00", 0),
        ] {
            match parse_hex(text) {
                Err(ProgramError::InvalidToken { index, .. }) => {
                    assert_eq!(index, bad_index, "{text:?}")
                }
                other => panic!("{text:?}: expected InvalidToken, got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_input_is_one_empty_token() {
        match parse_hex(" \n") {
            Err(ProgramError::InvalidToken { index, token }) => {
                assert_eq!(index, 0);
                assert!(token.is_empty());
            }
            other => panic!("expected InvalidToken, got {other:?}"),
        }
    }

    #[test]
    fn length_limit() {
        let max = vec!["00"; MAX_PROGRAM_LEN].join(" ");
        assert_eq!(parse_hex(&max).unwrap().len(), MAX_PROGRAM_LEN);

        let over = vec!["00"; MAX_PROGRAM_LEN + 1].join(" ");
        assert!(matches!(
            parse_hex(&over),
            Err(ProgramError::TooLong { len }) if len == MAX_PROGRAM_LEN + 1
        ));
    }

    #[test]
    fn display_round_trips() {
        let p: Program = "d1 2a 0 ff".parse().unwrap();
        assert_eq!(p.to_string(), "D1 2A 00 FF");
        assert_eq!(p.to_string().parse::<Program>().unwrap(), p);
    }

    #[test]
    fn cid_is_stable() {
        let a = parse_hex("D1 2A 00").unwrap();
        let b = parse_hex("d1 2a 00\n").unwrap();
        assert_eq!(a.cid(), b.cid());
        assert!(a.cid().starts_with("b3:"));
        assert_eq!(a.cid().len(), 3 + 64);
        assert_ne!(a.cid(), parse_hex("D1 2B 00").unwrap().cid());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load("/nonexistent/mxcpu/program.hex").unwrap_err();
        assert!(matches!(err, ProgramError::Io(_)));
    }
}
