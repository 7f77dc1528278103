use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::base::Token;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unknown encoding scheme: {0:?}")]
    UnknownScheme(String),

    #[error("bad vocabulary file {} (line {line}): {reason}", path.display())]
    Vocab {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("token {0} is not in the vocabulary")]
    UnknownToken(Token),

    #[error("byte {0:#04x} has no rank in the vocabulary")]
    UnencodableByte(u8),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] fancy_regex::Error),
}
