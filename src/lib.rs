pub mod base;
pub mod encoding;
pub mod error;
pub mod strip;

pub use base::{Token, Tokenizer};
pub use encoding::Encoding;
pub use error::{Error, Result};
pub use strip::{StripOutcome, Stripper};
