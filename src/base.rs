use crate::error::Result;

pub type Token = i32;

pub trait Tokenizer {
    fn encode(&self, text: &str) -> Result<Vec<Token>>;
    fn decode(&self, ids: &[Token]) -> Result<String>;
}
