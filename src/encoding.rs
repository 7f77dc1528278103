use std::fs;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose};
use fancy_regex::Regex;
use indexmap::IndexMap;
use lazy_static::lazy_static;

use crate::base::{Token, Tokenizer};
use crate::error::{Error, Result};

const CL100K_SPLIT_PATTERN: &str = r"'(?i:[sdmt]|ll|ve|re)|[^\r\n\p{L}\p{N}]?+\p{L}+|\p{N}{1,3}| ?[^\s\p{L}\p{N}]++[\r\n]*|\s*[\r\n]|\s+(?!\S)|\s+";

const O200K_SPLIT_PATTERN: &str = concat!(
    r"[^\r\n\p{L}\p{N}]?[\p{Lu}\p{Lt}\p{Lm}\p{Lo}\p{M}]*[\p{Ll}\p{Lm}\p{Lo}\p{M}]+(?i:'s|'t|'re|'ve|'m|'ll|'d)?",
    r"|[^\r\n\p{L}\p{N}]?[\p{Lu}\p{Lt}\p{Lm}\p{Lo}\p{M}]+[\p{Ll}\p{Lm}\p{Lo}\p{M}]*(?i:'s|'t|'re|'ve|'m|'ll|'d)?",
    r"|\p{N}{1,3}",
    r"| ?[^\s\p{L}\p{N}]+[\r\n/]*",
    r"|\s*[\r\n]+",
    r"|\s+(?!\S)",
    r"|\s+",
);

struct Scheme {
    split_pattern: &'static str,
    vocab_file: &'static str,
}

lazy_static! {
    static ref SCHEMES: IndexMap<&'static str, Scheme> = IndexMap::from([
        (
            "cl100k_base",
            Scheme {
                split_pattern: CL100K_SPLIT_PATTERN,
                vocab_file: "cl100k_base.tiktoken",
            },
        ),
        (
            "o200k_base",
            Scheme {
                split_pattern: O200K_SPLIT_PATTERN,
                vocab_file: "o200k_base.tiktoken",
            },
        ),
    ]);
}

lazy_static! {
    static ref MODEL_TO_SCHEME: IndexMap<&'static str, &'static str> = IndexMap::from([
        ("gpt-4", "cl100k_base"),
        ("gpt-4-turbo", "cl100k_base"),
        ("gpt-3.5-turbo", "cl100k_base"),
        ("gpt-4o", "o200k_base"),
        ("gpt-4o-mini", "o200k_base"),
    ]);
}

/// Parse a `.tiktoken` vocabulary: one `base64(bytes) rank` pair per line.
fn load_ranks(path: &Path) -> Result<IndexMap<Vec<u8>, Token>> {
    let raw = fs::read_to_string(path)?;
    let bad_line = |line: usize, reason: String| Error::Vocab {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut ranks = IndexMap::default();
    for (i, line) in raw.lines().enumerate() {
        let line_no = i + 1;
        let mut parts = line.split(' ');
        let token = parts
            .next()
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| bad_line(line_no, "missing token".to_string()))
            .and_then(|raw| {
                general_purpose::STANDARD
                    .decode(raw)
                    .map_err(|e| bad_line(line_no, format!("bad base64: {e}")))
            })?;
        let rank: Token = parts
            .next()
            .ok_or_else(|| bad_line(line_no, "missing rank".to_string()))
            .and_then(|raw| {
                raw.parse()
                    .map_err(|e| bad_line(line_no, format!("bad rank: {e}")))
            })?;
        if rank < 0 {
            return Err(bad_line(
                line_no,
                format!("rank {rank} for token {token:?} is negative"),
            ));
        }
        ranks.insert(token, rank);
    }
    Ok(ranks)
}

/// Repeatedly merge the lowest-ranked adjacent pair until no pair of
/// parts concatenates to a known token.
fn byte_pair_merge(ranks: &IndexMap<Vec<u8>, Token>, chunk: &[u8]) -> Vec<Vec<u8>> {
    let mut parts: Vec<Vec<u8>> = Vec::with_capacity(chunk.len());
    for &b in chunk {
        parts.push(vec![b]);
    }

    loop {
        let mut min_idx = None;
        let mut min_rank = None;
        for (i, pair) in parts.windows(2).enumerate() {
            let rank = ranks.get(&[pair[0].clone(), pair[1].clone()].concat());
            if let Some(rank) = rank {
                if min_rank.is_none() || rank < min_rank.unwrap() {
                    min_idx = Some(i);
                    min_rank = Some(rank);
                }
            }
        }
        let Some(min_idx) = min_idx else {
            break;
        };
        parts[min_idx] = [parts[min_idx].clone(), parts[min_idx + 1].clone()].concat();
        parts.remove(min_idx + 1);
    }
    parts
}

#[derive(Debug)]
pub struct Encoding {
    name: &'static str,
    split_pattern: Regex,
    ranks: IndexMap<Vec<u8>, Token>,
    decoder: IndexMap<Token, Vec<u8>>,
}

impl Encoding {
    /// Look up the scheme a model tokenizes with, then load it.
    pub fn for_model(model: &str, vocab_dir: impl AsRef<Path>) -> Result<Self> {
        let scheme = MODEL_TO_SCHEME
            .get(model)
            .ok_or_else(|| Error::UnknownScheme(model.to_string()))?;
        Self::by_name(scheme, vocab_dir)
    }

    /// Load a scheme by its own name, e.g. `cl100k_base`.
    pub fn by_name(name: &str, vocab_dir: impl AsRef<Path>) -> Result<Self> {
        let (name, scheme) = SCHEMES
            .get_key_value(name)
            .map(|(&name, scheme)| (name, scheme))
            .ok_or_else(|| Error::UnknownScheme(name.to_string()))?;
        let ranks = load_ranks(&vocab_dir.as_ref().join(scheme.vocab_file))?;
        let decoder = ranks.iter().map(|(t, &r)| (r, t.clone())).collect();
        Ok(Encoding {
            name,
            split_pattern: Regex::new(scheme.split_pattern)?,
            ranks,
            decoder,
        })
    }

    pub fn name(&self) -> &str {
        self.name
    }

    fn encode_chunk(&self, chunk_bytes: &[u8]) -> Result<Vec<Token>> {
        if let Some(&rank) = self.ranks.get(chunk_bytes) {
            return Ok(vec![rank]);
        }
        byte_pair_merge(&self.ranks, chunk_bytes)
            .iter()
            .map(|part| {
                // after merging, only a byte missing from the
                // vocabulary can fail the lookup
                self.ranks
                    .get(part)
                    .copied()
                    .ok_or(Error::UnencodableByte(part[0]))
            })
            .collect()
    }
}

impl Tokenizer for Encoding {
    fn encode(&self, text: &str) -> Result<Vec<Token>> {
        let mut ids = Vec::new();
        for m in self.split_pattern.find_iter(text) {
            let chunk = m?.as_str();
            ids.extend(self.encode_chunk(chunk.as_bytes())?);
        }
        Ok(ids)
    }

    fn decode(&self, ids: &[Token]) -> Result<String> {
        let mut text_bytes = Vec::new();
        for &id in ids {
            let bytes = self.decoder.get(&id).ok_or(Error::UnknownToken(id))?;
            text_bytes.extend_from_slice(bytes);
        }
        Ok(String::from_utf8_lossy(&text_bytes).to_string())
    }
}
