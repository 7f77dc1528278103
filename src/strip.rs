use std::fs;
use std::io;
use std::path::Path;

use fancy_regex::{Regex, escape};
use log::{info, warn};

use crate::error::{Error, Result};

/// The retired template sentence, quotes included, exactly as it sits
/// in the source arrays.
pub const DEFAULT_TEMPLATE: &str = "\"Hello {firstName}, I just graduated in CS and have built scalable web & mobile applications. I'd be happy to connect and learn more about roles you're hiring for.\"";

pub const DEFAULT_FILES: [&str; 3] = ["content.js", "options.js", "background.js"];

#[derive(Debug, PartialEq, Eq)]
pub enum StripOutcome {
    Removed,
    NotFound,
}

pub struct Stripper {
    pattern: Regex,
}

impl Stripper {
    /// Build the removal pattern: a comma, optional whitespace, then
    /// the template sentence. The sentence is escaped wholesale so
    /// embedded quotes, braces and dots stay literal data.
    pub fn new(template: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r",\s*{}", escape(template)))?;
        Ok(Stripper { pattern })
    }

    /// Remove the first occurrence of the pattern from one file and
    /// rewrite it in place. Files without a match are not rewritten.
    pub fn strip_file(&self, path: impl AsRef<Path>) -> Result<StripOutcome> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match self.pattern.find(&content)? {
            None => Ok(StripOutcome::NotFound),
            Some(m) => {
                let mut stripped = String::with_capacity(content.len() - m.as_str().len());
                stripped.push_str(&content[..m.start()]);
                stripped.push_str(&content[m.end()..]);
                replace_file(path, &stripped)?;
                Ok(StripOutcome::Removed)
            }
        }
    }

    /// Process files strictly in order. Failures are isolated: a file
    /// that cannot be read is reported and skipped, and the rest of
    /// the list still runs. Returns how many files were modified.
    pub fn run(&self, files: &[String]) -> usize {
        let mut removed = 0;
        for file in files {
            match self.strip_file(file) {
                Ok(StripOutcome::Removed) => {
                    info!("removed template from {file}");
                    removed += 1;
                }
                Ok(StripOutcome::NotFound) => info!("pattern not found in {file}"),
                Err(Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                    warn!("file {file} not found")
                }
                Err(err) => warn!("error processing {file}: {err}"),
            }
        }
        removed
    }
}

/// Write the new content to a sibling temporary file, then rename it
/// over the original, so an interrupted run never leaves the target
/// half-written.
fn replace_file(path: &Path, content: &str) -> io::Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("stripped");
    let tmp = path.with_file_name(format!("{file_name}.tmp"));
    fs::write(&tmp, content)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    Ok(())
}
