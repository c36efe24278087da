//! Handlers behind the CLI subcommands.

pub mod anki;
pub mod chat;
pub mod notion;
pub mod parse;
pub mod settings;

use anyhow::Context;
use std::io::Read;
use std::path::Path;

/// Reads model output from a file, or from stdin when `source` is `-`.
pub fn read_input(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading model output from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(Path::new(source)).with_context(|| format!("reading {source}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_input_loads_file_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("reply.md");
        std::fs::write(&path, "### Topic").expect("write");

        let text = read_input(path.to_str().expect("utf8 path")).expect("read");
        assert_eq!(text, "### Topic");
    }

    #[test]
    fn read_input_reports_missing_file() {
        let error = read_input("/definitely/not/here.md").expect_err("missing");
        assert!(error.to_string().contains("/definitely/not/here.md"));
    }
}
