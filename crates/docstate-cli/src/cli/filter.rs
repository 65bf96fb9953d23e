//! The `encrypt`/`decrypt` commands: the text filter pair.

use anyhow::{Context, Result};
use clap::Args;

use docstate_infra::crypto::aescbc;

/// Arguments shared by `encrypt` and `decrypt`.
///
/// No `Debug` derive: the key must never reach log or error output.
#[derive(Args)]
pub struct FilterArgs {
    /// Cipher key. Keys shorter than 32 bytes are deterministically
    /// extended, which weakens them; prefer a full-length key.
    #[arg(long, env = "DOCSTATE_FILTER_KEY", hide_env_values = true)]
    pub key: String,

    /// The value to transform, or `-` to read it from stdin.
    pub value: String,
}

pub fn run_encrypt(args: FilterArgs, json: bool) -> Result<()> {
    let plaintext = read_value(&args.value)?;
    let blob = aescbc::encrypt(&plaintext, &args.key);
    print_value(&blob, json)
}

pub fn run_decrypt(args: FilterArgs, json: bool) -> Result<()> {
    let blob = read_value(&args.value)?;
    let plaintext = aescbc::decrypt(&blob, &args.key)?;
    print_value(&plaintext, json)
}

fn read_value(arg: &str) -> Result<String> {
    if arg == "-" {
        let text =
            std::io::read_to_string(std::io::stdin()).context("failed to read value from stdin")?;
        // Trailing newline from `echo`-style pipes is never part of the value.
        Ok(text.trim_end_matches(['\r', '\n']).to_string())
    } else {
        Ok(arg.to_string())
    }
}

fn print_value(value: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({ "value": value }));
    } else {
        println!("{value}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_inline_value() {
        assert_eq!(read_value("plain text").unwrap(), "plain text");
    }

    #[test]
    fn test_inline_value_keeps_whitespace() {
        // Only the stdin path trims; inline argv values are taken verbatim.
        assert_eq!(read_value("padded  ").unwrap(), "padded  ");
    }
}
