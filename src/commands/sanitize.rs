//! Sanitize markup from a file or stdin

use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::sanitize::Sanitizer;
use crate::Site;

/// Sanitize `input` (stdin when `None`) and print the result
pub fn run(site: &Site, input: Option<&Path>) -> Result<()> {
    let raw = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let policy = site.policy();
    print!("{}", Sanitizer::new(&policy).clean(&raw));
    Ok(())
}
