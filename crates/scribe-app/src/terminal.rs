use std::io::{self, Write};

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use scribe_services::Clipboard;

/// Clipboard writes through the OSC 52 escape sequence understood by most
/// terminal emulators.
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(osc52_sequence(text).as_bytes())
            .context("failed to write clipboard sequence")?;
        stdout.flush().context("failed to flush stdout")?;
        Ok(())
    }
}

fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", BASE64.encode(text))
}
