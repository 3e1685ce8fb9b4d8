use anyhow::Context;
use arboard::Clipboard;

pub fn copy_text(text: &str) -> anyhow::Result<()> {
    let mut clipboard = Clipboard::new().context("clipboard is not available")?;
    clipboard
        .set_text(text.to_string())
        .context("clipboard write failed")?;
    tracing::debug!(bytes = text.len(), "copied email draft to clipboard");
    Ok(())
}
