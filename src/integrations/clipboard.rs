use anyhow::{Context, Result};
use arboard::Clipboard;
use tracing::info;

pub trait ClipboardWriter {
    fn copy_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard, opened on first copy so headless sessions only fail when
/// a copy is actually requested. The handle is kept for the writer's lifetime
/// because X11 selections vanish with their owner.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.handle.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().context("failed to access clipboard")?,
        };
        let clipboard = self.handle.insert(clipboard);
        clipboard
            .set_text(text)
            .context("failed to write clipboard")?;
        info!(chars = text.chars().count(), "copied text to clipboard");
        Ok(())
    }
}
