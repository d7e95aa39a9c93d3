use arboard::Clipboard;
use intake_core::ClipboardSink;

/// System clipboard, opened lazily so a headless session still starts.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: String) -> Result<(), String> {
        if self.inner.is_none() {
            self.inner = Some(Clipboard::new().map_err(|err| err.to_string())?);
        }
        match self.inner.as_mut() {
            Some(clipboard) => clipboard.set_text(text).map_err(|err| err.to_string()),
            None => Err("clipboard unavailable".to_string()),
        }
    }
}
