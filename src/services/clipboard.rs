use anyhow::Result;
use async_trait::async_trait;

#[cfg(target_arch = "wasm32")]
pub trait ClipboardBounds {}
#[cfg(target_arch = "wasm32")]
impl<T> ClipboardBounds for T {}

#[cfg(not(target_arch = "wasm32"))]
pub trait ClipboardBounds: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> ClipboardBounds for T {}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ClipboardAccess: ClipboardBounds {
    /// Platform clipboard capability.
    async fn write_text(&self, text: &str) -> Result<()>;

    /// Legacy copy path, tried when `write_text` is unavailable or fails.
    fn copy_with_selection(&self, text: &str) -> Result<()>;
}

// --- Native Implementation ---

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Context;
#[cfg(not(target_arch = "wasm32"))]
use arboard::Clipboard;
#[cfg(not(target_arch = "wasm32"))]
use base64::{engine::general_purpose::STANDARD, Engine as _};
#[cfg(not(target_arch = "wasm32"))]
use std::io::Write;

/// OSC 52 "set clipboard" escape sequence for `text`.
#[cfg(not(target_arch = "wasm32"))]
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

/// Desktop clipboard through `arboard`, falling back to asking the terminal
/// via OSC 52.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct SystemClipboard;

#[cfg(not(target_arch = "wasm32"))]
impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
impl ClipboardAccess for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Clipboard unavailable")?;
        clipboard
            .set_text(text.to_string())
            .context("Clipboard write failed")?;
        log::debug!("Copied {} bytes to the system clipboard", text.len());
        Ok(())
    }

    fn copy_with_selection(&self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(osc52_sequence(text).as_bytes())
            .context("Failed to write OSC 52 sequence")?;
        stdout.flush()?;
        Ok(())
    }
}

// --- Web Implementation ---

#[cfg(target_arch = "wasm32")]
use anyhow::anyhow;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue};

/// `navigator.clipboard`, with the hidden-textarea `execCommand("copy")` fallback.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct BrowserClipboard;

#[cfg(target_arch = "wasm32")]
impl BrowserClipboard {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl ClipboardAccess for BrowserClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let window = web_sys::window().ok_or_else(|| anyhow!("No window"))?;
        let navigator = window.navigator();

        let available = js_sys::Reflect::has(&navigator, &JsValue::from_str("clipboard")).unwrap_or(false);
        if !available {
            return Err(anyhow!("Clipboard API unavailable"));
        }

        let promise = navigator.clipboard().write_text(text);
        wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|e| anyhow!("Clipboard write rejected: {:?}", e))?;
        Ok(())
    }

    fn copy_with_selection(&self, text: &str) -> Result<()> {
        let window = web_sys::window().ok_or_else(|| anyhow!("No window"))?;
        let document = window.document().ok_or_else(|| anyhow!("No document"))?;
        let body = document.body().ok_or_else(|| anyhow!("No body"))?;

        let textarea = document
            .create_element("textarea")
            .map_err(|e| anyhow!("Create textarea error: {:?}", e))?
            .dyn_into::<web_sys::HtmlTextAreaElement>()
            .map_err(|_| anyhow!("Element is not a textarea"))?;
        textarea.set_value(text);
        let style = textarea.style();
        let _ = style.set_property("position", "fixed");
        let _ = style.set_property("opacity", "0");

        body.append_child(&textarea)
            .map_err(|e| anyhow!("Append error: {:?}", e))?;
        textarea.select();

        let copied = document
            .dyn_ref::<web_sys::HtmlDocument>()
            .ok_or_else(|| anyhow!("Document does not support execCommand"))
            .and_then(|doc| {
                doc.exec_command("copy")
                    .map_err(|e| anyhow!("execCommand error: {:?}", e))
            });
        let _ = body.remove_child(&textarea);

        match copied? {
            true => Ok(()),
            false => Err(anyhow!("execCommand(\"copy\") was refused")),
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
        assert_eq!(osc52_sequence(""), "\x1b]52;c;\x07");
    }

    #[test]
    fn test_osc52_sequence_encodes_utf8() {
        assert_eq!(osc52_sequence("한"), "\x1b]52;c;7ZWc\x07");
    }

    #[tokio::test]
    async fn test_write_reports_or_succeeds() {
        // Headless runners have no display; either way the result is a plain Result
        let clipboard = SystemClipboard::new();
        if let Err(e) = clipboard.write_text("storyboard").await {
            assert!(format!("{:#}", e).starts_with("Clipboard"));
        }
    }
}
