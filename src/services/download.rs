use anyhow::Result;
use async_trait::async_trait;

pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const JSON_MIME: &str = "application/json";

/// Content type for a saved file, by extension.
pub fn mime_for(filename: &str) -> &'static str {
    if filename.to_ascii_lowercase().ends_with(".json") {
        JSON_MIME
    } else {
        DOCX_MIME
    }
}

#[cfg(target_arch = "wasm32")]
pub trait SaverBounds {}
#[cfg(target_arch = "wasm32")]
impl<T> SaverBounds for T {}

#[cfg(not(target_arch = "wasm32"))]
pub trait SaverBounds: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> SaverBounds for T {}

/// Hands a downloaded document to the user.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FileSaver: SaverBounds {
    async fn save(&self, filename: &str, content: &[u8]) -> Result<()>;
}

// --- Native Implementation ---

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Context;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Writes documents into a local folder.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
impl FileSaver for DirectorySaver {
    async fn save(&self, filename: &str, content: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.path_for(filename);
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Saved {} ({} bytes)", path.display(), content.len());
        Ok(())
    }
}

// --- Web Implementation ---

#[cfg(target_arch = "wasm32")]
use anyhow::anyhow;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

/// Triggers a browser download through a temporary object URL.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct BrowserDownload;

#[cfg(target_arch = "wasm32")]
impl BrowserDownload {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl FileSaver for BrowserDownload {
    async fn save(&self, filename: &str, content: &[u8]) -> Result<()> {
        let window = web_sys::window().ok_or_else(|| anyhow!("No window"))?;
        let document = window.document().ok_or_else(|| anyhow!("No document"))?;
        let body = document.body().ok_or_else(|| anyhow!("No body"))?;

        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(content));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime_for(filename));
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| anyhow!("Blob error: {:?}", e))?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)
            .map_err(|e| anyhow!("Object URL error: {:?}", e))?;

        let anchor = document
            .create_element("a")
            .map_err(|e| anyhow!("Create anchor error: {:?}", e))?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| anyhow!("Element is not an anchor"))?;
        anchor.set_href(&url);
        anchor.set_download(filename);

        let appended = body.append_child(&anchor);
        if appended.is_ok() {
            anchor.click();
            let _ = body.remove_child(&anchor);
        }
        let _ = web_sys::Url::revoke_object_url(&url);

        appended.map_err(|e| anyhow!("Append error: {:?}", e))?;
        Ok(())
    }
}
