//! Decoded icon handles, shared between frames.
use iced::widget::{image, svg};
use indexmap::IndexMap;

use crate::{IconRef, Task, icon::IconError};

/// Pixel size used when wrapping inline vector fragments into a document.
const VECTOR_DOCUMENT_SIZE: f32 = 64.0;

/// Load status of one icon.
#[derive(Debug, Clone)]
pub enum LoadedIcon {
    Raster(image::Handle),
    Vector(svg::Handle),
    /// A remote fetch is in flight.
    Pending,
    /// Loading failed; the marker is drawn without an icon.
    Failed,
}

/// Cache keyed by icon reference. Built-in shapes are drawn directly and never cached.
#[derive(Debug, Default)]
pub struct IconCache {
    entries: IndexMap<IconRef, LoadedIcon>,
}

impl IconCache {
    pub fn get(&self, icon: &IconRef) -> Option<&LoadedIcon> {
        self.entries.get(icon)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bring the cache in line with `tasks`.
    ///
    /// Local payloads are decoded right away. Remote icons are marked pending and their
    /// URLs returned so the caller can start fetching them. Entries no task uses are dropped.
    pub fn sync(&mut self, tasks: &[Task]) -> Vec<String> {
        self.entries
            .retain(|icon, _| tasks.iter().any(|task| &task.icon == icon));

        let mut fetches = Vec::new();
        for task in tasks {
            if matches!(task.icon, IconRef::Builtin(_)) || self.entries.contains_key(&task.icon) {
                continue;
            }
            let loaded = match &task.icon {
                IconRef::Remote(url) => {
                    fetches.push(url.clone());
                    LoadedIcon::Pending
                }
                local => decode_local(local).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "failed to decode icon");
                    LoadedIcon::Failed
                }),
            };
            self.entries.insert(task.icon.clone(), loaded);
        }
        fetches
    }

    /// Store the outcome of a remote fetch started by [`IconCache::sync`].
    pub fn finish_fetch(&mut self, url: &str, result: Result<Vec<u8>, String>) {
        let key = IconRef::Remote(url.to_string());
        let Some(entry) = self.entries.get_mut(&key) else {
            return;
        };
        *entry = match result {
            Ok(bytes) => decode_fetched(bytes),
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to fetch icon");
                LoadedIcon::Failed
            }
        };
    }
}

fn decode_local(icon: &IconRef) -> Result<LoadedIcon, IconError> {
    match icon {
        IconRef::Embedded { .. } => Ok(LoadedIcon::Raster(image::Handle::from_bytes(
            icon.decode_payload()?,
        ))),
        IconRef::InlineVector(_) => Ok(LoadedIcon::Vector(svg::Handle::from_memory(
            icon.svg_document(VECTOR_DOCUMENT_SIZE)?.into_bytes(),
        ))),
        IconRef::Builtin(_) | IconRef::Remote(_) => Err(IconError::NoPayload),
    }
}

/// Fetched bodies that look like SVG are drawn as vectors, everything else as raster.
fn decode_fetched(bytes: Vec<u8>) -> LoadedIcon {
    if looks_like_svg(&bytes) {
        LoadedIcon::Vector(svg::Handle::from_memory(bytes))
    } else {
        LoadedIcon::Raster(image::Handle::from_bytes(bytes))
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

/// Download a remote icon.
pub async fn fetch_remote(url: String) -> Result<Vec<u8>, IconError> {
    let response = reqwest::get(&url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}
