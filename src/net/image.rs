//! Background photo loader.
//!
//! Spawns one thread per requested photo URL, decodes to RGBA capped at card
//! resolution, and hands results back through channels polled once per
//! frame. Failed URLs are remembered so a bad photo is fetched only once.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc;

/// Cards are small; decode no wider than this.
const MAX_PHOTO_WIDTH: u32 = 256;

/// Decoded photo pixels (RGBA), ready for texture upload.
pub struct PhotoData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Manages background photo fetching and decoding.
pub struct PhotoLoader {
    pending: HashMap<String, mpsc::Receiver<Option<PhotoData>>>,
    loaded: HashMap<String, PhotoData>,
    failed: HashSet<String>,
}

impl PhotoLoader {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            loaded: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Request a photo to be fetched in the background. Duplicate and
    /// previously-failed URLs are ignored.
    pub fn request(&mut self, url: &str) {
        if url.is_empty()
            || self.loaded.contains_key(url)
            || self.pending.contains_key(url)
            || self.failed.contains(url)
        {
            return;
        }

        let (tx, rx) = mpsc::channel();
        let url_owned = url.to_string();
        std::thread::spawn(move || {
            let result = fetch_and_decode(&url_owned);
            let _ = tx.send(result);
        });
        self.pending.insert(url.to_string(), rx);
    }

    /// Poll for completed downloads. Call every frame; returns the URLs that
    /// just finished so the host can upload textures.
    pub fn poll(&mut self) -> Vec<String> {
        let mut ready = Vec::new();
        let mut completed = Vec::new();
        for (url, rx) in &self.pending {
            if let Ok(result) = rx.try_recv() {
                match result {
                    Some(data) => {
                        self.loaded.insert(url.clone(), data);
                        ready.push(url.clone());
                    }
                    None => {
                        log::debug!("photo failed: {}", url);
                        self.failed.insert(url.clone());
                    }
                }
                completed.push(url.clone());
            }
        }
        for url in completed {
            self.pending.remove(&url);
        }
        ready
    }

    pub fn get(&self, url: &str) -> Option<&PhotoData> {
        self.loaded.get(url)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for PhotoLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch_and_decode(url: &str) -> Option<PhotoData> {
    let resp = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .ok()?
        .get(url)
        .send()
        .ok()?;

    if !resp.status().is_success() {
        return None;
    }

    let bytes = resp.bytes().ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();

    let (w, h, pixels) = if w > MAX_PHOTO_WIDTH {
        let ratio = MAX_PHOTO_WIDTH as f32 / w as f32;
        let new_h = ((h as f32 * ratio) as u32).max(1);
        let resized = image::imageops::resize(
            &rgba,
            MAX_PHOTO_WIDTH,
            new_h,
            image::imageops::FilterType::Triangle,
        );
        let (rw, rh) = resized.dimensions();
        (rw, rh, resized.into_raw())
    } else {
        (w, h, rgba.into_raw())
    };

    Some(PhotoData {
        width: w,
        height: h,
        rgba: pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_deduplicates() {
        let mut loader = PhotoLoader::new();
        loader.request("https://example.com/p.png");
        loader.request("https://example.com/p.png");
        assert_eq!(loader.pending.len(), 1);
    }

    #[test]
    fn empty_url_is_ignored() {
        let mut loader = PhotoLoader::new();
        loader.request("");
        assert_eq!(loader.pending.len(), 0);
    }
}
