//! Async image preloading.
//!
//! Decoding happens on tokio's blocking pool with bounded concurrency. Progress
//! is published on a `watch` channel so a loading indicator always sees the
//! latest value, and the whole run can be cancelled through a
//! `CancellationToken`.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use ts_rs::TS;

use super::{ImageCache, LruImageCache};
use crate::error::{GalleryError, GalleryResult};
use crate::rendering::types::{DecodedImage, ImageId};

/// Images decoded in parallel by default.
pub const DEFAULT_PRELOAD_CONCURRENCY: usize = 4;

/// Where encoded image bytes come from.
///
/// `fetch` is called from the blocking pool and may do synchronous I/O.
pub trait ImageSource: Send + Sync + 'static {
    fn fetch(&self, id: &ImageId) -> GalleryResult<Vec<u8>>;
}

/// Reads images from a directory; the image id is the relative file path.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `id` inside the root. Ids that would escape the root are rejected.
    pub fn path_for(&self, id: &ImageId) -> Option<PathBuf> {
        let relative = Path::new(id.as_str());
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe || id.as_str().is_empty() {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl ImageSource for DirectorySource {
    fn fetch(&self, id: &ImageId) -> GalleryResult<Vec<u8>> {
        let not_found = || GalleryError::ImageNotFound { id: id.to_string() };
        let path = self.path_for(id).ok_or_else(not_found)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Preload progress snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "generated/")]
pub struct PreloadProgress {
    pub loaded: usize,
    pub failed: usize,
    pub total: usize,
}

impl PreloadProgress {
    /// Fraction of images processed (successfully or not), 0.0-1.0.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.loaded + self.failed) as f64 / self.total as f64
    }

    pub fn is_complete(&self) -> bool {
        self.loaded + self.failed >= self.total
    }
}

/// Outcome of a finished preload run.
#[derive(Debug, Clone, Default)]
pub struct PreloadReport {
    /// Images decoded and inserted into the cache.
    pub loaded: Vec<ImageId>,
    /// Images that could not be fetched or decoded, with the reason.
    pub failed: Vec<(ImageId, String)>,
    /// Images already cached before the run.
    pub skipped: usize,
}

/// Decodes a set of images into a shared cache ahead of interaction.
pub struct Preloader<S: ImageSource> {
    source: Arc<S>,
    cache: Arc<LruImageCache>,
    concurrency: usize,
    progress_tx: watch::Sender<PreloadProgress>,
    cancel: CancellationToken,
}

impl<S: ImageSource> Preloader<S> {
    pub fn new(source: S, cache: Arc<LruImageCache>) -> Self {
        let (progress_tx, _) = watch::channel(PreloadProgress::default());
        Self {
            source: Arc::new(source),
            cache,
            concurrency: DEFAULT_PRELOAD_CONCURRENCY,
            progress_tx,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Receive progress updates.
    pub fn subscribe(&self) -> watch::Receiver<PreloadProgress> {
        self.progress_tx.subscribe()
    }

    /// Token that stops the run when cancelled.
    ///
    /// Cancellation is permanent; later `run` calls return immediately.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cache(&self) -> &Arc<LruImageCache> {
        &self.cache
    }

    /// Fetch and decode every id not already cached.
    ///
    /// Individual failures are logged and reported. The run is rejected up
    /// front with `GalleryError::CacheTooSmall` when the cache cannot hold
    /// every distinct id, and aborted with `GalleryError::PreloadCancelled`
    /// on cancellation.
    pub async fn run(&self, ids: &[ImageId]) -> GalleryResult<PreloadReport> {
        let unique: Vec<&ImageId> = {
            let mut seen = HashSet::new();
            ids.iter().filter(|id| seen.insert(*id)).collect()
        };
        let capacity = self.cache.capacity();
        if unique.len() > capacity {
            log::warn!(
                "[PRELOAD] {} images do not fit a cache of {}",
                unique.len(),
                capacity
            );
            return Err(GalleryError::CacheTooSmall {
                needed: unique.len(),
                capacity,
            });
        }

        // `get` refreshes recency, so cached ids of this run outlive the inserts
        let mut report = PreloadReport::default();
        let mut pending = Vec::new();
        for id in unique {
            if self.cache.get(id).is_some() {
                report.skipped += 1;
            } else {
                pending.push(id.clone());
            }
        }

        let mut progress = PreloadProgress {
            loaded: 0,
            failed: 0,
            total: pending.len(),
        };
        self.progress_tx.send_replace(progress);

        if pending.is_empty() {
            log::debug!("[PRELOAD] Nothing to load ({} cached)", report.skipped);
            return Ok(report);
        }

        log::info!(
            "[PRELOAD] Loading {} images ({} cached, concurrency {})",
            progress.total,
            report.skipped,
            self.concurrency
        );

        let decodes = stream::iter(pending.into_iter().map(|id| {
            let source = Arc::clone(&self.source);
            async move {
                let fetch_id = id.clone();
                let result = tokio::task::spawn_blocking(move || {
                    let bytes = source.fetch(&fetch_id)?;
                    DecodedImage::from_bytes(&bytes)
                })
                .await;
                (id, result)
            }
        }))
        .buffer_unordered(self.concurrency);
        let mut decodes = std::pin::pin!(decodes);

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    log::info!(
                        "[PRELOAD] Cancelled after {} of {} images",
                        progress.loaded,
                        progress.total
                    );
                    return Err(GalleryError::PreloadCancelled {
                        loaded: progress.loaded,
                        total: progress.total,
                    });
                }
                next = decodes.next() => next,
            };

            let Some((id, result)) = next else {
                break;
            };

            match result {
                Ok(Ok(image)) => {
                    log::debug!("[PRELOAD] Decoded {} ({}x{})", id, image.width, image.height);
                    self.cache.insert(id.clone(), Arc::new(image));
                    report.loaded.push(id);
                    progress.loaded += 1;
                }
                Ok(Err(e)) => {
                    log::warn!("[PRELOAD] Failed to load {}: {}", id, e);
                    report.failed.push((id, e.to_string()));
                    progress.failed += 1;
                }
                Err(e) => {
                    log::error!("[PRELOAD] Decode task failed for {}: {:?}", id, e);
                    report.failed.push((id, e.to_string()));
                    progress.failed += 1;
                }
            }
            self.progress_tx.send_replace(progress);
        }

        log::info!(
            "[PRELOAD] Done: {} loaded, {} failed",
            progress.loaded,
            progress.failed
        );
        Ok(report)
    }
}
