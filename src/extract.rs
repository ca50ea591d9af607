//! Resumable color extraction.
//!
//! The scan is split into chunks of `yield_every_pixels` pixels. Each call to
//! [`Extraction::step`] scans one chunk, so the host decides what happens
//! between chunks: the browser awaits an animation frame, [`ExtractColors`]
//! returns `Poll::Pending`, and [`extract_colors`] just keeps going.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use log::{debug, trace, warn};

use crate::bitmap::{Bitmap, check_dimensions};
use crate::color::ExtractedColor;
use crate::error::{ExtractError, Result};
use crate::histogram::ColorHistogram;
use crate::options::ExtractOptions;

/// Shared flag a caller flips to abandon an in-flight extraction, e.g. when
/// the user uploads another CAD file before the first one is done.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// More chunks remain; the scan is suspended at a yield point.
    Suspended { scanned: u64, total: u64 },
    /// Every pixel of the scan region has been visited.
    Complete,
}

pub struct Extraction<B> {
    bitmap: B,
    options: ExtractOptions,
    scan_height: u32,
    /// Row-major index of the next pixel to visit.
    cursor: u64,
    total: u64,
    histogram: ColorHistogram,
    cancel: Option<CancelToken>,
    yields: u32,
}

impl<B: Bitmap> Extraction<B> {
    pub fn new(bitmap: B, options: ExtractOptions) -> Result<Self> {
        let (width, height) = (bitmap.width(), bitmap.height());
        check_dimensions(width, height)?;

        let scan_height = options.scan_height(height);
        let total = width as u64 * scan_height as u64;
        debug!(
            "extract start {}x{} scan_height={} max_colors={} yield_every={}",
            width,
            height,
            scan_height,
            options.color_limit(),
            options.yield_interval()
        );

        Ok(Self {
            bitmap,
            options,
            scan_height,
            cursor: 0,
            total,
            histogram: ColorHistogram::new(),
            cancel: None,
            yields: 0,
        })
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn scan_height(&self) -> u32 {
        self.scan_height
    }

    /// Fraction of the scan region visited so far, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.cursor as f64 / self.total as f64
    }

    /// Number of times the scan stopped at a yield point.
    pub fn yields(&self) -> u32 {
        self.yields
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.total
    }

    /// Scan the next chunk of pixels.
    ///
    /// The cancel token is checked before any work, so a cancelled run never
    /// scans past the yield point it was cancelled at.
    pub fn step(&mut self) -> Result<Progress> {
        if self.is_complete() {
            return Ok(Progress::Complete);
        }
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            warn!(
                "extract cancelled after {} of {} pixels",
                self.cursor, self.total
            );
            return Err(ExtractError::Cancelled);
        }

        let width = self.bitmap.width() as u64;
        let end = (self.cursor + self.options.yield_interval()).min(self.total);

        while self.cursor < end {
            let y = (self.cursor / width) as u32;
            let x = (self.cursor % width) as usize;
            let run = (width - x as u64).min(end - self.cursor) as usize;

            let row = self.bitmap.row(y);
            self.histogram.record(&row[x * 4..(x + run) * 4]);
            self.cursor += run as u64;
        }

        if self.is_complete() {
            return Ok(Progress::Complete);
        }
        self.yields += 1;
        trace!("extract yield #{} at {}/{}", self.yields, self.cursor, self.total);
        Ok(Progress::Suspended {
            scanned: self.cursor,
            total: self.total,
        })
    }

    /// Scan whatever is left without suspending and rank the colors.
    pub fn finish(mut self) -> Result<Vec<ExtractedColor>> {
        while let Progress::Suspended { .. } = self.step()? {}
        Ok(self.into_colors())
    }

    fn into_colors(self) -> Vec<ExtractedColor> {
        let considered = self.histogram.considered();
        if considered == 0 {
            debug!("extract done: no opaque pixels");
            return Vec::new();
        }

        let distinct = self.histogram.distinct();
        let mut colors: Vec<ExtractedColor> = self
            .histogram
            .top(self.options.color_limit())
            .into_iter()
            .map(|c| ExtractedColor::from_key(c.key, c.count, considered))
            .collect();
        // Stable, so equal percentages keep the key order from the selection.
        colors.sort_by(|a, b| b.pct.total_cmp(&a.pct));

        debug!(
            "extract done: considered={} distinct={} returned={} yields={}",
            considered,
            distinct,
            colors.len(),
            self.yields
        );
        colors
    }

    /// Turn the extraction into a future that suspends at every yield point.
    pub fn into_async(self) -> ExtractColors<B> {
        ExtractColors { inner: Some(self) }
    }
}

/// Future returned by [`extract_colors_async`].
///
/// Each poll scans one chunk; between chunks it wakes itself and returns
/// `Poll::Pending` so other tasks on the same executor get to run.
pub struct ExtractColors<B> {
    inner: Option<Extraction<B>>,
}

impl<B: Bitmap + Unpin> Future for ExtractColors<B> {
    type Output = Result<Vec<ExtractedColor>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(extraction) = self.inner.as_mut() else {
            return Poll::Ready(Ok(Vec::new()));
        };
        match extraction.step() {
            Ok(Progress::Suspended { .. }) => {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            Ok(Progress::Complete) => {
                let colors = self.inner.take().map(Extraction::into_colors);
                Poll::Ready(Ok(colors.unwrap_or_default()))
            }
            Err(e) => {
                self.inner = None;
                Poll::Ready(Err(e))
            }
        }
    }
}

/// Extract the most frequent opaque colors, scanning the whole image in one go.
pub fn extract_colors<B: Bitmap>(bitmap: B, options: &ExtractOptions) -> Result<Vec<ExtractedColor>> {
    Extraction::new(bitmap, *options)?.finish()
}

/// Same as [`extract_colors`], suspending every `yield_every_pixels` pixels.
pub fn extract_colors_async<B: Bitmap + Unpin>(
    bitmap: B,
    options: &ExtractOptions,
) -> Result<ExtractColors<B>> {
    Ok(Extraction::new(bitmap, *options)?.into_async())
}

/// Run an extraction on a dedicated worker thread.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_extraction<B>(
    bitmap: B,
    options: ExtractOptions,
    cancel: CancelToken,
) -> std::thread::JoinHandle<Result<Vec<ExtractedColor>>>
where
    B: Bitmap + Send + 'static,
{
    std::thread::spawn(move || Extraction::new(bitmap, options)?.with_cancel(cancel).finish())
}
