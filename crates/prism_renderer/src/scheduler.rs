//! Pixel work distribution for multi-threaded rendering.
//!
//! Workers repeatedly claim the next [`Pixel`] from a shared [`PixelQueue`]
//! until it runs dry, and report each finished pixel to [`Progress`].

use std::sync::{Mutex, PoisonError};

/// A single pixel to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    /// Row index, growing downward
    pub row: u32,
    /// Column index, growing to the right
    pub col: u32,
}

impl Pixel {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

#[derive(Debug)]
struct Cursor {
    row: u32,
    col: u32,
}

/// Hands out every pixel of an image exactly once, row by row.
#[derive(Debug)]
pub struct PixelQueue {
    rows: u32,
    cols: u32,
    cursor: Mutex<Cursor>,
}

impl PixelQueue {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            cursor: Mutex::new(Cursor { row: 0, col: 0 }),
        }
    }

    /// Total number of pixels in the queue.
    pub fn total(&self) -> u64 {
        self.rows as u64 * self.cols as u64
    }

    /// Claim the next pixel, or `None` once every pixel was handed out.
    pub fn next_pixel(&self) -> Option<Pixel> {
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        if self.cols == 0 || cursor.row >= self.rows {
            return None;
        }

        let pixel = Pixel::new(cursor.row, cursor.col);
        cursor.col += 1;
        if cursor.col == self.cols {
            cursor.col = 0;
            cursor.row += 1;
        }
        Some(pixel)
    }
}

#[derive(Debug, Default)]
struct Counter {
    done: u64,
    last_reported: u64,
}

/// Counts finished pixels and logs throttled progress.
#[derive(Debug)]
pub struct Progress {
    total: u64,
    /// Reporting step in tenths of a percent, 0 when disabled
    step: u64,
    counter: Mutex<Counter>,
}

impl Progress {
    /// Track `total` pixels, logging every `interval` percent (0 disables).
    pub fn new(total: u64, interval: f64) -> Self {
        Self {
            total,
            step: (interval * 10.0) as u64,
            counter: Mutex::new(Counter::default()),
        }
    }

    /// Record one finished pixel.
    ///
    /// Returns the percentage that was logged, if this pixel crossed the
    /// next reporting step.
    pub fn pixel_done(&self) -> Option<f64> {
        let percent = {
            let mut counter = self.counter.lock().unwrap_or_else(PoisonError::into_inner);
            counter.done += 1;
            if self.step == 0 || self.total == 0 {
                return None;
            }
            let tenths = 1000 * counter.done / self.total;
            if tenths - counter.last_reported < self.step {
                return None;
            }
            counter.last_reported = tenths;
            tenths as f64 / 10.0
        };

        log::info!("render progress {:5.1}%", percent);
        Some(percent)
    }

    /// Number of finished pixels.
    pub fn done(&self) -> u64 {
        self.counter.lock().unwrap_or_else(PoisonError::into_inner).done
    }
}
