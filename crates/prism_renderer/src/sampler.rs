//! Per-pixel sampling strategies.
//!
//! Each function computes the color of pixel `(j, i)` of an `nx × ny` image.

use crate::{Camera, Color, RayTracer};
use prism_math::DVec3;
use std::collections::HashMap;

/// One ray through the pixel center.
pub fn sample_single<T: RayTracer + ?Sized>(camera: &Camera, tracer: &T, nx: u32, ny: u32, j: u32, i: u32) -> Color {
    tracer.trace_ray(&camera.construct_ray(nx, ny, j, i))
}

/// Average of an `n × n` grid of rays through the sub-pixel centers.
pub fn sample_grid<T: RayTracer + ?Sized>(
    camera: &Camera,
    tracer: &T,
    nx: u32,
    ny: u32,
    j: u32,
    i: u32,
    n: u32,
) -> Color {
    let n = n.max(1);
    let mut color = Color::ZERO;
    for si in 0..n {
        for sj in 0..n {
            let ray = camera.construct_ray(nx * n, ny * n, j * n + sj, i * n + si);
            color += tracer.trace_ray(&ray);
        }
    }
    color / (n * n) as f64
}

/// Subdivision depth for an adaptive sample budget: `⌊log2(n − 1)⌋`, 0 for `n ≤ 2`.
pub fn adaptive_level(samples: u32) -> u32 {
    if samples <= 2 {
        0
    } else {
        (samples - 1).ilog2()
    }
}

/// Position on the finest subdivision grid of a pixel, relative to its
/// center. One unit is `side / 2^(level + 1)`.
type LatticePoint = (i64, i64);

/// Traced corner colors, keyed by lattice position.
type SampleMemo = HashMap<LatticePoint, Color>;

/// Square cell with its center and half side in lattice units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    x: i64,
    y: i64,
    half: i64,
}

impl Cell {
    /// Corners ordered (−x,+y), (+x,+y), (+x,−y), (−x,−y).
    fn corners(self) -> [LatticePoint; 4] {
        let Cell { x, y, half: h } = self;
        [(x - h, y + h), (x + h, y + h), (x + h, y - h), (x - h, y - h)]
    }

    /// The four quarter cells, in corner order.
    fn quadrants(self) -> [Cell; 4] {
        let half = self.half / 2;
        self.corners().map(|(cx, cy)| Cell {
            x: (self.x + cx) / 2,
            y: (self.y + cy) / 2,
            half,
        })
    }
}

/// State of one adaptively sampled pixel.
struct AdaptivePixel<'a, T: ?Sized> {
    camera: &'a Camera,
    tracer: &'a T,
    center: DVec3,
    unit: f64,
    memo: SampleMemo,
}

impl<T: RayTracer + ?Sized> AdaptivePixel<'_, T> {
    /// View plane point of a lattice position. Every cell sharing a corner
    /// derives it from the same integers, so shared corners trace the same ray.
    fn point(&self, (x, y): LatticePoint) -> DVec3 {
        self.center + self.camera.right() * (x as f64 * self.unit) + self.camera.up() * (y as f64 * self.unit)
    }

    fn sample(&mut self, p: LatticePoint) -> Color {
        if let Some(color) = self.memo.get(&p) {
            return *color;
        }
        let color = self.tracer.trace_ray(&self.camera.ray_through(self.point(p)));
        self.memo.insert(p, color);
        color
    }

    fn trace_corners(&mut self, cell: Cell) -> [Color; 4] {
        cell.corners().map(|p| self.sample(p))
    }

    fn subdivide(&mut self, cell: Cell, level: u32) {
        let colors = self.trace_corners(cell);
        if level == 0 || all_equal(&colors) {
            return;
        }
        for quadrant in cell.quadrants() {
            self.subdivide(quadrant, level - 1);
        }
    }

    fn mean(&self) -> Color {
        self.memo.values().sum::<Color>() / self.memo.len() as f64
    }
}

/// Adaptive supersampling.
///
/// Traces the four corners of the pixel. Where the corner colors differ the
/// cell is split into four quadrants, down to [`adaptive_level`] levels.
/// Shared corners are traced only once. The pixel color is the average of
/// every distinct sample.
pub fn sample_adaptive<T: RayTracer + ?Sized>(
    camera: &Camera,
    tracer: &T,
    nx: u32,
    ny: u32,
    j: u32,
    i: u32,
    samples: u32,
) -> Color {
    let level = adaptive_level(samples);
    let side = (camera.width() / nx as f64).min(camera.height() / ny as f64);
    let mut pixel = AdaptivePixel {
        camera,
        tracer,
        center: camera.pixel_center(nx, ny, j, i),
        unit: side / (1i64 << (level + 1)) as f64,
        memo: SampleMemo::new(),
    };

    let top = Cell {
        x: 0,
        y: 0,
        half: 1 << level,
    };
    let colors = pixel.trace_corners(top);
    if level == 0 || all_equal(&colors) {
        return colors.iter().sum::<Color>() / 4.0;
    }

    for quadrant in top.quadrants() {
        pixel.subdivide(quadrant, level - 1);
    }
    pixel.mean()
}

fn all_equal(colors: &[Color; 4]) -> bool {
    colors.iter().all(|c| *c == colors[0])
}
