//! Image rendering.
//!
//! Drives the per-pixel samplers over a whole image, either on the calling
//! thread or on a fixed-size rayon pool fed by a shared [`PixelQueue`].

use crate::scheduler::{Pixel, PixelQueue, Progress};
use crate::{sample_adaptive, sample_grid, sample_single, Camera, Color, RayTracer, Sampling};
use std::path::Path;
use std::sync::mpsc;
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convert a color on the 0-255 scale to 8-bit RGB, clamping each channel.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let c = color.clamp(Color::ZERO, Color::splat(255.0));
    [c.x as u8, c.y as u8, c.z as u8]
}

/// Render buffer for storing output colors.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Overwrite every `interval`-th row and column with `color`.
    pub fn draw_grid(&mut self, interval: u32, color: Color) {
        if interval == 0 {
            return;
        }
        for y in 0..self.height {
            for x in 0..self.width {
                if y % interval == 0 || x % interval == 0 {
                    self.set(x, y, color);
                }
            }
        }
    }

    /// Convert to packed RGB bytes, row by row.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgb(*c)).collect()
    }

    /// Write the image to disk. The format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        let path = path.as_ref();
        let img = image::RgbImage::from_fn(self.width, self.height, |x, y| image::Rgb(color_to_rgb(self.get(x, y))));
        img.save(path)?;
        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Color of pixel `(j, i)` using the camera's sampling mode.
pub fn render_pixel<T: RayTracer + ?Sized>(camera: &Camera, tracer: &T, nx: u32, ny: u32, j: u32, i: u32) -> Color {
    match camera.sampling() {
        Sampling::Single => sample_single(camera, tracer, nx, ny, j, i),
        Sampling::Grid(n) => sample_grid(camera, tracer, nx, ny, j, i, n),
        Sampling::Adaptive(n) => sample_adaptive(camera, tracer, nx, ny, j, i, n),
    }
}

/// Render every pixel of `image`.
///
/// The image size is the resolution the camera's view plane is divided
/// into. Each pixel is written exactly once.
pub fn render<T: RayTracer + ?Sized>(camera: &Camera, tracer: &T, image: &mut ImageBuffer) -> Result<(), RenderError> {
    let (nx, ny) = (image.width, image.height);
    let queue = PixelQueue::new(ny, nx);
    let progress = Progress::new(queue.total(), camera.progress_interval());

    log::info!(
        "Rendering {}x{} ({:?} sampling, {} threads)",
        nx,
        ny,
        camera.sampling(),
        camera.worker_threads().map_or_else(|| "inline".to_string(), |n| n.to_string())
    );
    let start = Instant::now();

    match camera.worker_threads() {
        None => {
            while let Some(Pixel { row, col }) = queue.next_pixel() {
                let color = render_pixel(camera, tracer, nx, ny, col, row);
                image.set(col, row, color);
                progress.pixel_done();
            }
        }
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
            let (tx, rx) = mpsc::channel::<(Pixel, Color)>();

            // Workers run on the pool while this thread writes finished pixels
            pool.in_place_scope(|s| {
                for _ in 0..threads {
                    let tx = tx.clone();
                    let queue = &queue;
                    let progress = &progress;
                    s.spawn(move |_| {
                        while let Some(pixel) = queue.next_pixel() {
                            let color = render_pixel(camera, tracer, nx, ny, pixel.col, pixel.row);
                            if tx.send((pixel, color)).is_err() {
                                break;
                            }
                            progress.pixel_done();
                        }
                    });
                }
                drop(tx);

                for (pixel, color) in rx {
                    image.set(pixel.col, pixel.row, color);
                }
            });
        }
    }

    log::info!("Render complete in {:.2?} ({} pixels)", start.elapsed(), progress.done());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AmbientLight, Scene, SimpleRayTracer, Sphere, Surface, Threads};
    use prism_math::{DVec3, Ray};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Encodes the ray direction in the color and counts calls.
    struct DirectionTracer {
        calls: AtomicUsize,
    }

    impl RayTracer for DirectionTracer {
        fn trace_ray(&self, ray: &Ray) -> Color {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ray.direction() * 100.0 + Color::splat(100.0)
        }
    }

    fn camera(threads: Threads) -> Camera {
        Camera::builder()
            .with_location(DVec3::ZERO)
            .with_direction(DVec3::new(0.0, 0.0, -1.0), DVec3::Y)
            .with_vp_size(3.0, 3.0)
            .with_vp_distance(1.0)
            .with_threads(threads)
            .with_progress_interval(10.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_color_to_rgb_clamps() {
        assert_eq!(color_to_rgb(Color::new(-5.0, 127.9, 300.0)), [0, 127, 255]);
        assert_eq!(color_to_rgb(Color::splat(255.0)), [255, 255, 255]);
    }

    #[test]
    fn test_image_buffer_get_set() {
        let mut image = ImageBuffer::new(4, 2);
        image.set(3, 1, Color::splat(9.0));
        assert_eq!(image.get(3, 1), Color::splat(9.0));
        assert_eq!(image.pixels[7], Color::splat(9.0));
        assert_eq!(image.to_rgb8().len(), 4 * 2 * 3);
    }

    #[test]
    fn test_draw_grid() {
        let mut image = ImageBuffer::new(5, 5);
        let red = Color::new(255.0, 0.0, 0.0);
        image.draw_grid(2, red);

        assert_eq!(image.get(0, 3), red);
        assert_eq!(image.get(3, 2), red);
        assert_eq!(image.get(4, 4), red);
        assert_eq!(image.get(1, 1), Color::ZERO);
        assert_eq!(image.get(3, 3), Color::ZERO);

        // Interval 0 draws nothing
        let mut image = ImageBuffer::new(2, 2);
        image.draw_grid(0, red);
        assert!(image.pixels.iter().all(|c| *c == Color::ZERO));
    }

    #[test]
    fn test_threaded_render_writes_each_pixel_once() {
        let tracer = DirectionTracer {
            calls: AtomicUsize::new(0),
        };
        let mut threaded = ImageBuffer::new(3, 3);
        render(&camera(Threads::Count(4)), &tracer, &mut threaded).unwrap();
        assert_eq!(tracer.calls.load(Ordering::SeqCst), 9);

        let inline_tracer = DirectionTracer {
            calls: AtomicUsize::new(0),
        };
        let mut inline = ImageBuffer::new(3, 3);
        render(&camera(Threads::None), &inline_tracer, &mut inline).unwrap();

        // Each pixel sits at its own index regardless of completion order
        assert_eq!(threaded.pixels, inline.pixels);
        assert_eq!(threaded.get(1, 1), Color::new(100.0, 100.0, 0.0));
        assert!(threaded.get(0, 0).x < 100.0);
        assert!(threaded.get(2, 0).x > 100.0);
    }

    #[test]
    fn test_threaded_render_drains_while_running() {
        let tracer = DirectionTracer {
            calls: AtomicUsize::new(0),
        };
        let mut threaded = ImageBuffer::new(32, 24);
        render(&camera(Threads::Count(3)), &tracer, &mut threaded).unwrap();
        assert_eq!(tracer.calls.load(Ordering::SeqCst), 32 * 24);

        let mut inline = ImageBuffer::new(32, 24);
        render(&camera(Threads::None), &tracer, &mut inline).unwrap();
        assert_eq!(threaded.pixels, inline.pixels);
    }

    #[test]
    fn test_render_sphere_scene() {
        let mut scene = Scene::new("sphere")
            .with_background(Color::splat(10.0))
            .with_ambient_light(AmbientLight::new(Color::splat(255.0), 0.2));
        scene.add_geometry(
            Surface::new(Sphere::new(DVec3::new(0.0, 0.0, -5.0), 0.3).unwrap())
                .with_emission(Color::new(100.0, 0.0, 0.0)),
        );
        let tracer = SimpleRayTracer::new(&scene);

        let camera = Camera::builder()
            .with_location(DVec3::ZERO)
            .with_direction(DVec3::new(0.0, 0.0, -1.0), DVec3::Y)
            .with_vp_size(3.0, 3.0)
            .with_vp_distance(10.0)
            .with_antialiasing(true)
            .with_samples(2)
            .with_threads(Threads::Count(2))
            .build()
            .unwrap();

        let mut image = ImageBuffer::new(3, 3);
        camera.render_image(&tracer, &mut image).unwrap();

        assert!((image.get(1, 1) - Color::new(151.0, 51.0, 51.0)).length() < 1e-9);
        assert_eq!(image.get(0, 0), Color::splat(10.0));
    }

    #[test]
    fn test_save_png() {
        let mut image = ImageBuffer::new(4, 3);
        image.set(1, 2, Color::new(255.0, 128.0, 0.0));

        let path = std::env::temp_dir().join(format!("prism_render_test_{}.png", std::process::id()));
        image.save(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (4, 3));
        assert_eq!(loaded.get_pixel(1, 2).0, [255, 128, 0]);
        std::fs::remove_file(&path).ok();
    }
}
