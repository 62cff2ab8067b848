//! Scene file loading and conversion into renderer types.

use std::path::{Path, PathBuf};

use prism_renderer::{
    AmbientLight, CameraBuilder, CameraError, Color, Cylinder, DVec3, DirectionalLight, Geometries,
    GeometryError, LightError, Material, MaterialError, Plane, PointLight, Polygon, Ray, Scene,
    Shape, Sphere, SpotLight, Surface, Triangle, Tube, MAX_CALC_COLOR_LEVEL,
};
use thiserror::Error;

use crate::description::{GeometryDescription, LightDescription, SceneDescription, ShapeDescription};

/// Errors that can occur while loading a scene file.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid material: {0}")]
    Material(#[from] MaterialError),

    #[error("Invalid camera: {0}")]
    Camera(#[from] CameraError),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid light: {0}")]
    InvalidLight(String),

    #[error("Invalid image settings: {0}")]
    InvalidImage(String),
}

/// Result type for scene loading.
pub type SceneResult<T> = Result<T, SceneError>;

/// Output image settings from the scene file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSettings {
    pub width: u32,
    pub height: u32,
    pub output: Option<PathBuf>,
    /// Debug grid `(interval, color)` drawn after rendering
    pub grid: Option<(u32, Color)>,
}

/// A validated scene, ready to render.
pub struct LoadedScene {
    pub scene: Scene,
    /// Camera settings. Already checked to build, callers may still override
    /// settings such as the thread count before building.
    pub camera: CameraBuilder,
    pub image: ImageSettings,
    /// Recursion depth for the tracer
    pub max_level: u32,
}

/// Load a scene from a JSON file.
///
/// The scene is named after the file stem unless the file sets a name.
pub fn load_scene_file<P: AsRef<Path>>(path: P) -> SceneResult<LoadedScene> {
    let path = path.as_ref();
    log::info!("Loading scene file {}", path.display());

    let json = std::fs::read_to_string(path)?;
    let description = SceneDescription::from_json(&json)?;
    let stem = path.file_stem().and_then(|s| s.to_str());
    build(description, stem)
}

/// Load a scene from JSON text.
pub fn load_scene_str(json: &str) -> SceneResult<LoadedScene> {
    build(SceneDescription::from_json(json)?, None)
}

fn build(description: SceneDescription, fallback_name: Option<&str>) -> SceneResult<LoadedScene> {
    let image = image_settings(&description)?;
    let camera = camera_builder(&description);
    // Fail on a bad camera now rather than at render time
    camera.build()?;

    let mut scene = Scene::new(description.name_or(fallback_name))
        .with_background(description.background)
        .with_geometries(geometries(&description.geometries)?);
    if let Some(ambient) = &description.ambient {
        scene = scene.with_ambient_light(AmbientLight::new(ambient.color, ambient.ka));
    }
    for (index, light) in description.lights.iter().enumerate() {
        add_light(&mut scene, index, light)?;
    }

    log::info!(
        "Loaded scene '{}': {} geometries, {} lights, {}x{} image",
        scene.name,
        scene.geometries.len(),
        scene.lights.len(),
        image.width,
        image.height
    );

    Ok(LoadedScene {
        scene,
        camera,
        image,
        max_level: description.max_level.unwrap_or(MAX_CALC_COLOR_LEVEL).max(1),
    })
}

fn image_settings(description: &SceneDescription) -> SceneResult<ImageSettings> {
    let image = &description.image;
    if image.width == 0 || image.height == 0 {
        return Err(SceneError::InvalidImage(format!(
            "resolution must be positive, got {}x{}",
            image.width, image.height
        )));
    }
    let grid = match &image.grid {
        Some(grid) if grid.interval == 0 => {
            return Err(SceneError::InvalidImage("grid interval must be positive".into()));
        }
        Some(grid) => Some((grid.interval, grid.color)),
        None => None,
    };

    Ok(ImageSettings {
        width: image.width,
        height: image.height,
        output: image.output.as_ref().map(PathBuf::from),
        grid,
    })
}

fn camera_builder(description: &SceneDescription) -> CameraBuilder {
    let camera = &description.camera;
    let mut builder = CameraBuilder::new()
        .with_location(camera.location)
        .with_direction(camera.to, camera.up)
        .with_vp_size(camera.vp_size[0], camera.vp_size[1])
        .with_vp_distance(camera.vp_distance)
        .with_antialiasing(camera.antialiasing)
        .with_adaptive_supersampling(camera.adaptive_supersampling)
        .with_threads(camera.threads.into())
        .with_progress_interval(camera.progress_interval);
    if let Some(samples) = camera.samples {
        builder = builder.with_samples(samples);
    }
    builder
}

fn geometries(descriptions: &[GeometryDescription]) -> SceneResult<Geometries> {
    let mut geometries = Geometries::new();

    for (index, description) in descriptions.iter().enumerate() {
        let material = description.material.to_material();
        material.validate()?;

        let invalid = |e: GeometryError| {
            SceneError::InvalidGeometry(format!("#{index} ({}): {e}", description.shape.kind()))
        };
        let emission = description.emission;

        match &description.shape {
            ShapeDescription::Sphere { center, radius } => {
                let shape = Sphere::new(*center, *radius).map_err(invalid)?;
                geometries.add(surface(shape, emission, material));
            }
            ShapeDescription::Plane { point, normal } => {
                let shape = Plane::new(*point, *normal).map_err(invalid)?;
                geometries.add(surface(shape, emission, material));
            }
            ShapeDescription::PlaneFromPoints { points: [p1, p2, p3] } => {
                let shape = Plane::from_points(*p1, *p2, *p3).map_err(invalid)?;
                geometries.add(surface(shape, emission, material));
            }
            ShapeDescription::Triangle { vertices: [v0, v1, v2] } => {
                let shape = Triangle::new(*v0, *v1, *v2).map_err(invalid)?;
                geometries.add(surface(shape, emission, material));
            }
            ShapeDescription::Polygon { vertices } => {
                let shape = Polygon::new(vertices.clone()).map_err(invalid)?;
                geometries.add(surface(shape, emission, material));
            }
            ShapeDescription::Tube {
                origin,
                direction,
                radius,
            } => {
                let shape = axis(*origin, *direction)
                    .and_then(|a| Tube::new(a, *radius))
                    .map_err(invalid)?;
                geometries.add(surface(shape, emission, material));
            }
            ShapeDescription::Cylinder {
                origin,
                direction,
                radius,
                height,
            } => {
                let shape = axis(*origin, *direction)
                    .and_then(|a| Cylinder::new(a, *radius, *height))
                    .map_err(invalid)?;
                geometries.add(surface(shape, emission, material));
            }
        }
        log::debug!("Added geometry #{index} ({})", description.shape.kind());
    }

    Ok(geometries)
}

fn surface<S: Shape>(shape: S, emission: Color, material: Material) -> Surface<S> {
    Surface::new(shape).with_emission(emission).with_material(material)
}

/// Axis ray, rejecting a zero direction before `Ray::new` would panic on it.
fn axis(origin: DVec3, direction: DVec3) -> Result<Ray, GeometryError> {
    if direction.length_squared() == 0.0 || !direction.is_finite() {
        return Err(GeometryError::ZeroAxis);
    }
    Ok(Ray::new(origin, direction))
}

fn add_light(scene: &mut Scene, index: usize, description: &LightDescription) -> SceneResult<()> {
    let invalid = |e: LightError| SceneError::InvalidLight(format!("#{index} ({}): {e}", description.kind()));

    match *description {
        LightDescription::Directional { intensity, direction } => {
            scene.add_light(DirectionalLight::new(intensity, direction).map_err(invalid)?);
        }
        LightDescription::Point {
            intensity,
            position,
            kc,
            kl,
            kq,
        } => {
            check_attenuation(index, kc, kl, kq)?;
            scene.add_light(PointLight::new(intensity, position).with_kc(kc).with_kl(kl).with_kq(kq));
        }
        LightDescription::Spot {
            intensity,
            position,
            direction,
            kc,
            kl,
            kq,
            narrow_beam,
        } => {
            check_attenuation(index, kc, kl, kq)?;
            let light = SpotLight::new(intensity, position, direction)
                .map_err(invalid)?
                .with_kc(kc)
                .with_kl(kl)
                .with_kq(kq)
                .with_narrow_beam(narrow_beam);
            scene.add_light(light);
        }
    }
    log::debug!("Added light #{index} ({})", description.kind());
    Ok(())
}

/// Attenuation must be non-negative and not vanish at distance 0.
fn check_attenuation(index: usize, kc: f64, kl: f64, kq: f64) -> SceneResult<()> {
    if kc < 0.0 || kl < 0.0 || kq < 0.0 || kc == 0.0 {
        return Err(SceneError::InvalidLight(format!(
            "#{index}: attenuation factors must be non-negative with kc > 0, got kc={kc} kl={kl} kq={kq}"
        )));
    }
    Ok(())
}
