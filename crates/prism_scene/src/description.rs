//! Serde model of the scene file.
//!
//! Vectors and colors are JSON arrays of three numbers. Material
//! coefficients accept a single number or an RGB array.

use glam::DVec3;
use prism_renderer::{Material, Threads};
use serde::{Deserialize, Serialize};

fn default_name() -> String {
    String::from("unnamed")
}

fn one() -> f64 {
    1.0
}

fn default_narrow_beam() -> i32 {
    1
}

/// Top level of a scene file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub background: DVec3,
    #[serde(default)]
    pub ambient: Option<AmbientDescription>,
    #[serde(default)]
    pub geometries: Vec<GeometryDescription>,
    #[serde(default)]
    pub lights: Vec<LightDescription>,
    pub camera: CameraDescription,
    pub image: ImageDescription,
    /// Recursion depth of the tracer, the renderer default when absent
    #[serde(default)]
    pub max_level: Option<u32>,
}

impl SceneDescription {
    /// Parse a scene description from JSON text.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Scene name, falling back to `fallback` and then to "unnamed".
    pub fn name_or(&self, fallback: Option<&str>) -> String {
        self.name
            .clone()
            .or_else(|| fallback.map(String::from))
            .unwrap_or_else(default_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientDescription {
    pub color: DVec3,
    #[serde(default = "one")]
    pub ka: f64,
}

/// A material coefficient: one value for all channels, or one per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coefficient {
    Scalar(f64),
    Rgb(DVec3),
}

impl Coefficient {
    pub fn to_rgb(self) -> DVec3 {
        match self {
            Coefficient::Scalar(v) => DVec3::splat(v),
            Coefficient::Rgb(v) => v,
        }
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Coefficient::Scalar(0.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialDescription {
    #[serde(default)]
    pub kd: Coefficient,
    #[serde(default)]
    pub ks: Coefficient,
    #[serde(default)]
    pub kt: Coefficient,
    #[serde(default)]
    pub kr: Coefficient,
    #[serde(default)]
    pub shininess: i32,
}

impl MaterialDescription {
    /// Convert to a renderer material. Values are not validated here.
    pub fn to_material(&self) -> Material {
        Material::new()
            .with_kd_rgb(self.kd.to_rgb())
            .with_ks_rgb(self.ks.to_rgb())
            .with_kt_rgb(self.kt.to_rgb())
            .with_kr_rgb(self.kr.to_rgb())
            .with_shininess(self.shininess)
    }
}

/// One renderable primitive: a shape plus its emission and material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryDescription {
    #[serde(flatten)]
    pub shape: ShapeDescription,
    #[serde(default)]
    pub emission: DVec3,
    #[serde(default)]
    pub material: MaterialDescription,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDescription {
    Sphere {
        center: DVec3,
        radius: f64,
    },
    /// Plane through `point` with `normal`
    Plane {
        point: DVec3,
        normal: DVec3,
    },
    /// Plane through three points
    PlaneFromPoints {
        points: [DVec3; 3],
    },
    Triangle {
        vertices: [DVec3; 3],
    },
    Polygon {
        vertices: Vec<DVec3>,
    },
    Tube {
        origin: DVec3,
        direction: DVec3,
        radius: f64,
    },
    Cylinder {
        origin: DVec3,
        direction: DVec3,
        radius: f64,
        height: f64,
    },
}

impl ShapeDescription {
    /// Name of the shape type as written in the file.
    pub fn kind(&self) -> &'static str {
        match self {
            ShapeDescription::Sphere { .. } => "sphere",
            ShapeDescription::Plane { .. } => "plane",
            ShapeDescription::PlaneFromPoints { .. } => "plane_from_points",
            ShapeDescription::Triangle { .. } => "triangle",
            ShapeDescription::Polygon { .. } => "polygon",
            ShapeDescription::Tube { .. } => "tube",
            ShapeDescription::Cylinder { .. } => "cylinder",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightDescription {
    Directional {
        intensity: DVec3,
        direction: DVec3,
    },
    Point {
        intensity: DVec3,
        position: DVec3,
        #[serde(default = "one")]
        kc: f64,
        #[serde(default)]
        kl: f64,
        #[serde(default)]
        kq: f64,
    },
    Spot {
        intensity: DVec3,
        position: DVec3,
        direction: DVec3,
        #[serde(default = "one")]
        kc: f64,
        #[serde(default)]
        kl: f64,
        #[serde(default)]
        kq: f64,
        #[serde(default = "default_narrow_beam")]
        narrow_beam: i32,
    },
}

impl LightDescription {
    pub fn kind(&self) -> &'static str {
        match self {
            LightDescription::Directional { .. } => "directional",
            LightDescription::Point { .. } => "point",
            LightDescription::Spot { .. } => "spot",
        }
    }
}

/// Thread setting: a worker count, `"none"` or `"auto"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThreadsDescription {
    Count(usize),
    Mode(ThreadsMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadsMode {
    None,
    Auto,
}

impl Default for ThreadsDescription {
    fn default() -> Self {
        ThreadsDescription::Mode(ThreadsMode::None)
    }
}

impl From<ThreadsDescription> for Threads {
    fn from(value: ThreadsDescription) -> Self {
        match value {
            ThreadsDescription::Count(n) => Threads::Count(n),
            ThreadsDescription::Mode(ThreadsMode::None) => Threads::None,
            ThreadsDescription::Mode(ThreadsMode::Auto) => Threads::Auto,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraDescription {
    pub location: DVec3,
    pub to: DVec3,
    pub up: DVec3,
    /// View plane `[width, height]`
    pub vp_size: [f64; 2],
    pub vp_distance: f64,
    #[serde(default)]
    pub samples: Option<u32>,
    #[serde(default)]
    pub antialiasing: bool,
    #[serde(default)]
    pub adaptive_supersampling: bool,
    #[serde(default)]
    pub threads: ThreadsDescription,
    /// Progress logging step in percent, 0 to disable
    #[serde(default)]
    pub progress_interval: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDescription {
    pub width: u32,
    pub height: u32,
    /// Default output path, relative to the working directory
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub grid: Option<GridDescription>,
}

/// Debug grid drawn over the rendered image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridDescription {
    pub interval: u32,
    pub color: DVec3,
}
