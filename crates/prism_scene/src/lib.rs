//! Prism Scene - scene files for the Prism renderer
//!
//! A scene file is a JSON document holding the geometry, lights, camera and
//! output image settings of one render:
//!
//! ```json
//! {
//!   "name": "single sphere",
//!   "background": [0, 0, 0],
//!   "ambient": { "color": [255, 255, 255], "ka": 0.1 },
//!   "geometries": [
//!     { "type": "sphere", "center": [0, 0, -100], "radius": 50,
//!       "emission": [100, 20, 20],
//!       "material": { "kd": 0.5, "ks": 0.5, "shininess": 30 } }
//!   ],
//!   "lights": [
//!     { "type": "point", "intensity": [500, 500, 500], "position": [50, 50, 50], "kl": 0.0004 }
//!   ],
//!   "camera": {
//!     "location": [0, 0, 100], "to": [0, 0, -1], "up": [0, 1, 0],
//!     "vp_size": [200, 200], "vp_distance": 100
//!   },
//!   "image": { "width": 500, "height": 500 }
//! }
//! ```
//!
//! [`load_scene_file`] parses and validates a file and turns it into renderer
//! types.

mod description;
mod loader;

pub use description::{
    AmbientDescription, CameraDescription, Coefficient, GeometryDescription, GridDescription,
    ImageDescription, LightDescription, MaterialDescription, SceneDescription, ShapeDescription,
    ThreadsDescription, ThreadsMode,
};
pub use loader::{load_scene_file, load_scene_str, ImageSettings, LoadedScene, SceneError, SceneResult};
