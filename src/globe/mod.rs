mod animation;
mod camera;
mod geometry;
mod location;
mod pointer;
mod scene;
mod texture;
mod widget;

pub use animation::FlyTo;
pub use camera::{Camera, Ray};
pub use geometry::{ease_in_out_quad, latlon_to_local, target_orientation, Orientation};
pub use location::{visible_indices, Category, Location};
pub use pointer::{DragGesture, PointerSource, Release};
pub use scene::{Hit, MarkerGroup, Material, Mesh, MeshId, Shape};
pub use texture::{load_texture, Texture, TextureLoad, TextureLoader, TextureRequest};
pub use widget::GlobeWidget;
