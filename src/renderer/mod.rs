//! Presentation adapter
//!
//! Turns particle views into plain triangle lists. Nothing here feeds back
//! into the simulation; a host uploads the vertices however it likes.

pub mod scene;
pub mod shapes;
pub mod vertex;

pub use scene::SceneBuilder;
pub use vertex::Vertex;
