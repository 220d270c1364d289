pub mod boundary;
pub mod editor;
pub mod error;
pub mod graph;
pub mod math;
pub mod mesh;
pub mod texture;
pub mod triangulation;

pub use error::{Result, SpriteMeshError};
