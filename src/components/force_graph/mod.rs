//! Canvas force-directed graph view: simulation, interaction state and rendering.

mod component;
mod frame_loop;
mod render;
pub mod scale;
pub mod simulation;
mod state;
pub mod style;
pub mod transform;
mod types;

pub use component::ForceGraphCanvas;
pub use simulation::ForceConfig;
pub use state::{ForceGraphState, LayoutOptions, PointerAction, ViewPhase};
pub use transform::{ZoomConfig, ZoomTransform};
pub use types::{Fill, Frame, LinkSprite, NodeSprite, Tooltip};
