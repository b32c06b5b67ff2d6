mod controller;
mod gesture;
mod registry;

pub use controller::{Axis, CarouselController, CarouselPhase, GestureThresholds, IndexRequest};
pub use gesture::{PointerTracker, position_on};
pub use registry::CarouselSet;
