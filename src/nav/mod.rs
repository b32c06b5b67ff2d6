mod generation;
mod state;
mod window;

pub use generation::{GenerationGuard, Ticket};
pub use state::{NavChange, NavDirection, NavigationState, Slot, initialize};
pub use window::RenderWindow;
