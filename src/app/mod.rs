mod actors;
mod catalog_ops;
mod core;
mod event_bus;
mod event_loop;
mod input_ops;
mod nav;
mod state;
pub(crate) mod terminal_session;
mod view_ops;


pub use core::{App, AppOptions, EngineSubsystem, PendingWork};
pub use state::{AppState, CatalogState, ModalContent, Mode, StatusState};
