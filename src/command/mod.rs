mod core;
mod dispatch;
mod types;

pub(crate) use core::apply_catalog_view;
pub use dispatch::{CommandContext, CommandDispatchResult, dispatch};
pub use types::{ActionId, Command, CommandOutcome};
