mod codec;
mod sync;

pub use codec::{DeepLink, PLAYER_PATH};
pub use sync::{DeepLinkSync, LocationHistory, MemoryHistory, link_for};
