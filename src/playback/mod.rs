mod backend;
mod coordinator;
mod embed;
mod host;
mod simulated;

pub use backend::{Activation, MediaBackend, backend_for};
pub use coordinator::{
    Indicator, PendingPlay, PlaybackCoordinator, PlaybackPhase, PlaybackPolicy, SlotStatus,
};
pub use embed::{EmbedCommand, EmbedProvider, vimeo_id, youtube_id};
pub use host::{
    EmbedFrame, ImageElement, MediaHost, MediaSignal, MediaSignalKind, MountId, PlayFuture,
    PostError, VideoElement,
};
pub use simulated::SimulatedHost;

#[cfg(test)]
pub(crate) use host::testing;
