use futures_util::future::BoxFuture;

use crate::error::AppResult;
use crate::nav::Slot;

/// Settles once the host has accepted or refused a play request.
pub type PlayFuture = BoxFuture<'static, AppResult<()>>;

/// Identifies one mounting of a slot. A slot that leaves the window and comes
/// back gets a fresh epoch, so signals from the old element can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId {
    pub slot: Slot,
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSignalKind {
    Loaded,
    Failed(String),
    /// Playback stalled waiting for data.
    Waiting,
    /// Playback resumed after a stall.
    Playing,
    /// Playback reached the end of the media.
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSignal {
    pub mount: MountId,
    pub kind: MediaSignalKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PostError {
    #[error("player frame is not ready")]
    NotReady,
    #[error("player frame was detached")]
    Detached,
}

pub trait ImageElement: Send {
    fn set_source(&mut self, url: Option<&str>);
}

pub trait VideoElement: Send {
    fn set_source(&mut self, url: Option<&str>);
    fn set_current_time(&mut self, seconds: f64);
    fn set_muted(&mut self, muted: bool);
    fn muted(&self) -> bool;
    fn play(&mut self) -> PlayFuture;
    fn pause(&mut self);
}

/// A sandboxed third-party player reachable only through posted messages.
pub trait EmbedFrame: Send {
    fn set_source(&mut self, url: Option<&str>);
    fn post_message(&mut self, message: &str) -> Result<(), PostError>;
}

/// Creates platform media elements. Elements report load progress through the
/// host's own signal channel, tagged with the mount they were created for.
pub trait MediaHost: Send {
    fn create_image(&mut self, mount: MountId) -> Box<dyn ImageElement>;
    fn create_video(&mut self, mount: MountId) -> Box<dyn VideoElement>;
    fn create_frame(&mut self, mount: MountId) -> Box<dyn EmbedFrame>;
    /// Records a user gesture; hosts with an autoplay policy unlock unmuted play.
    fn note_user_gesture(&mut self) {}
}
