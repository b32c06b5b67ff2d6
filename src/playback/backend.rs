use tracing::{debug, trace};

use crate::catalog::{MediaKind, Segment};
use crate::error::{AppError, AppResult};

use super::embed::{EmbedCommand, EmbedProvider};
use super::host::{EmbedFrame, ImageElement, MediaHost, MountId, PlayFuture, VideoElement};

/// Result of asking a backend to start playback.
pub enum Activation {
    /// The host will settle the request later.
    Pending(PlayFuture),
    /// Commands were sent without acknowledgment.
    Fired,
    /// Nothing to play.
    Static,
}

impl std::fmt::Debug for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending(_) => f.write_str("Pending(..)"),
            Self::Fired => f.write_str("Fired"),
            Self::Static => f.write_str("Static"),
        }
    }
}

/// One playback strategy per media kind. The coordinator only talks to this
/// trait; kind-specific behavior lives behind it.
pub trait MediaBackend: Send {
    fn kind(&self) -> MediaKind;
    /// Assigns the source so the host starts loading.
    fn mount(&mut self) -> AppResult<()>;
    /// Releases the source. The backend is dropped afterwards.
    fn unmount(&mut self);
    /// Starts from the beginning, muted.
    fn activate(&mut self) -> Activation;
    /// Continues from the current position.
    fn resume(&mut self) -> Activation;
    fn pause(&mut self);
    fn deactivate(&mut self, reset_position: bool);
    fn set_muted(&mut self, muted: bool);
    fn is_muted(&self) -> bool;
}

/// The only place that dispatches on media kind.
pub fn backend_for(
    segment: &Segment,
    mount: MountId,
    host: &mut dyn MediaHost,
) -> Box<dyn MediaBackend> {
    match segment.media_kind {
        MediaKind::Image => Box::new(ImageBackend {
            element: host.create_image(mount),
            url: segment.media_url.clone(),
        }),
        MediaKind::Video => Box::new(NativeVideoBackend {
            element: host.create_video(mount),
            url: segment.media_url.clone(),
        }),
        MediaKind::Youtube => embed(EmbedProvider::Youtube, segment, mount, host),
        MediaKind::Vimeo => embed(EmbedProvider::Vimeo, segment, mount, host),
    }
}

fn embed(
    provider: EmbedProvider,
    segment: &Segment,
    mount: MountId,
    host: &mut dyn MediaHost,
) -> Box<dyn MediaBackend> {
    Box::new(EmbedBackend {
        provider,
        mount,
        url: segment.media_url.clone(),
        frame: host.create_frame(mount),
        muted: true,
    })
}

pub struct ImageBackend {
    element: Box<dyn ImageElement>,
    url: String,
}

impl MediaBackend for ImageBackend {
    fn kind(&self) -> MediaKind {
        MediaKind::Image
    }

    fn mount(&mut self) -> AppResult<()> {
        self.element.set_source(Some(&self.url));
        Ok(())
    }

    fn unmount(&mut self) {
        self.element.set_source(None);
    }

    fn activate(&mut self) -> Activation {
        Activation::Static
    }

    fn resume(&mut self) -> Activation {
        Activation::Static
    }

    fn pause(&mut self) {}

    fn deactivate(&mut self, _reset_position: bool) {}

    fn set_muted(&mut self, _muted: bool) {}

    fn is_muted(&self) -> bool {
        true
    }
}

pub struct NativeVideoBackend {
    element: Box<dyn VideoElement>,
    url: String,
}

impl MediaBackend for NativeVideoBackend {
    fn kind(&self) -> MediaKind {
        MediaKind::Video
    }

    fn mount(&mut self) -> AppResult<()> {
        self.element.set_source(Some(&self.url));
        Ok(())
    }

    fn unmount(&mut self) {
        self.element.pause();
        self.element.set_source(None);
    }

    fn activate(&mut self) -> Activation {
        self.element.set_current_time(0.0);
        self.element.set_muted(true);
        Activation::Pending(self.element.play())
    }

    fn resume(&mut self) -> Activation {
        Activation::Pending(self.element.play())
    }

    fn pause(&mut self) {
        self.element.pause();
    }

    fn deactivate(&mut self, reset_position: bool) {
        self.element.pause();
        if reset_position {
            self.element.set_current_time(0.0);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.element.set_muted(muted);
    }

    fn is_muted(&self) -> bool {
        self.element.muted()
    }
}

pub struct EmbedBackend {
    provider: EmbedProvider,
    mount: MountId,
    url: String,
    frame: Box<dyn EmbedFrame>,
    muted: bool,
}

impl EmbedBackend {
    fn post(&mut self, command: EmbedCommand) {
        let message = self.provider.message(command);
        if let Err(err) = self.frame.post_message(&message) {
            trace!(?command, %err, "embed command dropped");
        }
    }
}

impl MediaBackend for EmbedBackend {
    fn kind(&self) -> MediaKind {
        match self.provider {
            EmbedProvider::Youtube => MediaKind::Youtube,
            EmbedProvider::Vimeo => MediaKind::Vimeo,
        }
    }

    fn mount(&mut self) -> AppResult<()> {
        let Some(id) = self.provider.extract_id(&self.url) else {
            return Err(AppError::media(
                self.mount.slot.story,
                self.mount.slot.segment,
                format!("no video id in {}", self.url),
            ));
        };
        let embed_url = self.provider.embed_url(&id);
        debug!(%embed_url, "embed mounted");
        self.frame.set_source(Some(&embed_url));
        Ok(())
    }

    fn unmount(&mut self) {
        self.frame.set_source(None);
    }

    fn activate(&mut self) -> Activation {
        self.muted = true;
        self.post(EmbedCommand::Mute);
        self.post(EmbedCommand::Play);
        Activation::Fired
    }

    fn resume(&mut self) -> Activation {
        self.post(EmbedCommand::Play);
        Activation::Fired
    }

    fn pause(&mut self) {
        self.post(EmbedCommand::Pause);
    }

    fn deactivate(&mut self, reset_position: bool) {
        self.post(EmbedCommand::Pause);
        if reset_position {
            self.post(EmbedCommand::SeekToStart);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.post(if muted {
            EmbedCommand::Mute
        } else {
            EmbedCommand::Unmute
        });
    }

    fn is_muted(&self) -> bool {
        self.muted
    }
}
