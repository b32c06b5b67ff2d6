use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

const YOUTUBE_ID_LEN: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedProvider {
    Youtube,
    Vimeo,
}

impl EmbedProvider {
    pub fn extract_id(self, url: &str) -> Option<String> {
        match self {
            Self::Youtube => youtube_id(url),
            Self::Vimeo => vimeo_id(url),
        }
    }

    /// Player URL with autoplay, mute and loop baked in.
    pub fn embed_url(self, id: &str) -> String {
        match self {
            Self::Youtube => format!(
                "https://www.youtube.com/embed/{id}?enablejsapi=1&autoplay=1&mute=1&controls=0&loop=1&playlist={id}&playsinline=1&rel=0"
            ),
            Self::Vimeo => format!(
                "https://player.vimeo.com/video/{id}?autoplay=1&muted=1&controls=0&loop=1&background=1"
            ),
        }
    }

    pub fn message(self, command: EmbedCommand) -> String {
        let value = match (self, command) {
            (Self::Youtube, command) => {
                let (func, args) = match command {
                    EmbedCommand::Play => ("playVideo", json!("")),
                    EmbedCommand::Pause => ("pauseVideo", json!("")),
                    EmbedCommand::Mute => ("mute", json!("")),
                    EmbedCommand::Unmute => ("unMute", json!("")),
                    EmbedCommand::SeekToStart => ("seekTo", json!([0, true])),
                };
                json!({ "event": "command", "func": func, "args": args })
            }
            (Self::Vimeo, EmbedCommand::Play) => json!({ "method": "play" }),
            (Self::Vimeo, EmbedCommand::Pause) => json!({ "method": "pause" }),
            (Self::Vimeo, EmbedCommand::Mute) => json!({ "method": "setVolume", "value": 0 }),
            (Self::Vimeo, EmbedCommand::Unmute) => json!({ "method": "setVolume", "value": 1 }),
            (Self::Vimeo, EmbedCommand::SeekToStart) => {
                json!({ "method": "setCurrentTime", "value": 0 })
            }
        };
        value.to_string()
    }
}

/// Control messages for a third-party player frame. There is no acknowledgment,
/// so every command must be safe to repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedCommand {
    Play,
    Pause,
    Mute,
    Unmute,
    SeekToStart,
}

static YOUTUBE_URL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^.*(youtu.be/|v/|u/[A-Za-z0-9_]/|embed/|watch\?v=|&v=|shorts/)([^#&?]*).*",
    )
    .ok()
});

static VIMEO_URL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:www\.|player\.)?vimeo.com/(?:channels/(?:[A-Za-z0-9_]+/)?|groups/[^/]*/videos/|album/[0-9]+/video/|video/|manage/videos/|)([0-9]+)(?:[A-Za-z0-9_-]+)?",
    )
    .ok()
});

static BARE_NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]+$").ok());

/// The id after the rightmost recognized marker, if it is exactly 11 characters.
pub fn youtube_id(url: &str) -> Option<String> {
    let id = YOUTUBE_URL.as_ref()?.captures(url)?.get(2)?.as_str();
    (id.chars().count() == YOUTUBE_ID_LEN).then(|| id.to_string())
}

/// The numeric id from any common vimeo.com path, or the input itself when it
/// is already a bare number.
pub fn vimeo_id(url: &str) -> Option<String> {
    if let Some(id) = VIMEO_URL
        .as_ref()
        .and_then(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
    {
        return Some(id.as_str().to_string());
    }
    BARE_NUMBER
        .as_ref()?
        .is_match(url)
        .then(|| url.to_string())
}
