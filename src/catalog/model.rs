use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Youtube,
    Vimeo,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Youtube => "youtube",
            Self::Vimeo => "vimeo",
        }
    }

    /// Kinds with a play/pause lifecycle.
    pub fn is_playable(self) -> bool {
        !matches!(self, Self::Image)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    Top,
    Center,
    #[default]
    Bottom,
}

impl VerticalAnchor {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "top" => Some(Self::Top),
            "center" => Some(Self::Center),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TextSize {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmentLayout {
    pub vertical_anchor: VerticalAnchor,
    pub text_size: TextSize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub media_url: String,
    pub media_kind: MediaKind,
    pub title: Option<String>,
    pub description_html: Option<String>,
    pub layout: SegmentLayout,
    pub show_overlay: bool,
    pub show_button: bool,
}

/// A story always carries at least one segment; empty ones are dropped during transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub category: String,
    pub cover_image: String,
    pub full_content: String,
    pub segments: Vec<Segment>,
}

impl Story {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segment_index(&self, segment_id: &str) -> Option<usize> {
        self.segments.iter().position(|seg| seg.id == segment_id)
    }
}
