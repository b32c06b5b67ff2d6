use crate::carousel::IndexRequest;
use crate::nav::Slot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NextStory,
    PrevStory,
    NextSegment,
    PrevSegment,
    /// Zero-based segment of the active story.
    JumpSegment {
        segment: usize,
    },
    TogglePlay,
    ToggleMute,
    OpenContent,
    CloseContent,
    CycleCategory,
    SelectCategory {
        name: String,
    },
    Refresh,
    DismissOnboarding,
    /// Closes the topmost overlay, or leaves the viewer when none is open.
    Back,
    Quit,
    /// A committed pointer gesture from one of the carousels.
    Gesture {
        request: IndexRequest,
    },
    /// The media of `slot` played to the end.
    MediaEnded {
        slot: Slot,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionId {
    NextStory,
    PrevStory,
    NextSegment,
    PrevSegment,
    JumpSegment,
    TogglePlay,
    ToggleMute,
    OpenContent,
    CloseContent,
    CycleCategory,
    SelectCategory,
    Refresh,
    DismissOnboarding,
    Back,
    Quit,
    Gesture,
    MediaEnded,
    Input,
    Catalog,
    Media,
}

impl ActionId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NextStory => "next-story",
            Self::PrevStory => "prev-story",
            Self::NextSegment => "next-segment",
            Self::PrevSegment => "prev-segment",
            Self::JumpSegment => "jump-segment",
            Self::TogglePlay => "toggle-play",
            Self::ToggleMute => "toggle-mute",
            Self::OpenContent => "open-content",
            Self::CloseContent => "close-content",
            Self::CycleCategory => "cycle-category",
            Self::SelectCategory => "select-category",
            Self::Refresh => "refresh",
            Self::DismissOnboarding => "dismiss-onboarding",
            Self::Back => "back",
            Self::Quit => "quit",
            Self::Gesture => "gesture",
            Self::MediaEnded => "media-ended",
            Self::Input => "input",
            Self::Catalog => "catalog",
            Self::Media => "media",
        }
    }
}

impl Command {
    pub fn action_id(&self) -> ActionId {
        match self {
            Self::NextStory => ActionId::NextStory,
            Self::PrevStory => ActionId::PrevStory,
            Self::NextSegment => ActionId::NextSegment,
            Self::PrevSegment => ActionId::PrevSegment,
            Self::JumpSegment { .. } => ActionId::JumpSegment,
            Self::TogglePlay => ActionId::TogglePlay,
            Self::ToggleMute => ActionId::ToggleMute,
            Self::OpenContent => ActionId::OpenContent,
            Self::CloseContent => ActionId::CloseContent,
            Self::CycleCategory => ActionId::CycleCategory,
            Self::SelectCategory { .. } => ActionId::SelectCategory,
            Self::Refresh => ActionId::Refresh,
            Self::DismissOnboarding => ActionId::DismissOnboarding,
            Self::Back => ActionId::Back,
            Self::Quit => ActionId::Quit,
            Self::Gesture { .. } => ActionId::Gesture,
            Self::MediaEnded { .. } => ActionId::MediaEnded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Noop,
    QuitRequested,
}
