use crate::catalog::{CategoryFilter, Story};
use crate::command::ActionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewer,
    /// The "read more" modal covers the viewer.
    Content,
    Onboarding,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Viewer => "VIEWER",
            Self::Content => "CONTENT",
            Self::Onboarding => "WELCOME",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: String,
    pub last_action_id: Option<ActionId>,
}

/// What the content modal shows for the story it was opened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub story: usize,
    pub title: String,
    pub cover_image: String,
    pub html_content: String,
}

impl ModalContent {
    pub fn from_story(index: usize, story: &Story) -> Self {
        Self {
            story: index,
            title: story.title.clone(),
            cover_image: story.cover_image.clone(),
            html_content: story.full_content.clone(),
        }
    }
}

/// The fetched catalog and the filtered subset the viewer navigates.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub all: Vec<Story>,
    pub filter: CategoryFilter,
    pub visible: Vec<Story>,
    pub loading: bool,
    /// Category requested before the catalog arrived.
    pub preferred_category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: Mode,
    pub status: StatusState,
    pub catalog: CatalogState,
    pub modal: Option<ModalContent>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: Mode::Viewer,
            status: StatusState::default(),
            catalog: CatalogState::default(),
            modal: None,
        }
    }
}
