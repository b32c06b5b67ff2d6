mod chrome;
mod layout;
mod overlay;
mod slide;
mod text;

pub use chrome::{ChromeView, draw_chrome, pagination_dot_at, pagination_dot_position};
pub use layout::{UiLayout, split_layout};
pub use overlay::{
    draw_content_modal, draw_empty_state, draw_indicator, draw_onboarding_overlay,
};
pub use slide::{SlideView, draw_slide};
pub use text::{WrapCache, strip_html, wrap_text};
