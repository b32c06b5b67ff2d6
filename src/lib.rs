pub mod app;
pub mod carousel;
pub mod catalog;
pub mod command;
pub mod config;
pub mod deeplink;
pub mod error;
pub mod event;
pub mod input;
pub mod logging;
pub mod nav;
pub mod playback;
pub mod session;
pub mod ui;
