use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

use super::model::Story;
use super::transform::{RawResponse, transform_posts};

/// Where stories come from before caching.
pub trait StorySource: Send + Sync {
    fn describe(&self) -> String;
    fn load(&self) -> AppResult<Vec<Story>>;
}

/// Reads a CMS GraphQL response saved as JSON.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorySource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> AppResult<Vec<Story>> {
        let raw = fs::read_to_string(&self.path).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to read catalog: {}", self.path.display()),
            )
        })?;
        parse_response(&raw)
    }
}

/// Serves a fixed set of stories, e.g. ones built in code.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    stories: Vec<Story>,
}

impl StaticSource {
    pub fn new(stories: Vec<Story>) -> Self {
        Self { stories }
    }
}

impl StorySource for StaticSource {
    fn describe(&self) -> String {
        format!("{} in-memory stories", self.stories.len())
    }

    fn load(&self) -> AppResult<Vec<Story>> {
        Ok(self.stories.clone())
    }
}

pub fn parse_response(raw: &str) -> AppResult<Vec<Story>> {
    let response = serde_json::from_str::<RawResponse>(raw)
        .map_err(|err| AppError::catalog(format!("malformed catalog payload: {err}")))?;
    if response.errors.is_some() {
        return Err(AppError::catalog("catalog payload reports errors"));
    }
    let Some(data) = response.data else {
        return Err(AppError::catalog("catalog payload has no data"));
    };
    Ok(transform_posts(&data.posts.nodes))
}
