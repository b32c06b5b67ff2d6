mod cache;
mod filter;
mod model;
mod source;
mod transform;

pub use cache::{CACHE_FILE_NAME, CatalogCache, FetchOrigin, FetchedCatalog};
pub use filter::{ALL_CATEGORIES, CategoryFilter};
pub use model::{MediaKind, Segment, SegmentLayout, Story, TextSize, VerticalAnchor};
pub use source::{JsonFileSource, StaticSource, StorySource, parse_response};
pub use transform::{clean_description_html, kind_from_mime, slugify, transform_posts};

#[cfg(test)]
pub(crate) use model::fixtures;
