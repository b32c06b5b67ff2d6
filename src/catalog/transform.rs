use std::collections::HashSet;

use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use super::model::{MediaKind, Segment, SegmentLayout, Story, TextSize, VerticalAnchor};

const DEFAULT_CATEGORY: &str = "Geral";
const DEFAULT_COVER_IMAGE: &str = "https://picsum.photos/400/600";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawResponse {
    pub data: Option<RawData>,
    pub errors: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawData {
    pub posts: RawPosts,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPosts {
    pub nodes: Vec<RawPost>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPost {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<RawNode<RawImage>>,
    pub categories: Option<RawNodes<RawCategory>>,
    pub conteudo_dos_stories: Option<RawStoryContent>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawNode<T> {
    pub node: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawNodes<T> {
    pub nodes: Vec<T>,
}

impl<T> Default for RawNodes<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawImage {
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCategory {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawStoryContent {
    pub conteudo: Option<RawSlides>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSlides {
    pub slides: Option<Vec<RawSlide>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSlide {
    pub media: Option<RawNode<RawMedia>>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub content_position: Option<String>,
    pub text_size: Option<String>,
    pub show_overlay: Option<bool>,
    pub show_button: Option<bool>,
    /// Either a string or a single-element array in the CMS payload.
    pub media_source: Option<serde_json::Value>,
    pub youtube_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawMedia {
    pub media_item_url: Option<String>,
    pub mime_type: Option<String>,
}

pub fn transform_posts(posts: &[RawPost]) -> Vec<Story> {
    posts
        .iter()
        .enumerate()
        .filter_map(|(index, post)| transform_post(index, post))
        .collect()
}

fn transform_post(index: usize, post: &RawPost) -> Option<Story> {
    let slides = post
        .conteudo_dos_stories
        .as_ref()
        .and_then(|content| content.conteudo.as_ref())
        .and_then(|conteudo| conteudo.slides.as_deref())
        .unwrap_or_default();
    if slides.is_empty() {
        return None;
    }

    let title = post.title.clone().unwrap_or_default();
    let title_slug = slugify(&title);
    let id = non_empty(post.slug.as_deref())
        .map(str::to_string)
        .or_else(|| (!title_slug.is_empty()).then_some(title_slug))
        .unwrap_or_else(|| format!("story-{index}"));

    let mut seen = HashSet::new();
    let segments = slides
        .iter()
        .enumerate()
        .map(|(seg_index, slide)| {
            let mut segment = transform_slide(seg_index, slide);
            if !seen.insert(segment.id.clone()) {
                segment.id = format!("{}-{seg_index}", segment.id);
                seen.insert(segment.id.clone());
            }
            segment
        })
        .collect();

    let category = post
        .categories
        .as_ref()
        .and_then(|cats| cats.nodes.first())
        .and_then(|cat| non_empty(cat.name.as_deref()))
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string();
    let cover_image = post
        .featured_image
        .as_ref()
        .and_then(|image| image.node.as_ref())
        .and_then(|node| non_empty(node.source_url.as_deref()))
        .unwrap_or(DEFAULT_COVER_IMAGE)
        .to_string();

    Some(Story {
        id,
        title,
        category,
        cover_image,
        full_content: post.content.clone().unwrap_or_default(),
        segments,
    })
}

fn transform_slide(index: usize, slide: &RawSlide) -> Segment {
    let title = slide.title.as_deref().unwrap_or_default().trim().to_string();
    let slug = slugify(&title);
    let id = if slug.is_empty() {
        format!("segment-{index}")
    } else {
        slug
    };

    let media = slide.media.as_ref().and_then(|media| media.node.as_ref());
    let mut media_url = media
        .and_then(|node| node.media_item_url.clone())
        .unwrap_or_default();
    let mime = media
        .and_then(|node| node.mime_type.as_deref())
        .unwrap_or("image/jpeg");
    let mut media_kind = kind_from_mime(mime);

    let embed_url = non_empty(slide.youtube_url.as_deref());
    match (media_source(slide.media_source.as_ref()), embed_url) {
        (Some("youtube"), Some(url)) => {
            media_url = url.to_string();
            media_kind = MediaKind::Youtube;
        }
        (Some("vimeo"), Some(url)) => {
            media_url = url.to_string();
            media_kind = MediaKind::Vimeo;
        }
        _ => {}
    }

    let description = slide
        .text
        .as_deref()
        .map(clean_description_html)
        .filter(|html| !html.is_empty());

    Segment {
        id,
        media_url,
        media_kind,
        title: (!title.is_empty()).then_some(title),
        description_html: description,
        layout: SegmentLayout {
            vertical_anchor: slide
                .content_position
                .as_deref()
                .and_then(VerticalAnchor::parse)
                .unwrap_or_default(),
            text_size: slide
                .text_size
                .as_deref()
                .and_then(TextSize::parse)
                .unwrap_or_default(),
        },
        show_overlay: slide.show_overlay != Some(false),
        show_button: slide.show_button != Some(false),
    }
}

pub fn kind_from_mime(mime: &str) -> MediaKind {
    match mime {
        "video/youtube" => MediaKind::Youtube,
        "video/vimeo" => MediaKind::Vimeo,
        other if other.starts_with("video/") => MediaKind::Video,
        _ => MediaKind::Image,
    }
}

fn media_source(value: Option<&serde_json::Value>) -> Option<&str> {
    match value? {
        serde_json::Value::String(source) => Some(source.as_str()),
        serde_json::Value::Array(items) => items.first().and_then(|item| item.as_str()),
        _ => None,
    }
}

/// NFD-normalizes, keeps ASCII word characters, whitespace and `-`, then hyphenates.
pub fn slugify(value: &str) -> String {
    let kept: String = value
        .nfd()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-' || ch.is_whitespace())
        .collect();
    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

pub fn clean_description_html(html: &str) -> String {
    html.replace("<p>", "").replace("</p>", "<br/>")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
