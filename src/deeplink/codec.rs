use url::Url;
use url::form_urlencoded;

pub const PLAYER_PATH: &str = "/player";
const STORY_PARAM: &str = "story";
const SEGMENT_PARAM: &str = "segment";
/// Resolves bare paths; only the query of the result is read.
const LOCATION_BASE: &str = "http://localhost/";

/// Story and segment ids carried by a `/player?story=..&segment=..` location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeepLink {
    pub story: Option<String>,
    pub segment: Option<String>,
}

impl DeepLink {
    pub fn new(story: impl Into<String>, segment: impl Into<String>) -> Self {
        Self {
            story: Some(story.into()),
            segment: Some(segment.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.story.is_none() && self.segment.is_none()
    }

    /// Accepts a full URL or a path. Only the query is inspected; later
    /// duplicates of a parameter are ignored. Unparseable input yields an
    /// empty link.
    pub fn parse(location: &str) -> Self {
        let Ok(base) = Url::parse(LOCATION_BASE) else {
            return Self::default();
        };
        let Ok(url) = Url::options().base_url(Some(&base)).parse(location) else {
            return Self::default();
        };

        let mut link = Self::default();
        for (key, value) in url.query_pairs() {
            let target = match key.as_ref() {
                STORY_PARAM => &mut link.story,
                SEGMENT_PARAM => &mut link.segment,
                _ => continue,
            };
            if target.is_none() {
                *target = Some(value.into_owned());
            }
        }
        link
    }

    pub fn to_location(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(story) = &self.story {
            query.append_pair(STORY_PARAM, story);
        }
        if let Some(segment) = &self.segment {
            query.append_pair(SEGMENT_PARAM, segment);
        }
        let query = query.finish();
        if query.is_empty() {
            PLAYER_PATH.to_string()
        } else {
            format!("{PLAYER_PATH}?{query}")
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::DeepLink;

    #[test]
    fn parses_player_query() {
        let link = DeepLink::parse("https://viewer.example/player?story=abc&segment=intro");
        assert_eq!(link, DeepLink::new("abc", "intro"));
    }

    #[test]
    fn missing_query_yields_empty_link() {
        assert!(DeepLink::parse("/player").is_empty());
        assert!(DeepLink::parse("").is_empty());
    }

    #[test]
    fn first_occurrence_wins_and_unknown_params_are_skipped() {
        let link = DeepLink::parse("/player?x=1&story=a&story=b#frag");
        assert_eq!(link.story.as_deref(), Some("a"));
        assert_eq!(link.segment, None);
    }

    #[test]
    fn location_omits_missing_params() {
        let link = DeepLink {
            story: None,
            segment: Some("s".to_string()),
        };
        assert_eq!(link.to_location(), "/player?segment=s");
        assert_eq!(DeepLink::default().to_location(), "/player");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let link = DeepLink::new("a b&c=d/", "é");
        assert_eq!(
            link.to_location(),
            "/player?story=a+b%26c%3Dd%2F&segment=%C3%A9"
        );
        let parsed = DeepLink::parse("/player?story=a%20b+c&segment=%C3%A9");
        assert_eq!(parsed, DeepLink::new("a b c", "é"));
    }

    proptest! {
        #[test]
        fn location_round_trips(story in ".{0,24}", segment in ".{0,24}") {
            let link = DeepLink::new(story, segment);
            prop_assert_eq!(DeepLink::parse(&link.to_location()), link);
        }
    }
}
