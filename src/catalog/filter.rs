use super::model::Story;

pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    categories: Vec<String>,
    selected: usize,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            categories: vec![ALL_CATEGORIES.to_string()],
            selected: 0,
        }
    }
}

impl CategoryFilter {
    /// `All` followed by the distinct categories in first-seen order.
    pub fn from_stories(stories: &[Story]) -> Self {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for story in stories {
            if !categories.iter().any(|cat| cat == &story.category) {
                categories.push(story.category.clone());
            }
        }
        Self {
            categories,
            selected: 0,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn selected(&self) -> &str {
        &self.categories[self.selected]
    }

    /// Unknown names select `All`.
    pub fn select(&mut self, name: &str) -> bool {
        let next = self
            .categories
            .iter()
            .position(|cat| cat.eq_ignore_ascii_case(name))
            .unwrap_or(0);
        let changed = next != self.selected;
        self.selected = next;
        changed
    }

    pub fn cycle(&mut self) {
        self.selected = (self.selected + 1) % self.categories.len();
    }

    pub fn apply(&self, stories: &[Story]) -> Vec<Story> {
        if self.selected == 0 {
            return stories.to_vec();
        }
        let selected = self.selected();
        stories
            .iter()
            .filter(|story| story.category == selected)
            .cloned()
            .collect()
    }
}
