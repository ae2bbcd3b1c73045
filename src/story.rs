//! Story generator desk: pick a style, generate, save, re-read.

use crate::article::study::Segment;
use crate::models::{GeneratedStory, SavedStory, WordRecord};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use uuid::Uuid;

static STORY_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[\w']+\b").expect("story word pattern is valid"));

pub const STYLES: [&str; 7] = [
    "Fun & Humorous (有趣幽默)",
    "Imaginative / Brain-hole (脑洞大开)",
    "Sci-Fi (科幻)",
    "Mystery (悬疑)",
    "Romance (浪漫)",
    "Daily Life (日常生活)",
    "Fairy Tale (童话)",
];

/// Story on the desk: freshly generated (no id yet) or loaded from the shelf.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub translation: String,
    pub created_at: Option<i64>,
}

/// Split `content` into segments, flagging words from `words`
/// case-insensitively.
pub fn highlight(content: &str, words: &[String]) -> Vec<Segment> {
    let targets: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
    let mut segments = Vec::new();
    let mut last = 0;
    for m in STORY_WORD.find_iter(content) {
        if m.start() > last {
            segments.push(Segment {
                text: content[last..m.start()].to_string(),
                highlighted: false,
            });
        }
        segments.push(Segment {
            text: m.as_str().to_string(),
            highlighted: targets.contains(&m.as_str().to_lowercase()),
        });
        last = m.end();
    }
    if last < content.len() {
        segments.push(Segment {
            text: content[last..].to_string(),
            highlighted: false,
        });
    }
    segments
}

#[derive(Debug)]
pub struct StoryDesk {
    words: Vec<String>,
    style: usize,
    draft: Option<Draft>,
    show_translation: bool,
    show_highlights: bool,
}

impl StoryDesk {
    pub fn new(words: &[WordRecord]) -> Self {
        Self {
            words: words.iter().map(|w| w.word.clone()).collect(),
            style: 0,
            draft: None,
            show_translation: false,
            show_highlights: true,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn style(&self) -> &'static str {
        STYLES[self.style]
    }

    pub fn set_style(&mut self, index: usize) -> bool {
        if index >= STYLES.len() {
            return false;
        }
        self.style = index;
        true
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn toggle_translation(&mut self) -> bool {
        self.show_translation = !self.show_translation;
        self.show_translation
    }

    pub fn toggle_highlights(&mut self) -> bool {
        self.show_highlights = !self.show_highlights;
        self.show_highlights
    }

    pub fn is_translation_shown(&self) -> bool {
        self.show_translation
    }

    /// Replace the desk with a freshly generated, unsaved story.
    pub fn set_generated(&mut self, story: GeneratedStory) {
        self.draft = Some(Draft {
            id: None,
            title: story.title,
            content: story.content,
            translation: story.translation,
            created_at: None,
        });
    }

    pub fn load(&mut self, story: &SavedStory) {
        self.draft = Some(Draft {
            id: Some(story.id),
            title: story.title.clone(),
            content: story.content.clone(),
            translation: story.translation.clone(),
            created_at: Some(story.created_at),
        });
    }

    /// The draft as a record to save. Re-saving keeps its id and creation
    /// time; the draft adopts both so later saves update in place.
    pub fn prepare_save(&mut self) -> Option<SavedStory> {
        let style = self.style().to_string();
        let related_words = self.words.clone();
        let draft = self.draft.as_mut()?;
        let id = *draft.id.get_or_insert_with(Uuid::new_v4);
        let created_at = *draft
            .created_at
            .get_or_insert_with(|| chrono::Utc::now().timestamp_millis());

        Some(SavedStory {
            id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            translation: draft.translation.clone(),
            style,
            created_at,
            related_words,
        })
    }

    /// Drop the draft if it is the story that was just deleted.
    pub fn forget(&mut self, id: Uuid) {
        if self.draft.as_ref().and_then(|d| d.id) == Some(id) {
            self.draft = None;
        }
    }

    /// Story body split for display; a single plain segment when
    /// highlighting is off.
    pub fn segments(&self) -> Vec<Segment> {
        let Some(draft) = &self.draft else {
            return Vec::new();
        };
        if !self.show_highlights {
            return vec![Segment {
                text: draft.content.clone(),
                highlighted: false,
            }];
        }
        highlight(&draft.content, &self.words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::fruit;
    use pretty_assertions::assert_eq;

    fn story() -> GeneratedStory {
        GeneratedStory {
            title: "Orchard".to_string(),
            content: "An Apple met a banana's cousin.".to_string(),
            translation: "一个苹果……".to_string(),
        }
    }

    #[test]
    fn test_highlight_marks_only_target_words() {
        let words = vec!["apple".to_string(), "banana".to_string()];
        let highlighted: Vec<String> = highlight("An Apple met a banana's cousin.", &words)
            .into_iter()
            .filter(|s| s.highlighted)
            .map(|s| s.text)
            .collect();
        // "banana's" is one token and does not equal "banana".
        assert_eq!(highlighted, vec!["Apple"]);
    }

    #[test]
    fn test_highlight_round_trips_content() {
        let content = "  Hello, world! It's fine.  ";
        let joined: String = highlight(content, &[])
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(joined, content);
    }

    #[test]
    fn test_resave_reuses_id_and_creation_time() {
        let mut desk = StoryDesk::new(&fruit());
        assert!(desk.prepare_save().is_none());

        desk.set_generated(story());
        desk.set_style(2);
        let first = desk.prepare_save().unwrap();
        let second = desk.prepare_save().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(first.style, "Sci-Fi (科幻)");
        assert_eq!(first.related_words.len(), 5);
    }

    #[test]
    fn test_generating_again_makes_a_new_story() {
        let mut desk = StoryDesk::new(&fruit());
        desk.set_generated(story());
        let saved = desk.prepare_save().unwrap();

        desk.set_generated(story());
        assert_ne!(desk.prepare_save().unwrap().id, saved.id);
    }

    #[test]
    fn test_forget_clears_matching_draft_only() {
        let mut desk = StoryDesk::new(&fruit());
        desk.set_generated(story());
        let saved = desk.prepare_save().unwrap();

        desk.forget(Uuid::new_v4());
        assert!(desk.draft().is_some());
        desk.forget(saved.id);
        assert!(desk.draft().is_none());
    }

    #[test]
    fn test_style_bounds_and_plain_segments() {
        let mut desk = StoryDesk::new(&fruit());
        assert!(!desk.set_style(STYLES.len()));
        assert_eq!(desk.style(), STYLES[0]);

        desk.set_generated(story());
        assert!(!desk.toggle_highlights());
        assert_eq!(desk.segments().len(), 1);
    }
}
