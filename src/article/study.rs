//! Study dashboard over words enriched in the context of one article.

use super::board::InfiniteBoard;
use super::cloze::ClozeView;
use crate::models::ArticleWordRecord;
use crate::{Error, Result};
use rand::Rng;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence pattern is valid"));

pub const CONTEXT_UNAVAILABLE: &str = "Context unavailable.";
pub const NOTE_UNAVAILABLE: &str = "Context note not available.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyState {
    /// Waiting on enrichment.
    Loading,
    /// Enrichment came back with nothing usable.
    Empty,
    Failed(String),
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyView {
    Flashcards,
    Matching,
    Cloze,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

/// First sentence of `article` mentioning `word`, split so each occurrence
/// of the word is its own highlighted segment.
pub fn context_sentence(article: &str, word: &str) -> Option<Vec<Segment>> {
    if word.is_empty() {
        return None;
    }
    let needle = word.to_lowercase();
    let sentences: Vec<&str> = SENTENCE.find_iter(article).map(|m| m.as_str()).collect();
    let sentences = if sentences.is_empty() {
        vec![article]
    } else {
        sentences
    };
    let sentence = sentences
        .into_iter()
        .find(|s| s.to_lowercase().contains(&needle))?;

    let pattern = match RegexBuilder::new(&regex::escape(word))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!("Could not build highlight pattern for '{}': {}", word, e);
            return Some(vec![Segment {
                text: sentence.to_string(),
                highlighted: false,
            }]);
        }
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for m in pattern.find_iter(sentence) {
        if m.start() > last {
            segments.push(Segment {
                text: sentence[last..m.start()].to_string(),
                highlighted: false,
            });
        }
        segments.push(Segment {
            text: m.as_str().to_string(),
            highlighted: true,
        });
        last = m.end();
    }
    if last < sentence.len() {
        segments.push(Segment {
            text: sentence[last..].to_string(),
            highlighted: false,
        });
    }
    Some(segments)
}

pub fn context_note(record: &ArticleWordRecord) -> &str {
    record
        .context_note
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(NOTE_UNAVAILABLE)
}

#[derive(Debug)]
pub struct StudySession {
    article: String,
    selected_words: Vec<String>,
    state: StudyState,
    records: Vec<ArticleWordRecord>,
    view: StudyView,
    index: usize,
    flipped: bool,
    show_context: bool,
    board: Option<InfiniteBoard>,
    cloze: Option<ClozeView>,
}

impl StudySession {
    pub fn new(article: String, selected_words: Vec<String>) -> Self {
        Self {
            article,
            selected_words,
            state: StudyState::Loading,
            records: Vec::new(),
            view: StudyView::Flashcards,
            index: 0,
            flipped: false,
            show_context: false,
            board: None,
            cloze: None,
        }
    }

    pub fn article(&self) -> &str {
        &self.article
    }

    pub fn selected_words(&self) -> &[String] {
        &self.selected_words
    }

    pub fn state(&self) -> &StudyState {
        &self.state
    }

    pub fn records(&self) -> &[ArticleWordRecord] {
        &self.records
    }

    pub fn view(&self) -> StudyView {
        self.view
    }

    /// Accept the enrichment outcome. Only the first delivery counts.
    pub fn deliver(&mut self, outcome: Result<Vec<ArticleWordRecord>>) {
        if self.state != StudyState::Loading {
            tracing::warn!("Ignoring study data delivered after loading finished");
            return;
        }
        self.state = match outcome {
            Ok(records) if records.is_empty() => StudyState::Empty,
            Ok(records) => {
                tracing::info!("Study guide ready with {} words", records.len());
                self.records = records;
                StudyState::Ready
            }
            Err(e) => {
                tracing::error!("Study guide generation failed: {}", e);
                StudyState::Failed(e.to_string())
            }
        };
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.state != StudyState::Ready {
            return Err(Error::EmptyWordSet);
        }
        Ok(())
    }

    /// Switch views. Matching and cloze start fresh every time they are
    /// entered from another view.
    pub fn set_view<R: Rng + ?Sized>(&mut self, view: StudyView, rng: &mut R) -> Result<()> {
        self.ensure_ready()?;
        if view == self.view {
            return Ok(());
        }
        self.board = None;
        self.cloze = None;
        match view {
            StudyView::Flashcards => {}
            StudyView::Matching => self.board = Some(InfiniteBoard::new(&self.records, rng)),
            StudyView::Cloze => {
                self.cloze = Some(ClozeView::new(&self.article, &self.records, rng));
            }
        }
        self.view = view;
        Ok(())
    }

    pub fn board(&self) -> Option<&InfiniteBoard> {
        self.board.as_ref()
    }

    pub fn board_mut(&mut self) -> Option<&mut InfiniteBoard> {
        self.board.as_mut()
    }

    pub fn cloze(&self) -> Option<&ClozeView> {
        self.cloze.as_ref()
    }

    pub fn cloze_mut(&mut self) -> Option<&mut ClozeView> {
        self.cloze.as_mut()
    }

    // Flashcards

    pub fn current(&self) -> Option<&ArticleWordRecord> {
        self.records.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_context_shown(&self) -> bool {
        self.show_context
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn toggle_context(&mut self) {
        self.show_context = !self.show_context;
    }

    pub fn next_card(&mut self) {
        if self.records.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.records.len();
        self.reset_card();
    }

    pub fn prev_card(&mut self) {
        if self.records.is_empty() {
            return;
        }
        self.index = (self.index + self.records.len() - 1) % self.records.len();
        self.reset_card();
    }

    fn reset_card(&mut self) {
        self.flipped = false;
        self.show_context = false;
    }

    /// Article sentence for the current card, if any mentions it.
    pub fn current_context(&self) -> Option<Vec<Segment>> {
        let record = self.current()?;
        context_sentence(&self.article, &record.word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::test_support::{article_record, records};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ARTICLE: &str = "The nebula glowed. Stars formed inside the Nebula! Nothing else";

    fn ready(count: usize) -> StudySession {
        let mut session = StudySession::new(ARTICLE.to_string(), vec!["nebula".to_string()]);
        session.deliver(Ok(records(count)));
        session
    }

    #[test]
    fn test_context_sentence_highlights_every_occurrence() {
        let segments = context_sentence(ARTICLE, "NEBULA").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment {
                    text: "The ".to_string(),
                    highlighted: false
                },
                Segment {
                    text: "nebula".to_string(),
                    highlighted: true
                },
                Segment {
                    text: " glowed.".to_string(),
                    highlighted: false
                },
            ]
        );
    }

    #[test]
    fn test_context_sentence_missing_word() {
        assert_eq!(context_sentence(ARTICLE, "comet"), None);
        // Trailing text without terminal punctuation is not a sentence.
        assert_eq!(context_sentence(ARTICLE, "else"), None);
    }

    #[test]
    fn test_article_without_terminator_is_one_sentence() {
        let segments = context_sentence("no full stop here", "stop").unwrap();
        assert_eq!(segments.len(), 3);
        assert!(segments[1].highlighted);
    }

    #[test]
    fn test_context_note_fallback() {
        let mut record = article_record("nebula", "星云");
        assert_eq!(context_note(&record), NOTE_UNAVAILABLE);
        record.context_note = Some("Used literally here.".to_string());
        assert_eq!(context_note(&record), "Used literally here.");
    }

    #[test]
    fn test_delivery_states() {
        let mut empty = StudySession::new(ARTICLE.to_string(), vec![]);
        empty.deliver(Ok(vec![]));
        assert_eq!(empty.state(), &StudyState::Empty);

        let mut failed = StudySession::new(ARTICLE.to_string(), vec![]);
        failed.deliver(Err(Error::AiProvider("quota".to_string())));
        assert!(matches!(failed.state(), StudyState::Failed(msg) if msg.contains("quota")));
        assert!(failed
            .set_view(StudyView::Matching, &mut StdRng::seed_from_u64(0))
            .is_err());

        let mut late = ready(2);
        late.deliver(Ok(vec![]));
        assert_eq!(late.state(), &StudyState::Ready);
        assert_eq!(late.records().len(), 2);
    }

    #[test]
    fn test_flashcards_wrap_both_ways() {
        let mut session = ready(3);
        session.prev_card();
        assert_eq!(session.index(), 2);
        session.flip();
        session.toggle_context();
        session.next_card();
        assert_eq!(session.index(), 0);
        assert!(!session.is_flipped());
        assert!(!session.is_context_shown());
    }

    #[test]
    fn test_entering_matching_deals_fresh_board() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = ready(8);

        session.set_view(StudyView::Matching, &mut rng).unwrap();
        let board = session.board_mut().unwrap();
        board.tap(0);
        board.tap(1);
        // Re-entering the active view keeps the board in play.
        session.set_view(StudyView::Matching, &mut rng).unwrap();
        let board = session.board().unwrap();
        assert!(board.match_count() == 1 || board.is_error(0));

        session.set_view(StudyView::Cloze, &mut rng).unwrap();
        assert!(session.board().is_none());
        assert!(session.cloze().is_some());

        session.set_view(StudyView::Matching, &mut rng).unwrap();
        let board = session.board().unwrap();
        assert_eq!(board.match_count(), 0);
        assert_eq!(board.selected(), None);
    }
}
