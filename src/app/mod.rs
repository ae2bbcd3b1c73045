//! Terminal front-end driving a [`Session`] line by line.
//!
//! Each input line becomes one session operation. Delayed engine effects
//! (match reveals, board clears) are scheduled on a [`TimerScope`] owned by
//! the current screen and applied when they fire.

mod render;

use crate::ai::{EnrichmentService, GeminiEnrichmentClient};
use crate::article::board::SlotTap;
use crate::article::StudyView;
use crate::games::choice::AnswerOutcome;
use crate::games::flashcard::DeckMove;
use crate::games::matching::{MatchOutcome, Resolution, COMPLETION_DELAY, TICK_INTERVAL};
use crate::games::scramble::TileMove;
use crate::games::spelling::SpellingOutcome;
use crate::games::{Advance, Game};
use crate::library::{StoryShelf, WordLibrary};
use crate::models::{Config, GameKind, SavedStory, WordGroup};
use crate::session::{LearningPath, Mode, Screen, Session};
use crate::speech::{CommandSpeech, SilentSpeech, SpeechService};
use crate::store::{JsonFileStore, RecordStore, LIBRARY_FILE, STORIES_FILE};
use crate::timer::TimerScope;
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

const AI_RETRY_DELAY: Duration = Duration::from_millis(1500);

/// Timer events the screens schedule for themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    MatchResolve,
    MatchFinish,
    MatchTick,
    BoardClear(usize, usize),
    BoardErrors,
}

/// Injectable collaborators, so tests can swap in mocks.
pub struct AppServices {
    pub ai: Arc<dyn EnrichmentService>,
    pub groups: Arc<dyn RecordStore<WordGroup>>,
    pub stories: Arc<dyn RecordStore<SavedStory>>,
    pub speech: Box<dyn SpeechService>,
}

#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub seed: Option<u64>,
    pub silent: bool,
}

pub struct App {
    session: Session,
    ai: Arc<dyn EnrichmentService>,
    library: WordLibrary,
    shelf: StoryShelf,
    speech: Box<dyn SpeechService>,
    locale: String,
    timers: TimerScope<TimerEvent>,
    scope: (Mode, Option<StudyView>),
    groups: Vec<WordGroup>,
    stories: Vec<SavedStory>,
}

impl App {
    pub fn with_services(services: AppServices, session: Session, locale: String) -> Self {
        let scope = (session.mode(), None);
        Self {
            session,
            ai: services.ai.clone(),
            library: WordLibrary::new(services.groups, services.ai),
            shelf: StoryShelf::new(services.stories),
            speech: services.speech,
            locale,
            timers: TimerScope::new(),
            scope,
            groups: Vec::new(),
            stories: Vec::new(),
        }
    }

    /// Wire up the Gemini client, JSON stores under the data directory and
    /// the configured speech command.
    pub fn new(config: &Config, options: AppOptions) -> Self {
        let ai = GeminiEnrichmentClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        )
        .with_retries(config.ai_retry_attempts, AI_RETRY_DELAY);
        info!("AI provider: Gemini (model: {})", ai.model());

        let speech: Box<dyn SpeechService> = match (&config.speech_command, options.silent) {
            (Some(command), false) => match CommandSpeech::parse(command) {
                Some(speech) => Box::new(speech),
                None => Box::new(SilentSpeech),
            },
            _ => {
                info!("Speech disabled");
                Box::new(SilentSpeech)
            }
        };

        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!("Data directory: {}", config.data_dir.display());

        Self::with_services(
            AppServices {
                ai: Arc::new(ai),
                groups: Arc::new(JsonFileStore::in_dir(&config.data_dir, LIBRARY_FILE)),
                stories: Arc::new(JsonFileStore::in_dir(&config.data_dir, STORIES_FILE)),
                speech,
            },
            Session::new(rng),
            config.speech_locale.clone(),
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn render(&self) -> Vec<String> {
        render::screen(&self.session)
    }

    /// Read commands from stdin until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();
        print_lines(&mut stdout, &self.render()).await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    let line = line.trim();
                    if matches!(line, "quit" | "exit") {
                        break;
                    }
                    let out = self.handle(line).await;
                    print_lines(&mut stdout, &out).await?;
                }
                Some(event) = self.timers.next() => {
                    let out = self.on_timer(event);
                    print_lines(&mut stdout, &out).await?;
                }
            }
        }
        info!("Session ended");
        Ok(())
    }

    /// Apply one input line and return what to show.
    pub async fn handle(&mut self, line: &str) -> Vec<String> {
        let line = line.trim();
        let mut out = Vec::new();
        if !line.is_empty() {
            self.session.clear_error();
            match self.dispatch(line, &mut out).await {
                Ok(()) => {}
                Err(e @ (Error::Validation(_) | Error::EmptyWordSet | Error::Busy)) => {
                    out.push(format!("! {}", e));
                }
                Err(e) if self.session.last_error().is_some() => {
                    debug!("Reported via session: {}", e);
                }
                Err(e) => {
                    warn!("Command '{}' failed: {}", line, e);
                    out.push(format!("! {}", e));
                }
            }
        }
        self.sync_timers();
        out.extend(self.render());
        out
    }

    /// Apply a fired timer and return what to show.
    pub fn on_timer(&mut self, event: TimerEvent) -> Vec<String> {
        let mut finished = false;
        match event {
            TimerEvent::MatchTick | TimerEvent::MatchResolve | TimerEvent::MatchFinish => {
                let Some((Game::Match(engine), _)) = self.session.game_mut() else {
                    debug!("Ignoring stale timer {:?}", event);
                    return Vec::new();
                };
                match event {
                    TimerEvent::MatchTick => {
                        engine.tick();
                        return Vec::new();
                    }
                    TimerEvent::MatchResolve => {
                        if let Resolution::Matched { completed: true } = engine.resolve() {
                            self.timers.schedule(COMPLETION_DELAY, TimerEvent::MatchFinish);
                        }
                    }
                    _ => finished = engine.finish().is_some(),
                }
            }
            TimerEvent::BoardClear(..) | TimerEvent::BoardErrors => {
                let Some((study, rng)) = self.session.study_mut() else {
                    debug!("Ignoring stale timer {:?}", event);
                    return Vec::new();
                };
                let Some(board) = study.board_mut() else {
                    return Vec::new();
                };
                if let TimerEvent::BoardClear(first, second) = event {
                    let dealt = board.clear_match(first, second, rng);
                    debug!("Board refilled with {} pairs", dealt);
                } else {
                    board.clear_errors();
                }
            }
        }

        if finished {
            if let Err(e) = self.session.finish_game() {
                warn!("Could not close the match game: {}", e);
            }
        }
        self.sync_timers();
        self.render()
    }

    /// Cancel timers that belong to a screen or study view we just left.
    fn sync_timers(&mut self) {
        let view = match self.session.screen() {
            Screen::ArticleStudy(study) => Some(study.view()),
            _ => None,
        };
        let scope = (self.session.mode(), view);
        if scope == self.scope {
            return;
        }
        self.timers.cancel();
        self.scope = scope;
        if scope.0 == Mode::Match {
            self.timers.every(TICK_INTERVAL, TimerEvent::MatchTick);
        }
    }

    fn speak(&self, text: &str) {
        self.speech.speak(text, &self.locale);
    }

    async fn dispatch(&mut self, line: &str, out: &mut Vec<String>) -> Result<()> {
        let (verb, rest) = split_verb(line);
        match verb {
            "help" => {
                out.push("Anywhere: home | back | new | quit".to_string());
                return Ok(());
            }
            "home" => return self.session.go_home(),
            "back" => return self.session.back(),
            "new" => return self.session.new_list(),
            _ => {}
        }

        match self.session.mode() {
            Mode::Home => match verb {
                "1" | "custom" => self.session.choose_path(LearningPath::Custom),
                "2" | "article" => self.session.choose_path(LearningPath::Article),
                _ => unknown(line),
            },
            Mode::Setup => {
                if verb == "library" {
                    self.session.open_library()?;
                    return self.refresh_groups(out).await;
                }
                let ai = self.ai.clone();
                self.session.submit_words(line, ai.as_ref()).await
            }
            Mode::Library => self.library_command(verb, rest, out).await,
            Mode::Flashcard => self.flashcard_command(verb),
            Mode::GameHub => self.hub_command(verb),
            Mode::Quiz | Mode::Context => self.choice_command(verb, out),
            Mode::Spelling => self.spelling_command(verb, line, out),
            Mode::Match => self.match_command(verb),
            Mode::Scramble => self.scramble_command(verb, rest),
            Mode::StoryGenerator => self.story_command(verb, rest, out).await,
            Mode::Result => match verb {
                "again" | "hub" => self.session.back_to_hub(),
                _ => unknown(line),
            },
            Mode::ArticleSetup => self.session.submit_article(line),
            Mode::ArticleSelection => self.selection_command(verb, rest).await,
            Mode::ArticleStudy => self.study_command(verb, rest, out),
        }
    }

    async fn refresh_groups(&mut self, out: &mut Vec<String>) -> Result<()> {
        self.groups = self.library.list().await?;
        if self.groups.is_empty() {
            out.push("No saved groups yet.".to_string());
        }
        for (i, group) in self.groups.iter().enumerate() {
            out.push(format!("  {}) {} ({} words)", i + 1, group.name, group.words.len()));
        }
        Ok(())
    }

    fn group_at(&self, raw: &str) -> Result<&WordGroup> {
        index_arg(raw)
            .and_then(|i| self.groups.get(i))
            .ok_or_else(|| Error::Validation(format!("No group numbered '{}'", raw)))
    }

    async fn library_command(
        &mut self,
        verb: &str,
        rest: &str,
        out: &mut Vec<String>,
    ) -> Result<()> {
        match verb {
            "list" => {}
            "play" => {
                let words = self.group_at(rest)?.words.clone();
                return self.session.play_group(words);
            }
            "create" => {
                let (name, words) = rest
                    .split_once(':')
                    .ok_or_else(|| Error::Validation("Use: create NAME: words".to_string()))?;
                let group = self.library.create(name, words).await?;
                out.push(format!("Created '{}'", group.name));
            }
            "rename" => {
                let (number, name) = split_verb(rest);
                let id = self.group_at(number)?.id;
                self.library.rename(id, name).await?;
            }
            "add" => {
                let (number, words) = rest
                    .split_once(':')
                    .ok_or_else(|| Error::Validation("Use: add N: words".to_string()))?;
                let id = self.group_at(number.trim())?.id;
                let (_, added) = self.library.append_words(id, words).await?;
                out.push(format!("Added {} new words", added));
            }
            "remove" => {
                let (number, indices) = split_verb(rest);
                let id = self.group_at(number)?.id;
                let indices: Vec<usize> =
                    indices.split_whitespace().filter_map(index_arg).collect();
                self.library.remove_words(id, &indices).await?;
            }
            "delete" => {
                let id = self.group_at(rest)?.id;
                self.library.delete(id).await?;
            }
            _ => return unknown(verb),
        }
        self.refresh_groups(out).await
    }

    fn flashcard_command(&mut self, verb: &str) -> Result<()> {
        if verb == "games" {
            return self.session.finish_flashcards();
        }
        let Some(deck) = self.session.deck_mut() else {
            return Ok(());
        };
        match verb {
            "f" | "flip" => deck.flip(),
            "p" | "prev" => {
                deck.prev();
            }
            "say" => {
                let word = deck.current().word.clone();
                self.speak(&word);
            }
            "n" | "next" => {
                if deck.next() == DeckMove::Finished {
                    return self.session.finish_flashcards();
                }
            }
            other => return unknown(other),
        }
        Ok(())
    }

    fn hub_command(&mut self, verb: &str) -> Result<()> {
        match verb {
            "story" => self.session.open_story_generator(),
            "cards" => self.session.open_flashcards(),
            other => match GameKind::ALL
                .into_iter()
                .find(|k| k.label().eq_ignore_ascii_case(other))
            {
                Some(kind) => self.session.select_game(kind),
                None => unknown(other),
            },
        }
    }

    fn choice_command(&mut self, verb: &str, out: &mut Vec<String>) -> Result<()> {
        let Some((game, _)) = self.session.game_mut() else {
            return Ok(());
        };
        if matches!(verb, "n" | "next") {
            let advance = match game {
                Game::Quiz(engine) => engine.advance(),
                Game::Context(engine) => engine.advance(),
                _ => return Ok(()),
            };
            return self.after_advance(advance, out);
        }

        let option = index_arg(verb)
            .ok_or_else(|| Error::Validation("Answer with an option number".to_string()))?;
        let outcome = match game {
            Game::Quiz(engine) => engine.answer(option),
            Game::Context(engine) => engine.answer(option),
            _ => return Ok(()),
        };
        match outcome {
            AnswerOutcome::Answered { is_correct: true } => out.push("Correct!".to_string()),
            AnswerOutcome::Answered { is_correct: false } => out.push("Not quite.".to_string()),
            AnswerOutcome::AlreadyAnswered => out.push("Already answered.".to_string()),
            AnswerOutcome::OutOfRange => out.push("No such option.".to_string()),
        }
        Ok(())
    }

    fn after_advance(&mut self, advance: Advance, out: &mut Vec<String>) -> Result<()> {
        match advance {
            Advance::Locked => {
                out.push("Answer first.".to_string());
                Ok(())
            }
            Advance::Next => Ok(()),
            Advance::Finished(_) => self.session.finish_game().map(|_| ()),
        }
    }

    fn spelling_command(&mut self, verb: &str, line: &str, out: &mut Vec<String>) -> Result<()> {
        let Some((Game::Spelling(engine), _)) = self.session.game_mut() else {
            return Ok(());
        };
        match verb {
            "n" | "next" => {
                let advance = engine.advance();
                self.after_advance(advance, out)
            }
            "say" => {
                if let Some(word) = engine.current().map(|w| w.word.clone()) {
                    self.speak(&word);
                }
                Ok(())
            }
            _ => {
                match engine.check(line) {
                    SpellingOutcome::Empty => out.push("Type a guess first.".to_string()),
                    SpellingOutcome::AlreadyChecked => out.push("Type 'next'.".to_string()),
                    SpellingOutcome::Checked { .. } => {}
                }
                Ok(())
            }
        }
    }

    fn match_command(&mut self, verb: &str) -> Result<()> {
        let Some((Game::Match(engine), _)) = self.session.game_mut() else {
            return Ok(());
        };
        let index = index_arg(verb)
            .ok_or_else(|| Error::Validation("Pick a card by number".to_string()))?;
        if let MatchOutcome::Resolving { delay, .. } = engine.select(index) {
            self.timers.schedule(delay, TimerEvent::MatchResolve);
        }
        Ok(())
    }

    fn scramble_command(&mut self, verb: &str, rest: &str) -> Result<()> {
        let Some((Game::Scramble(engine), rng)) = self.session.game_mut() else {
            return Ok(());
        };
        let moved = match verb {
            "p" | "a" => {
                let position = index_arg(rest)
                    .ok_or_else(|| Error::Validation("Give a tile number".to_string()))?;
                if verb == "p" {
                    engine.tap_pool(position)
                } else {
                    engine.tap_answer(position)
                }
            }
            "shuffle" => {
                engine.reshuffle(rng);
                return Ok(());
            }
            "say" => {
                if let Some(word) = engine.current().map(|w| w.word.clone()) {
                    self.speak(&word);
                }
                return Ok(());
            }
            "n" | "next" => {
                let advance = engine.advance(rng);
                return self.after_advance(advance, &mut Vec::new());
            }
            other => return unknown(other),
        };
        if let TileMove::Moved { solved: true } = moved {
            if let Some(word) = engine.current().map(|w| w.word.clone()) {
                self.speak(&word);
            }
        }
        Ok(())
    }

    async fn story_command(
        &mut self,
        verb: &str,
        rest: &str,
        out: &mut Vec<String>,
    ) -> Result<()> {
        match verb {
            "generate" => {
                let ai = self.ai.clone();
                return self.session.generate_story(ai.as_ref()).await;
            }
            "stories" => {
                self.stories = self.shelf.list().await?;
                for (i, story) in self.stories.iter().enumerate() {
                    out.push(format!("  {}) {} [{}]", i + 1, story.title, story.style));
                }
                if self.stories.is_empty() {
                    out.push("No saved stories yet.".to_string());
                }
                return Ok(());
            }
            _ => {}
        }

        let picked = index_arg(rest).and_then(|i| self.stories.get(i)).cloned();
        let Some(desk) = self.session.story_mut() else {
            return Ok(());
        };
        match verb {
            "style" => {
                if !index_arg(rest).is_some_and(|i| desk.set_style(i)) {
                    return Err(Error::Validation("No such style".to_string()));
                }
            }
            "save" => {
                let story = self.shelf.save(desk).await?;
                out.push(format!("Saved '{}'", story.title));
            }
            "translation" => {
                desk.toggle_translation();
            }
            "highlights" => {
                desk.toggle_highlights();
            }
            "open" => {
                let story = picked.ok_or_else(|| Error::Validation("No such story".to_string()))?;
                desk.load(&story);
            }
            "delete" => {
                let story = picked.ok_or_else(|| Error::Validation("No such story".to_string()))?;
                self.shelf.delete(story.id, Some(desk)).await?;
                self.stories.retain(|s| s.id != story.id);
            }
            other => return unknown(other),
        }
        Ok(())
    }

    async fn selection_command(&mut self, verb: &str, rest: &str) -> Result<()> {
        if verb == "done" {
            let ai = self.ai.clone();
            return self.session.study_selection(ai.as_ref()).await;
        }
        let Some(selection) = self.session.selection_mut() else {
            return Ok(());
        };
        match verb {
            "pick" => {
                for word in rest.split_whitespace() {
                    if selection.find(word).is_some() {
                        selection.toggle_word(word);
                    }
                }
                Ok(())
            }
            other => unknown(other),
        }
    }

    fn study_command(&mut self, verb: &str, rest: &str, out: &mut Vec<String>) -> Result<()> {
        let Some((study, rng)) = self.session.study_mut() else {
            return Ok(());
        };
        let view = match verb {
            "cards" => Some(StudyView::Flashcards),
            "match" => Some(StudyView::Matching),
            "cloze" => Some(StudyView::Cloze),
            _ => None,
        };
        if let Some(view) = view {
            return study.set_view(view, rng);
        }

        match study.view() {
            StudyView::Flashcards => match verb {
                "f" | "flip" => study.flip(),
                "n" | "next" => study.next_card(),
                "p" | "prev" => study.prev_card(),
                "context" => study.toggle_context(),
                "say" => {
                    if let Some(word) = study.current().map(|r| r.word.clone()) {
                        self.speech.speak(&word, &self.locale);
                    }
                }
                other => return unknown(other),
            },
            StudyView::Matching => {
                let Some(board) = study.board_mut() else {
                    return Ok(());
                };
                let slot = index_arg(verb)
                    .ok_or_else(|| Error::Validation("Pick a tile by number".to_string()))?;
                match board.tap(slot) {
                    SlotTap::Matched {
                        first,
                        second,
                        delay,
                    } => self
                        .timers
                        .schedule(delay, TimerEvent::BoardClear(first, second)),
                    SlotTap::Mismatched { delay, .. } => {
                        self.timers.schedule(delay, TimerEvent::BoardErrors)
                    }
                    _ => {}
                }
            }
            StudyView::Cloze => {
                let Some(cloze) = study.cloze_mut() else {
                    return Ok(());
                };
                match verb {
                    "fill" => {
                        let (blank, chip) = split_verb(rest);
                        let placed = match (index_arg(blank), index_arg(chip)) {
                            (Some(blank), Some(chip)) => cloze.fill_from_bank(blank, chip),
                            _ => false,
                        };
                        if !placed {
                            out.push("Could not place that word.".to_string());
                        }
                    }
                    "write" => {
                        let (blank, word) = split_verb(rest);
                        let token = index_arg(blank).and_then(|n| cloze.blanks().get(n).copied());
                        if !token.is_some_and(|t| cloze.fill(t, word)) {
                            out.push("Could not place that word.".to_string());
                        }
                    }
                    "check" => {
                        cloze.check()?;
                    }
                    other => return unknown(other),
                }
            }
        }
        Ok(())
    }
}

fn split_verb(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    }
}

/// 1-based user number to 0-based index.
fn index_arg(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok()?.checked_sub(1)
}

fn unknown(command: &str) -> Result<()> {
    Err(Error::Validation(format!(
        "Unknown command '{}'. Type 'help'.",
        command
    )))
}

async fn print_lines(stdout: &mut tokio::io::Stdout, lines: &[String]) -> Result<()> {
    for line in lines {
        stdout.write_all(line.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockEnrichmentClient;
    use crate::speech::MockSpeech;
    use crate::store::MemoryStore;

    fn app(ai: MockEnrichmentClient, speech: MockSpeech) -> App {
        App::with_services(
            AppServices {
                ai: Arc::new(ai),
                groups: Arc::new(MemoryStore::new()),
                stories: Arc::new(MemoryStore::new()),
                speech: Box::new(speech),
            },
            Session::with_seed(7),
            "en-US".to_string(),
        )
    }

    #[test]
    fn test_index_arg_is_one_based() {
        assert_eq!(index_arg("1"), Some(0));
        assert_eq!(index_arg(" 12 "), Some(11));
        assert_eq!(index_arg("0"), None);
        assert_eq!(index_arg("x"), None);
    }

    #[test]
    fn test_split_verb() {
        assert_eq!(split_verb("create Fruit: apple"), ("create", "Fruit: apple"));
        assert_eq!(split_verb("next"), ("next", ""));
    }

    #[tokio::test]
    async fn test_words_to_flashcards_and_speech() {
        let speech = MockSpeech::new();
        let mut app = app(MockEnrichmentClient::new(), speech.clone());

        app.handle("custom").await;
        let out = app.handle("apple, pear").await;
        assert_eq!(app.session().mode(), Mode::Flashcard);
        assert!(out.iter().any(|l| l.contains("Card 1/2: apple")));

        app.handle("say").await;
        assert_eq!(speech.calls()[0].0, "apple");

        app.handle("next").await;
        app.handle("next").await;
        assert_eq!(app.session().mode(), Mode::GameHub);
    }

    #[tokio::test]
    async fn test_failed_enrichment_is_shown() {
        let mut app = app(
            MockEnrichmentClient::new().with_failure("quota exceeded"),
            MockSpeech::new(),
        );
        app.handle("1").await;
        let out = app.handle("apple").await;

        assert_eq!(app.session().mode(), Mode::Setup);
        assert!(out.iter().any(|l| l.contains("quota exceeded")));
    }

    #[tokio::test]
    async fn test_unknown_command_keeps_screen() {
        let mut app = app(MockEnrichmentClient::new(), MockSpeech::new());
        let out = app.handle("dance").await;
        assert_eq!(app.session().mode(), Mode::Home);
        assert!(out[0].contains("Unknown command"));
    }

    #[tokio::test]
    async fn test_library_create_and_play() {
        let mut app = app(MockEnrichmentClient::new(), MockSpeech::new());
        app.handle("custom").await;
        app.handle("library").await;
        let out = app.handle("create Fruit: apple, kiwi").await;
        assert!(out.iter().any(|l| l.contains("1) Fruit (2 words)")));

        app.handle("play 1").await;
        assert_eq!(app.session().mode(), Mode::Flashcard);
        assert_eq!(app.session().words().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_match_timers_resolve_pairs() {
        let mut app = app(MockEnrichmentClient::new(), MockSpeech::new());
        app.handle("custom").await;
        app.handle("apple").await;
        app.handle("games").await;
        app.handle("match").await;

        let Screen::Game(Game::Match(engine)) = app.session().screen() else {
            panic!("expected match");
        };
        assert_eq!(engine.cards().len(), 2);
        app.handle("1").await;
        app.handle("2").await;

        loop {
            let event = app.timers.next().await.unwrap();
            app.on_timer(event);
            if app.session().mode() == Mode::Result {
                break;
            }
        }
        let stats = app.session().stats().unwrap();
        assert_eq!(stats.moves, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_match_cancels_timers() {
        let mut app = app(MockEnrichmentClient::new(), MockSpeech::new());
        app.handle("custom").await;
        app.handle("apple, pear").await;
        app.handle("games").await;
        app.handle("match").await;
        assert_eq!(app.timers.pending(), 1);

        app.handle("back").await;
        assert_eq!(app.session().mode(), Mode::GameHub);
        assert_eq!(app.timers.pending(), 0);
    }
}
