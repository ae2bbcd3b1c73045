//! Study session navigator
//!
//! Owns the current mode and its screen state, the active word set, the
//! last game's stats and the article being studied. Every move is checked
//! against a fixed transition table. AI requests are split into a `begin`
//! step that hands out a [`Ticket`] and a `complete` step that accepts the
//! response only if the session has not moved on in the meantime.

use crate::ai::EnrichmentService;
use crate::article::{validate_article, StudySession, WordSelection};
use crate::games::{FlashcardDeck, Game};
use crate::models::{ArticleWordRecord, GameKind, GameStats, GeneratedStory, WordRecord};
use crate::story::StoryDesk;
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

/// Word lists longer than this are refused at setup.
pub const MAX_WORDS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Home,
    Setup,
    Library,
    Flashcard,
    GameHub,
    Quiz,
    Spelling,
    Match,
    Context,
    Scramble,
    StoryGenerator,
    Result,
    ArticleSetup,
    ArticleSelection,
    ArticleStudy,
}

impl Mode {
    pub fn for_game(kind: GameKind) -> Self {
        match kind {
            GameKind::Quiz => Mode::Quiz,
            GameKind::Spelling => Mode::Spelling,
            GameKind::Match => Mode::Match,
            GameKind::Context => Mode::Context,
            GameKind::Scramble => Mode::Scramble,
        }
    }

    pub fn game(self) -> Option<GameKind> {
        match self {
            Mode::Quiz => Some(GameKind::Quiz),
            Mode::Spelling => Some(GameKind::Spelling),
            Mode::Match => Some(GameKind::Match),
            Mode::Context => Some(GameKind::Context),
            Mode::Scramble => Some(GameKind::Scramble),
            _ => None,
        }
    }

    pub fn is_game(self) -> bool {
        self.game().is_some()
    }

    /// Whether `self -> to` is an edge of the navigation graph.
    pub fn can_move_to(self, to: Mode) -> bool {
        use Mode::*;

        if to == Home {
            return true;
        }
        if self.is_game() {
            return matches!(to, Result | GameHub);
        }
        matches!(
            (self, to),
            (Home, Setup | ArticleSetup)
                | (Setup, Library | Flashcard)
                | (Library, Setup | Flashcard)
                | (Flashcard, GameHub | Library)
                | (
                    GameHub,
                    Quiz | Spelling | Match | Context | Scramble | StoryGenerator | Flashcard
                )
                | (StoryGenerator, GameHub)
                | (Result, GameHub)
                | (ArticleSetup, ArticleSelection)
                | (ArticleSelection, ArticleStudy | ArticleSetup)
        )
    }

    /// Where the on-screen back control leads, if there is one.
    pub fn back_target(self) -> Option<Mode> {
        match self {
            Mode::Home => None,
            Mode::Setup | Mode::ArticleSetup | Mode::ArticleStudy => Some(Mode::Home),
            Mode::Library => Some(Mode::Setup),
            Mode::Flashcard => Some(Mode::Library),
            Mode::GameHub => Some(Mode::Flashcard),
            Mode::Quiz
            | Mode::Spelling
            | Mode::Match
            | Mode::Context
            | Mode::Scramble
            | Mode::StoryGenerator
            | Mode::Result => Some(Mode::GameHub),
            Mode::ArticleSelection => Some(Mode::ArticleSetup),
        }
    }
}

/// The two ways into a study session from the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningPath {
    Custom,
    Article,
}

/// Mode plus whatever state that mode's screen owns.
#[derive(Debug)]
pub enum Screen {
    Home,
    Setup,
    Library,
    Flashcard(FlashcardDeck),
    GameHub,
    Game(Game),
    StoryGenerator(StoryDesk),
    Result(GameStats),
    ArticleSetup,
    ArticleSelection(WordSelection),
    ArticleStudy(StudySession),
}

impl Screen {
    pub fn mode(&self) -> Mode {
        match self {
            Screen::Home => Mode::Home,
            Screen::Setup => Mode::Setup,
            Screen::Library => Mode::Library,
            Screen::Flashcard(_) => Mode::Flashcard,
            Screen::GameHub => Mode::GameHub,
            Screen::Game(game) => Mode::for_game(game.kind()),
            Screen::StoryGenerator(_) => Mode::StoryGenerator,
            Screen::Result(_) => Mode::Result,
            Screen::ArticleSetup => Mode::ArticleSetup,
            Screen::ArticleSelection(_) => Mode::ArticleSelection,
            Screen::ArticleStudy(_) => Mode::ArticleStudy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Enrichment,
    StudyData,
    Story,
}

/// Receipt for an outstanding AI request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
    kind: RequestKind,
}

impl Ticket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleState {
    pub article: String,
    pub selected_words: Vec<String>,
}

/// Split a comma or newline separated list into trimmed, non-blank words.
/// At least one word is required.
pub fn split_words(raw: &str) -> Result<Vec<String>> {
    let words: Vec<String> = raw
        .split(['\n', ','])
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();

    if words.is_empty() {
        return Err(Error::Validation(
            "Please enter at least one word.".to_string(),
        ));
    }
    Ok(words)
}

/// Typed input for a practice list: [`split_words`] capped at [`MAX_WORDS`].
pub fn parse_word_input(raw: &str) -> Result<Vec<String>> {
    let words = split_words(raw)?;
    if words.len() > MAX_WORDS {
        return Err(Error::Validation(
            "Please try fewer than 20 words at a time for the best experience.".to_string(),
        ));
    }
    Ok(words)
}

#[derive(Debug)]
pub struct Session {
    rng: StdRng,
    screen: Screen,
    words: Vec<WordRecord>,
    stats: Option<GameStats>,
    article: ArticleState,
    epoch: u64,
    pending: Option<Ticket>,
    last_error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl Session {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            screen: Screen::Home,
            words: Vec::new(),
            stats: None,
            article: ArticleState::default(),
            epoch: 0,
            pending: None,
            last_error: None,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn mode(&self) -> Mode {
        self.screen.mode()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    // Mutable access is per screen so the variant itself only changes
    // through `transition`.

    pub fn deck_mut(&mut self) -> Option<&mut FlashcardDeck> {
        match &mut self.screen {
            Screen::Flashcard(deck) => Some(deck),
            _ => None,
        }
    }

    /// The running game together with the session's random source.
    pub fn game_mut(&mut self) -> Option<(&mut Game, &mut StdRng)> {
        match &mut self.screen {
            Screen::Game(game) => Some((game, &mut self.rng)),
            _ => None,
        }
    }

    pub fn story_mut(&mut self) -> Option<&mut StoryDesk> {
        match &mut self.screen {
            Screen::StoryGenerator(desk) => Some(desk),
            _ => None,
        }
    }

    pub fn selection_mut(&mut self) -> Option<&mut WordSelection> {
        match &mut self.screen {
            Screen::ArticleSelection(selection) => Some(selection),
            _ => None,
        }
    }

    /// The article study session together with the session's random source.
    pub fn study_mut(&mut self) -> Option<(&mut StudySession, &mut StdRng)> {
        match &mut self.screen {
            Screen::ArticleStudy(study) => Some((study, &mut self.rng)),
            _ => None,
        }
    }

    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }

    pub fn stats(&self) -> Option<&GameStats> {
        self.stats.as_ref()
    }

    pub fn article(&self) -> &ArticleState {
        &self.article
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    fn transition(&mut self, screen: Screen) -> Result<()> {
        let from = self.mode();
        let to = screen.mode();
        if !from.can_move_to(to) {
            return Err(Error::InvalidTransition { from, to });
        }
        self.epoch += 1;
        if let Some(ticket) = self.pending.take() {
            info!("Abandoning in-flight {:?} request", ticket.kind);
        }
        info!("Session {:?} -> {:?}", from, to);
        self.screen = screen;
        Ok(())
    }

    fn ensure_mode(&self, to: Mode) -> Result<()> {
        let from = self.mode();
        if !from.can_move_to(to) {
            return Err(Error::InvalidTransition { from, to });
        }
        Ok(())
    }

    fn ensure_words(&self) -> Result<()> {
        if self.words.is_empty() {
            return Err(Error::EmptyWordSet);
        }
        Ok(())
    }

    fn issue(&mut self, kind: RequestKind) -> Result<Ticket> {
        if self.pending.is_some() {
            return Err(Error::Busy);
        }
        let ticket = Ticket {
            epoch: self.epoch,
            kind,
        };
        self.pending = Some(ticket);
        self.last_error = None;
        Ok(ticket)
    }

    /// Accept `ticket` if it is the outstanding request and the session has
    /// not moved since it was issued.
    fn redeem(&mut self, ticket: Ticket) -> bool {
        if self.pending != Some(ticket) || ticket.epoch != self.epoch {
            warn!("Discarding stale {:?} response", ticket.kind);
            return false;
        }
        self.pending = None;
        true
    }

    fn record_failure(&mut self, error: &Error) {
        warn!("Request failed: {}", error);
        self.last_error = Some(error.to_string());
    }

    // Navigation

    pub fn choose_path(&mut self, path: LearningPath) -> Result<()> {
        match path {
            LearningPath::Custom => self.transition(Screen::Setup),
            LearningPath::Article => {
                self.transition(Screen::ArticleSetup)?;
                self.article = ArticleState::default();
                Ok(())
            }
        }
    }

    pub fn go_home(&mut self) -> Result<()> {
        self.transition(Screen::Home)
    }

    /// Forget the word set and any result, then go home.
    pub fn new_list(&mut self) -> Result<()> {
        self.transition(Screen::Home)?;
        self.words.clear();
        self.stats = None;
        Ok(())
    }

    pub fn open_library(&mut self) -> Result<()> {
        self.transition(Screen::Library)
    }

    pub fn close_library(&mut self) -> Result<()> {
        self.transition(Screen::Setup)
    }

    /// Study a saved group's words.
    pub fn play_group(&mut self, words: Vec<WordRecord>) -> Result<()> {
        self.ensure_mode(Mode::Flashcard)?;
        let deck = FlashcardDeck::new(&words)?;
        self.transition(Screen::Flashcard(deck))?;
        self.words = words;
        self.stats = None;
        Ok(())
    }

    pub fn open_flashcards(&mut self) -> Result<()> {
        self.ensure_words()?;
        let deck = FlashcardDeck::new(&self.words)?;
        self.transition(Screen::Flashcard(deck))
    }

    pub fn finish_flashcards(&mut self) -> Result<()> {
        self.ensure_words()?;
        self.transition(Screen::GameHub)
    }

    pub fn select_game(&mut self, kind: GameKind) -> Result<()> {
        self.ensure_mode(Mode::for_game(kind))?;
        self.ensure_words()?;
        let game = Game::start(kind, &self.words, &mut self.rng)?;
        info!("Starting {} with {} words", kind.label(), self.words.len());
        self.transition(Screen::Game(game))
    }

    /// Collect the running game's final stats and show them.
    pub fn finish_game(&mut self) -> Result<&GameStats> {
        let Screen::Game(game) = &self.screen else {
            return Err(Error::InvalidTransition {
                from: self.mode(),
                to: Mode::Result,
            });
        };
        let stats = game
            .outcome()
            .ok_or_else(|| Error::Invariant(format!("{:?} is still running", game.kind())))?;

        self.transition(Screen::Result(stats.clone()))?;
        Ok(self.stats.insert(stats))
    }

    /// Leave a game or the story generator without a result.
    pub fn exit_to_hub(&mut self) -> Result<()> {
        if !matches!(self.mode(), Mode::StoryGenerator) && !self.mode().is_game() {
            return Err(Error::InvalidTransition {
                from: self.mode(),
                to: Mode::GameHub,
            });
        }
        self.ensure_words()?;
        self.transition(Screen::GameHub)
    }

    /// From the result screen back to the hub; the result is dropped.
    pub fn back_to_hub(&mut self) -> Result<()> {
        if self.mode() != Mode::Result {
            return Err(Error::InvalidTransition {
                from: self.mode(),
                to: Mode::GameHub,
            });
        }
        self.ensure_words()?;
        self.transition(Screen::GameHub)?;
        self.stats = None;
        Ok(())
    }

    pub fn open_story_generator(&mut self) -> Result<()> {
        self.ensure_words()?;
        let desk = StoryDesk::new(&self.words);
        self.transition(Screen::StoryGenerator(desk))
    }

    /// Follow the current screen's back control.
    pub fn back(&mut self) -> Result<()> {
        let from = self.mode();
        let Some(to) = from.back_target() else {
            return Ok(());
        };
        match to {
            Mode::Home => self.go_home(),
            Mode::Setup => self.close_library(),
            Mode::Library => self.open_library(),
            Mode::Flashcard => self.open_flashcards(),
            Mode::GameHub if from == Mode::Result => self.back_to_hub(),
            Mode::GameHub => self.exit_to_hub(),
            Mode::ArticleSetup => self.transition(Screen::ArticleSetup),
            other => Err(Error::InvalidTransition { from, to: other }),
        }
    }

    // Custom word path

    /// Validate typed words and reserve the enrichment request.
    pub fn begin_enrichment(&mut self, raw: &str) -> Result<(Ticket, Vec<String>)> {
        if self.mode() != Mode::Setup {
            return Err(Error::InvalidTransition {
                from: self.mode(),
                to: Mode::Flashcard,
            });
        }
        if self.pending.is_some() {
            return Err(Error::Busy);
        }
        let words = parse_word_input(raw)?;
        let ticket = self.issue(RequestKind::Enrichment)?;
        info!("Requesting enrichment for {} words", words.len());
        Ok((ticket, words))
    }

    /// Apply an enrichment response. Returns `Ok(false)` when the response
    /// is stale and was dropped. Failures leave words and mode untouched.
    pub fn complete_enrichment(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<WordRecord>>,
    ) -> Result<bool> {
        if !self.redeem(ticket) {
            return Ok(false);
        }
        let outcome = outcome.and_then(|records| {
            if records.is_empty() {
                Err(Error::AiProvider("No data returned from AI".to_string()))
            } else {
                Ok(records)
            }
        });
        match outcome {
            Ok(records) => {
                let deck = FlashcardDeck::new(&records)?;
                self.transition(Screen::Flashcard(deck))?;
                self.words = records;
                self.stats = None;
                Ok(true)
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    pub async fn submit_words(&mut self, raw: &str, ai: &dyn EnrichmentService) -> Result<()> {
        let (ticket, words) = self.begin_enrichment(raw)?;
        let outcome = ai.enrich(&words).await;
        self.complete_enrichment(ticket, outcome).map(|_| ())
    }

    // Article path

    pub fn submit_article(&mut self, article: &str) -> Result<()> {
        self.ensure_mode(Mode::ArticleSelection)?;
        validate_article(article)?;
        self.transition(Screen::ArticleSelection(WordSelection::new(article)))?;
        self.article = ArticleState {
            article: article.to_string(),
            selected_words: Vec::new(),
        };
        Ok(())
    }

    /// Move to the study dashboard and reserve the in-context enrichment.
    /// Returns the ticket plus the article and words to send.
    pub fn submit_selection(&mut self) -> Result<(Ticket, ArticleState)> {
        let Screen::ArticleSelection(selection) = &self.screen else {
            return Err(Error::InvalidTransition {
                from: self.mode(),
                to: Mode::ArticleStudy,
            });
        };
        let selected_words = selection.proceed()?;
        let article = selection.article().to_string();

        let study = StudySession::new(article.clone(), selected_words.clone());
        self.transition(Screen::ArticleStudy(study))?;
        self.article = ArticleState {
            article,
            selected_words,
        };
        let ticket = self.issue(RequestKind::StudyData)?;
        Ok((ticket, self.article.clone()))
    }

    /// Hand enrichment results to the study dashboard. Returns false when
    /// the dashboard has since been left.
    pub fn deliver_study_data(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<ArticleWordRecord>>,
    ) -> bool {
        if !self.redeem(ticket) {
            return false;
        }
        if let Err(e) = &outcome {
            self.record_failure(e);
        }
        match &mut self.screen {
            Screen::ArticleStudy(study) => {
                study.deliver(outcome);
                true
            }
            _ => false,
        }
    }

    pub async fn study_selection(&mut self, ai: &dyn EnrichmentService) -> Result<()> {
        let (ticket, state) = self.submit_selection()?;
        let outcome = ai
            .enrich_in_context(&state.article, &state.selected_words)
            .await;
        self.deliver_study_data(ticket, outcome);
        Ok(())
    }

    // Story generator

    pub fn begin_story(&mut self) -> Result<(Ticket, Vec<String>, String)> {
        let Screen::StoryGenerator(desk) = &self.screen else {
            return Err(Error::InvalidTransition {
                from: self.mode(),
                to: Mode::StoryGenerator,
            });
        };
        let words = desk.words().to_vec();
        let style = desk.style().to_string();
        let ticket = self.issue(RequestKind::Story)?;
        Ok((ticket, words, style))
    }

    pub fn complete_story(
        &mut self,
        ticket: Ticket,
        outcome: Result<GeneratedStory>,
    ) -> Result<bool> {
        if !self.redeem(ticket) {
            return Ok(false);
        }
        match (outcome, &mut self.screen) {
            (Ok(story), Screen::StoryGenerator(desk)) => {
                info!("Story '{}' generated", story.title);
                desk.set_generated(story);
                Ok(true)
            }
            (Ok(_), _) => Ok(false),
            (Err(e), _) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    pub async fn generate_story(&mut self, ai: &dyn EnrichmentService) -> Result<()> {
        let (ticket, words, style) = self.begin_story()?;
        let outcome = ai.generate_story(&words, &style).await;
        self.complete_story(ticket, outcome).map(|_| ())
    }
}
