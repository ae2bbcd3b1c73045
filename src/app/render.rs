//! Plain-text rendering of each screen.

use crate::article::study::{context_note, Segment};
use crate::article::{
    ClozeView, InfiniteBoard, StudySession, StudyState, StudyView, WordSelection,
};
use crate::games::choice::ChoiceQuestion;
use crate::games::{FlashcardDeck, Game, MatchEngine, ScrambleEngine, SpellingEngine};
use crate::models::GameKind;
use crate::result::summarize;
use crate::session::{Screen, Session};
use crate::story::{StoryDesk, STYLES};

pub fn screen(session: &Session) -> Vec<String> {
    let mut out = match session.screen() {
        Screen::Home => vec![
            "Vocab Quest".to_string(),
            "  1) custom  - type your own words".to_string(),
            "  2) article - learn words from an article".to_string(),
        ],
        Screen::Setup => vec![
            "Enter words separated by commas or new lines (max 20).".to_string(),
            "Or type 'library' to open saved groups.".to_string(),
        ],
        Screen::Library => vec![
            "Library: list | play N | create NAME: words | rename N NAME".to_string(),
            "         add N: words | remove N i j.. | delete N".to_string(),
        ],
        Screen::Flashcard(deck) => flashcard(deck),
        Screen::GameHub => hub(session),
        Screen::Game(game) => game_lines(game),
        Screen::StoryGenerator(desk) => story(desk),
        Screen::Result(stats) => summarize(stats)
            .to_string()
            .lines()
            .map(str::to_string)
            .chain(["Type 'again' to pick another game or 'new' for a new list.".to_string()])
            .collect(),
        Screen::ArticleSetup => vec![
            "Paste an article (at least 20 characters) on one line.".to_string(),
        ],
        Screen::ArticleSelection(selection) => article_selection(selection),
        Screen::ArticleStudy(study) => article_study(study),
    };
    if let Some(error) = session.last_error() {
        out.push(format!("! {}", error));
    }
    out
}

fn segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| {
            if s.highlighted {
                format!("*{}*", s.text)
            } else {
                s.text.clone()
            }
        })
        .collect()
}

fn flashcard(deck: &FlashcardDeck) -> Vec<String> {
    let card = deck.current();
    let progress = deck.progress();
    let mut out = vec![format!(
        "Card {}/{}: {} {}",
        progress.current, progress.total, card.word, card.phonetic
    )];
    if deck.is_flipped() {
        out.push(format!("  {}", card.definition));
        out.push(format!("  e.g. {}", card.example));
    }
    out.push("flip | next | prev | say | games".to_string());
    out
}

fn hub(session: &Session) -> Vec<String> {
    let mut out = vec![format!("Game hub ({} words)", session.words().len())];
    for kind in GameKind::ALL {
        out.push(format!("  {:<10} {}", kind.label().to_lowercase(), kind.label()));
    }
    out.push("  story      Story generator".to_string());
    out.push("  cards      Back to flashcards".to_string());
    out
}

fn choice(
    kind: GameKind,
    question: Option<&ChoiceQuestion>,
    selected: Option<usize>,
) -> Vec<String> {
    let Some(question) = question else {
        return vec![format!("{}: done. Type 'next' for results.", kind.label())];
    };
    let mut out = vec![format!("{}: {}", kind.label(), question.prompt)];
    if let Some(hint) = &question.hint {
        out.push(format!("  hint: {}", hint));
    }
    for (i, option) in question.options.iter().enumerate() {
        let mark = match selected {
            Some(_) if Some(i) == question.correct_option() => " (correct)",
            Some(s) if s == i => " (your pick)",
            _ => "",
        };
        out.push(format!("  {}) {}{}", i + 1, option, mark));
    }
    out.push(if selected.is_some() {
        "Type 'next' to continue.".to_string()
    } else {
        "Answer with the option number.".to_string()
    });
    out
}

fn spelling(engine: &SpellingEngine) -> Vec<String> {
    let Some(word) = engine.current() else {
        return vec!["Spelling: done. Type 'next' for results.".to_string()];
    };
    let mut out = vec![
        format!("Spell the word: {}", word.definition),
        format!("  sounds like {}", word.phonetic),
    ];
    match engine.checked() {
        Some(true) => out.push("Correct! Type 'next'.".to_string()),
        Some(false) => out.push(format!("The answer was '{}'. Type 'next'.", word.word)),
        None => out.push("Type your guess, or 'say' to hear it.".to_string()),
    }
    out
}

fn matching(engine: &MatchEngine) -> Vec<String> {
    let mut out = vec![format!(
        "Match: {}/{} pairs, {} moves, {}s",
        engine.matched_count(),
        engine.pairs(),
        engine.moves(),
        engine.elapsed_seconds()
    )];
    for (i, card) in engine.cards().iter().enumerate() {
        let face = if card.matched {
            format!("[{}]", card.content)
        } else if engine.is_face_up(i) {
            card.content.clone()
        } else {
            "?".to_string()
        };
        out.push(format!("  {:>2}) {}", i + 1, face));
    }
    out
}

fn scramble(engine: &ScrambleEngine) -> Vec<String> {
    let Some(word) = engine.current() else {
        return vec!["Scramble: done.".to_string()];
    };
    let pool: Vec<String> = engine
        .pool()
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}:{}", i + 1, t.ch))
        .collect();
    let mut out = vec![
        format!("Scramble: {}", word.definition),
        format!("  answer: {}", engine.answer_text()),
        format!("  pool:   {}", pool.join(" ")),
    ];
    out.push(if engine.is_solved() {
        "Solved! Type 'next'.".to_string()
    } else {
        "p N moves a pool letter, a N returns one, 'shuffle' reshuffles.".to_string()
    });
    out
}

fn game_lines(game: &Game) -> Vec<String> {
    let progress = game.progress();
    let mut out = vec![format!(
        "-- {} {}/{} --",
        game.kind().label(),
        progress.current,
        progress.total
    )];
    out.extend(match game {
        Game::Quiz(engine) => choice(GameKind::Quiz, engine.current(), engine.selected()),
        Game::Context(engine) => choice(GameKind::Context, engine.current(), engine.selected()),
        Game::Spelling(engine) => spelling(engine),
        Game::Match(engine) => matching(engine),
        Game::Scramble(engine) => scramble(engine),
    });
    out
}

fn story(desk: &StoryDesk) -> Vec<String> {
    let mut out = vec![format!("Story generator. Style: {}", desk.style())];
    match desk.draft() {
        None => {
            for (i, style) in STYLES.iter().enumerate() {
                out.push(format!("  {}) {}", i + 1, style));
            }
            out.push("style N | generate | stories | open N | delete N".to_string());
        }
        Some(draft) => {
            out.push(format!("# {}", draft.title));
            out.push(segments(&desk.segments()));
            if desk.is_translation_shown() {
                out.push(draft.translation.clone());
            }
            out.push("generate | save | translation | highlights | stories".to_string());
        }
    }
    out
}

fn article_selection(selection: &WordSelection) -> Vec<String> {
    let text: String = selection
        .tokens()
        .iter()
        .map(|t| {
            if t.is_word && selection.is_selected(&t.text) {
                format!("[{}]", t.text)
            } else {
                t.text.clone()
            }
        })
        .collect();
    vec![
        text,
        format!("Selected: {}", selection.selected().join(", ")),
        "pick WORD.. toggles words | done starts studying".to_string(),
    ]
}

fn board(board: &InfiniteBoard) -> Vec<String> {
    let mut out = vec![format!("Matches: {}", board.match_count())];
    for (i, slot) in board.slots().iter().enumerate() {
        let text = match slot {
            None => "-".to_string(),
            Some(tile) => {
                let mark = if board.is_clearing(i) {
                    " (match)"
                } else if board.is_error(i) {
                    " (x)"
                } else if board.selected() == Some(i) {
                    " <"
                } else {
                    ""
                };
                format!("{}{}", tile.content, mark)
            }
        };
        out.push(format!("  {:>2}) {}", i + 1, text));
    }
    out
}

fn cloze(view: &ClozeView) -> Vec<String> {
    let mut nth = 0;
    let text: String = view
        .tokens()
        .iter()
        .enumerate()
        .map(|(i, t)| {
            if !view.is_blank(i) {
                return t.text.clone();
            }
            nth += 1;
            match view.filled(i) {
                Some(word) => format!("({}:{})", nth, word),
                None => format!("({}:____)", nth),
            }
        })
        .collect();

    let bank: Vec<String> = view
        .bank()
        .iter()
        .enumerate()
        .map(|(i, w)| format!("{}:{}", i + 1, w))
        .collect();
    let mut out = vec![text, format!("Bank: {}", bank.join(" "))];
    match view.results() {
        Some(results) => {
            let correct = results.iter().filter(|r| r.is_correct()).count();
            out.push(format!("{}/{} correct", correct, results.len()));
        }
        None => out.push("fill BLANK CHIP | write BLANK WORD | check".to_string()),
    }
    out
}

fn article_study(study: &StudySession) -> Vec<String> {
    match study.state() {
        StudyState::Loading => return vec!["Analyzing your words...".to_string()],
        StudyState::Empty => return vec!["No study data came back. Type 'home'.".to_string()],
        StudyState::Failed(message) => return vec![format!("Study data failed: {}", message)],
        StudyState::Ready => {}
    }

    let mut out = vec![format!(
        "Study ({} words): cards | match | cloze",
        study.records().len()
    )];
    match study.view() {
        StudyView::Flashcards => {
            if let Some(record) = study.current() {
                out.push(format!(
                    "Card {}/{}: {} {}",
                    study.index() + 1,
                    study.records().len(),
                    record.word,
                    record.phonetic
                ));
                if study.is_flipped() {
                    out.push(format!("  {}", record.translation));
                    out.push(format!("  {}", record.definition));
                }
                if study.is_context_shown() {
                    let sentence = study
                        .current_context()
                        .map(|s| segments(&s))
                        .unwrap_or_else(|| crate::article::study::CONTEXT_UNAVAILABLE.to_string());
                    out.push(format!("  in context: {}", sentence));
                    out.push(format!("  note: {}", context_note(record)));
                }
            }
            out.push("flip | next | prev | context | say".to_string());
        }
        StudyView::Matching => out.extend(study.board().map(board).unwrap_or_default()),
        StudyView::Cloze => out.extend(study.cloze().map(cloze).unwrap_or_default()),
    }
    out
}
