//! Prompt templates sent to the AI collaborator.

use crate::Result;

const ENRICH: &str = include_str!("../data/prompts/enrich.txt");
const ENRICH_IN_CONTEXT: &str = include_str!("../data/prompts/enrich_in_context.txt");
const STORY: &str = include_str!("../data/prompts/story.txt");

/// Ask for a definition, phonetic and example for each word.
pub fn enrich(words: &[String]) -> String {
    fill(ENRICH, &[("words", &words.join(", "))])
}

/// Ask for article-aware records. Words go out as a JSON array so an entry
/// containing a comma stays one entry.
pub fn enrich_in_context(article: &str, words: &[String]) -> Result<String> {
    let list = serde_json::to_string(words)?;
    Ok(fill(ENRICH_IN_CONTEXT, &[("article", article), ("words", &list)]))
}

pub fn story(words: &[String], style: &str) -> String {
    fill(STORY, &[("words", &words.join(", ")), ("style", style)])
}

/// Substitute `{{key}}` placeholders in one pass over the template, so text
/// that came in through a value is never expanded again. Unknown keys are
/// left as written.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };

        let key = &after[..close];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + close + 4]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_enrich_prompt_lists_the_words() {
        let prompt = enrich(&words(&["apple", "banana"]));
        assert!(prompt.starts_with("I have a list of English words: apple, banana."));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_context_prompt_sends_words_as_json() {
        let prompt =
            enrich_in_context("The comet passed.", &words(&["comet", "salt, pepper"])).unwrap();
        assert!(prompt.contains("\"The comet passed.\""));
        assert!(prompt.contains(r#"["comet","salt, pepper"]"#));
    }

    #[test]
    fn test_placeholders_inside_the_article_stay_literal() {
        let prompt = enrich_in_context("Braces {{words}} here.", &words(&["brace"])).unwrap();
        assert!(prompt.contains("Braces {{words}} here."));
        assert_eq!(prompt.matches(r#"["brace"]"#).count(), 1);
    }

    #[test]
    fn test_story_prompt_carries_style_and_words() {
        let prompt = story(&words(&["orbit", "tide"]), "Sci-Fi (科幻)");
        assert!(prompt.contains("following English words: orbit, tide."));
        assert!(prompt.contains("Style/Tone: Sci-Fi (科幻)"));
        assert!(prompt.contains("Use every provided word at least once."));
    }

    #[test]
    fn test_fill_keeps_unknown_and_unclosed_markers() {
        assert_eq!(fill("{{a}} {{b}}", &[("a", "x")]), "x {{b}}");
        assert_eq!(fill("tail {{open", &[("open", "x")]), "tail {{open");
    }
}
