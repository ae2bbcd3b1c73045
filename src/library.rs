//! Saved word groups and stories.

use crate::ai::EnrichmentService;
use crate::models::{SavedStory, WordGroup, WordRecord};
use crate::session::split_words;
use crate::store::RecordStore;
use crate::story::StoryDesk;
use crate::{Error, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct WordLibrary {
    store: Arc<dyn RecordStore<WordGroup>>,
    ai: Arc<dyn EnrichmentService>,
}

impl WordLibrary {
    pub fn new(store: Arc<dyn RecordStore<WordGroup>>, ai: Arc<dyn EnrichmentService>) -> Self {
        Self { store, ai }
    }

    pub async fn list(&self) -> Result<Vec<WordGroup>> {
        self.store.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<WordGroup> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| Error::Storage(format!("No word group with id {}", id)))
    }

    async fn enrich(&self, words: &[String]) -> Result<Vec<WordRecord>> {
        let records = self.ai.enrich(words).await?;
        if records.is_empty() {
            return Err(Error::AiProvider("No data returned from AI".to_string()));
        }
        Ok(records)
    }

    /// Enrich `raw` words and save them as a new group.
    pub async fn create(&self, name: &str, raw: &str) -> Result<WordGroup> {
        let name = required_name(name)?;
        let words = split_words(raw)?;
        let records = self.enrich(&words).await?;

        let group = WordGroup::new(name, records);
        self.store.upsert(group.clone()).await?;
        info!("Saved group '{}' with {} words", group.name, group.words.len());
        Ok(group)
    }

    pub async fn rename(&self, id: Uuid, name: &str) -> Result<WordGroup> {
        let mut group = self.get(id).await?;
        group.name = required_name(name)?;
        self.store.upsert(group.clone()).await?;
        Ok(group)
    }

    /// Drop the words at `indices`. Out-of-range indices are ignored.
    pub async fn remove_words(&self, id: Uuid, indices: &[usize]) -> Result<WordGroup> {
        let mut group = self.get(id).await?;
        let drop: HashSet<usize> = indices.iter().copied().collect();
        group.words = group
            .words
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !drop.contains(i))
            .map(|(_, w)| w)
            .collect();
        self.store.upsert(group.clone()).await?;
        Ok(group)
    }

    /// Enrich and append words the group does not already contain. Returns
    /// the updated group and how many words were added.
    pub async fn append_words(&self, id: Uuid, raw: &str) -> Result<(WordGroup, usize)> {
        let mut group = self.get(id).await?;
        let mut known: HashSet<String> = group.words.iter().map(WordRecord::key).collect();

        let fresh: Vec<String> = split_words(raw)?
            .into_iter()
            .filter(|w| !known.contains(&w.to_lowercase()))
            .collect();
        if fresh.is_empty() {
            return Ok((group, 0));
        }

        let before = group.words.len();
        for record in self.enrich(&fresh).await? {
            if known.insert(record.key()) {
                group.words.push(record);
            }
        }
        let added = group.words.len() - before;
        self.store.upsert(group.clone()).await?;
        info!("Added {} words to '{}'", added, group.name);
        Ok((group, added))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.store.delete(id).await
    }
}

fn required_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Please enter a group name.".to_string()));
    }
    Ok(name.to_string())
}

pub struct StoryShelf {
    store: Arc<dyn RecordStore<SavedStory>>,
}

impl StoryShelf {
    pub fn new(store: Arc<dyn RecordStore<SavedStory>>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<SavedStory>> {
        self.store.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<SavedStory>> {
        self.store.get(id).await
    }

    /// Save the desk's draft. Saving the same draft again updates it.
    pub async fn save(&self, desk: &mut StoryDesk) -> Result<SavedStory> {
        let story = desk
            .prepare_save()
            .ok_or_else(|| Error::Validation("Generate a story first.".to_string()))?;
        self.store.upsert(story.clone()).await?;
        info!("Saved story '{}'", story.title);
        Ok(story)
    }

    /// Delete a story, clearing it from the desk if it is showing there.
    pub async fn delete(&self, id: Uuid, desk: Option<&mut StoryDesk>) -> Result<bool> {
        let removed = self.store.delete(id).await?;
        if let Some(desk) = desk {
            desk.forget(id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::mock::synthetic_record;
    use crate::ai::MockEnrichmentClient;
    use crate::games::test_support::fruit;
    use crate::models::GeneratedStory;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn library(ai: &MockEnrichmentClient) -> WordLibrary {
        WordLibrary::new(Arc::new(MemoryStore::new()), Arc::new(ai.clone()))
    }

    fn words(group: &WordGroup) -> Vec<&str> {
        group.words.iter().map(|w| w.word.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_requires_name_and_words() {
        let ai = MockEnrichmentClient::new();
        let library = library(&ai);

        assert!(matches!(
            library.create("  ", "apple").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            library.create("Fruit", " , ").await,
            Err(Error::Validation(_))
        ));
        assert_eq!(ai.get_call_count(), 0);

        let group = library.create(" Fruit ", "apple, pear").await.unwrap();
        assert_eq!(group.name, "Fruit");
        assert_eq!(words(&group), vec!["apple", "pear"]);
        assert_eq!(library.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_enrichment_saves_nothing() {
        let ai = MockEnrichmentClient::new().with_failure("down");
        let library = library(&ai);

        assert!(library.create("Fruit", "apple").await.is_err());
        assert!(library.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_skips_known_words() {
        let ai = MockEnrichmentClient::new();
        let library = library(&ai);
        let group = library.create("Fruit", "apple").await.unwrap();

        let (group, added) = library
            .append_words(group.id, "APPLE, kiwi")
            .await
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(words(&group), vec!["apple", "kiwi"]);

        let (_, added) = library.append_words(group.id, "Kiwi").await.unwrap();
        assert_eq!(added, 0);
        assert_eq!(ai.get_call_count(), 2);
    }

    fn numbered(range: std::ops::Range<usize>) -> String {
        range.map(|i| format!("w{}", i)).collect::<Vec<_>>().join(",")
    }

    #[tokio::test]
    async fn test_groups_are_not_limited_to_a_practice_list() {
        let library = library(&MockEnrichmentClient::new());

        let big = library.create("Big", &numbered(0..25)).await.unwrap();
        assert_eq!(big.words.len(), 25);

        let small = library.create("Small", &numbered(0..15)).await.unwrap();
        let (grown, added) = library
            .append_words(small.id, &numbered(10..22))
            .await
            .unwrap();
        assert_eq!(added, 7);
        assert_eq!(grown.words.len(), 22);
        assert_eq!(library.get(small.id).await.unwrap().words.len(), 22);
    }

    #[tokio::test]
    async fn test_append_dedupes_what_the_ai_returns() {
        let ai = MockEnrichmentClient::new()
            .with_word_response(vec![synthetic_record("apple")])
            .with_word_response(vec![synthetic_record("kiwi"), synthetic_record("Apple")]);
        let library = library(&ai);
        let group = library.create("Fruit", "apple").await.unwrap();

        let (group, added) = library.append_words(group.id, "kiwi").await.unwrap();
        assert_eq!(added, 1);
        assert_eq!(words(&group), vec!["apple", "kiwi"]);
    }

    #[tokio::test]
    async fn test_rename_and_remove_words() {
        let library = WordLibrary::new(
            Arc::new(MemoryStore::with_records(vec![WordGroup::new(
                "Fruit".to_string(),
                fruit(),
            )])),
            Arc::new(MockEnrichmentClient::new()),
        );
        let id = library.list().await.unwrap()[0].id;

        assert!(matches!(
            library.rename(id, "").await,
            Err(Error::Validation(_))
        ));
        library.rename(id, "Snacks").await.unwrap();
        let group = library.remove_words(id, &[0, 2, 99]).await.unwrap();

        assert_eq!(group.name, "Snacks");
        assert_eq!(words(&group), vec!["banana", "grape", "lemon"]);
        assert_eq!(library.get(id).await.unwrap(), group);
    }

    #[tokio::test]
    async fn test_missing_group_is_a_storage_error() {
        let library = library(&MockEnrichmentClient::new());
        assert!(matches!(
            library.rename(Uuid::new_v4(), "x").await,
            Err(Error::Storage(_))
        ));
        assert!(!library.delete(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_story_shelf_save_twice_updates() {
        let shelf = StoryShelf::new(Arc::new(MemoryStore::new()));
        let mut desk = StoryDesk::new(&fruit());
        assert!(matches!(
            shelf.save(&mut desk).await,
            Err(Error::Validation(_))
        ));

        desk.set_generated(GeneratedStory {
            title: "Orchard".to_string(),
            content: "An apple fell.".to_string(),
            translation: "一个苹果掉了。".to_string(),
        });
        let first = shelf.save(&mut desk).await.unwrap();
        let second = shelf.save(&mut desk).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(shelf.list().await.unwrap().len(), 1);

        assert!(shelf.delete(first.id, Some(&mut desk)).await.unwrap());
        assert!(desk.draft().is_none());
        assert!(shelf.list().await.unwrap().is_empty());
    }
}
