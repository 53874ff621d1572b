use chrono::{DateTime, Local};

use super::collection::{Collection, Record};
use crate::ids::new_id;
use crate::store::{IDEAS_KEY, Store};
use crate::types::{Idea, IdeaId};

pub type Ideas = Collection<Idea>;

impl Record for Idea {
    const KEY: &'static str = IDEAS_KEY;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Ideas {
    pub fn create(
        &mut self,
        title: &str,
        notes: &str,
        now: DateTime<Local>,
        store: &Store,
    ) -> Option<IdeaId> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let item = Idea {
            id: new_id(now),
            title: title.to_string(),
            notes: notes.trim().to_string(),
            created_at: now,
        };
        Some(self.insert(item, store))
    }

    pub fn delete(&mut self, id: &str, store: &Store) -> bool {
        self.remove(id, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_delete() {
        let store = Store::open_in_memory().unwrap();
        let mut ideas = Ideas::load(&store);
        let now = Local::now();
        let keep = ideas.create("Garden app", "", now, &store).unwrap();
        let parked = ideas
            .create("Podcast", "  weekly, 20 minutes  ", now, &store)
            .unwrap();
        assert_eq!(ideas.get(&parked).unwrap().notes, "weekly, 20 minutes");

        assert!(ideas.delete(&parked, &store));
        let reloaded = Ideas::load(&store);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.list()[0].id, keep);
    }

    #[test]
    fn blank_title_is_ignored() {
        let store = Store::open_in_memory().unwrap();
        let mut ideas = Ideas::load(&store);
        assert_eq!(ideas.create("", "notes only", Local::now(), &store), None);
        assert!(ideas.is_empty());
    }
}
