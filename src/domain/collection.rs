use serde::{Serialize, de::DeserializeOwned};

use crate::store::Store;

/// A record kept in one of the persisted lists.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Store key the whole list is saved under.
    const KEY: &'static str;

    fn id(&self) -> &str;
}

/// In-memory list mirrored to the store after every mutation.
///
/// Items are kept newest first; the in-memory copy is authoritative for the
/// session and is only read back from the store at startup.
#[derive(Clone, Debug, Default)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T: Record> Collection<T> {
    /// Rehydrates the list, falling back to empty on missing or corrupt data.
    pub fn load(store: &Store) -> Self {
        Self {
            items: store.read::<Vec<T>>(T::KEY).unwrap_or_default(),
        }
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Prepends `item` and persists. Returns the item's id.
    pub fn insert(&mut self, item: T, store: &Store) -> String {
        let id = item.id().to_string();
        self.items.insert(0, item);
        self.persist(store);
        id
    }

    /// Applies `patch` to the item with `id`. Returns false if there is none.
    pub fn update(&mut self, id: &str, store: &Store, patch: impl FnOnce(&mut T)) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id() == id) else {
            return false;
        };
        patch(item);
        self.persist(store);
        true
    }

    pub fn remove(&mut self, id: &str, store: &Store) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() == before {
            return false;
        }
        self.persist(store);
        true
    }

    pub fn clear(&mut self, store: &Store) {
        self.items.clear();
        self.persist(store);
    }

    fn persist(&self, store: &Store) {
        store.write(T::KEY, &self.items);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use crate::domain::{Entries, Loops};
    use crate::store::Store;
    use crate::types::LoopStatus;

    #[test]
    fn failed_writes_keep_the_in_memory_change() {
        let store = Store::open_in_memory().unwrap();
        store.break_storage().unwrap();
        let now = Local::now();

        let mut loops = Loops::load(&store);
        assert!(loops.is_empty());
        let id = loops.create("Ship report", "", now, &store).unwrap();
        assert_eq!(loops.list()[0].title, "Ship report");

        assert!(loops.complete(&id, now, &store));
        assert_eq!(loops.get(&id).unwrap().status, LoopStatus::Done);
        assert!(loops.remove(&id, &store));
        assert!(loops.is_empty());

        let mut entries = Entries::load(&store);
        entries.create("Sent invoice", true, None, now, &store);
        assert_eq!(entries.len(), 1);
        entries.clear(&store);
        assert!(entries.is_empty());
    }
}
