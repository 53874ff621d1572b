use chrono::{DateTime, Local, NaiveDate};

use super::collection::{Collection, Record};
use crate::ids::new_id;
use crate::store::{ENTRIES_KEY, Store};
use crate::types::{Entry, EntryId};

pub type Entries = Collection<Entry>;

impl Record for Entry {
    const KEY: &'static str = ENTRIES_KEY;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entries {
    /// Logs a finished action. `date` defaults to today; blank output is ignored.
    pub fn create(
        &mut self,
        output: &str,
        fulfilled: bool,
        date: Option<NaiveDate>,
        now: DateTime<Local>,
        store: &Store,
    ) -> Option<EntryId> {
        let output = output.trim();
        if output.is_empty() {
            return None;
        }
        let item = Entry {
            id: new_id(now),
            date: date.unwrap_or_else(|| now.date_naive()),
            output: output.to_string(),
            fulfilled,
        };
        Some(self.insert(item, store))
    }

    pub fn fulfilled_count(&self) -> usize {
        self.list().iter().filter(|entry| entry.fulfilled).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_date_to_today() {
        let store = Store::open_in_memory().unwrap();
        let mut entries = Entries::load(&store);
        let now = Local::now();
        let id = entries
            .create("Sent invoice", true, None, now, &store)
            .unwrap();
        let entry = entries.get(&id).unwrap();
        assert_eq!(entry.date, now.date_naive());
        assert_eq!(entry.output, "Sent invoice");
        assert!(entry.fulfilled);
    }

    #[test]
    fn blank_output_is_ignored() {
        let store = Store::open_in_memory().unwrap();
        let mut entries = Entries::load(&store);
        assert_eq!(entries.create(" ", false, None, Local::now(), &store), None);
        assert!(entries.is_empty());
    }

    #[test]
    fn clear_empties_memory_and_store() {
        let store = Store::open_in_memory().unwrap();
        let mut entries = Entries::load(&store);
        let now = Local::now();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1);
        entries.create("one", true, date, now, &store);
        entries.create("two", false, date, now, &store);
        assert_eq!(entries.fulfilled_count(), 1);
        assert_eq!(Entries::load(&store).len(), 2);

        entries.clear(&store);
        assert!(entries.is_empty());
        assert!(Entries::load(&store).is_empty());
    }

    #[test]
    fn corrupt_store_loads_empty() {
        let store = Store::open_in_memory().unwrap();
        store.put_raw(ENTRIES_KEY, "[{\"id\": 3}]").unwrap();
        assert!(Entries::load(&store).is_empty());
    }
}
