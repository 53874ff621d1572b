use chrono::{DateTime, Local};

use super::collection::{Collection, Record};
use crate::ids::new_id;
use crate::store::{LOOPS_KEY, Store};
use crate::types::{Loop, LoopId, LoopStatus};

pub type Loops = Collection<Loop>;

impl Record for Loop {
    const KEY: &'static str = LOOPS_KEY;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Loops {
    /// Opens a new loop. Blank titles are ignored.
    pub fn create(
        &mut self,
        title: &str,
        criterion: &str,
        now: DateTime<Local>,
        store: &Store,
    ) -> Option<LoopId> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let item = Loop {
            id: new_id(now),
            title: title.to_string(),
            criterion: criterion.trim().to_string(),
            status: LoopStatus::Open,
            created_at: now,
            completed_at: None,
        };
        Some(self.insert(item, store))
    }

    pub fn complete(&mut self, id: &str, now: DateTime<Local>, store: &Store) -> bool {
        self.update(id, store, |item| {
            item.status = LoopStatus::Done;
            item.completed_at = Some(now);
        })
    }

    pub fn reopen(&mut self, id: &str, store: &Store) -> bool {
        self.update(id, store, |item| {
            item.status = LoopStatus::Open;
            item.completed_at = None;
        })
    }

    pub fn delete(&mut self, id: &str, store: &Store) -> bool {
        self.remove(id, store)
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.get(id).is_some_and(Loop::is_open)
    }

    pub fn open_count(&self) -> usize {
        self.list().iter().filter(|item| item.is_open()).count()
    }

    /// Loops visible under the current filter, newest first.
    pub fn visible(&self, only_open: bool) -> Vec<&Loop> {
        self.list()
            .iter()
            .filter(|item| !only_open || item.is_open())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn complete_reopen_delete_scenario() {
        let store = Store::open_in_memory().unwrap();
        let mut loops = Loops::load(&store);
        let now = Local::now();

        let id = loops.create("Ship report", "", now, &store).unwrap();
        assert_eq!(loops.get(&id).unwrap().status, LoopStatus::Open);
        assert_eq!(loops.get(&id).unwrap().completed_at, None);

        assert!(loops.complete(&id, now, &store));
        let done = loops.get(&id).unwrap();
        assert_eq!(done.status, LoopStatus::Done);
        assert_eq!(done.completed_at, Some(now));

        assert!(loops.reopen(&id, &store));
        let reopened = loops.get(&id).unwrap();
        assert_eq!(reopened.status, LoopStatus::Open);
        assert_eq!(reopened.completed_at, None);

        assert!(loops.delete(&id, &store));
        assert!(loops.list().iter().all(|item| item.id != id));
        assert!(Loops::load(&store).is_empty());
    }

    #[test]
    fn blank_title_is_ignored() {
        let store = Store::open_in_memory().unwrap();
        let mut loops = Loops::load(&store);
        assert_eq!(loops.create("   ", "criterion", Local::now(), &store), None);
        assert!(loops.is_empty());
        assert_eq!(store.get_raw(LOOPS_KEY).unwrap(), None);
    }

    #[test]
    fn reload_reproduces_identical_loop() {
        let store = Store::open_in_memory().unwrap();
        let mut loops = Loops::load(&store);
        let now = Local::now();
        let id = loops
            .create(" Ship report ", " reviewed by Anna ", now, &store)
            .unwrap();
        loops.complete(&id, now, &store);

        let reloaded = Loops::load(&store);
        assert_eq!(reloaded.list(), loops.list());
        let item = reloaded.get(&id).unwrap();
        assert_eq!(item.title, "Ship report");
        assert_eq!(item.criterion, "reviewed by Anna");
    }

    #[test]
    fn newest_first_and_open_filter() {
        let store = Store::open_in_memory().unwrap();
        let mut loops = Loops::load(&store);
        let now = Local::now();
        let first = loops.create("first", "", now, &store).unwrap();
        let second = loops.create("second", "", now, &store).unwrap();
        loops.complete(&first, now, &store);

        let ids: Vec<&str> = loops.list().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec![second.as_str(), first.as_str()]);
        assert_eq!(loops.visible(true).len(), 1);
        assert_eq!(loops.visible(false).len(), 2);
        assert_eq!(loops.open_count(), 1);
        assert!(loops.is_open(&second));
        assert!(!loops.is_open(&first));
    }

    #[test]
    fn unknown_id_is_a_no_op() {
        let store = Store::open_in_memory().unwrap();
        let mut loops = Loops::load(&store);
        assert!(!loops.complete("missing", Local::now(), &store));
        assert!(!loops.delete("missing", &store));
    }
}
