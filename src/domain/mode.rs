use crate::store::{MODE_KEY, Store};
use crate::types::Mode;

pub fn load_mode(store: &Store) -> Mode {
    store.read(MODE_KEY).unwrap_or_default()
}

pub fn save_mode(mode: Mode, store: &Store) {
    store.write(MODE_KEY, &mode);
}
