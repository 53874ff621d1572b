/// Domain collections (loops, entries, ideas) and the mode flag.
mod collection;
mod entries;
mod ideas;
mod loops;
mod mode;

pub use collection::Record;
pub use entries::Entries;
pub use ideas::Ideas;
pub use loops::Loops;
pub use mode::{load_mode, save_mode};
