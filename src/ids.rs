/// Record id generation.
use chrono::{DateTime, Local};
use rand::RngExt;

/// Generate a new id from the creation time plus a random suffix, so two
/// records created within the same millisecond still differ.
pub fn new_id(now: DateTime<Local>) -> String {
    let mut rng = rand::rng();
    let suffix: u16 = rng.random_range(0..=u16::MAX);
    format!("{}-{suffix:04x}", now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_starts_with_creation_millis() {
        let now = Local::now();
        let id = new_id(now);
        let (millis, suffix) = id.split_once('-').unwrap();
        assert_eq!(millis, now.timestamp_millis().to_string());
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
