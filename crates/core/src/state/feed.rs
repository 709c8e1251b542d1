/// Maximum length of the news list and the notification log.
pub const FEED_CAPACITY: usize = 20;

/// Insert at the head and drop the oldest entries beyond `capacity`.
pub fn push_front_capped<T>(items: &mut Vec<T>, item: T, capacity: usize) {
    items.insert(0, item);
    items.truncate(capacity);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_from_the_tail() {
        let mut items = Vec::new();
        for i in 0..25 {
            push_front_capped(&mut items, i, FEED_CAPACITY);
        }
        assert_eq!(items.len(), FEED_CAPACITY);
        assert_eq!(items.first(), Some(&24));
        assert_eq!(items.last(), Some(&5));
    }
}
