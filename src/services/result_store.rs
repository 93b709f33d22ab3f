/// Authoritative text buffer for recognized (or user-edited) text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultStore {
    text: String,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer verbatim. Engine results and user edits share this path.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn get(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whitespace-delimited, non-empty tokens
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Unicode scalar values in the buffer
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty() {
        let store = ResultStore::new();
        assert!(store.is_empty());
        assert_eq!(store.word_count(), 0);
        assert_eq!(store.char_count(), 0);
    }

    #[test]
    fn test_hello_world_counts() {
        let mut store = ResultStore::new();
        store.set("hello world");
        assert_eq!(store.word_count(), 2);
        assert_eq!(store.char_count(), 11);
    }

    #[test]
    fn test_set_keeps_whitespace_verbatim() {
        let mut store = ResultStore::new();
        let text = "  line one\n\n\tline two  \n";
        store.set(text);
        assert_eq!(store.get(), text);
        assert_eq!(store.word_count(), 4);
        assert_eq!(store.char_count(), text.chars().count());
    }

    #[test]
    fn test_whitespace_only_has_no_words() {
        let mut store = ResultStore::new();
        store.set(" \n\t ");
        assert_eq!(store.word_count(), 0);
        assert_eq!(store.char_count(), 4);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_char_count_is_unicode_aware() {
        let mut store = ResultStore::new();
        store.set("日本語 テキスト");
        assert_eq!(store.char_count(), 8);
        assert_eq!(store.word_count(), 2);
    }

    #[test]
    fn test_edit_overwrites_and_clear_empties() {
        let mut store = ResultStore::new();
        store.set("machine text");
        store.set("user edit");
        assert_eq!(store.get(), "user edit");

        store.clear();
        assert!(store.is_empty());
    }
}
