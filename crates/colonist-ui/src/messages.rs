//! Message lookup backed by the resource store's strings.

use colonist_media::ResourceStore;
use std::sync::Arc;

/// Localized text with `%name%` placeholders.
///
/// Unknown keys render as the key itself so a missing translation is visible
/// without breaking the panel.
#[derive(Clone)]
pub struct Messages {
    store: Arc<dyn ResourceStore>,
}

impl Messages {
    /// Look messages up in `store`.
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    /// True if a message exists for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.store.string(key).is_some()
    }

    /// Message for `key`.
    pub fn t(&self, key: &str) -> String {
        match self.store.string(key) {
            Some(text) => text,
            None => {
                tracing::debug!(%key, "Missing message");
                key.to_string()
            }
        }
    }

    /// Message for `key` with each `%name%` replaced by its value.
    pub fn t_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.t(key);
        for (name, value) in args {
            text = text.replace(&format!("%{name}%"), value);
        }
        text
    }

    /// Display name of a game object id (`<id>.name`).
    pub fn name_of(&self, id: &str) -> String {
        self.t(&format!("{id}.name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colonist_media::MemoryResourceStore;

    fn messages() -> Messages {
        let store = MemoryResourceStore::new();
        store.insert_string("greeting", "Hail, %nation% of %name%!");
        store.insert_string("model.goods.furs.name", "Furs");
        Messages::new(Arc::new(store))
    }

    #[test]
    fn test_substitution() {
        let m = messages();
        assert_eq!(
            m.t_args("greeting", &[("nation", "Sioux"), ("name", "Wakpa")]),
            "Hail, Sioux of Wakpa!"
        );
        assert_eq!(m.name_of("model.goods.furs"), "Furs");
    }

    #[test]
    fn test_missing_key_echoes_key() {
        let m = messages();
        assert!(!m.has("nope"));
        assert_eq!(m.t("nope"), "nope");
        assert_eq!(m.t_args("nope", &[("x", "y")]), "nope");
    }
}
