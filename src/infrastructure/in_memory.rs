use crate::domain::ports::ProfileStore;
use crate::domain::settlement::SavedProfile;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory table of saved card profiles.
///
/// Uses `Arc<RwLock<HashMap<String, SavedProfile>>>` so clones share the same
/// table. The checkout only ever reads from it.
#[derive(Default, Clone)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<HashMap<String, SavedProfile>>>,
}

impl InMemoryProfileStore {
    /// Creates a new, empty profile store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles<I>(profiles: I) -> Self
    where
        I: IntoIterator<Item = (String, SavedProfile)>,
    {
        Self {
            profiles: Arc::new(RwLock::new(profiles.into_iter().collect())),
        }
    }

    /// The two sample profiles the checkout ships with.
    pub fn with_demo_profiles() -> Self {
        Self::with_profiles([
            (
                "personal".to_string(),
                SavedProfile {
                    card_number: "4242424242424242".into(),
                    expiry: "12/30".into(),
                    cvc: "123".into(),
                    email: "alex.morgan@example.com".into(),
                    name_on_card: "Alex Morgan".into(),
                    address: "221 Market Street, San Francisco, CA 94105".into(),
                },
            ),
            (
                "business".to_string(),
                SavedProfile {
                    card_number: "5555555555554444".into(),
                    expiry: "08/29".into(),
                    cvc: "456".into(),
                    email: "billing@northwind.example".into(),
                    name_on_card: "Northwind Traders".into(),
                    address: "90 Harbour Road, Seattle, WA 98101".into(),
                },
            ),
        ])
    }

    pub async fn insert(&self, key: impl Into<String>, profile: SavedProfile) {
        let mut profiles = self.profiles.write().await;
        profiles.insert(key.into(), profile);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find(&self, key: &str) -> Result<Option<SavedProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(key).cloned())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let profiles = self.profiles.read().await;
        let mut keys: Vec<String> = profiles.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validators::luhn_valid;

    #[tokio::test]
    async fn test_in_memory_profile_store() {
        let store = InMemoryProfileStore::new();
        let profile = SavedProfile {
            card_number: "378282246310005".into(),
            expiry: "01/31".into(),
            cvc: "1234".into(),
            email: "amex@example.com".into(),
            name_on_card: "Card Holder".into(),
            address: "1 Main St".into(),
        };

        store.insert("amex", profile.clone()).await;
        assert_eq!(store.find("amex").await.unwrap(), Some(profile));
        assert!(store.find("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_demo_profiles_are_valid_cards() {
        let store = InMemoryProfileStore::with_demo_profiles();
        assert_eq!(store.keys().await.unwrap(), vec!["business", "personal"]);
        for key in store.keys().await.unwrap() {
            let profile = store.find(&key).await.unwrap().unwrap();
            assert!(luhn_valid(&profile.card_number), "{key} has a bad card number");
        }
    }
}
