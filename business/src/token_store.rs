//! Bearer token storage with two lifetime tiers.
//!
//! The persistent tier survives a process restart ("remember me"), the
//! ephemeral tier lives as long as the process. At most one tier holds a token
//! at any time: every write to one tier clears the other.

use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{error, warn};

use crate::error::StorageError;

/// Which tier a token lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTier {
    Persistent,
    Ephemeral,
}

impl TokenTier {
    /// Tier chosen by the "remember me" flag.
    pub fn for_remember(remember: bool) -> Self {
        if remember {
            Self::Persistent
        } else {
            Self::Ephemeral
        }
    }
}

/// A backend holding a single token under a fixed key.
pub trait TokenStorage: Send + Debug {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&mut self, token: &str) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-process storage. Used for the ephemeral tier, and for the persistent
/// tier in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    token: Option<String>,
}

impl MemoryStorage {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

impl TokenStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &str) -> Result<(), StorageError> {
        self.token = Some(token.to_owned());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.token = None;
        Ok(())
    }
}

#[derive(Debug)]
struct Tiers {
    persistent: Box<dyn TokenStorage>,
    ephemeral: Box<dyn TokenStorage>,
}

impl Tiers {
    fn tier_mut(&mut self, tier: TokenTier) -> &mut dyn TokenStorage {
        match tier {
            TokenTier::Persistent => self.persistent.as_mut(),
            TokenTier::Ephemeral => self.ephemeral.as_mut(),
        }
    }

    fn tier(&self, tier: TokenTier) -> &dyn TokenStorage {
        match tier {
            TokenTier::Persistent => self.persistent.as_ref(),
            TokenTier::Ephemeral => self.ephemeral.as_ref(),
        }
    }

    fn load(&self, tier: TokenTier) -> Option<String> {
        self.tier(tier).load().unwrap_or_else(|e| {
            error!("TokenStore: failed to read {tier:?} tier: {e}");
            None
        })
    }

    fn clear(&mut self, tier: TokenTier) {
        if let Err(e) = self.tier_mut(tier).clear() {
            error!("TokenStore: failed to clear {tier:?} tier: {e}");
        }
    }
}

/// Shared handle to the two token tiers.
///
/// Clones share the same tiers. Reads hand out an owned copy, so a request
/// built before a concurrent `clear()` keeps the token it was issued with.
#[derive(Debug, Clone)]
pub struct TokenStore {
    tiers: Arc<Mutex<Tiers>>,
}

impl TokenStore {
    pub fn new(persistent: Box<dyn TokenStorage>, ephemeral: Box<dyn TokenStorage>) -> Self {
        Self {
            tiers: Arc::new(Mutex::new(Tiers {
                persistent,
                ephemeral,
            })),
        }
    }

    /// Both tiers in memory.
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryStorage::default()),
            Box::new(MemoryStorage::default()),
        )
    }

    fn lock(&self) -> MutexGuard<'_, Tiers> {
        self.tiers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `token` in `tier` and empties the other tier.
    ///
    /// Returns the tier that ended up holding the token: if the persistent
    /// backend refuses the write, the token is kept in the ephemeral tier
    /// instead so the session still has a credential.
    pub fn set(&self, token: &str, tier: TokenTier) -> TokenTier {
        let mut tiers = self.lock();
        let stored = match tiers.tier_mut(tier).save(token) {
            Ok(()) => tier,
            Err(e) => {
                warn!("TokenStore: failed to write {tier:?} tier, keeping token ephemeral: {e}");
                tiers.clear(TokenTier::Persistent);
                if let Err(e) = tiers.ephemeral.save(token) {
                    error!("TokenStore: failed to write Ephemeral tier: {e}");
                }
                TokenTier::Ephemeral
            }
        };
        let other = match stored {
            TokenTier::Persistent => TokenTier::Ephemeral,
            TokenTier::Ephemeral => TokenTier::Persistent,
        };
        tiers.clear(other);
        stored
    }

    /// Persistent token if present, else the ephemeral one.
    pub fn current(&self) -> Option<String> {
        let tiers = self.lock();
        tiers
            .load(TokenTier::Persistent)
            .or_else(|| tiers.load(TokenTier::Ephemeral))
    }

    /// Which tier currently holds the token, if any.
    pub fn active_tier(&self) -> Option<TokenTier> {
        let tiers = self.lock();
        if tiers.load(TokenTier::Persistent).is_some() {
            Some(TokenTier::Persistent)
        } else if tiers.load(TokenTier::Ephemeral).is_some() {
            Some(TokenTier::Ephemeral)
        } else {
            None
        }
    }

    /// Reads a single tier.
    pub fn peek(&self, tier: TokenTier) -> Option<String> {
        self.lock().load(tier)
    }

    pub fn clear(&self) {
        let mut tiers = self.lock();
        tiers.clear(TokenTier::Persistent);
        tiers.clear(TokenTier::Ephemeral);
    }

    /// Empties only the persistent tier.
    pub fn clear_persistent(&self) {
        self.lock().clear(TokenTier::Persistent);
    }

    /// Empties only the ephemeral tier, as a process restart would.
    pub fn clear_ephemeral(&self) {
        self.lock().clear(TokenTier::Ephemeral);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct ReadOnlyStorage;

    impl TokenStorage for ReadOnlyStorage {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn save(&mut self, _token: &str) -> Result<(), StorageError> {
            Err(StorageError::Format("read-only".to_owned()))
        }

        fn clear(&mut self) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn populated_tiers(store: &TokenStore) -> usize {
        [TokenTier::Persistent, TokenTier::Ephemeral]
            .into_iter()
            .filter(|tier| store.peek(*tier).is_some())
            .count()
    }

    #[test]
    fn test_set_clears_the_other_tier() {
        let store = TokenStore::in_memory();

        store.set("first", TokenTier::Persistent);
        store.set("second", TokenTier::Ephemeral);

        assert_eq!(store.peek(TokenTier::Persistent), None);
        assert_eq!(store.peek(TokenTier::Ephemeral).as_deref(), Some("second"));
        assert_eq!(store.current().as_deref(), Some("second"));
        assert_eq!(store.active_tier(), Some(TokenTier::Ephemeral));
    }

    #[test]
    fn test_current_prefers_persistent() {
        let store = TokenStore::new(
            Box::new(MemoryStorage::with_token("kept")),
            Box::new(MemoryStorage::with_token("session")),
        );

        assert_eq!(store.current().as_deref(), Some("kept"));
    }

    #[test]
    fn test_clear_empties_both() {
        let store = TokenStore::in_memory();
        store.set("token", TokenTier::Persistent);

        store.clear();

        assert_eq!(store.current(), None);
        assert_eq!(store.active_tier(), None);
    }

    #[test]
    fn test_at_most_one_tier_after_any_sequence() {
        let store = TokenStore::in_memory();
        let steps = [
            Some(TokenTier::Persistent),
            Some(TokenTier::Ephemeral),
            None,
            Some(TokenTier::Ephemeral),
            Some(TokenTier::Persistent),
            Some(TokenTier::Persistent),
            None,
        ];

        for (i, step) in steps.into_iter().enumerate() {
            match step {
                Some(tier) => {
                    store.set(&format!("token-{i}"), tier);
                }
                None => store.clear(),
            }
            assert!(populated_tiers(&store) <= 1, "step {i} left two tiers set");
        }
    }

    #[test]
    fn test_failed_persistent_write_falls_back_to_ephemeral() {
        let store = TokenStore::new(Box::new(ReadOnlyStorage), Box::new(MemoryStorage::default()));

        let stored = store.set("token", TokenTier::Persistent);

        assert_eq!(stored, TokenTier::Ephemeral);
        assert_eq!(store.current().as_deref(), Some("token"));
    }

    #[test]
    fn test_for_remember() {
        assert_eq!(TokenTier::for_remember(true), TokenTier::Persistent);
        assert_eq!(TokenTier::for_remember(false), TokenTier::Ephemeral);
    }
}
