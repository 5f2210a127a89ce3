//! Session-scoped bearer credential and the key/value storage it is loaded from.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ucommon::non_empty_trimmed;

use crate::CredentialError;

/// Storage key the dashboard keeps its bearer token under.
pub const CREDENTIAL_STORAGE_KEY: &str = "token";

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // SAFETY: zero bytes are valid UTF-8.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// Holds the credential for one running client session.
///
/// Gateways share it by `Arc` and read it on every call; only the login
/// flow writes it.
#[derive(Default)]
pub struct SessionContext {
    token: RwLock<Option<SecretString>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Result<Self, CredentialError> {
        let context = Self::new();
        context.set_token(token)?;
        Ok(context)
    }

    /// Loads the token stored under [`CREDENTIAL_STORAGE_KEY`].
    pub fn load_from(storage: &dyn TokenStorage) -> Result<Self, CredentialError> {
        Self::load_from_key(storage, CREDENTIAL_STORAGE_KEY)
    }

    /// Blank stored values count as "no credential".
    pub fn load_from_key(storage: &dyn TokenStorage, key: &str) -> Result<Self, CredentialError> {
        let context = Self::new();
        if let Some(token) = storage.get_item(key)? {
            if non_empty_trimmed(&token).is_some() {
                *context.token_mut()? = Some(SecretString::new(token));
            }
        }

        Ok(context)
    }

    pub fn persist_to(&self, storage: &dyn TokenStorage) -> Result<(), CredentialError> {
        self.persist_to_key(storage, CREDENTIAL_STORAGE_KEY)
    }

    /// Writes the current token under `key`, or removes the entry when signed out.
    pub fn persist_to_key(
        &self,
        storage: &dyn TokenStorage,
        key: &str,
    ) -> Result<(), CredentialError> {
        let token = self.token_ref()?;
        match token.as_ref() {
            Some(secret) => storage.set_item(key, secret.expose()),
            None => storage.remove_item(key).map(|_| ()),
        }
    }

    pub fn set_token(&self, token: impl Into<String>) -> Result<(), CredentialError> {
        let token = SecretString::new(token);
        if non_empty_trimmed(token.expose()).is_none() {
            return Err(CredentialError::invalid("bearer token must not be empty"));
        }

        *self.token_mut()? = Some(token);
        Ok(())
    }

    pub fn clear_token(&self) -> Result<bool, CredentialError> {
        Ok(self.token_mut()?.take().is_some())
    }

    pub fn has_token(&self) -> Result<bool, CredentialError> {
        Ok(self.token_ref()?.is_some())
    }

    /// Runs `f` with the raw token, if one is set.
    pub fn with_bearer<R>(&self, f: impl FnOnce(&str) -> R) -> Result<Option<R>, CredentialError> {
        let token = self.token_ref()?;
        Ok(token.as_ref().map(|secret| f(secret.expose())))
    }

    fn token_ref(&self) -> Result<RwLockReadGuard<'_, Option<SecretString>>, CredentialError> {
        self.token
            .read()
            .map_err(|_| CredentialError::unavailable("session credential lock poisoned"))
    }

    fn token_mut(&self) -> Result<RwLockWriteGuard<'_, Option<SecretString>>, CredentialError> {
        self.token
            .write()
            .map_err(|_| CredentialError::unavailable("session credential lock poisoned"))
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let has_token = self.has_token().unwrap_or(false);
        f.debug_struct("SessionContext")
            .field("has_token", &has_token)
            .finish()
    }
}

/// String key/value storage that survives restarts, in the shape of browser local storage.
pub trait TokenStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, CredentialError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), CredentialError>;

    /// Returns whether a value was present.
    fn remove_item(&self, key: &str) -> Result<bool, CredentialError>;
}

#[derive(Debug, Default)]
pub struct InMemoryTokenStorage {
    items: Mutex<HashMap<String, String>>,
}

impl InMemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, CredentialError> {
        self.items
            .lock()
            .map_err(|_| CredentialError::storage("token storage lock poisoned"))
    }
}

impl TokenStorage for InMemoryTokenStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<bool, CredentialError> {
        Ok(self.items()?.remove(key).is_some())
    }
}

/// Keeps all items in one JSON object file.
#[derive(Debug)]
pub struct FileTokenStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, CredentialError> {
        self.lock
            .lock()
            .map_err(|_| CredentialError::storage("token file lock poisoned"))
    }

    fn load(&self) -> Result<BTreeMap<String, String>, CredentialError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let bytes = fs::read(&self.path).map_err(|error| {
            CredentialError::storage(format!("failed to read token file: {error}"))
        })?;
        serde_json::from_slice(&bytes).map_err(|error| {
            CredentialError::storage(format!("failed to parse token file: {error}"))
        })
    }

    fn save(&self, items: &BTreeMap<String, String>) -> Result<(), CredentialError> {
        let bytes = serde_json::to_vec_pretty(items).map_err(|error| {
            CredentialError::storage(format!("failed to serialize token file: {error}"))
        })?;
        write_atomic(&self.path, &bytes)
    }
}

impl TokenStorage for FileTokenStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CredentialError> {
        let _guard = self.guard()?;
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        let _guard = self.guard()?;
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> Result<bool, CredentialError> {
        let _guard = self.guard()?;
        let mut items = self.load()?;
        let removed = items.remove(key).is_some();
        if removed {
            self.save(&items)?;
        }

        Ok(removed)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CredentialError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|error| {
            CredentialError::storage(format!("failed to create token directory: {error}"))
        })?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).map_err(|error| {
        CredentialError::storage(format!("failed to write temporary token file: {error}"))
    })?;
    fs::rename(&tmp, path).map_err(|error| {
        CredentialError::storage(format!("failed to replace token file: {error}"))
    })
}
