use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::io::mirror::MirrorNotice;
use crate::io::state::{self, ViewState};
use crate::io::storage::Storage;
use crate::io::transfer::{self, ImportError, Imported};
use crate::model::snapshot::TrackerData;
use crate::model::user::UserProfile;
use crate::ops::ids;

pub const USERS_KEY: &str = "users";
pub const ACTIVE_USER_KEY: &str = "active-user";

/// Storage key of a user's tracker snapshot
pub fn data_key(user_id: &str) -> String {
    format!("data-{}", user_id)
}

/// A result plus the identity notices the change produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notified<T> {
    pub value: T,
    pub notices: Vec<MirrorNotice>,
}

impl<T> Notified<T> {
    fn quiet(value: T) -> Self {
        Notified {
            value,
            notices: Vec::new(),
        }
    }
}

/// Reads and writes users and snapshots through a `Storage`.
///
/// Storage failures stop here: reads fall back to defaults and writes are
/// logged and dropped, so callers never see a `StorageError`.
pub struct Gateway<S: Storage> {
    storage: S,
}

impl<S: Storage> Gateway<S> {
    pub fn new(storage: S) -> Self {
        Gateway { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    // --- Raw documents ---

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = match self.storage.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "read failed");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "ignoring malformed document");
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> bool {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "could not encode document");
                return false;
            }
        };
        match self.storage.set(key, &text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "write dropped");
                false
            }
        }
    }

    fn remove_key(&mut self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            tracing::warn!(key = %key, error = %e, "remove dropped");
        }
    }

    // --- Users ---

    pub fn list_users(&self) -> Vec<UserProfile> {
        self.read_json(USERS_KEY).unwrap_or_default()
    }

    fn write_users(&mut self, users: &[UserProfile]) -> bool {
        self.write_json(USERS_KEY, users)
    }

    pub fn active_user_id(&self) -> Option<String> {
        self.read_json(ACTIVE_USER_KEY)
    }

    pub fn set_active_user(&mut self, id: &str) -> bool {
        self.write_json(ACTIVE_USER_KEY, id)
    }

    /// The active user, or the first user when the pointer is unset or
    /// names a user that no longer exists
    pub fn active_user(&self) -> Option<UserProfile> {
        let users = self.list_users();
        let active = self.active_user_id();
        active
            .and_then(|id| users.iter().find(|u| u.id == id).cloned())
            .or_else(|| users.into_iter().next())
    }

    /// Create a user with the built-in checklist and make it active
    pub fn create_user(&mut self, name: &str) -> Notified<UserProfile> {
        let mut users = self.list_users();
        let id = ids::user_id(|c| users.iter().any(|u| u.id == c));
        let profile = UserProfile {
            id,
            name: name.trim().to_string(),
            created_at: Utc::now(),
        };
        users.push(profile.clone());
        self.write_users(&users);
        self.set_active_user(&profile.id);
        self.save_snapshot(&profile.id, &TrackerData::default());

        tracing::debug!(user = %profile.id, "created user");
        let notice = MirrorNotice::Upsert {
            id: profile.id.clone(),
            name: profile.name.clone(),
        };
        Notified {
            value: profile,
            notices: vec![notice],
        }
    }

    /// Rename a user. False when the id is unknown or the trimmed name is
    /// empty. An unchanged name is accepted without a write or a notice.
    pub fn rename_user(&mut self, id: &str, name: &str) -> Notified<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Notified::quiet(false);
        }
        let mut users = self.list_users();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Notified::quiet(false);
        };
        if user.name == name {
            return Notified::quiet(true);
        }
        user.name = name.to_string();
        self.write_users(&users);
        Notified {
            value: true,
            notices: vec![MirrorNotice::Upsert {
                id: id.to_string(),
                name: name.to_string(),
            }],
        }
    }

    /// Remove a user and its snapshot. Returns the active user afterwards.
    pub fn delete_user(&mut self, id: &str) -> Notified<Option<UserProfile>> {
        let mut users = self.list_users();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Notified::quiet(self.active_user());
        }

        self.write_users(&users);
        self.remove_key(&data_key(id));

        if self.active_user_id().as_deref() == Some(id) {
            match users.first() {
                Some(next) => {
                    self.set_active_user(&next.id);
                }
                None => self.remove_key(ACTIVE_USER_KEY),
            }
        }

        Notified {
            value: self.active_user(),
            notices: vec![MirrorNotice::Delete { id: id.to_string() }],
        }
    }

    // --- Snapshots ---

    /// The user's snapshot, or the built-in defaults when it is missing,
    /// unreadable or invalid
    pub fn load_snapshot(&self, user_id: &str) -> TrackerData {
        let key = data_key(user_id);
        let text = match self.storage.get(&key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::debug!(user = %user_id, "no snapshot, using defaults");
                return TrackerData::default();
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "read failed, using defaults");
                return TrackerData::default();
            }
        };
        TrackerData::from_json(&text).unwrap_or_else(|| {
            tracing::warn!(key = %key, "rejected invalid snapshot, using defaults");
            TrackerData::default()
        })
    }

    /// Replace the user's stored snapshot. Returns whether it was persisted.
    pub fn save_snapshot(&mut self, user_id: &str, data: &TrackerData) -> bool {
        self.write_json(&data_key(user_id), data)
    }

    pub fn export_snapshot(&self, user_id: &str, user_name: &str) -> serde_json::Result<String> {
        transfer::export_payload(&self.load_snapshot(user_id), user_name, Utc::now())
    }

    /// Validate an export document without applying it
    pub fn import_snapshot(&self, text: &str) -> Result<Imported, ImportError> {
        transfer::parse_import(text)
    }

    // --- View state ---

    pub fn view_state(&self) -> ViewState {
        state::read_view_state(&self.storage)
    }

    pub fn save_view_state(&mut self, view: &ViewState) -> bool {
        match state::write_view_state(&mut self.storage, view) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "view state write dropped");
                false
            }
        }
    }
}
