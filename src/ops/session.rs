//! The explicit application context: one gateway plus the active user's
//! hydrated snapshot.

use crate::io::gateway::Gateway;
use crate::io::mirror::MirrorNotice;
use crate::io::storage::Storage;
use crate::io::transfer::{ImportError, Imported};
use crate::model::snapshot::TrackerData;
use crate::model::user::UserProfile;
use crate::ops::editor::{EditError, EditSession};
use crate::ops::entry_ops;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveUser {
    None,
    Selected {
        profile: UserProfile,
        data: TrackerData,
    },
}

pub struct Session<S: Storage> {
    gateway: Gateway<S>,
    active: ActiveUser,
}

impl<S: Storage> Session<S> {
    /// Hydrate the active user's snapshot from storage
    pub fn open(gateway: Gateway<S>) -> Self {
        let mut session = Session {
            gateway,
            active: ActiveUser::None,
        };
        session.reload();
        session
    }

    fn reload(&mut self) {
        self.active = match self.gateway.active_user() {
            Some(profile) => {
                let data = self.gateway.load_snapshot(&profile.id);
                ActiveUser::Selected { profile, data }
            }
            None => ActiveUser::None,
        };
    }

    pub fn gateway(&self) -> &Gateway<S> {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut Gateway<S> {
        &mut self.gateway
    }

    pub fn active(&self) -> &ActiveUser {
        &self.active
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match &self.active {
            ActiveUser::Selected { profile, .. } => Some(profile),
            ActiveUser::None => None,
        }
    }

    pub fn data(&self) -> Option<&TrackerData> {
        match &self.active {
            ActiveUser::Selected { data, .. } => Some(data),
            ActiveUser::None => None,
        }
    }

    /// Flip a completion flag and persist. None when no user is active.
    pub fn toggle(&mut self, day: u32, item_id: &str) -> Option<bool> {
        let ActiveUser::Selected { profile, data } = &mut self.active else {
            return None;
        };
        let checked = entry_ops::toggle(&mut data.entries, day, item_id);
        self.gateway.save_snapshot(&profile.id, data);
        Some(checked)
    }

    // --- Users ---

    /// Make `id` the active user. False when no such user exists.
    pub fn switch_user(&mut self, id: &str) -> bool {
        if !self.gateway.list_users().iter().any(|u| u.id == id) {
            return false;
        }
        self.gateway.set_active_user(id);
        self.reload();
        true
    }

    pub fn create_user(&mut self, name: &str) -> (UserProfile, Vec<MirrorNotice>) {
        let created = self.gateway.create_user(name);
        self.reload();
        (created.value, created.notices)
    }

    pub fn rename_user(&mut self, id: &str, name: &str) -> (bool, Vec<MirrorNotice>) {
        let renamed = self.gateway.rename_user(id, name);
        if renamed.value {
            self.reload();
        }
        (renamed.value, renamed.notices)
    }

    pub fn rename_active_user(&mut self, name: &str) -> (bool, Vec<MirrorNotice>) {
        match self.profile().map(|p| p.id.clone()) {
            Some(id) => self.rename_user(&id, name),
            None => (false, Vec::new()),
        }
    }

    /// Delete a user; the session follows the gateway's choice of the next
    /// active user
    pub fn delete_user(&mut self, id: &str) -> Vec<MirrorNotice> {
        let deleted = self.gateway.delete_user(id);
        self.reload();
        deleted.notices
    }

    // --- Editing ---

    pub fn begin_edit(&self) -> Option<EditSession> {
        self.data().map(EditSession::new)
    }

    /// Save an edit session over the active snapshot and persist it.
    /// Returns false when no user is active.
    pub fn commit_edit(&mut self, edit: &EditSession) -> Result<bool, EditError> {
        let ActiveUser::Selected { profile, data } = &mut self.active else {
            return Ok(false);
        };
        *data = edit.save(data)?;
        self.gateway.save_snapshot(&profile.id, data);
        Ok(true)
    }

    // --- Transfer ---

    /// Validate an export document and make it the active user's snapshot.
    /// A rejected document changes nothing.
    pub fn import(&mut self, text: &str) -> Result<Option<Imported>, ImportError> {
        let imported = self.gateway.import_snapshot(text)?;
        let ActiveUser::Selected { profile, data } = &mut self.active else {
            return Ok(None);
        };
        *data = imported.data.clone();
        self.gateway.save_snapshot(&profile.id, data);
        Ok(Some(imported))
    }

    pub fn export(&self) -> Option<serde_json::Result<String>> {
        let profile = self.profile()?;
        Some(self.gateway.export_snapshot(&profile.id, &profile.name))
    }
}
