use chrono::{DateTime, Utc};

use crate::actor_framework::Document;
use crate::domain::{ObjectId, ProfileUpdate, Role, User};

#[derive(Debug, Clone)]
pub enum UserPatch {
    Profile {
        update: ProfileUpdate,
        at: DateTime<Utc>,
    },
    Role {
        role: Role,
        at: DateTime<Utc>,
    },
}

impl Document for User {
    type Id = ObjectId;
    type Filter = ();
    type Patch = UserPatch;

    fn id(&self) -> &ObjectId {
        &self.id
    }

    /// One account per email address.
    fn unique_key(&self) -> Option<String> {
        Some(self.email.clone())
    }

    fn matches(&self, _filter: &()) -> bool {
        true
    }

    fn apply(&mut self, patch: UserPatch) {
        match patch {
            UserPatch::Profile { update, at } => self.apply_profile(update, at),
            UserPatch::Role { role, at } => {
                self.role = role;
                self.updated_at = at;
            }
        }
    }
}
