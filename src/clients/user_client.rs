use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::actor_framework::CollectionClient;
use crate::domain::{NewUser, ObjectId, ProfileUpdate, Role, User};
use crate::security::Authorized;
use crate::user_actor::{UserError, UserPatch};

/// Client for interacting with the users collection.
#[derive(Clone)]
pub struct UserClient {
    inner: CollectionClient<User>,
}

crate::impl_basic_client!(UserClient, User, UserError, user);

impl UserClient {
    /// Registers a user with [`Role::User`].
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: NewUser) -> Result<User, UserError> {
        self.register(input, Role::User).await
    }

    /// Registers a user with an explicit role. Used for bootstrapping the
    /// first admin; not reachable from the HTTP surface.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: NewUser, role: Role) -> Result<User, UserError> {
        if input.email.trim().is_empty() || !input.email.contains('@') {
            return Err(UserError::ValidationError(format!("invalid email {:?}", input.email)));
        }
        let user = User::register(ObjectId::new(), input, role, Utc::now());
        debug!("Sending request");
        self.inner.insert_one(user.clone()).await?;
        info!(user_id = %user.id, %role, "User registered");
        Ok(user)
    }

    /// Sets the target's role to admin.
    #[instrument(skip(self, grant, target), fields(admin = %grant.actor().id, target = %target))]
    pub async fn promote_to_admin(&self, grant: &Authorized, target: ObjectId) -> Result<(), UserError> {
        require_admin(grant)?;
        let patch = UserPatch::Role { role: Role::Admin, at: Utc::now() };
        self.patch(target, patch).await?;
        info!("User promoted to admin");
        Ok(())
    }

    /// Applies the supplied profile fields to the target.
    #[instrument(skip(self, grant, target, update), fields(admin = %grant.actor().id, target = %target))]
    pub async fn update_profile(
        &self,
        grant: &Authorized,
        target: ObjectId,
        update: ProfileUpdate,
    ) -> Result<(), UserError> {
        require_admin(grant)?;
        let patch = UserPatch::Profile { update, at: Utc::now() };
        self.patch(target, patch).await?;
        info!("User profile updated");
        Ok(())
    }

    async fn patch(&self, target: ObjectId, patch: UserPatch) -> Result<(), UserError> {
        debug!("Sending request");
        let outcome = self.inner.update_one(target, None, patch).await?;
        if outcome.matched == 0 {
            return Err(UserError::NotFound(target));
        }
        Ok(())
    }
}

fn require_admin(grant: &Authorized) -> Result<(), UserError> {
    if grant.role() != Role::Admin {
        return Err(UserError::InsufficientGrant { required: Role::Admin, held: grant.role() });
    }
    Ok(())
}
