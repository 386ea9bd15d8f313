use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::clients::UserClient;
use crate::domain::{ObjectId, Role, User};
use crate::user_actor::UserError;
use super::token::Principal;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GuardError {
    #[error("Principal {0} is not a known user")]
    PrincipalUnknown(ObjectId),
    #[error("Principal {principal} has role {actual}, {required} required")]
    MissingRole {
        principal: ObjectId,
        required: Role,
        actual: Role,
    },
    #[error("Principal lookup failed: {0}")]
    Lookup(UserError),
}

/// Proof that a principal passed a role check. Only [`RoleGuard`] creates one,
/// and privileged user mutations require it.
#[derive(Debug, Clone)]
pub struct Authorized {
    actor: User,
    role: Role,
}

impl Authorized {
    pub fn actor(&self) -> &User {
        &self.actor
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Gate for role-restricted mutations. The stored role of the acting user is
/// the only authorization signal.
#[derive(Clone)]
pub struct RoleGuard {
    users: UserClient,
}

impl RoleGuard {
    pub fn new(users: UserClient) -> Self {
        Self { users }
    }

    #[instrument(skip(self), fields(principal = %principal.user_id))]
    pub async fn authorize(&self, principal: &Principal, required: Role) -> Result<Authorized, GuardError> {
        let actor = match self.users.get_user(principal.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Principal not found");
                return Err(GuardError::PrincipalUnknown(principal.user_id));
            }
            Err(e) => return Err(GuardError::Lookup(e)),
        };

        if actor.role != required {
            warn!(actual = %actor.role, %required, "Role check failed");
            return Err(GuardError::MissingRole {
                principal: principal.user_id,
                required,
                actual: actor.role,
            });
        }

        info!(%required, "Role check passed");
        Ok(Authorized { actor, role: required })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::{CollectionActor, StoreError};
    use crate::mock_framework::{create_mock_client, expect_find_one};
    use crate::domain::NewUser;
    use chrono::Utc;
    use std::time::Duration;

    fn person(email: &str, role: Role) -> User {
        let input = NewUser {
            first_name: "Dewi".into(),
            last_name: "Lestari".into(),
            email: email.into(),
            phone: String::new(),
            address: String::new(),
            image: None,
        };
        User::register(ObjectId::new(), input, role, Utc::now())
    }

    async fn guard_with(users: Vec<User>) -> RoleGuard {
        let (actor, client) = CollectionActor::<User>::new("users", 8, Duration::from_secs(1));
        tokio::spawn(actor.run());
        for user in users {
            client.insert_one(user).await.unwrap();
        }
        RoleGuard::new(UserClient::new(client))
    }

    #[tokio::test]
    async fn test_admin_is_allowed() {
        let admin = person("admin@example.com", Role::Admin);
        let guard = guard_with(vec![admin.clone()]).await;

        let grant = guard.authorize(&Principal { user_id: admin.id }, Role::Admin).await.unwrap();
        assert_eq!(grant.actor().id, admin.id);
        assert_eq!(grant.role(), Role::Admin);
    }

    #[tokio::test]
    async fn test_plain_user_is_denied() {
        let user = person("user@example.com", Role::User);
        let guard = guard_with(vec![user.clone()]).await;

        let err = guard.authorize(&Principal { user_id: user.id }, Role::Admin).await.unwrap_err();
        assert_eq!(
            err,
            GuardError::MissingRole { principal: user.id, required: Role::Admin, actual: Role::User }
        );
    }

    #[tokio::test]
    async fn test_unknown_principal_is_denied_distinctly() {
        let guard = guard_with(vec![]).await;
        let ghost = ObjectId::new();

        let err = guard.authorize(&Principal { user_id: ghost }, Role::Admin).await.unwrap_err();
        assert_eq!(err, GuardError::PrincipalUnknown(ghost));
    }

    #[tokio::test]
    async fn test_lookup_fault_is_not_reported_as_denial() {
        let (client, mut receiver) = create_mock_client::<User>(8, Duration::from_secs(1));
        let guard = RoleGuard::new(UserClient::new(client));
        let principal = Principal { user_id: ObjectId::new() };

        let task = tokio::spawn(async move { guard.authorize(&principal, Role::Admin).await });
        let (_, responder) = expect_find_one(&mut receiver).await.expect("Expected user lookup");
        responder.send(Err(StoreError::Unavailable("users collection closed".into()))).unwrap();

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, GuardError::Lookup(UserError::DatabaseError(_))));
    }
}
