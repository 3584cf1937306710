use audit::AuditAction;
use chrono::Utc;
use common::{Actor, EntityKind, RecordId};

use crate::error::{DomainError, Result};
use crate::locks::LockDomain;
use crate::services::Context;

use super::{NewUser, User, UserChanges, repository};

/// Service for managing system users.
#[derive(Clone)]
pub struct UserService {
    ctx: Context,
}

impl UserService {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Creates an active user. Usernames are unique.
    #[tracing::instrument(skip(self, new, actor), fields(username = %new.username))]
    pub async fn create(&self, new: NewUser, actor: &Actor) -> Result<User> {
        new.validate()?;
        let users = &self.ctx.stores.users;

        let user = {
            let _held = self.ctx.locks.acquire(&[LockDomain::User]).await;
            if repository::exists_by_username(users, &new.username).await {
                return Err(DomainError::Conflict(format!(
                    "Username already exists: {}",
                    new.username
                )));
            }
            users.save(User::from_new(new, Utc::now()), None).await?
        };

        self.ctx.record(
            EntityKind::User,
            user.id,
            AuditAction::Create,
            actor,
            format!("Created user: {}", user.username),
        );
        Ok(user)
    }

    pub async fn get(&self, id: RecordId) -> Result<User> {
        self.ctx
            .stores
            .users
            .find_by_id(id)
            .await
            .ok_or_else(|| DomainError::not_found(EntityKind::User, id))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User> {
        repository::find_by_username(&self.ctx.stores.users, username)
            .await
            .ok_or_else(|| DomainError::not_found(EntityKind::User, username))
    }

    pub async fn list(&self) -> Vec<User> {
        self.ctx.stores.users.find_all().await
    }

    #[tracing::instrument(skip(self, changes, actor))]
    pub async fn update(&self, id: RecordId, changes: UserChanges, actor: &Actor) -> Result<User> {
        let users = &self.ctx.stores.users;

        let user = {
            let _held = self.ctx.locks.acquire(&[LockDomain::User]).await;
            let mut user = users
                .find_by_id(id)
                .await
                .ok_or_else(|| DomainError::not_found(EntityKind::User, id))?;
            user.apply(changes, Utc::now());
            users.update(id, user).await?
        };

        self.ctx.record(
            EntityKind::User,
            id,
            AuditAction::Update,
            actor,
            format!("Updated user: {}", user.username),
        );
        Ok(user)
    }

    #[tracing::instrument(skip(self, actor))]
    pub async fn delete(&self, id: RecordId, actor: &Actor) -> Result<()> {
        let users = &self.ctx.stores.users;

        let user = {
            let _held = self.ctx.locks.acquire(&[LockDomain::User]).await;
            let user = users
                .find_by_id(id)
                .await
                .ok_or_else(|| DomainError::not_found(EntityKind::User, id))?;
            users.delete(id).await;
            user
        };

        self.ctx.record(
            EntityKind::User,
            id,
            AuditAction::Delete,
            actor,
            format!("Deleted user: {}", user.username),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Services;
    use crate::user::Role;

    #[tokio::test]
    async fn create_then_lookup_by_username() {
        let services = Services::in_memory();

        let created = services
            .users
            .create(
                NewUser::new("admin", "admin@police.gov").role(Role::Admin),
                &Actor::system(),
            )
            .await
            .unwrap();
        let found = services.users.get_by_username("admin").await.unwrap();

        assert_eq!(created, found);
        assert_eq!(found.role, Role::Admin);
        assert!(found.active);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let services = Services::in_memory();
        let actor = Actor::system();
        services
            .users
            .create(NewUser::new("officer1", "a@police.gov"), &actor)
            .await
            .unwrap();

        let err = services
            .users
            .create(NewUser::new("officer1", "b@police.gov"), &actor)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(msg) if msg.contains("officer1")));
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let services = Services::in_memory();

        let err = services
            .users
            .delete(RecordId::new(5), &Actor::system())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_deactivates_user() {
        let services = Services::in_memory();
        let actor = Actor::system();
        let user = services
            .users
            .create(NewUser::new("officer1", "o@police.gov"), &actor)
            .await
            .unwrap();

        let mut changes = UserChanges::from(&user);
        changes.active = false;
        let updated = services.users.update(user.id, changes, &actor).await.unwrap();

        assert!(!updated.active);
        assert_eq!(updated.created_at, user.created_at);
    }
}
