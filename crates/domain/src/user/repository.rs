//! Read-only user queries.

use entity_store::EntityStore;

use super::User;

pub async fn find_by_username(users: &EntityStore<User>, username: &str) -> Option<User> {
    users.find_first(|user| user.username == username).await
}

pub async fn find_by_email(users: &EntityStore<User>, email: &str) -> Option<User> {
    users.find_first(|user| user.email == email).await
}

pub async fn exists_by_username(users: &EntityStore<User>, username: &str) -> bool {
    find_by_username(users, username).await.is_some()
}
