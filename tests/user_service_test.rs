//! User service unit tests.

use std::sync::Arc;

use mockall::predicate::eq;

use eav_backend::domain::{EntityFields, Role, Status, TypedValue, User};
use eav_backend::errors::AppError;
use eav_backend::infra::repositories::{MockRoleRepository, MockUserRepository};
use eav_backend::services::{MockEavStore, UserManager, UserService};

fn persisted_user(id: i64, email: &str) -> User {
    User::from_storage(
        id,
        "Test User".to_string(),
        email.to_string(),
        None,
        Status::Active,
        chrono::Utc::now(),
        chrono::Utc::now(),
    )
}

fn persisted_role(id: i64, code: &str) -> Role {
    let mut role = Role::new(code, code, None).unwrap();
    role.id = Some(id);
    role
}

fn manager(
    users: MockUserRepository,
    roles: MockRoleRepository,
    eav: MockEavStore,
) -> UserManager {
    UserManager::new(Arc::new(users), Arc::new(roles), Arc::new(eav))
}

#[tokio::test]
async fn test_get_user_success() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(5i64))
        .returning(|id| Ok(Some(persisted_user(id, "test@example.com"))));

    let service = manager(users, MockRoleRepository::new(), MockEavStore::new());
    let result = service.get_user(5).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().id, Some(5));
}

#[tokio::test]
async fn test_get_user_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let service = manager(users, MockRoleRepository::new(), MockEavStore::new());
    let result = service.get_user(5).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_create_user_rejects_duplicate_email() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .with(eq("dup@example.com"))
        .returning(|email| Ok(Some(persisted_user(1, email))));

    let service = manager(users, MockRoleRepository::new(), MockEavStore::new());
    let user = User::new("Dup", "dup@example.com", None, Status::Pending).unwrap();
    let result = service.create_user(user).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_create_user_flushes_buffered_dynamic_fields() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users
        .expect_create()
        .returning(|user| Ok(persisted_user(5, &user.email)));

    let mut eav = MockEavStore::new();
    eav.expect_set_attribute_value()
        .withf(|entity_type, entity_id, code, value| {
            entity_type == "user"
                && *entity_id == 5
                && code == "blood_type"
                && *value == TypedValue::from("O+")
        })
        .times(1)
        .returning(|_, _, _, _| Ok(()));

    let mut user = User::new("Ada", "ada@example.com", None, Status::Pending).unwrap();
    user.buffer_dynamic("blood_type", TypedValue::from("O+"));

    let service = manager(users, MockRoleRepository::new(), eav);
    let created = service.create_user(user).await.unwrap();

    assert_eq!(created.id, Some(5));
}

#[tokio::test]
async fn test_update_user_rejects_email_taken_by_another_user() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(|email| Ok(Some(persisted_user(2, email))));

    let service = manager(users, MockRoleRepository::new(), MockEavStore::new());
    let mut user = persisted_user(5, "taken@example.com");
    user.set_name("Renamed").unwrap();
    let result = service.update_user(&user).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_delete_user_also_removes_attribute_values() {
    let mut users = MockUserRepository::new();
    users.expect_delete().with(eq(9i64)).returning(|_| Ok(()));

    let mut eav = MockEavStore::new();
    eav.expect_delete_entity_values()
        .with(eq("user"), eq(9i64))
        .times(1)
        .returning(|_, _| Ok(2));

    let service = manager(users, MockRoleRepository::new(), eav);
    let result = service.delete_user(9).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_assign_role_resolves_code_to_id() {
    let mut users = MockUserRepository::new();
    users
        .expect_assign_role()
        .with(eq(3i64), eq(7i64))
        .returning(|_, _| Ok(()));

    let mut roles = MockRoleRepository::new();
    roles
        .expect_find_by_code()
        .with(eq("admin"))
        .returning(|code| Ok(Some(persisted_role(7, code))));

    let service = manager(users, roles, MockEavStore::new());
    let result = service.assign_role(3, "admin").await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_assign_unknown_role_fails() {
    let mut roles = MockRoleRepository::new();
    roles.expect_find_by_code().returning(|_| Ok(None));

    let service = manager(MockUserRepository::new(), roles, MockEavStore::new());
    let result = service.assign_role(3, "ghost").await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_has_role_passes_through() {
    let mut users = MockUserRepository::new();
    users
        .expect_has_role()
        .with(eq(3i64), eq("admin"))
        .returning(|_, _| Ok(true));

    let service = manager(users, MockRoleRepository::new(), MockEavStore::new());
    assert!(service.has_role(3, "admin").await.unwrap());
}
