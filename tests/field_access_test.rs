//! Field access tests: native columns first, dynamic attributes second.

use mockall::predicate::eq;

use eav_backend::domain::{EntityFields, Status, TypedValue, User};
use eav_backend::errors::AppError;
use eav_backend::services::{FieldAccess, MockEavStore};

fn persisted_user(id: i64) -> User {
    User::from_storage(
        id,
        "Ada".to_string(),
        "ada@example.com".to_string(),
        None,
        Status::Active,
        chrono::Utc::now(),
        chrono::Utc::now(),
    )
}

#[tokio::test]
async fn native_field_read_never_consults_the_store() {
    // Any store call would panic: no expectations are set
    let store = MockEavStore::new();
    let user = persisted_user(5);

    let value = user.get_field(&store, "email").await.unwrap();
    assert_eq!(value, Some(TypedValue::from("ada@example.com")));
}

#[tokio::test]
async fn null_native_column_reads_absent_without_consulting_the_store() {
    // A dynamic attribute named like a native column must not shadow
    // it; any store call would panic since no expectations are set
    let store = MockEavStore::new();
    let user = persisted_user(5);
    assert_eq!(user.phone, None);

    let value = user.get_field(&store, "phone").await.unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn dynamic_field_read_delegates_to_the_store() {
    let mut store = MockEavStore::new();
    store
        .expect_get_attribute_value()
        .with(eq("user"), eq(5i64), eq("blood_type"))
        .returning(|_, _, _| Ok(Some(TypedValue::from("O+"))));

    let user = persisted_user(5);
    let value = user.get_field(&store, "blood_type").await.unwrap();
    assert_eq!(value, Some(TypedValue::from("O+")));
}

#[tokio::test]
async fn dynamic_field_read_is_absent_when_store_fails() {
    let mut store = MockEavStore::new();
    store
        .expect_get_attribute_value()
        .returning(|_, _, _| Err(AppError::internal("store unavailable")));

    let user = persisted_user(5);
    let value = user.get_field(&store, "blood_type").await.unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn native_field_write_never_consults_the_store() {
    let store = MockEavStore::new();
    let mut user = persisted_user(5);

    user.set_field(&store, "name", TypedValue::from("Grace"))
        .await
        .unwrap();
    assert_eq!(user.name, "Grace");
}

#[tokio::test]
async fn native_field_write_surfaces_validation_errors() {
    let store = MockEavStore::new();
    let mut user = persisted_user(5);

    let result = user
        .set_field(&store, "email", TypedValue::from("not-an-email"))
        .await;
    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn dynamic_field_write_delegates_and_propagates_errors() {
    let mut store = MockEavStore::new();
    store
        .expect_set_attribute_value()
        .with(
            eq("user"),
            eq(5i64),
            eq("blood_type"),
            eq(TypedValue::from("O+")),
        )
        .returning(|_, _, _, _| {
            Err(AppError::AttributeNotFound("blood_type".to_string()))
        });

    let mut user = persisted_user(5);
    let result = user
        .set_field(&store, "blood_type", TypedValue::from("O+"))
        .await;
    assert!(matches!(
        result.unwrap_err(),
        AppError::AttributeNotFound(_)
    ));
}

#[tokio::test]
async fn unsaved_entity_buffers_dynamic_writes_and_reads_absent() {
    // The store must stay untouched while the entity has no identity
    let store = MockEavStore::new();
    let mut user = User::new("Ada", "ada@example.com", None, Status::Pending).unwrap();

    user.set_field(&store, "blood_type", TypedValue::from("O+"))
        .await
        .unwrap();
    let value = user.get_field(&store, "blood_type").await.unwrap();
    assert_eq!(value, None);

    let buffered = user.take_buffered();
    assert_eq!(
        buffered,
        vec![("blood_type".to_string(), TypedValue::from("O+"))]
    );
}

#[tokio::test]
async fn identity_fields_are_not_assignable_by_name() {
    let store = MockEavStore::new();
    let mut user = persisted_user(5);

    let result = user.set_field(&store, "id", TypedValue::Integer(99)).await;
    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}
