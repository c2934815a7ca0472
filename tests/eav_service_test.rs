//! EAV service unit tests.

use std::sync::Arc;

use chrono::NaiveDate;
use mockall::predicate::eq;

use eav_backend::domain::{Attribute, AttributeType, AttributeValue, EntityType, TypedValue};
use eav_backend::errors::AppError;
use eav_backend::infra::repositories::{MockAttributeRepository, MockAttributeValueRepository};
use eav_backend::services::{EavService, EavStore};

fn attribute(id: i64, code: &str, value_type: AttributeType, scope: Option<&str>) -> Attribute {
    let entity_type = scope.map(|code| {
        let mut et = EntityType::new(code, code, None).unwrap();
        et.id = Some(100);
        et
    });
    let mut attr = Attribute::new(code, code, value_type, entity_type, false, None).unwrap();
    attr.id = Some(id);
    attr
}

fn value_row(attr: Attribute, entity_type: &str, entity_id: i64, raw: &str) -> AttributeValue {
    let mut row = AttributeValue::new(attr, entity_type, entity_id, raw.to_string());
    row.id = Some(1);
    row
}

fn service(
    attributes: MockAttributeRepository,
    values: MockAttributeValueRepository,
) -> EavService {
    EavService::new(Arc::new(attributes), Arc::new(values))
}

#[tokio::test]
async fn set_fails_with_attribute_not_found_and_persists_nothing() {
    let mut attributes = MockAttributeRepository::new();
    attributes
        .expect_find_by_code()
        .with(eq("nonexistent"))
        .returning(|_| Ok(None));

    // No upsert expectation: any write would panic the mock
    let values = MockAttributeValueRepository::new();

    let result = service(attributes, values)
        .set_attribute_value("user", 1, "nonexistent", TypedValue::from("x"))
        .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError::AttributeNotFound(code) if code == "nonexistent"
    ));
}

#[tokio::test]
async fn set_fails_when_attribute_scoped_to_other_entity_type() {
    let mut attributes = MockAttributeRepository::new();
    attributes
        .expect_find_by_code()
        .returning(|_| Ok(Some(attribute(7, "specialty", AttributeType::String, Some("doctor")))));

    let values = MockAttributeValueRepository::new();

    let result = service(attributes, values)
        .set_attribute_value("patient", 3, "specialty", TypedValue::from("cardiology"))
        .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError::AttributeNotApplicable { attribute, entity_type }
            if attribute == "specialty" && entity_type == "patient"
    ));
}

#[tokio::test]
async fn set_coerces_date_to_storage_format_before_upsert() {
    let mut attributes = MockAttributeRepository::new();
    attributes
        .expect_find_by_code()
        .returning(|_| Ok(Some(attribute(9, "date_of_birth", AttributeType::Date, Some("patient")))));

    let mut values = MockAttributeValueRepository::new();
    values
        .expect_upsert()
        .withf(|attribute_id, entity_type, entity_id, value| {
            *attribute_id == 9
                && entity_type == "patient"
                && *entity_id == 3
                && value == "1990-05-01 00:00:00"
        })
        .returning(|_, _, _, _| Ok(()));

    let date = NaiveDate::from_ymd_opt(1990, 5, 1).unwrap();
    let result = service(attributes, values)
        .set_attribute_value("patient", 3, "date_of_birth", TypedValue::from(date))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn set_coerces_truthiness_into_boolean_attribute() {
    let mut attributes = MockAttributeRepository::new();
    attributes
        .expect_find_by_code()
        .returning(|_| Ok(Some(attribute(4, "is_on_call", AttributeType::Boolean, None))));

    let mut values = MockAttributeValueRepository::new();
    values
        .expect_upsert()
        .withf(|_, _, _, value| value == "1")
        .returning(|_, _, _, _| Ok(()));

    let result = service(attributes, values)
        .set_attribute_value("doctor", 5, "is_on_call", TypedValue::from(3i64))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn get_returns_absent_for_unknown_attribute() {
    let mut attributes = MockAttributeRepository::new();
    attributes.expect_find_by_code().returning(|_| Ok(None));

    let values = MockAttributeValueRepository::new();

    let result = service(attributes, values)
        .get_attribute_value("user", 1, "nonexistent")
        .await;

    assert_eq!(result.unwrap(), None);
}

#[tokio::test]
async fn get_returns_absent_when_no_value_row_exists() {
    let mut attributes = MockAttributeRepository::new();
    attributes
        .expect_find_by_code()
        .returning(|_| Ok(Some(attribute(7, "specialty", AttributeType::String, None))));

    let mut values = MockAttributeValueRepository::new();
    values
        .expect_find_by_entity_and_attribute()
        .returning(|_, _, _| Ok(None));

    let result = service(attributes, values)
        .get_attribute_value("doctor", 5, "specialty")
        .await;

    assert_eq!(result.unwrap(), None);
}

#[tokio::test]
async fn get_coerces_stored_text_to_declared_type() {
    let mut attributes = MockAttributeRepository::new();
    attributes
        .expect_find_by_code()
        .returning(|_| Ok(Some(attribute(8, "visit_count", AttributeType::Integer, None))));

    let mut values = MockAttributeValueRepository::new();
    values
        .expect_find_by_entity_and_attribute()
        .with(eq("patient"), eq(3i64), eq(8i64))
        .returning(|entity_type, entity_id, _| {
            let attr = attribute(8, "visit_count", AttributeType::Integer, None);
            Ok(Some(value_row(attr, entity_type, entity_id, "12")))
        });

    let result = service(attributes, values)
        .get_attribute_value("patient", 3, "visit_count")
        .await;

    assert_eq!(result.unwrap(), Some(TypedValue::Integer(12)));
}

#[tokio::test]
async fn get_propagates_coercion_failure() {
    let mut attributes = MockAttributeRepository::new();
    attributes
        .expect_find_by_code()
        .returning(|_| Ok(Some(attribute(8, "visit_count", AttributeType::Integer, None))));

    let mut values = MockAttributeValueRepository::new();
    values
        .expect_find_by_entity_and_attribute()
        .returning(|entity_type, entity_id, _| {
            let attr = attribute(8, "visit_count", AttributeType::Integer, None);
            Ok(Some(value_row(attr, entity_type, entity_id, "garbage")))
        });

    let result = service(attributes, values)
        .get_attribute_value("patient", 3, "visit_count")
        .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError::TypeCoercion { .. }
    ));
}

#[tokio::test]
async fn get_all_groups_values_by_attribute_code() {
    let attributes = MockAttributeRepository::new();

    let mut values = MockAttributeValueRepository::new();
    values.expect_find_by_entity().returning(|entity_type, entity_id| {
        Ok(vec![
            value_row(
                attribute(1, "blood_type", AttributeType::String, None),
                entity_type,
                entity_id,
                "O+",
            ),
            value_row(
                attribute(2, "visit_count", AttributeType::Integer, None),
                entity_type,
                entity_id,
                "12",
            ),
        ])
    });

    let result = service(attributes, values)
        .get_attribute_values("patient", 3)
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.get("blood_type"), Some(&TypedValue::from("O+")));
    assert_eq!(result.get("visit_count"), Some(&TypedValue::Integer(12)));
}

#[tokio::test]
async fn delete_entity_values_reports_removed_row_count() {
    let attributes = MockAttributeRepository::new();

    let mut values = MockAttributeValueRepository::new();
    values
        .expect_delete_by_entity()
        .with(eq("user"), eq(9i64))
        .returning(|_, _| Ok(3));

    let removed = service(attributes, values)
        .delete_entity_values("user", 9)
        .await
        .unwrap();

    assert_eq!(removed, 3);
}
