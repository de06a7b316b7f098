//! Unified Error Contract Tests
//!
//! Every failure origin (explicit fail, API helper, validation escalation,
//! I/O fault) reaches the caller as the same `{result, error}` shape.

use std::io;
use std::sync::Arc;

use parsley_schema::error::{
    attempt, bad_request, conflict, display_value, fail, fail_with, forbidden, not_found,
    server_error, unauthorized, ErrorClass, ErrorPayload, Outcome, UnifiedError,
};
use parsley_schema::record::Record;
use parsley_schema::schema::{FieldSpec, Format, Schema, SchemaRegistry};
use serde_json::{json, Map, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn signup_schema() -> Arc<Schema> {
    Arc::new(
        Schema::define(
            "Signup",
            vec![
                FieldSpec::string("name").required(),
                FieldSpec::string("email").format(Format::Email).required(),
            ],
        )
        .unwrap(),
    )
}

fn record(schema: &Arc<Schema>, input: Value) -> Record {
    match input {
        Value::Object(map) => schema.record(&map),
        other => panic!("expected object, got {}", other),
    }
}

fn caught<T>(op: impl FnOnce() -> Result<T, UnifiedError>) -> ErrorPayload {
    match attempt(op).unwrap().into_result() {
        Err(payload) => payload,
        Ok(_) => panic!("expected a captured failure"),
    }
}

// =============================================================================
// Explicit Failures
// =============================================================================

#[test]
fn test_structured_fail_reaches_caller_as_payload() {
    let error = caught(|| -> Result<(), UnifiedError> {
        Err(fail_with(json!({"message": "Out of stock", "code": "NO_STOCK", "status": 400})))
    });

    assert_eq!(error.message(), "Out of stock");
    assert_eq!(error.code(), Some("NO_STOCK"));
    assert_eq!(error.status(), Some(400));
}

#[test]
fn test_bare_message_gets_default_code() {
    let error = caught(|| -> Result<(), UnifiedError> { Err(fail("Nope")) });
    assert_eq!(error.message(), "Nope");
    assert_eq!(error.code(), Some("USER-0001"));
    assert_eq!(error.status(), None);
}

#[test]
fn test_extra_keys_pass_through() {
    let err = fail_with(json!({"message": "Limit hit", "retry_after": 30}));
    assert_eq!(err.message(), "Limit hit");
    assert_eq!(err.to_payload().get("retry_after"), Some(&json!(30)));
}

#[test]
fn test_malformed_fail_is_a_type_error_and_propagates() {
    let err = fail_with(json!({"code": "X"}));
    assert_eq!(err.class(), ErrorClass::Type);
    assert_eq!(err.code(), "TYPE-0005");

    let propagated = attempt(|| -> Result<(), UnifiedError> { Err(fail_with(json!(42))) });
    assert!(propagated.is_err());
}

#[test]
fn test_success_has_no_error() {
    let outcome = attempt(|| Ok::<_, UnifiedError>(7)).unwrap();
    assert_eq!(outcome, Outcome::ok(7));
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({"result": 7, "error": null})
    );
}

// =============================================================================
// API Helpers
// =============================================================================

#[test]
fn test_api_helpers_fix_code_and_status() {
    let cases = [
        (not_found("missing"), "HTTP-404", 404),
        (bad_request("bad"), "HTTP-400", 400),
        (forbidden("no"), "HTTP-403", 403),
        (unauthorized("who"), "HTTP-401", 401),
        (conflict("taken"), "HTTP-409", 409),
        (server_error("boom"), "HTTP-500", 500),
    ];

    for (err, code, status) in cases {
        assert_eq!(err.code(), code);
        assert_eq!(err.http_status(), status);
        assert!(err.is_catchable());

        let payload = err.to_payload();
        assert_eq!(payload.message(), err.message());
        assert_eq!(payload.status(), Some(status));
    }
}

#[test]
fn test_http_response_defaults_to_500() {
    let response = fail("Something broke").to_response();
    assert_eq!(response.status, 500);
    assert_eq!(
        response.body,
        json!({"error": {"message": "Something broke", "code": "USER-0001"}})
    );

    let response = not_found("No such order").to_response();
    assert_eq!(response.status, 404);
    assert_eq!(
        response.body,
        json!({"error": {"code": "HTTP-404", "message": "No such order", "status": 404}})
    );
}

#[test]
fn test_http_response_body_is_the_full_payload() {
    let err = fail_with(json!({
        "message": "Out of stock",
        "code": "NO_STOCK",
        "status": 409,
        "sku": "A-1",
    }));

    let response = err.to_response();
    assert_eq!(response.status, 409);
    assert_eq!(response.body["error"], err.to_payload().to_json());
    assert_eq!(response.body["error"]["status"], json!(409));
    assert_eq!(response.body["error"]["sku"], json!("A-1"));
}

#[test]
fn test_validation_response_keeps_fields() {
    let schema = signup_schema();
    let err = record(&schema, json!({"name": "Ann"}))
        .prepare_insert()
        .unwrap_err();

    let response = err.to_response();
    assert_eq!(response.status, 400);
    assert_eq!(response.body["error"]["status"], json!(400));
    assert_eq!(response.body["error"]["code"], json!("VALIDATION"));
    assert_eq!(response.body["error"]["fields"][0]["field"], json!("email"));
}

// =============================================================================
// Validation Escalation
// =============================================================================

#[test]
fn test_fail_if_invalid_payload() {
    let schema = signup_schema();
    let validated = record(&schema, json!({"name": "Ann", "email": "nope"})).validate();

    let err = validated.fail_if_invalid().unwrap_err();
    let payload = err.payload().unwrap().to_json();

    assert_eq!(
        payload,
        json!({
            "status": 400,
            "code": "VALIDATION",
            "message": "Validation failed",
            "fields": [{
                "field": "email",
                "code": "FORMAT",
                "message": validated.error("email").unwrap(),
            }],
        })
    );
    assert_eq!(err.message(), "Validation failed");
    assert_eq!(err.http_status(), 400);
}

#[test]
fn test_fail_if_invalid_passes_unvalidated_and_valid_records() {
    let schema = signup_schema();

    let unvalidated = record(&schema, json!({}));
    assert!(unvalidated.fail_if_invalid().is_ok());

    let valid = record(&schema, json!({"name": "Ann", "email": "ann@example.com"})).validate();
    assert!(valid.fail_if_invalid().is_ok());
}

#[test]
fn test_insert_path_is_catchable() {
    let schema = signup_schema();
    let input = record(&schema, json!({"email": "ann@example.com"}));

    let error = caught(|| input.prepare_insert());
    assert_eq!(error.code(), Some("VALIDATION"));
    assert_eq!(error.fields().map(Vec::len), Some(1));
}

#[test]
fn test_payload_reattaches_to_record_for_rerender() {
    let schema = signup_schema();
    let submitted = record(&schema, json!({"name": "Ann", "email": "nope"}));
    let error = caught(|| submitted.prepare_insert());

    let rerender = submitted.with_error_payload(&error);
    assert_eq!(rerender.error_code("email"), Some("FORMAT"));
    assert_eq!(rerender.get("email"), Some(&json!("nope")));
    assert!(!rerender.is_validated());
}

#[test]
fn test_with_error_on_unknown_field_is_undefined() {
    let schema = signup_schema();
    let err = record(&schema, json!({})).with_error("nickname", "Taken").unwrap_err();
    assert_eq!(err.class(), ErrorClass::Undefined);
    assert!(!err.is_catchable());
}

// =============================================================================
// System Faults and Display
// =============================================================================

#[test]
fn test_io_fault_synthesizes_payload() {
    let error = caught(|| -> Result<(), UnifiedError> {
        Err(io::Error::new(io::ErrorKind::NotFound, "disk gone").into())
    });

    assert_eq!(error.message(), "disk gone");
    assert_eq!(error.code(), Some("IO-0001"));
}

#[test]
fn test_unknown_schema_propagates() {
    let registry = SchemaRegistry::new();
    let result = attempt(|| registry.construct("Ghost", &Map::new()));
    assert_eq!(result.unwrap_err().class(), ErrorClass::Undefined);
}

#[test]
fn test_display_reads_message_for_every_origin() {
    let schema = signup_schema();
    let validation = caught(|| record(&schema, json!({})).prepare_insert());
    let explicit = caught(|| -> Result<(), UnifiedError> { Err(fail("Out of stock")) });

    assert_eq!(
        format!("Error: {}", display_value(&validation.to_json())),
        "Error: Validation failed"
    );
    assert_eq!(
        format!("Error: {}", display_value(&explicit.to_json())),
        "Error: Out of stock"
    );
    assert_eq!(format!("Error: {}", explicit), "Error: Out of stock");
}
