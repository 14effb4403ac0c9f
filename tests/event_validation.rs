use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use eventgate_core::config::ValidationConfig;
use eventgate_core::event_type::{Category, EventType};
use eventgate_core::validation::{EventValidation, ValidationError};
use serde_json::{json, Value};

const EVENT_TYPE: &str = "some-event-type";

fn validation() -> EventValidation {
    eventgate_core::init_logger();
    EventValidation::standard(ValidationConfig::default()).unwrap()
}

fn validate(category: Category, schema: Value, event: &Value) -> Option<ValidationError> {
    let et = EventType::new(EVENT_TYPE, category, schema);
    validation().for_type(&et).unwrap().validate(event)
}

fn message(error: Option<ValidationError>) -> String {
    error.expect("expected a validation error").message().to_string()
}

fn basic_schema() -> Value {
    json!({
        "type": "object",
        "required": ["foo"],
        "properties": {"foo": {"type": "string"}}
    })
}

fn pattern_schema() -> Value {
    let pattern = format!("{}{}", "a?".repeat(28), "a".repeat(28));
    json!({
        "type": "object",
        "required": ["foo"],
        "properties": {"foo": {"type": "string", "pattern": pattern}}
    })
}

fn metadata() -> Value {
    json!({
        "eid": "de305d54-75b4-431b-adb2-eb6b9e546014",
        "occurred_at": "1996-12-19T16:39:57-08:00"
    })
}

fn business_event() -> Value {
    json!({"foo": "bar", "metadata": metadata()})
}

fn data_change_event() -> Value {
    json!({
        "data": {"foo": "bar"},
        "data_op": "C",
        "data_type": "event-name",
        "metadata": metadata()
    })
}

fn fixture(name: &str) -> Value {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name]
        .iter()
        .collect();
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn undefined_event_missing_declared_field() {
    let error = validate(Category::Undefined, basic_schema(), &json!({"bar": "baz"}));
    assert!(message(error).contains("foo"));
}

#[test]
fn undefined_event_needs_no_metadata() {
    assert_eq!(
        validate(Category::Undefined, basic_schema(), &json!({"foo": "bar"})),
        None
    );
}

#[test]
fn business_event_requires_metadata() {
    let error = validate(Category::Business, basic_schema(), &json!({"foo": "bar"}));
    assert_eq!(message(error), "#: required key [metadata] not found");
}

#[test]
fn business_event_allows_span_ctx_in_metadata() {
    let event = json!({
        "metadata": {
            "occurred_at": "1992-08-03T10:00:00Z",
            "eid": "329ed3d2-8366-11e8-adc0-fa7ae01bbebc",
            "span_ctx": {
                "ot-tracer-spanid": "b268f901d5f2b865",
                "ot-tracer-traceid": "e9435c17dabe8238",
                "ot-baggage-foo": "bar"
            }
        },
        "foo": "bar"
    });
    assert_eq!(validate(Category::Business, basic_schema(), &event), None);
}

#[test]
fn business_event_accepts_matching_event_type() {
    let mut event = business_event();
    event["metadata"]["event_type"] = json!(EVENT_TYPE);
    assert_eq!(validate(Category::Business, basic_schema(), &event), None);
}

#[test]
fn data_change_event_requires_extra_fields() {
    let error = validate(
        Category::DataChange,
        basic_schema(),
        &json!({"data": {"foo": "bar"}}),
    );
    assert_eq!(
        message(error),
        "#: 3 schema violations found\n#: required key [metadata] not found\n\
         #: required key [data_op] not found\n#: required key [data_type] not found"
    );
}

#[test]
fn data_change_event_is_valid() {
    assert_eq!(
        validate(Category::DataChange, basic_schema(), &data_change_event()),
        None
    );
}

#[test]
fn data_change_event_rejects_additional_root_fields() {
    let mut event = data_change_event();
    event["foo"] = json!("anything");

    let error = validate(Category::DataChange, basic_schema(), &event);
    assert_eq!(message(error), "#: extraneous key [foo] is not permitted");
}

#[test]
fn data_change_event_validates_data_against_user_schema() {
    let mut event = data_change_event();
    event["data"] = json!({"foo": 42});

    let error = validate(Category::DataChange, basic_schema(), &event);
    assert!(message(error).starts_with("#/data/foo: "));
}

#[test]
fn data_change_event_rejects_unknown_data_op() {
    let mut event = data_change_event();
    event["data_op"] = json!("X");

    let error = validate(Category::DataChange, basic_schema(), &event);
    assert_eq!(message(error), "#/data_op: X is not a valid enum value");
}

#[test]
fn metadata_event_type_must_match_event_type_name() {
    let mut event = business_event();
    event["metadata"]["event_type"] = json!("different-from-event-name");

    let error = validate(Category::Business, basic_schema(), &event);
    assert_eq!(
        message(error),
        "#/metadata/event_type: different-from-event-name is not a valid enum value"
    );
}

#[test]
fn metadata_requires_occurred_at() {
    let mut event = business_event();
    event["metadata"]
        .as_object_mut()
        .unwrap()
        .remove("occurred_at");

    let error = validate(Category::Business, basic_schema(), &event);
    assert_eq!(message(error), "#/metadata: required key [occurred_at] not found");
}

#[test]
fn metadata_occurred_at_must_be_a_date_time() {
    let mut event = business_event();
    event["metadata"]["occurred_at"] = json!("last tuesday");

    let error = validate(Category::Business, basic_schema(), &event);
    assert_eq!(
        message(error),
        "#/metadata/occurred_at: [last tuesday] is not a valid date-time"
    );
}

#[test]
fn eid_must_be_formatted_as_uuid() {
    let mut event = business_event();
    event["metadata"]["eid"] = json!("x");

    let error = validate(Category::Business, basic_schema(), &event);
    assert_eq!(
        message(error),
        "#/metadata/eid: string [x] does not match pattern \
         ^[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12}$"
    );
}

#[test]
fn pattern_matching_is_fast() {
    let et = EventType::new(EVENT_TYPE, Category::Undefined, pattern_schema());
    let validator = validation().for_type(&et).unwrap();
    let event = json!({"foo": "a".repeat(28)});

    let started = Instant::now();
    let error = validator.validate(&event);
    let elapsed = started.elapsed();

    assert_eq!(error, None);
    assert!(elapsed < Duration::from_millis(100), "took {:?}", elapsed);
}

#[test]
fn pattern_mismatch_is_fast() {
    let et = EventType::new(EVENT_TYPE, Category::Undefined, pattern_schema());
    let validator = validation().for_type(&et).unwrap();
    let event = json!({"foo": format!("{}b", "a".repeat(27))});

    let started = Instant::now();
    let error = validator.validate(&event);
    let elapsed = started.elapsed();

    assert!(message(error).starts_with("#/foo: string ["));
    assert!(elapsed < Duration::from_millis(100), "took {:?}", elapsed);
}

#[test]
fn backtracking_pattern_is_bounded() {
    // Lookaround keeps this off the linear engine; the nested alternation
    // exhausts the backtrack limit on a near-match.
    let schema = json!({
        "type": "object",
        "properties": {"foo": {"type": "string", "pattern": "^(?=a)(a|a)*$"}}
    });
    let et = EventType::new(EVENT_TYPE, Category::Undefined, schema);
    let validator = validation().for_type(&et).unwrap();
    let event = json!({"foo": format!("{}b", "a".repeat(40))});

    let started = Instant::now();
    let error = validator.validate(&event);
    let elapsed = started.elapsed();

    assert!(message(error).starts_with("#/foo: "));
    assert!(elapsed < Duration::from_secs(2), "took {:?}", elapsed);
}

#[test]
fn data_change_accepts_definitions() {
    let et = EventType::new(
        EVENT_TYPE,
        Category::DataChange,
        fixture("product-json-schema.json"),
    );
    let validator = validation().for_type(&et).unwrap();

    assert_eq!(validator.validate(&fixture("product-event.json")), None);

    let mut event = fixture("product-event.json");
    event["data"]["price"]["currency"] = json!("euro");
    assert_eq!(
        message(validator.validate(&event)),
        "#/data/price/currency: string [euro] does not match pattern ^[A-Z]{3}$"
    );
}

#[test]
fn significant_fields_must_be_declared() {
    let et = EventType::new(EVENT_TYPE, Category::Business, basic_schema())
        .with_significant_fields(["foo", "order_id"]);
    let validator = validation().for_type(&et).unwrap();

    assert_eq!(
        message(validator.validate(&business_event())),
        "#: significant field [order_id] is not declared in the schema"
    );
}

#[test]
fn schema_violation_wins_over_later_strategies() {
    let et = EventType::new(EVENT_TYPE, Category::Business, basic_schema())
        .with_significant_fields(["order_id"]);
    let validator = validation().for_type(&et).unwrap();

    assert_eq!(
        message(validator.validate(&json!({"foo": "bar"}))),
        "#: required key [metadata] not found"
    );
}
