#![cfg(feature = "serde")]

use drizzle_debug::{Dialect, Field, IsolationLevel, TxOptions, Value};

#[test]
fn test_field_serializes_to_sink_friendly_json() {
    let query = Field::string("query", "SELECT * FROM users WHERE id = ?");
    let args = Field::args("args", &[Value::Integer(1), Value::Null]);

    assert_eq!(
        serde_json::to_value(&query).unwrap(),
        serde_json::json!({ "key": "query", "value": "SELECT * FROM users WHERE id = ?" })
    );
    assert_eq!(
        serde_json::to_value(&args).unwrap(),
        serde_json::json!({ "key": "args", "value": [{ "Integer": 1 }, "Null"] })
    );
}

#[test]
fn test_options_and_dialect() {
    let opts = TxOptions {
        isolation: IsolationLevel::Serializable,
        read_only: true,
    };
    let json = serde_json::to_string(&opts).unwrap();
    assert_eq!(json, r#"{"isolation":"Serializable","read_only":true}"#);
    assert_eq!(serde_json::from_str::<TxOptions>(&json).unwrap(), opts);

    assert_eq!(
        serde_json::to_string(&Dialect::PostgreSQL).unwrap(),
        r#""postgresql""#
    );
}
