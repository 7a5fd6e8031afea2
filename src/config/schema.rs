use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "platform": {
                "type": "object",
                "properties": {
                    "base_url": { "type": "string", "format": "uri" },
                    "access_key": { "type": "string" },
                    "secret_key": { "type": "string" }
                }
            },
            "export": {
                "type": "object",
                "properties": {
                    "chunk_size": { "type": "integer", "minimum": 1, "maximum": 10000 },
                    "poll_interval_secs": { "type": "integer", "minimum": 1 },
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "max_retries": { "type": "integer", "minimum": 0 }
                }
            },
            "store": {
                "type": "object",
                "properties": {
                    "path": { "type": "string" }
                }
            }
        }
    })
});
