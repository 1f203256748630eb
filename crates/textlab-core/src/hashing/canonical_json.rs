//! JSON canónico mínimo: claves de objeto ordenadas, sin espacios.
//! Dos valores estructuralmente iguales producen exactamente el mismo texto,
//! requisito para que los fingerprints sean reproducibles entre corridas.

use serde_json::Value;

pub fn to_canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(&serde_json::to_string(s).expect("string serializes")),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, k) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(k).expect("string serializes"));
                out.push(':');
                write_canonical(&map[k], out);
            }
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_keys_are_sorted() {
        let a = json!({"b": 1, "a": [true, null]});
        assert_eq!(to_canonical_json(&a), r#"{"a":[true,null],"b":1}"#);
    }

    #[test]
    fn equal_values_produce_identical_text() {
        let a = json!({"x": {"z": 1, "y": 2}});
        let b = json!({"x": {"y": 2, "z": 1}});
        assert_eq!(to_canonical_json(&a), to_canonical_json(&b));
    }
}
