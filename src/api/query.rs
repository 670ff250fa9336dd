use serde::Serialize;
use serde::ser::Error as _;
use serde_json::Value;

/// Flattens serializable parameters into query pairs.
///
/// Maps and sequences of `[key, value]` pairs are accepted, in their own
/// order. `null` values are skipped. Nested values use bracket notation:
/// scalar arrays repeat `key[]`, objects become `key[field]` and containers
/// inside arrays are indexed as `key[0][field]`.
pub fn to_query_pairs<Q: Serialize + ?Sized>(
    params: &Q,
) -> Result<Vec<(String, String)>, serde_json::Error> {
    let mut pairs = Vec::new();
    match serde_json::to_value(params)? {
        Value::Null => {}
        Value::Object(map) => {
            for (key, value) in map {
                push_pair(&mut pairs, key, value);
            }
        }
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Array(mut pair) if pair.len() == 2 => {
                        let value = pair.pop().unwrap_or(Value::Null);
                        let key = match pair.pop() {
                            Some(Value::String(key)) => key,
                            Some(other) => scalar_text(&other),
                            None => continue,
                        };
                        push_pair(&mut pairs, key, value);
                    }
                    _ => {
                        return Err(serde_json::Error::custom(
                            "query parameter lists must contain [key, value] pairs",
                        ));
                    }
                }
            }
        }
        _ => {
            return Err(serde_json::Error::custom(
                "query parameters must serialize to a map",
            ));
        }
    }
    Ok(pairs)
}

fn push_pair(pairs: &mut Vec<(String, String)>, key: String, value: Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for (index, item) in items.into_iter().enumerate() {
                match item {
                    Value::Null => {}
                    nested @ (Value::Array(_) | Value::Object(_)) => {
                        push_pair(pairs, format!("{}[{}]", key, index), nested)
                    }
                    scalar => pairs.push((format!("{}[]", key), scalar_text(&scalar))),
                }
            }
        }
        Value::Object(map) => {
            for (field, nested) in map {
                push_pair(pairs, format!("{}[{}]", key, field), nested);
            }
        }
        other => pairs.push((key, scalar_text(&other))),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Search<'a> {
        q: &'a str,
        page: u32,
        archived: Option<bool>,
    }

    #[test]
    fn test_struct_params() {
        let pairs = to_query_pairs(&Search {
            q: "red shoes",
            page: 2,
            archived: None,
        })
        .unwrap();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "red shoes".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_arrays_and_nested_objects_use_brackets() {
        let pairs = to_query_pairs(&json!({
            "tag": ["a", null, "b"],
            "filter": {"x": 1, "range": {"from": "2024", "to": null}},
            "sort": [{"by": "name"}],
            "on": true
        }))
        .unwrap();
        assert_eq!(
            pairs,
            vec![
                ("tag[]".to_string(), "a".to_string()),
                ("tag[]".to_string(), "b".to_string()),
                ("filter[x]".to_string(), "1".to_string()),
                ("filter[range][from]".to_string(), "2024".to_string()),
                ("sort[0][by]".to_string(), "name".to_string()),
                ("on".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let pairs = to_query_pairs(&json!({"z": 1, "a": 2, "m": 3})).unwrap();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_pair_list() {
        let pairs = to_query_pairs(&[("page", "1"), ("per_page", "10")]).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "1".to_string()),
                ("per_page".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_pair_list_keeps_repeated_keys() {
        let pairs = to_query_pairs(&[("tag", "a"), ("tag", "b"), ("z", "1"), ("a", "2")]).unwrap();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0], ("tag".to_string(), "a".to_string()));
        assert_eq!(pairs[1], ("tag".to_string(), "b".to_string()));
        assert_eq!(pairs[3], ("a".to_string(), "2".to_string()));
    }

    #[test]
    fn test_unit_is_empty() {
        assert!(to_query_pairs(&()).unwrap().is_empty());
    }

    #[test]
    fn test_scalar_is_rejected() {
        assert!(to_query_pairs(&42).is_err());
        assert!(to_query_pairs(&["loose"]).is_err());
    }
}
