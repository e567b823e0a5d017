//! Path operations on a JSON tree
//!
//! Writing `null` deletes a node and prunes emptied parents, so an empty
//! tree reads back as `null` the same way the hosted store does.

use serde_json::{Map, Value};

pub(crate) fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Value at `path`, `Null` when absent
pub(crate) fn get(root: &Value, path: &str) -> Value {
    let mut current = root;
    for segment in segments(path) {
        current = match current {
            Value::Object(map) => match map.get(segment) {
                Some(next) => next,
                None => return Value::Null,
            },
            Value::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get(i)) {
                Some(next) => next,
                None => return Value::Null,
            },
            _ => return Value::Null,
        };
    }
    current.clone()
}

/// Replace the value at `path`
pub(crate) fn set(root: &mut Value, path: &str, value: Value) {
    set_in(root, &segments(path), value);
    if is_empty(root) {
        *root = Value::Null;
    }
}

/// Write each child of `updates` below `path`, leaving siblings alone
pub(crate) fn merge(root: &mut Value, path: &str, updates: &Map<String, Value>) {
    for (key, value) in updates {
        let target = if path.trim_matches('/').is_empty() {
            key.clone()
        } else {
            format!("{}/{}", path.trim_matches('/'), key)
        };
        set(root, &target, value.clone());
    }
}

/// True when one path is an ancestor of, or equal to, the other
pub(crate) fn related(a: &str, b: &str) -> bool {
    let a = segments(a);
    let b = segments(b);
    a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

fn set_in(node: &mut Value, path: &[&str], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        *node = value;
        return;
    };

    if !node.is_object() {
        if value.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }

    if let Value::Object(map) = node {
        if rest.is_empty() {
            if value.is_null() {
                map.remove(*first);
            } else {
                map.insert(first.to_string(), value);
            }
            return;
        }

        let child = map.entry(first.to_string()).or_insert(Value::Null);
        set_in(child, rest, value);
        let emptied = is_empty(child);
        if emptied {
            map.remove(*first);
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let mut root = Value::Null;
        set(&mut root, "aktuator/led", json!(true));
        set(&mut root, "current_data/temperature", json!(21.5));

        assert_eq!(get(&root, "aktuator/led"), json!(true));
        assert_eq!(get(&root, "aktuator"), json!({"led": true}));
        assert_eq!(get(&root, "aktuator/motor"), Value::Null);
        assert_eq!(get(&root, "current_data/temperature/x"), Value::Null);
    }

    #[test]
    fn test_null_deletes_and_prunes() {
        let mut root = json!({"aktuator": {"led": true}, "weather_data": {"-N1": {"humidity": 1}}});
        set(&mut root, "aktuator/led", Value::Null);
        assert_eq!(root, json!({"weather_data": {"-N1": {"humidity": 1}}}));

        set(&mut root, "weather_data/-N1", Value::Null);
        assert_eq!(root, Value::Null);
    }

    #[test]
    fn test_merge_keeps_siblings() {
        let mut root = json!({"aktuator": {"led": false, "motor": false, "fan": true}});
        let updates = json!({"led": true, "motor": true});
        merge(&mut root, "aktuator", updates.as_object().unwrap());
        assert_eq!(
            root,
            json!({"aktuator": {"led": true, "motor": true, "fan": true}})
        );
    }

    #[test]
    fn test_set_through_scalar_replaces_it() {
        let mut root = json!({"current_data": 5});
        set(&mut root, "current_data/humidity", json!(40));
        assert_eq!(root, json!({"current_data": {"humidity": 40}}));
    }

    #[test]
    fn test_related() {
        assert!(related("aktuator", "aktuator/led"));
        assert!(related("aktuator/led", "aktuator"));
        assert!(related("/aktuator/", "aktuator"));
        assert!(related("", "weather_data"));
        assert!(!related("aktuator/led", "aktuator/motor"));
        assert!(!related("weather_data", "current_data"));
    }
}
