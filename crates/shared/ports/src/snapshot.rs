use serde_json::Value;
use std::cmp::Ordering;

/// Immutable view of the value stored at one path
#[derive(Debug, Clone, PartialEq)]
pub struct DataSnapshot {
    key: Option<String>,
    value: Value,
}

impl DataSnapshot {
    pub fn new(key: Option<String>, value: Value) -> Self {
        Self { key, value }
    }

    /// Snapshot for `path`, keyed by its last segment
    pub fn at(path: &str, value: Value) -> Self {
        let key = path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .map(str::to_string);
        Self { key, value }
    }

    /// Last path segment, `None` at the root
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// False when nothing is stored at this path
    pub fn exists(&self) -> bool {
        !self.value.is_null()
    }

    /// Direct children in the store's key order
    ///
    /// Canonical decimal keys in the 32-bit range sort first, numerically;
    /// the rest follow lexicographically. Arrays keep index order and skip
    /// `null` slots. Scalars have no children.
    pub fn children(&self) -> Vec<DataSnapshot> {
        match &self.value {
            Value::Object(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
                entries
                    .into_iter()
                    .filter(|(_, value)| !value.is_null())
                    .map(|(key, value)| DataSnapshot::new(Some(key.clone()), value.clone()))
                    .collect()
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .filter(|(_, value)| !value.is_null())
                .map(|(index, value)| DataSnapshot::new(Some(index.to_string()), value.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn children_count(&self) -> usize {
        self.children().len()
    }

    /// Resolve a `/`-separated relative path below this snapshot
    pub fn child(&self, path: &str) -> DataSnapshot {
        let mut current = &self.value;
        let mut key = self.key.clone();

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            key = Some(segment.to_string());
            current = match current {
                Value::Object(map) => map.get(segment).unwrap_or(&Value::Null),
                Value::Array(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index))
                    .unwrap_or(&Value::Null),
                _ => &Value::Null,
            };
        }

        DataSnapshot::new(key, current.clone())
    }
}

/// Store key ordering: integer keys first (numerically), then strings
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (integer_key(a), integer_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// `0` or `-?[1-9][0-9]*` that fits in an `i32`
fn integer_key(key: &str) -> Option<i32> {
    let digits = key.strip_prefix('-').unwrap_or(key);
    let canonical = match digits.as_bytes() {
        [b'0'] => !key.starts_with('-'),
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
        [] => false,
    };
    if canonical { key.parse().ok() } else { None }
}
