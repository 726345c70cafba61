/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// # Examples
///
/// ```rust
/// use record_codec::{record, Value};
///
/// let value = record!({
///     "name": "Alice",
///     "age": 30,
///     "tags": ["rust", "records"]
/// });
///
/// assert!(value.is_map());
/// ```
#[macro_export]
macro_rules! record {
    // Handle null
    (null) => {
        $crate::Value::Null
    };

    // Handle true
    (true) => {
        $crate::Value::Bool(true)
    };

    // Handle false
    (false) => {
        $crate::Value::Bool(false)
    };

    // Handle empty list
    ([]) => {
        $crate::Value::List(vec![])
    };

    // Handle non-empty list
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::record!($elem)),*])
    };

    // Handle empty map
    ({}) => {
        $crate::Value::Map($crate::RecordMap::new())
    };

    // Handle non-empty map
    ({ $($entries:tt)+ }) => {{
        let mut map = $crate::RecordMap::new();
        $crate::record!(@entries map, $($entries)+);
        $crate::Value::Map(map)
    }};

    // Map entry with a negative number value (`-` and the literal are
    // separate token trees, so they need a dedicated munching arm)
    (@entries $map:ident, $key:literal : - $value:tt $(, $($rest:tt)*)?) => {
        $map.insert($key.to_string(), $crate::record!(- $value));
        $crate::record!(@entries $map $(, $($rest)*)?);
    };

    // Map entry with a single-token-tree value
    (@entries $map:ident, $key:literal : $value:tt $(, $($rest:tt)*)?) => {
        $map.insert($key.to_string(), $crate::record!($value));
        $crate::record!(@entries $map $(, $($rest)*)?);
    };

    // End of map entries (with or without trailing comma)
    (@entries $map:ident $(,)?) => {};

    // Fallback: any expression convertible into a Value
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{RecordMap, Value};

    #[test]
    fn test_record_macro_primitives() {
        assert_eq!(record!(null), Value::Null);
        assert_eq!(record!(true), Value::Bool(true));
        assert_eq!(record!(false), Value::Bool(false));
        assert_eq!(record!(42), Value::Integer(42));
        assert_eq!(record!(3.5), Value::Float(3.5));
        assert_eq!(record!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_record_macro_lists() {
        assert_eq!(record!([]), Value::List(vec![]));

        let list = record!([1, 2, 3]);
        match list {
            Value::List(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[0], Value::Integer(1));
                assert_eq!(items[2], Value::Integer(3));
            }
            _ => panic!("Expected list"),
        }
    }

    #[test]
    fn test_record_macro_maps() {
        assert_eq!(record!({}), Value::Map(RecordMap::new()));

        let value = record!({
            "name": "Alice",
            "nested": { "age": 30 }
        });

        let map = value.as_map().expect("expected map");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("name"), Some(&Value::String("Alice".to_string())));
        let nested = map.get("nested").and_then(Value::as_map).expect("nested");
        assert_eq!(nested.get("age"), Some(&Value::Integer(30)));
    }
}
