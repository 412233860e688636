#[macro_export]
macro_rules! toml {
    // Handle true
    (true) => {
        $crate::Value::Boolean(true)
    };

    // Handle false
    (false) => {
        $crate::Value::Boolean(false)
    };

    // Handle empty array
    ([]) => {
        $crate::Value::Array(vec![])
    };

    // Handle non-empty array
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::toml!($elem)),*])
    };

    // Handle empty table
    ({}) => {
        $crate::Value::Table($crate::TomlMap::new())
    };

    // Handle non-empty table
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut table = $crate::TomlMap::new();
        $(
            table.insert($key.to_string(), $crate::toml!($value));
        )*
        $crate::Value::Table(table)
    }};

    // Fallback for any expression with a From conversion
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{TomlMap, Value};

    #[test]
    fn toml_macro_primitives() {
        assert_eq!(toml!(true), Value::Boolean(true));
        assert_eq!(toml!(false), Value::Boolean(false));
        assert_eq!(toml!(42), Value::Integer(42));
        assert_eq!(toml!(3.5), Value::Float(3.5));
        assert_eq!(toml!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn toml_macro_arrays() {
        assert_eq!(toml!([]), Value::Array(vec![]));

        let arr = toml!([1, 2, 3]);
        match arr {
            Value::Array(vec) => {
                assert_eq!(vec.len(), 3);
                assert_eq!(vec[0], Value::Integer(1));
                assert_eq!(vec[1], Value::Integer(2));
                assert_eq!(vec[2], Value::Integer(3));
            }
            _ => panic!("Expected array"),
        }
    }

    #[test]
    fn toml_macro_tables() {
        assert_eq!(toml!({}), Value::Table(TomlMap::new()));

        let table = toml!({
            "name": "Alice",
            "age": 30
        });

        match table {
            Value::Table(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.get("name"), Some(&Value::String("Alice".to_string())));
                assert_eq!(map.get("age"), Some(&Value::Integer(30)));
            }
            _ => panic!("Expected table"),
        }
    }

    #[test]
    fn toml_macro_nests() {
        let value = toml!({
            "server": {
                "ports": [8001, 8002],
                "active": true
            }
        });

        let table = value.as_table().unwrap();
        let server = table.get("server").and_then(|v| v.as_table()).unwrap();
        let ports = server.get("ports").and_then(|v| v.as_array()).unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(server.get("active").and_then(|v| v.as_bool()), Some(true));
    }
}
