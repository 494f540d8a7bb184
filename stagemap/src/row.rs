use serde_json::Value;

/// Insert payload: an ordered column-name to value mapping. `serde_json`'s
/// `preserve_order` feature keeps attribute order stable from staging through
/// flush.
pub type Row = serde_json::Map<String, Value>;

/// Merges two rows; on key collision the `precedence` side wins. Used to lay
/// connective collation data under an action's own output.
pub fn merged(base: Row, precedence: Row) -> Row {
    let mut out = base;
    for (key, value) in precedence {
        out.insert(key, value);
    }
    out
}

/// Restricts a row to the given columns, in column order. Keys absent from
/// the row are simply left out; the executor decides what missing columns
/// mean.
pub fn restricted(row: &Row, columns: &[String]) -> Row {
    let mut out = Row::new();
    for column in columns {
        if let Some(value) = row.get(column) {
            out.insert(column.clone(), value.clone());
        }
    }
    out
}

/// Builds a [`Row`] with `json!` object syntax: `row! { "name": "t1" }`.
#[macro_export]
macro_rules! row {
    () => { $crate::row::Row::new() };
    ($($key:tt : $value:expr),+ $(,)?) => {{
        match $crate::serde_json::json!({ $($key: $value),+ }) {
            $crate::serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_prefers_precedence_side() {
        let base = row! { "name": "t1", "state": "ripe" };
        let over = row! { "state": "rotten", "age": 7 };
        let out = merged(base, over);
        assert_eq!(out.get("name").unwrap(), "t1");
        assert_eq!(out.get("state").unwrap(), "rotten");
        assert_eq!(out.get("age").unwrap(), 7);
    }

    #[test]
    fn restricted_follows_column_order_and_drops_extras() {
        let row = row! { "radius": 10, "name": "t1", "color": "red" };
        let columns = vec!["name".to_string(), "color".to_string(), "id".to_string()];
        let out = restricted(&row, &columns);
        let keys: Vec<&str> = out.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["name", "color"]);
        assert!(out.get("radius").is_none());
    }
}
