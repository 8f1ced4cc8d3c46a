use serde_json::Value;

/// `created_at` -> `createdAt`; camelCase input is returned unchanged.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.trim().chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Keep only `fields` (and `id`) on each serialized item. Column names are
/// matched against the camelCase output keys.
pub fn sparse(value: Value, fields: Option<&[String]>) -> Value {
    let Some(fields) = fields else {
        return value;
    };
    let keys: Vec<String> = fields.iter().map(|f| camel_case(f)).collect();
    keep(value, &keys)
}

fn keep(value: Value, keys: &[String]) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| keep(item, keys))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| key == "id" || keys.iter().any(|k| k == key))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sparse_keeps_id() {
        let fields = vec!["title".to_string()];
        let value = json!([{ "id": 1, "title": "a", "slug": "b" }]);

        assert_eq!(sparse(value, Some(&fields)), json!([{ "id": 1, "title": "a" }]));
    }

    #[test]
    fn test_column_names_match_camel_case_keys() {
        let fields = vec!["created_at".to_string(), "sortOrder".to_string()];
        let value = json!({ "id": 1, "createdAt": "2024-01-01", "sortOrder": "3", "slug": "b" });

        assert_eq!(
            sparse(value, Some(&fields)),
            json!({ "id": 1, "createdAt": "2024-01-01", "sortOrder": "3" })
        );
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("meta_description"), "metaDescription");
        assert_eq!(camel_case("categoryId"), "categoryId");
        assert_eq!(camel_case("_private"), "private");
    }

    #[test]
    fn test_no_fields_is_identity() {
        let value = json!({ "id": 1, "slug": "b" });
        assert_eq!(sparse(value.clone(), None), value);
    }
}
