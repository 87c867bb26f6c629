use surrealdb::sql::Thing;

use crate::middleware::error::{AppError, AppResult};

pub fn get_str_thing(value: &str) -> AppResult<Thing> {
    if value.is_empty() || !value.contains(':') {
        return Err(AppError::Generic {
            description: format!("{value} - can't create record id without table part"),
        });
    }
    Thing::try_from(value).map_err(|_| AppError::Generic {
        description: "error into record id".to_string(),
    })
}

/// Accepts either `table:key` or a bare `key` and checks the table part.
pub fn get_table_thing(table: &str, value: &str) -> AppResult<Thing> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Generic {
            description: "empty record id".to_string(),
        });
    }
    match value.find(':') {
        None => Ok(Thing::from((table, value))),
        Some(_) => {
            let thing = get_str_thing(value)?;
            if thing.tb != table {
                return Err(AppError::Generic {
                    description: format!("{value} is not a {table} record"),
                });
            }
            Ok(thing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_thing_from_bare_key() {
        let thing = get_table_thing("job", "abc123").unwrap();
        assert_eq!(thing.tb, "job");
        assert_eq!(thing.id.to_raw(), "abc123");
    }

    #[test]
    fn table_thing_from_full_id() {
        let thing = get_table_thing("job", "job:abc123").unwrap();
        assert_eq!(thing.to_raw(), "job:abc123");
    }

    #[test]
    fn table_thing_rejects_other_table() {
        assert!(get_table_thing("job", "member:abc123").is_err());
        assert!(get_table_thing("job", "  ").is_err());
    }
}
