use core::fmt;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use surrealdb::engine::any::Any as SurDb;
use surrealdb::method::Query;
use surrealdb::sql::Thing;

use crate::database::client::Db;
use crate::middleware::error::{AppError, AppResult};

pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordWithId {
    pub id: Thing,
}

impl ViewFieldSelector for RecordWithId {
    fn get_select_query_fields() -> String {
        "id".to_string()
    }
}

#[derive(Debug)]
pub struct QryBindingsVal<T: Serialize + 'static + Clone>(String, HashMap<String, T>);

impl<T: Serialize + 'static + Clone> QryBindingsVal<T> {
    pub fn new(qry: String, bindings: HashMap<String, T>) -> Self {
        QryBindingsVal(qry, bindings)
    }
    pub fn into_query(self, db: &Db) -> Query<SurDb> {
        self.1
            .into_iter()
            .fold(db.query(self.0), |qry, n_val| qry.bind(n_val))
    }
}

/// Page window plus ordering, 1-based `page` as clients send it.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub order_by: String,
    pub order_dir: QryOrder,
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, order_by: String, order_dir: QryOrder) -> AppResult<Self> {
        if page < 1 || limit < 1 {
            return Err(AppError::Validation {
                description: "page and limit must be positive".to_string(),
            });
        }
        let limit = limit.min(MAX_PAGE_LIMIT);
        // the offset of the page must fit the START value
        if (page - 1).checked_mul(limit).is_none() {
            return Err(AppError::Validation {
                description: format!("page {page} is out of range"),
            });
        }
        Ok(Pagination {
            order_by,
            order_dir,
            page,
            limit,
        })
    }

    pub fn start(&self) -> u32 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QryOrder {
    #[default]
    DESC,
    ASC,
}

impl fmt::Display for QryOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QryOrder::DESC => write!(f, "DESC"),
            QryOrder::ASC => write!(f, "ASC"),
        }
    }
}

pub trait ViewFieldSelector {
    // select query fields to fill the View object
    fn get_select_query_fields() -> String;
}

/// AND-joined WHERE conditions with their named bindings.
#[derive(Debug, Default)]
pub struct QryConditions {
    conditions: Vec<String>,
    bindings: HashMap<String, serde_json::Value>,
}

impl QryConditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, condition: impl Into<String>) -> &mut Self {
        self.conditions.push(condition.into());
        self
    }

    pub fn push_bound<V: Serialize>(
        &mut self,
        condition: impl Into<String>,
        name: &str,
        value: V,
    ) -> AppResult<&mut Self> {
        self.bindings
            .insert(name.to_string(), serde_json::to_value(value)?);
        self.conditions.push(condition.into());
        Ok(self)
    }

    pub fn to_where(&self) -> String {
        if self.conditions.is_empty() {
            return String::new();
        }
        format!("WHERE {}", self.conditions.join(" AND "))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TotalCounter {
    pub total: i64,
}

/// Page of results with the total number of matches (empty when nothing matched).
#[derive(Debug, Serialize, Deserialize)]
pub struct Listing<T> {
    pub list: Vec<T>,
    pub meta_counter: Vec<TotalCounter>,
}

/// Runs the page query and the count query over the same conditions.
pub async fn get_listing<T: DeserializeOwned + ViewFieldSelector>(
    db: &Db,
    table_name: &str,
    conditions: QryConditions,
    pagination: &Pagination,
    viewer: Option<Thing>,
) -> AppResult<Listing<T>> {
    let where_q = conditions.to_where();
    let query_string = format!(
        "SELECT {} FROM {table_name} {where_q} ORDER BY {} {} LIMIT $_limit START $_start;
         SELECT count() AS total FROM {table_name} {where_q} GROUP ALL;",
        T::get_select_query_fields(),
        pagination.order_by,
        pagination.order_dir,
    );

    let mut res = QryBindingsVal::new(query_string, conditions.bindings)
        .into_query(db)
        .bind(("_limit", pagination.limit))
        .bind(("_start", pagination.start()))
        .bind(("member", viewer))
        .await?;

    let list = res.take::<Vec<T>>(0)?;
    let total = res.take::<Option<TotalCounter>>(1)?;
    Ok(Listing {
        list,
        meta_counter: total.into_iter().collect(),
    })
}

pub async fn get_entity_view<T: DeserializeOwned + ViewFieldSelector>(
    db: &Db,
    id: &Thing,
    viewer: Option<Thing>,
) -> AppResult<Option<T>> {
    let query_string = format!("SELECT {} FROM $id;", T::get_select_query_fields());
    let mut res = db
        .query(query_string)
        .bind(("id", id.clone()))
        .bind(("member", viewer))
        .await?;
    Ok(res.take::<Option<T>>(0)?)
}

/// Selects the given records keeping the order of `ids`.
pub async fn get_entities_view<T: DeserializeOwned + ViewFieldSelector>(
    db: &Db,
    ids: Vec<Thing>,
    viewer: Option<Thing>,
) -> AppResult<Vec<T>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let query_string = format!("SELECT {} FROM $ids;", T::get_select_query_fields());
    let mut res = db
        .query(query_string)
        .bind(("ids", ids))
        .bind(("member", viewer))
        .await?;
    Ok(res.take::<Vec<T>>(0)?)
}

/// Amount added to a numeric counter field of a record.
#[derive(Debug, Clone)]
pub struct StatisticModifier {
    pub id: Thing,
    pub target_key: &'static str,
    pub modifier: i64,
}

/// Adds `modifier` to `target_key` and returns the record after the update.
pub async fn stats_editor<T: DeserializeOwned>(
    db: &Db,
    input: StatisticModifier,
) -> AppResult<Option<T>> {
    let qry = format!(
        "UPDATE $id SET {} += $modifier RETURN AFTER;",
        input.target_key
    );
    let mut res = db
        .query(qry)
        .bind(("id", input.id))
        .bind(("modifier", input.modifier))
        .await?;
    Ok(res.take::<Option<T>>(0)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_start_offset() {
        let p = Pagination::new(3, 10, "created_at".to_string(), QryOrder::DESC).unwrap();
        assert_eq!(p.start(), 20);
    }

    #[test]
    fn pagination_rejects_page_past_offset_range() {
        let res = Pagination::new(u32::MAX, 100, "created_at".to_string(), QryOrder::DESC);
        assert!(matches!(res, Err(AppError::Validation { .. })));

        let last = u32::MAX / 100 + 1;
        let p = Pagination::new(last, 100, "created_at".to_string(), QryOrder::DESC).unwrap();
        assert_eq!(p.start(), (last - 1) * 100);
    }

    #[test]
    fn pagination_rejects_zero_page() {
        assert!(Pagination::new(0, 10, "created_at".to_string(), QryOrder::DESC).is_err());
        assert!(Pagination::new(1, 0, "created_at".to_string(), QryOrder::DESC).is_err());
    }

    #[test]
    fn pagination_caps_limit() {
        let p = Pagination::new(1, 5000, "created_at".to_string(), QryOrder::ASC).unwrap();
        assert_eq!(p.limit, MAX_PAGE_LIMIT);
    }

    #[test]
    fn conditions_build_where_clause() {
        let mut cond = QryConditions::new();
        assert_eq!(cond.to_where(), "");
        cond.push("job_status = 'ACTIVE'");
        cond.push_bound("job_location IN $locations", "locations", vec!["SEOUL"])
            .unwrap();
        assert_eq!(
            cond.to_where(),
            "WHERE job_status = 'ACTIVE' AND job_location IN $locations"
        );
    }
}
