//! Entity repositories: query templates around compiled filters

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::filter::{compile, FilterExpr};
use crate::domain::pagination::{info_of, ItemsPage, Page};
use crate::error::{DataAccessError, QueryError, ValidationError};
use crate::infrastructure::archive::executor::QueryExecutor;
use crate::infrastructure::archive::types::{ArchiveEntity, Block, Call, Event, Extrinsic};

/// All repositories of one network archive
#[derive(Clone)]
pub struct Archive {
    executor: Arc<dyn QueryExecutor>,
}

impl Archive {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    pub fn extrinsics(&self) -> Repository<Extrinsic> {
        Repository::new(self.executor.clone())
    }

    pub fn blocks(&self) -> Repository<Block> {
        Repository::new(self.executor.clone())
    }

    pub fn events(&self) -> Repository<Event> {
        Repository::new(self.executor.clone())
    }

    pub fn calls(&self) -> Repository<Call> {
        Repository::new(self.executor.clone())
    }
}

pub struct Repository<T> {
    executor: Arc<dyn QueryExecutor>,
    _row: PhantomData<fn() -> T>,
}

impl<T: ArchiveEntity> Repository<T> {
    fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            _row: PhantomData,
        }
    }

    pub async fn list(
        &self,
        limit: usize,
        offset: usize,
        filter: Option<&FilterExpr>,
        order: Option<&str>,
    ) -> Result<Vec<T>, QueryError> {
        let query = list_query::<T>(limit, offset, filter, order)?;
        let mut data = self.executor.execute_query(&query).await?;
        let rows = data
            .get_mut(T::LIST_ROOT)
            .map(Value::take)
            .ok_or_else(|| missing_root(T::LIST_ROOT))?;
        serde_json::from_value(rows)
            .map_err(|err| DataAccessError::MalformedResponse(err.to_string()).into())
    }

    /// First matching row
    pub async fn first(&self, filter: &FilterExpr) -> Result<Option<T>, QueryError> {
        let mut rows = self.list(1, 0, Some(filter), None).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    pub async fn count(&self, filter: Option<&FilterExpr>) -> Result<usize, QueryError> {
        let query = count_query::<T>(filter)?;
        let data = self.executor.execute_query(&query).await?;
        data.get(T::CONNECTION_ROOT)
            .and_then(|connection| connection.get("totalCount"))
            .and_then(Value::as_u64)
            .map(|count| count as usize)
            .ok_or_else(|| missing_root(T::CONNECTION_ROOT).into())
    }

    /// One page of rows plus page metadata, list and count fetched concurrently
    pub async fn fetch_page(
        &self,
        filter: Option<&FilterExpr>,
        page: Page,
        order: Option<&str>,
    ) -> Result<ItemsPage<T>, QueryError> {
        let (items, total) = futures::try_join!(
            self.list(page.page_size(), page.offset(), filter, order),
            self.count(filter)
        )?;
        Ok(ItemsPage {
            items,
            page_info: info_of(total, page),
        })
    }
}

fn missing_root(root: &str) -> DataAccessError {
    DataAccessError::MalformedResponse(format!("response has no `{root}` field"))
}

fn checked_order<T: ArchiveEntity>(order: Option<&str>) -> Result<&'static str, ValidationError> {
    match order {
        None => Ok(T::ORDERS[0]),
        Some(order) => T::ORDERS
            .iter()
            .copied()
            .find(|known| *known == order)
            .ok_or_else(|| ValidationError::UnsupportedOrder {
                entity: T::ENTITY,
                order: order.to_string(),
            }),
    }
}

fn where_argument<T: ArchiveEntity>(filter: Option<&FilterExpr>) -> Result<String, QueryError> {
    let clause = compile(T::ENTITY, filter)?;
    // an empty `where: {}` would reach the backend as a degenerate filter
    Ok(if clause.is_empty() {
        String::new()
    } else {
        format!(", where: {{{clause}}}")
    })
}

pub(crate) fn list_query<T: ArchiveEntity>(
    limit: usize,
    offset: usize,
    filter: Option<&FilterExpr>,
    order: Option<&str>,
) -> Result<String, QueryError> {
    let order = checked_order::<T>(order)?;
    let filter = where_argument::<T>(filter)?;
    Ok(format!(
        "query {{ {root}(limit: {limit}, offset: {offset}, orderBy: {order}{filter}) {{ {fields} }} }}",
        root = T::LIST_ROOT,
        fields = T::FIELDS,
    ))
}

pub(crate) fn count_query<T: ArchiveEntity>(filter: Option<&FilterExpr>) -> Result<String, QueryError> {
    let filter = where_argument::<T>(filter)?;
    Ok(format!(
        "query {{ {root}(orderBy: id_ASC{filter}) {{ totalCount }} }}",
        root = T::CONNECTION_ROOT,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_omits_empty_where() {
        let query = list_query::<Block>(10, 20, None, None).unwrap();
        assert_eq!(
            query,
            "query { blocks(limit: 10, offset: 20, orderBy: id_DESC) { id hash height timestamp specVersion } }"
        );
        assert!(!list_query::<Block>(1, 0, Some(&FilterExpr::all()), None)
            .unwrap()
            .contains("where"));
    }

    #[test]
    fn test_list_query_embeds_clause() {
        let filter = FilterExpr::eq("height", 7i64);
        let query = list_query::<Block>(1, 0, Some(&filter), Some("height_ASC")).unwrap();
        assert!(query.contains("blocks(limit: 1, offset: 0, orderBy: height_ASC, where: {height_eq: 7})"));
    }

    #[test]
    fn test_count_query() {
        let filter = FilterExpr::eq("name", "Balances.Transfer");
        assert_eq!(
            count_query::<Event>(Some(&filter)).unwrap(),
            r#"query { eventsConnection(orderBy: id_ASC, where: {name_eq: "Balances.Transfer"}) { totalCount } }"#
        );
    }

    #[test]
    fn test_unknown_order_rejected() {
        assert!(matches!(
            list_query::<Event>(1, 0, None, Some("name_ASC")),
            Err(QueryError::Validation(ValidationError::UnsupportedOrder { .. }))
        ));
    }
}
