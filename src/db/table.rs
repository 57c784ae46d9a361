// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Table queries and a [`PageFetcher`] bound to one table.

use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::db::collections;
use crate::services::feed::PageFetcher;

/// Comparison applied by a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

/// A select against one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRequest {
    pub table: String,
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl TableRequest {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
            offset: 0,
        }
    }

    pub fn filter(mut self, field: &str, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.filter(field, FilterOp::Eq, value)
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }

    /// Same query restricted to one page.
    pub fn page(&self, limit: usize, offset: usize) -> Self {
        Self {
            limit: Some(limit),
            offset,
            ..self.clone()
        }
    }
}

/// Row-level read access to the backend.
#[async_trait]
pub trait TableQuery: Send + Sync {
    async fn select(&self, request: &TableRequest) -> anyhow::Result<Vec<Value>>;
}

/// Pages through one table query, decoding each row into `T`.
pub struct TableFetcher<T> {
    client: Arc<dyn TableQuery>,
    query: TableRequest,
    _row: PhantomData<fn() -> T>,
}

impl<T> TableFetcher<T> {
    pub fn new(client: Arc<dyn TableQuery>, query: TableRequest) -> Self {
        Self {
            client,
            query,
            _row: PhantomData,
        }
    }

    pub fn query(&self) -> &TableRequest {
        &self.query
    }
}

impl TableFetcher<crate::models::MealLog> {
    /// A user's meal log, newest first.
    pub fn meal_logs(client: Arc<dyn TableQuery>, user_id: &str) -> Self {
        let query = TableRequest::new(collections::MEAL_LOGS)
            .eq("user_id", user_id)
            .order_by("logged_at", Direction::Descending);
        Self::new(client, query)
    }
}

impl TableFetcher<crate::models::WorkoutLog> {
    /// A user's workout history, newest first.
    pub fn workout_logs(client: Arc<dyn TableQuery>, user_id: &str) -> Self {
        let query = TableRequest::new(collections::WORKOUT_LOGS)
            .eq("user_id", user_id)
            .order_by("started_at", Direction::Descending);
        Self::new(client, query)
    }
}

#[async_trait]
impl<T> PageFetcher<T> for TableFetcher<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, limit: usize, offset: usize) -> anyhow::Result<Vec<T>> {
        let request = self.query.page(limit, offset);
        let rows = self
            .client
            .select(&request)
            .await
            .with_context(|| format!("select from {} failed", request.table))?;

        rows.into_iter()
            .enumerate()
            .map(|(i, row)| {
                serde_json::from_value(row).with_context(|| {
                    format!("row {} of {} could not be decoded", offset + i, request.table)
                })
            })
            .collect()
    }
}
