use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use super::{double_option, ModelError};
use crate::sql::{bind_value, SetClause, SqlError, WhereBuilder, WhereClause};

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
}

/// Partial update; neither the id nor the owning company can change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub equity: Option<Option<BigDecimal>>,
}

impl JobPatch {
    pub fn set_clause(&self) -> Result<SetClause, SqlError> {
        SetClause::builder()
            .set_opt("title", self.title.clone())
            .set_opt("salary", self.salary.clone())
            .set_opt("equity", self.equity.clone())
            .build()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub min_salary: Option<i32>,
    /// true requires equity > 0; false or absent adds no constraint
    #[serde(default)]
    pub has_equity: Option<bool>,
}

impl JobFilter {
    pub fn where_clause(&self) -> WhereClause {
        let mut builder = WhereBuilder::new();
        if let Some(title) = self.title.as_deref().filter(|s| !s.is_empty()) {
            builder.contains("title", title);
        }
        if let Some(min) = self.min_salary {
            builder.at_least("salary", min);
        }
        if self.has_equity == Some(true) {
            builder.positive("equity");
        }
        builder.build()
    }
}

impl Job {
    /// Insert a new job; (title, company handle) is the natural key.
    pub async fn create(pool: &PgPool, data: &NewJob) -> Result<Job, ModelError> {
        let duplicate =
            sqlx::query("SELECT id FROM jobs WHERE title = $1 AND company_handle = $2")
                .bind(&data.title)
                .bind(&data.company_handle)
                .fetch_optional(pool)
                .await?;
        if duplicate.is_some() {
            return Err(ModelError::Conflict(format!(
                "Duplicate job: {} at {}",
                data.title, data.company_handle
            )));
        }

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {JOB_COLUMNS}"
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(&data.title)
            .bind(data.salary)
            .bind(&data.equity)
            .bind(&data.company_handle)
            .fetch_one(pool)
            .await?;
        Ok(job)
    }

    /// All jobs matching the filter, ordered by title (id breaks ties).
    pub async fn find_all(pool: &PgPool, filter: &JobFilter) -> Result<Vec<Job>, ModelError> {
        let where_clause = filter.where_clause();

        let sql = [
            format!("SELECT {JOB_COLUMNS} FROM jobs"),
            where_clause.sql(),
            "ORDER BY title, id".to_string(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        let mut query = sqlx::query_as::<_, Job>(&sql);
        for param in where_clause.params() {
            query = bind_value(query, param);
        }
        Ok(query.fetch_all(pool).await?)
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<Job, ModelError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No job: {id}")))
    }

    pub async fn update(pool: &PgPool, id: i32, patch: &JobPatch) -> Result<Job, ModelError> {
        let set = patch.set_clause()?;

        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {JOB_COLUMNS}",
            set.sql(),
            set.next_param()
        );
        let mut query = sqlx::query_as::<_, Job>(&sql);
        for param in set.params() {
            query = bind_value(query, param);
        }
        query = query.bind(id);

        query
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No job: {id}")))
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<(), ModelError> {
        let deleted = sqlx::query("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match deleted {
            Some(_) => Ok(()),
            None => Err(ModelError::NotFound(format!("No job: {id}"))),
        }
    }
}
