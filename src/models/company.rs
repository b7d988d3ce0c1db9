use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use super::job::Job;
use super::{double_option, ModelError};
use crate::sql::{bind_value, validate_range, SetClause, SqlError, WhereBuilder, WhereClause};

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Company plus its jobs, as returned by `Company::get`.
#[derive(Debug, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Partial update: absent fields stay unchanged; an explicit null clears a
/// nullable column. Field names are the external camelCase ones; the column
/// constants below are the storage translation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub num_employees: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub logo_url: Option<Option<String>>,
}

impl CompanyPatch {
    pub fn set_clause(&self) -> Result<SetClause, SqlError> {
        SetClause::builder()
            .set_opt("name", self.name.clone())
            .set_opt("description", self.description.clone())
            .set_opt("num_employees", self.num_employees.clone())
            .set_opt("logo_url", self.logo_url.clone())
            .build()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub min_employees: Option<i32>,
    #[serde(default)]
    pub max_employees: Option<i32>,
}

impl CompanyFilter {
    pub fn where_clause(&self) -> Result<WhereClause, SqlError> {
        validate_range(
            "employees",
            self.min_employees.map(i64::from),
            self.max_employees.map(i64::from),
        )?;

        let mut builder = WhereBuilder::new();
        if let Some(name) = self.name.as_deref().filter(|s| !s.is_empty()) {
            builder.contains("name", name);
        }
        if let Some(min) = self.min_employees {
            builder.at_least("num_employees", min);
        }
        if let Some(max) = self.max_employees {
            builder.at_most("num_employees", max);
        }
        Ok(builder.build())
    }
}

impl Company {
    /// Insert a new company; the handle is the natural key.
    pub async fn create(pool: &PgPool, data: &NewCompany) -> Result<Company, ModelError> {
        let duplicate = sqlx::query("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.handle)
            .fetch_optional(pool)
            .await?;
        if duplicate.is_some() {
            return Err(ModelError::Conflict(format!(
                "Duplicate company: {}",
                data.handle
            )));
        }

        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COMPANY_COLUMNS}"
        );
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(&data.handle)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.num_employees)
            .bind(&data.logo_url)
            .fetch_one(pool)
            .await?;
        Ok(company)
    }

    /// All companies matching the filter, ordered by name.
    pub async fn find_all(pool: &PgPool, filter: &CompanyFilter) -> Result<Vec<Company>, ModelError> {
        let where_clause = filter.where_clause()?;

        let sql = [
            format!("SELECT {COMPANY_COLUMNS} FROM companies"),
            where_clause.sql(),
            "ORDER BY name".to_string(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        let mut query = sqlx::query_as::<_, Company>(&sql);
        for param in where_clause.params() {
            query = bind_value(query, param);
        }
        Ok(query.fetch_all(pool).await?)
    }

    /// One company with its jobs, ordered by job id.
    pub async fn get(pool: &PgPool, handle: &str) -> Result<CompanyDetail, ModelError> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE handle = $1");
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No company: {handle}")))?;

        let jobs = sqlx::query_as::<_, Job>(
            "SELECT id, title, salary, equity, company_handle FROM jobs \
             WHERE company_handle = $1 ORDER BY id",
        )
        .bind(handle)
        .fetch_all(pool)
        .await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Partial update keyed by handle. The handle itself is not updatable;
    /// its placeholder continues the SET clause numbering.
    pub async fn update(
        pool: &PgPool,
        handle: &str,
        patch: &CompanyPatch,
    ) -> Result<Company, ModelError> {
        let set = patch.set_clause()?;

        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {COMPANY_COLUMNS}",
            set.sql(),
            set.next_param()
        );
        let mut query = sqlx::query_as::<_, Company>(&sql);
        for param in set.params() {
            query = bind_value(query, param);
        }
        query = query.bind(handle);

        query
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No company: {handle}")))
    }

    pub async fn delete(pool: &PgPool, handle: &str) -> Result<(), ModelError> {
        let deleted = sqlx::query("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(pool)
            .await?;
        match deleted {
            Some(_) => Ok(()),
            None => Err(ModelError::NotFound(format!("No company: {handle}"))),
        }
    }
}
