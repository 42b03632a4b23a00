use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use super::{FormStore, ListOrder, SetOnce, SubmissionFilter, SubmissionStore};
use crate::errors::AppError;
use crate::fields::models::{ExtraField, FieldValues, PermanentField};
use crate::forms::models::Form;
use crate::submissions::models::Submission;

/// PostgreSQL-backed store. Documents live in JSONB columns.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct FormRow {
    id: String,
    title: String,
    permanent_fields: Json<Vec<PermanentField>>,
    extra_fields: Json<Vec<ExtraField>>,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FormRow> for Form {
    fn from(row: FormRow) -> Self {
        Form {
            id: row.id,
            title: row.title,
            permanent_fields: row.permanent_fields.0,
            extra_fields: row.extra_fields.0,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct SubmissionRow {
    id: String,
    form_id: String,
    user_id: String,
    user_email: String,
    static_values: Json<FieldValues>,
    extra_values: Json<FieldValues>,
    created_at: DateTime<Utc>,
}

impl From<SubmissionRow> for Submission {
    fn from(row: SubmissionRow) -> Self {
        Submission {
            id: row.id,
            form_id: row.form_id,
            user_id: row.user_id,
            user_email: row.user_email,
            static_values: row.static_values.0,
            extra_values: row.extra_values.0,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl FormStore for PgStore {
    async fn get_form(&self, id: &str) -> Result<Option<Form>, AppError> {
        let row: Option<FormRow> = sqlx::query_as("SELECT * FROM forms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Form::from))
    }

    async fn put_form(&self, form: &Form) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO forms
                (id, title, permanent_fields, extra_fields, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                permanent_fields = EXCLUDED.permanent_fields,
                extra_fields = EXCLUDED.extra_fields,
                created_by = EXCLUDED.created_by,
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&form.id)
        .bind(&form.title)
        .bind(Json(&form.permanent_fields))
        .bind(Json(&form.extra_fields))
        .bind(&form.created_by)
        .bind(form.created_at)
        .bind(form.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn replace_extra_fields(&self, seed: &Form) -> Result<Form, AppError> {
        let row: FormRow = sqlx::query_as(
            r#"
            INSERT INTO forms
                (id, title, permanent_fields, extra_fields, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                extra_fields = EXCLUDED.extra_fields,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(&seed.id)
        .bind(&seed.title)
        .bind(Json(&seed.permanent_fields))
        .bind(Json(&seed.extra_fields))
        .bind(&seed.created_by)
        .bind(seed.created_at)
        .bind(seed.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn set_permanent_fields(
        &self,
        id: &str,
        fields: &[PermanentField],
        updated_at: DateTime<Utc>,
    ) -> Result<SetOnce, AppError> {
        let row: Option<FormRow> = sqlx::query_as(
            r#"
            UPDATE forms
            SET permanent_fields = $2, updated_at = $3
            WHERE id = $1 AND permanent_fields = '[]'::jsonb
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(fields))
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(SetOnce::Applied(row.into()));
        }
        Ok(match self.get_form(id).await? {
            Some(_) => SetOnce::AlreadySet,
            None => SetOnce::Missing,
        })
    }
}

#[async_trait]
impl SubmissionStore for PgStore {
    async fn insert_submission(&self, submission: &Submission) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO submissions
                (id, form_id, user_id, user_email, static_values, extra_values, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&submission.id)
        .bind(&submission.form_id)
        .bind(&submission.user_id)
        .bind(&submission.user_email)
        .bind(Json(&submission.static_values))
        .bind(Json(&submission.extra_values))
        .bind(submission.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_submission(&self, id: &str) -> Result<Option<Submission>, AppError> {
        let row: Option<SubmissionRow> = sqlx::query_as("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Submission::from))
    }

    async fn delete_submission(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_submissions(
        &self,
        filter: &SubmissionFilter,
        order: ListOrder,
    ) -> Result<Vec<Submission>, AppError> {
        let (column, value) = match filter {
            SubmissionFilter::Form(id) => ("form_id", id),
            SubmissionFilter::User(id) => ("user_id", id),
        };
        let order_by = match order {
            ListOrder::NewestFirst => " ORDER BY created_at DESC",
            ListOrder::Unordered => "",
        };
        let sql = format!("SELECT * FROM submissions WHERE {column} = $1{order_by}");

        let rows: Vec<SubmissionRow> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Submission::from).collect())
    }

    fn supports_sorted_listing(&self) -> bool {
        true
    }
}
