//! PostgreSQL implementation of the store traits.
//!
//! Row structs mirror the table columns (enums as TEXT) and convert into the
//! domain models at the read edge.

use std::str::FromStr;

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::UnknownVariant;

mod documents;
mod drafts;
mod ideas;
mod profiles;
mod strategy;
mod webhooks;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Parses a TEXT column into its closed enum. An unknown value is a data
/// integrity problem, not a client error.
fn parse_column<T>(value: &str) -> Result<T, AppError>
where
    T: FromStr<Err = UnknownVariant>,
{
    value
        .parse()
        .map_err(|e: UnknownVariant| AppError::Internal(anyhow::Error::new(e)))
}

fn parse_optional_column<T>(value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = UnknownVariant>,
{
    value.map(parse_column).transpose()
}
