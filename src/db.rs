use std::{str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::{
    config::Config,
    models::{Contact, NewContact},
    schema,
};

/// Opens the connection pool and makes sure the `contacts` table exists.
pub async fn connect(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

    let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
    if config.is_in_memory() {
        // Every connection to `:memory:` is its own database.
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
    }

    let pool = pool_options.connect_with(options).await?;
    schema::create_table(&pool).await?;
    Ok(pool)
}

pub async fn list_contacts(pool: &SqlitePool) -> Result<Vec<Contact>, sqlx::Error> {
    sqlx::query_as::<_, Contact>(
        "SELECT id, name, email, phone, created_at FROM contacts ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

/// Inserts the contact and returns the id SQLite assigned to it.
pub async fn insert_contact(pool: &SqlitePool, contact: &NewContact) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO contacts (name, email, phone) VALUES (?, ?, ?)")
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}
