//! Schema bootstrap

use sqlx::PgPool;
use tracing::info;

const CREATE_CHAT_MESSAGES: &str = r#"
CREATE TABLE IF NOT EXISTS chat_messages (
    id          BIGSERIAL PRIMARY KEY,
    sender      TEXT NOT NULL,
    content     TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

/// Create the tables the message store needs, if they do not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_CHAT_MESSAGES).execute(pool).await?;
    info!("chat_messages table ready");
    Ok(())
}
