//! Creation of the initial admin account from configuration.

use mdm_db::models::user::CreateUser;
use mdm_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::auth::password::hash_password;
use crate::config::AdminCredentials;
use crate::error::{AppError, AppResult};

/// Create the configured admin user unless an account with that username
/// already exists. Existing accounts are left untouched, password included.
///
/// Returns `true` when a user was created.
pub async fn ensure_admin_user(pool: &PgPool, admin: &AdminCredentials) -> AppResult<bool> {
    if UserRepo::find_by_username(pool, &admin.username).await?.is_some() {
        return Ok(false);
    }

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            password_hash,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, username = %user.username, "Created admin user");
    Ok(true)
}
