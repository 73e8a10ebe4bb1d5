use crate::{config::AuthConfig, db::dao::DaoContext};

use super::LocalAuth;

/// Builds the authenticator and seeds the roles plus the admin account.
pub async fn init_auth(cfg: &AuthConfig, daos: &DaoContext) -> anyhow::Result<LocalAuth> {
    let auth = LocalAuth::from_config(cfg, daos);
    auth.seed(cfg).await?;
    Ok(auth)
}
