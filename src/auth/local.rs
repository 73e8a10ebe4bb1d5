use crate::{
    auth::{
        Claims, Role, TokenBundle,
        jwt::{ACCESS_TTL_SECS, JwtKeys, decode_token, encode_token, make_access_claims},
        password::{hash_password, verify_password},
        types::{ADMIN_ROLE_NAME, USER_ROLE_NAME},
    },
    config::AuthConfig,
    db::dao::{DaoBase, DaoContext, DaoLayerError, RefreshTokenDao, RoleDao, UserDao},
    db::entities::{refresh_token, user},
    error::AppError,
    services::validation,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";

/// Email/password accounts stored in `users`, HS256 access tokens and
/// single-use refresh tokens stored in `refresh_tokens`.
#[derive(Clone)]
pub struct LocalAuth {
    users: UserDao,
    roles: RoleDao,
    refresh_tokens: RefreshTokenDao,
    jwt: JwtKeys,
}

impl LocalAuth {
    pub fn new(daos: &DaoContext, jwt: JwtKeys) -> Self {
        Self {
            users: daos.user(),
            roles: daos.role(),
            refresh_tokens: daos.refresh_token(),
            jwt,
        }
    }

    pub fn from_config(cfg: &AuthConfig, daos: &DaoContext) -> Self {
        Self::new(daos, JwtKeys::from_secret(cfg.jwt_secret.as_bytes()))
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenBundle, AppError> {
        let name = validation::required_text("name", name)?;
        let email = validation::email("email", email)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = hash_password(password)?;
        let role_id = self.roles.find_by_name(USER_ROLE_NAME).await?.map(|role| role.id);
        let user = self
            .users
            .create_user(&name, &email, &password_hash, role_id)
            .await?;

        let refresh = self.refresh_tokens.issue(user.id).await?;
        self.bundle(&user, Some(USER_ROLE_NAME), refresh)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AppError> {
        let user = self
            .users
            .find_by_email(&validation::normalize_email(email))
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let now = chrono::Utc::now().fixed_offset();
        self.users.set_last_login(user.id, &now).await?;

        let role_name = self.role_name(&user).await?;
        let refresh = self.refresh_tokens.issue(user.id).await?;
        self.bundle(&user, role_name.as_deref(), refresh)
    }

    /// Trades a live refresh token for a new bundle; the presented token is
    /// revoked in the process.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AppError> {
        let current = self
            .refresh_tokens
            .find_unrevoked(refresh_token)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_REFRESH_TOKEN))?;

        if current.expires_at < chrono::Utc::now().fixed_offset() {
            return Err(AppError::unauthorized("Refresh token expired"));
        }

        let user = match self.users.find_by_id(current.user_id).await {
            Ok(user) => user,
            Err(DaoLayerError::NotFound { .. }) => {
                return Err(AppError::unauthorized(INVALID_REFRESH_TOKEN));
            }
            Err(err) => return Err(err.into()),
        };

        let next = self
            .refresh_tokens
            .rotate(&current)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_REFRESH_TOKEN))?;

        let role_name = self.role_name(&user).await?;
        self.bundle(&user, role_name.as_deref(), next)
    }

    pub fn verify(&self, access_token: &str) -> Result<Claims, AppError> {
        decode_token(&self.jwt, access_token)
    }

    /// Verifies an `Authorization` header value of the form `Bearer <token>`.
    pub fn verify_bearer(&self, header: Option<&str>) -> Result<Claims, AppError> {
        let token = header
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthorized("Missing/invalid Authorization header"))?;
        self.verify(token)
    }

    /// Ensures the `admin` and `user` roles exist and creates the configured
    /// admin account unless a user with that email is already stored.
    pub async fn seed(&self, cfg: &AuthConfig) -> anyhow::Result<()> {
        let admin_role = self
            .roles
            .ensure(ADMIN_ROLE_NAME, "Full access to every resource")
            .await?;
        self.roles.ensure(USER_ROLE_NAME, "Registered user").await?;

        let email = validation::email("auth.admin_email", &cfg.admin_email)
            .map_err(|err| anyhow::anyhow!("admin seed: {}", err.message()))?;
        if let Some(existing) = self.users.find_by_email(&email).await? {
            tracing::info!(email = %existing.email, "admin user already present");
            return Ok(());
        }

        let hash = hash_password(&cfg.admin_password)
            .map_err(|err| anyhow::anyhow!("admin seed: {}", err.message()))?;
        let user = self
            .users
            .create_user(&cfg.admin_name, &email, &hash, Some(admin_role.id))
            .await?;
        tracing::info!(email = %user.email, "seeded admin user");
        Ok(())
    }

    async fn role_name(&self, user: &user::Model) -> Result<Option<String>, AppError> {
        let Some(role_id) = user.role_id else {
            return Ok(None);
        };
        match self.roles.find_by_id(role_id).await {
            Ok(role) => Ok(Some(role.name)),
            Err(DaoLayerError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn bundle(
        &self,
        user: &user::Model,
        role_name: Option<&str>,
        refresh: refresh_token::Model,
    ) -> Result<TokenBundle, AppError> {
        let claims = make_access_claims(user.id, Role::grants_for(role_name), ACCESS_TTL_SECS);
        Ok(TokenBundle {
            access_token: encode_token(&self.jwt, &claims)?,
            refresh_token: refresh.token,
            token_type: "Bearer",
            expires_in: ACCESS_TTL_SECS,
        })
    }
}
