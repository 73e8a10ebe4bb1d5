use anyhow::{Result, bail};

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(auth) = cfg.auth.as_ref() {
        if !auth.admin_email.contains('@') {
            errors.push("auth.admin_email must be an email address".to_string());
        }

        if auth.admin_password.len() < 8 {
            errors.push("auth.admin_password must be at least 8 characters".to_string());
        }

        if auth.jwt_secret.trim().is_empty() {
            errors.push("auth.jwt_secret must not be empty".to_string());
        }
    }

    if cfg.cors.allowed_origins.is_empty() {
        errors.push("cors.allowed_origins must list at least one origin (or *)".to_string());
    }

    for origin in &cfg.cors.allowed_origins {
        let origin = origin.trim();
        if origin != "*" && !(origin.starts_with("http://") || origin.starts_with("https://")) {
            errors.push(format!("cors.allowed_origins entry '{origin}' must be * or an http(s) origin"));
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::config::{AppConfig, AuthConfig, DatabaseConfig};

    #[test]
    fn default_config_is_valid() {
        validate(&AppConfig::default()).expect("defaults should validate");
    }

    #[test]
    fn collects_every_problem() {
        let mut cfg = AppConfig::default();
        cfg.general.host = " ".to_string();
        cfg.database = Some(DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_idle: 4,
        });
        cfg.auth = Some(AuthConfig {
            jwt_secret: String::new(),
            admin_email: "admin".to_string(),
            admin_password: "short".to_string(),
            admin_name: "Admin".to_string(),
        });
        cfg.cors.allowed_origins = vec!["ftp://example.com".to_string()];

        let message = validate(&cfg).expect_err("config should fail").to_string();
        for fragment in [
            "general.host",
            "database.min_idle",
            "auth.admin_email",
            "auth.admin_password",
            "auth.jwt_secret",
            "cors.allowed_origins",
        ] {
            assert!(message.contains(fragment), "missing {fragment} in {message}");
        }
    }
}
