//! Shared setup for router and service tests.

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;

use crate::{
    auth::{
        LocalAuth, Role,
        jwt::{JwtKeys, encode_token, make_access_claims},
    },
    config::{AppConfig, AuthConfig},
    db::dao::DaoContext,
    routes::app,
    state::AppState,
};

pub const TEST_JWT_SECRET: &[u8] = b"estate-api-test-secret";

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: String::from_utf8_lossy(TEST_JWT_SECRET).into_owned(),
        admin_email: "admin@example.com".to_string(),
        admin_password: "adminpassword".to_string(),
        admin_name: "Admin".to_string(),
    }
}

pub fn test_state(db: DatabaseConnection) -> Arc<AppState> {
    let mut cfg = AppConfig::default();
    cfg.auth = Some(test_auth_config());
    let auth = LocalAuth::from_config(&test_auth_config(), &DaoContext::new(&db));
    AppState::new(cfg, db, auth)
}

/// The full application router, middleware included, over `db`.
pub fn test_app(db: DatabaseConnection) -> Router {
    app(test_state(db))
}

pub fn bearer(user_id: i32, roles: Vec<Role>) -> String {
    let claims = make_access_claims(user_id, roles, 3600);
    let token = encode_token(&JwtKeys::from_secret(TEST_JWT_SECRET), &claims)
        .expect("token should encode");
    format!("Bearer {token}")
}

pub fn user_bearer(user_id: i32) -> String {
    bearer(user_id, vec![Role::User])
}

pub fn admin_bearer(user_id: i32) -> String {
    bearer(user_id, vec![Role::Admin, Role::User])
}

/// Row builders for `MockDatabase` query results.
pub mod fixtures {
    use chrono::{DateTime, FixedOffset, TimeZone};

    use crate::db::entities::{
        agency, document, faq, favorite, property, property_data, role, user, visit,
    };

    pub fn ts() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    pub fn user(id: i32, email: &str, role_id: Option<i32>) -> user::Model {
        user::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            phone: None,
            role_id,
            last_login_at: None,
            created_by: None,
            updated_by: None,
        }
    }

    pub fn role(id: i32, name: &str) -> role::Model {
        role::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            name: name.to_string(),
            description: None,
            created_by: None,
            updated_by: None,
        }
    }

    pub fn property(id: i32) -> property::Model {
        property::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            title: "Flat with balcony".to_string(),
            description: None,
            property_type: "apartment".to_string(),
            status: "sale".to_string(),
            price: 250_000,
            address: None,
            city: "Lyon".to_string(),
            zip_code: None,
            surface: Some(64),
            rooms: Some(3),
            bedrooms: Some(2),
            agency_id: None,
            created_by: Some(1),
            updated_by: Some(1),
        }
    }

    pub fn agency(id: i32) -> agency::Model {
        agency::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            name: "Central Realty".to_string(),
            email: Some("contact@central.example".to_string()),
            phone: None,
            address: None,
            city: Some("Lyon".to_string()),
            description: None,
            created_by: Some(1),
            updated_by: Some(1),
        }
    }

    pub fn document(id: i32) -> document::Model {
        document::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            name: "Floor plan".to_string(),
            url: "https://files.example/plan.pdf".to_string(),
            mime_type: Some("application/pdf".to_string()),
            property_id: None,
            user_id: None,
            created_by: Some(1),
            updated_by: Some(1),
        }
    }

    pub fn faq(id: i32) -> faq::Model {
        faq::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            question: "Are pets allowed?".to_string(),
            answer: "Depends on the listing.".to_string(),
            position: Some(1),
            created_by: Some(1),
            updated_by: Some(1),
        }
    }

    pub fn visit(id: i32, property_id: i32, user_id: i32) -> visit::Model {
        visit::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            property_id,
            user_id,
            scheduled_at: ts(),
            status: "pending".to_string(),
            notes: None,
            created_by: Some(user_id),
            updated_by: Some(user_id),
        }
    }

    pub fn favorite(id: i32, user_id: i32, property_id: i32) -> favorite::Model {
        favorite::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            user_id,
            property_id,
            created_by: Some(user_id),
            updated_by: Some(user_id),
        }
    }

    pub fn property_entry(id: i32, parent_id: i32, key: &str, value: &str) -> property_data::Model {
        property_data::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            property_id: parent_id,
            key: key.to_string(),
            value: value.to_string(),
            created_by: Some(1),
            updated_by: Some(1),
        }
    }
}
