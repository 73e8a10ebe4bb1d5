use sea_orm::Set;
use serde::Deserialize;

use crate::{
    db::dao::{FavoriteDao, PropertyDao, UserDao},
    db::entities::favorite,
    error::AppError,
    services::{
        crud_service::{CrudOp, CrudService, Immutable, require_exists},
        validation::supplied,
    },
};

#[derive(Debug, Deserialize)]
pub struct NewFavorite {
    pub property_id: i32,
    /// Defaults to the caller.
    pub user_id: Option<i32>,
}

#[derive(Clone)]
pub struct FavoriteService {
    favorites: FavoriteDao,
    properties: PropertyDao,
    users: UserDao,
}

impl FavoriteService {
    pub fn new(favorites: FavoriteDao, properties: PropertyDao, users: UserDao) -> Self {
        Self {
            favorites,
            properties,
            users,
        }
    }
}

#[async_trait::async_trait]
impl CrudService for FavoriteService {
    type Dao = FavoriteDao;
    type Create = NewFavorite;
    type Update = Immutable;

    fn dao(&self) -> &Self::Dao {
        &self.favorites
    }

    fn label(&self) -> &'static str {
        "Favorite"
    }

    fn build_create(
        &self,
        payload: NewFavorite,
        actor_id: i32,
    ) -> Result<favorite::ActiveModel, AppError> {
        Ok(favorite::ActiveModel {
            user_id: Set(payload.user_id.unwrap_or(actor_id)),
            property_id: Set(payload.property_id),
            ..Default::default()
        })
    }

    fn apply_update(
        &self,
        _active: &mut favorite::ActiveModel,
        _payload: Immutable,
    ) -> Result<(), AppError> {
        Ok(())
    }

    async fn check_constraints(
        &self,
        active: &favorite::ActiveModel,
        _id: Option<i32>,
    ) -> Result<(), AppError> {
        let (Some(&property_id), Some(&user_id)) =
            (supplied(&active.property_id), supplied(&active.user_id))
        else {
            return Ok(());
        };
        require_exists(&self.properties, property_id, "Property").await?;
        require_exists(&self.users, user_id, "User").await?;

        let existing = self
            .favorites
            .find_by_user_and_property(user_id, property_id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))?;
        if existing.is_some() {
            return Err(AppError::conflict("Property is already a favorite"));
        }
        Ok(())
    }
}
