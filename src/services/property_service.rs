use std::collections::HashMap;

use sea_orm::Set;
use serde::Deserialize;

use crate::{
    db::dao::{AgencyDao, PropertyDao},
    db::entities::{prelude::Property, property},
    error::AppError,
    services::{
        crud_service::{CrudService, Scope, require_exists},
        filters::{
            FilterMode, FilterKey, at_least_i32, at_least_i64, at_most_i32, at_most_i64,
            contains_text, exact_i32, exact_text, invalid_filter,
        },
        validation::{
            non_negative, one_of, optional_non_negative, optional_text, required_text, supplied,
        },
    },
};

pub const PROPERTY_STATUSES: &[&str] = &["sale", "rent", "sold", "rented"];
const DEFAULT_STATUS: &str = "sale";
const DATA_FILTER_PREFIX: &str = "data.";

static PROPERTY_FILTERS: &[FilterKey<property::Column>] = &[
    FilterKey {
        key: "q",
        column: property::Column::Title,
        parse: contains_text,
    },
    FilterKey {
        key: "city",
        column: property::Column::City,
        parse: exact_text,
    },
    FilterKey {
        key: "property_type",
        column: property::Column::PropertyType,
        parse: exact_text,
    },
    FilterKey {
        key: "status",
        column: property::Column::Status,
        parse: exact_text,
    },
    FilterKey {
        key: "agency_id",
        column: property::Column::AgencyId,
        parse: exact_i32,
    },
    FilterKey {
        key: "min_price",
        column: property::Column::Price,
        parse: at_least_i64,
    },
    FilterKey {
        key: "max_price",
        column: property::Column::Price,
        parse: at_most_i64,
    },
    FilterKey {
        key: "min_surface",
        column: property::Column::Surface,
        parse: at_least_i32,
    },
    FilterKey {
        key: "max_surface",
        column: property::Column::Surface,
        parse: at_most_i32,
    },
    FilterKey {
        key: "rooms",
        column: property::Column::Rooms,
        parse: at_least_i32,
    },
    FilterKey {
        key: "bedrooms",
        column: property::Column::Bedrooms,
        parse: at_least_i32,
    },
];

#[derive(Debug, Deserialize)]
pub struct NewProperty {
    pub title: String,
    pub description: Option<String>,
    pub property_type: String,
    pub status: Option<String>,
    pub price: i64,
    pub address: Option<String>,
    pub city: String,
    pub zip_code: Option<String>,
    pub surface: Option<i32>,
    pub rooms: Option<i32>,
    pub bedrooms: Option<i32>,
    pub agency_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub price: Option<i64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub surface: Option<i32>,
    pub rooms: Option<i32>,
    pub bedrooms: Option<i32>,
    pub agency_id: Option<i32>,
}

#[derive(Clone)]
pub struct PropertyService {
    properties: PropertyDao,
    agencies: AgencyDao,
}

impl PropertyService {
    pub fn new(properties: PropertyDao, agencies: AgencyDao) -> Self {
        Self {
            properties,
            agencies,
        }
    }
}

fn status(raw: &str) -> Result<String, AppError> {
    one_of("status", raw, PROPERTY_STATUSES)
}

#[async_trait::async_trait]
impl CrudService for PropertyService {
    type Dao = PropertyDao;
    type Create = NewProperty;
    type Update = PropertyPatch;

    fn dao(&self) -> &Self::Dao {
        &self.properties
    }

    fn label(&self) -> &'static str {
        "Property"
    }

    fn list_filter_mode(&self) -> FilterMode<property::Column> {
        FilterMode::Allowlist(PROPERTY_FILTERS)
    }

    /// `data.<key>=<value>` keeps properties that carry that data entry.
    fn take_scopes(
        &self,
        filters: &mut HashMap<String, String>,
    ) -> Result<Vec<Scope<Property>>, AppError> {
        let data_keys: Vec<String> = filters
            .keys()
            .filter(|key| key.starts_with(DATA_FILTER_PREFIX))
            .cloned()
            .collect();

        let mut scopes: Vec<Scope<Property>> = Vec::with_capacity(data_keys.len());
        for raw_key in data_keys {
            let Some(value) = filters.remove(&raw_key) else {
                continue;
            };
            let key = raw_key[DATA_FILTER_PREFIX.len()..].trim().to_string();
            if key.is_empty() {
                return Err(invalid_filter());
            }
            scopes.push(Box::new(move |query| {
                PropertyDao::with_data_entry(query, &key, &value)
            }));
        }
        Ok(scopes)
    }

    fn build_create(
        &self,
        payload: NewProperty,
        _actor_id: i32,
    ) -> Result<property::ActiveModel, AppError> {
        let status = match payload.status.as_deref() {
            Some(raw) => status(raw)?,
            None => DEFAULT_STATUS.to_string(),
        };
        Ok(property::ActiveModel {
            title: Set(required_text("title", &payload.title)?),
            description: Set(optional_text(payload.description)),
            property_type: Set(required_text("property_type", &payload.property_type)?),
            status: Set(status),
            price: Set(non_negative("price", payload.price)?),
            address: Set(optional_text(payload.address)),
            city: Set(required_text("city", &payload.city)?),
            zip_code: Set(optional_text(payload.zip_code)),
            surface: Set(optional_non_negative("surface", payload.surface)?),
            rooms: Set(optional_non_negative("rooms", payload.rooms)?),
            bedrooms: Set(optional_non_negative("bedrooms", payload.bedrooms)?),
            agency_id: Set(payload.agency_id),
            ..Default::default()
        })
    }

    fn validate_update(&self, payload: &PropertyPatch) -> Result<(), AppError> {
        if let Some(title) = &payload.title {
            required_text("title", title)?;
        }
        if let Some(property_type) = &payload.property_type {
            required_text("property_type", property_type)?;
        }
        if let Some(city) = &payload.city {
            required_text("city", city)?;
        }
        if let Some(raw) = &payload.status {
            status(raw)?;
        }
        optional_non_negative("price", payload.price)?;
        optional_non_negative("surface", payload.surface)?;
        optional_non_negative("rooms", payload.rooms)?;
        optional_non_negative("bedrooms", payload.bedrooms)?;
        Ok(())
    }

    fn apply_update(
        &self,
        active: &mut property::ActiveModel,
        payload: PropertyPatch,
    ) -> Result<(), AppError> {
        if let Some(title) = payload.title {
            active.title = Set(required_text("title", &title)?);
        }
        if let Some(description) = payload.description {
            active.description = Set(optional_text(Some(description)));
        }
        if let Some(property_type) = payload.property_type {
            active.property_type = Set(required_text("property_type", &property_type)?);
        }
        if let Some(raw) = payload.status {
            active.status = Set(status(&raw)?);
        }
        if let Some(price) = payload.price {
            active.price = Set(non_negative("price", price)?);
        }
        if let Some(address) = payload.address {
            active.address = Set(optional_text(Some(address)));
        }
        if let Some(city) = payload.city {
            active.city = Set(required_text("city", &city)?);
        }
        if let Some(zip_code) = payload.zip_code {
            active.zip_code = Set(optional_text(Some(zip_code)));
        }
        if let Some(surface) = payload.surface {
            active.surface = Set(Some(non_negative("surface", surface)?));
        }
        if let Some(rooms) = payload.rooms {
            active.rooms = Set(Some(non_negative("rooms", rooms)?));
        }
        if let Some(bedrooms) = payload.bedrooms {
            active.bedrooms = Set(Some(non_negative("bedrooms", bedrooms)?));
        }
        if let Some(agency_id) = payload.agency_id {
            active.agency_id = Set(Some(agency_id));
        }
        Ok(())
    }

    async fn check_constraints(
        &self,
        active: &property::ActiveModel,
        _id: Option<i32>,
    ) -> Result<(), AppError> {
        if let Some(Some(agency_id)) = supplied(&active.agency_id) {
            require_exists(&self.agencies, *agency_id, "Agency").await?;
        }
        Ok(())
    }
}
