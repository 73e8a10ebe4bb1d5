#[allow(unused_imports)]
pub mod prelude {
    pub use super::agency::Entity as Agency;
    pub use super::agency_data::Entity as AgencyData;
    pub use super::document::Entity as Document;
    pub use super::document_data::Entity as DocumentData;
    pub use super::faq::Entity as Faq;
    pub use super::faq_data::Entity as FaqData;
    pub use super::favorite::Entity as Favorite;
    pub use super::property::Entity as Property;
    pub use super::property_data::Entity as PropertyData;
    pub use super::refresh_token::Entity as RefreshToken;
    pub use super::role::Entity as Role;
    pub use super::user::Entity as User;
    pub use super::visit::Entity as Visit;
    pub use super::visit_data::Entity as VisitData;
}

pub mod agency;
pub mod agency_data;
pub mod document;
pub mod document_data;
pub mod faq;
pub mod faq_data;
pub mod favorite;
pub mod property;
pub mod property_data;
pub mod refresh_token;
pub mod role;
pub mod user;
pub mod visit;
pub mod visit_data;
