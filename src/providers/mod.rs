// Provider layer: one adapter per CMS product plus the shared fetch
// helper and the selecting factory.

pub mod base;
pub mod contentful;
pub mod factory;
pub mod fixture;
pub mod sanity;
pub mod storyblok;
pub mod strapi;

pub use crate::domain::ports::ContentService;
pub use factory::CmsFactory;
