pub mod config;
pub mod domain;
pub mod providers;
pub mod utils;
pub mod webhook;

pub use config::{CmsConfig, CmsKind, PublishState};
pub use domain::model::{FlexContent, GeneralData, Page};
pub use domain::ports::ContentService;
pub use providers::factory::CmsFactory;
pub use utils::error::{CmsError, Result};
