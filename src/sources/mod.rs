//! Company source module
//!
//! Defines the Source trait and provides a registry for all company sources.

mod loader;
mod registry;
mod sectors;
mod traits;

// Source implementations
pub mod crunchbase;
pub mod linkedin;
pub mod mock;
pub mod news;
pub mod opencorporates;
pub mod yellowpages;

pub use loader::SourceLoader;
pub use registry::{SourceInfo, SourceRegistry, UnavailableSource};
pub use sectors::{country_from_jurisdiction, SectorTable};
pub use traits::*;
