//! Configuration Resolution
//!
//! URL parameters, manifests, defaults, and the priority merge between them.

pub mod detect;
pub mod manifest;
pub mod model;
pub mod params;
pub mod resolver;

pub use detect::detect_type;
pub use manifest::{Manifest, ManifestCaption, ManifestTranscript};
pub use model::{
    dedupe_by_language, Attribution, Caption, ConfigDefaults, Configuration, ContentConfig,
    LinkedText, Transcript,
};
pub use params::QueryParams;
pub use resolver::{resolve, ConfigResolver, ManifestOutcome};
