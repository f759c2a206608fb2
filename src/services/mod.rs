pub mod license_service;

pub use license_service::{normalize_document, LicenseError, LicenseRecord, LicenseService};
