use crate::service::{coverage::CoverageService, registry::RegistryService};

/**
* Represents the application state shared across the Actix web application.
*/
pub struct AppState {
    /**
     * The registry service for creating and listing records.
     */
    pub registry_service: RegistryService,
    /**
     * The coverage service for computing aggregate statistics.
     */
    pub coverage_service: CoverageService,
}

/**
 * Creates a new instance of `AppState`.
 *
 * # Arguments
 * `registry_service`: The registry service for creating and listing records.
 * `coverage_service`: The coverage service for computing aggregate statistics.
 */
impl AppState {
    pub fn new(registry_service: RegistryService, coverage_service: CoverageService) -> Self {
        AppState { registry_service, coverage_service }
    }
}
