pub mod route_state;
pub mod router;
pub mod store;

pub use route_state::RouteState;
pub use router::{
    AppRoutingPolicy, DatabaseRouter, EntityRef, ModuleScope, Operation, DEFAULT_ALIAS,
    GLOBAL_ALIAS, KNOWN_ALIASES,
};
pub use store::{LicenseStore, StoreError};
