//! Domain model (runtime status, snapshots, management links, errors).

pub mod errors;
pub mod links;
pub mod snapshot;
pub mod status;

pub use self::errors::ApiError;
pub use self::links::{ManagementLinks, RoutingAttributes, EVENT_NAME_PLACEHOLDER, REASON_PLACEHOLDER};
pub use self::snapshot::{StatusSnapshot, StatusView, format_utc};
pub use self::status::{ParseStatusError, RuntimeStatus};
