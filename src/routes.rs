// Route path constants - single source of truth for all API paths

pub const ROOT: &str = "/";
pub const HEALTH: &str = "/health";
pub const EVENTS: &str = "/events";
pub const EVENT_ITEM: &str = "/events/{id}";
pub const DOCS: &str = "/docs";
pub const OPENAPI_JSON: &str = "/openapi.json";
