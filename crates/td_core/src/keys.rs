//! Reserved context keys.

/// Raw input value, always seeded.
pub const INPUT: &str = "input";
/// Result of the `sort` model.
pub const SORTED: &str = "sorted";
/// Fallback list field consulted by `sort`.
pub const LIST: &str = "list";
/// Pending requests appended by the `tool` model.
pub const TOOL_REQUESTS: &str = "tool_requests";
/// Mirror of `TOOL_REQUESTS` for external planners.
pub const PLAN: &str = "plan";
