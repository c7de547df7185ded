/// Display name used when a property or provider has not been given one.
pub const DEFAULT_PROPERTY_NAME: &str = "this property";

/// Display name used by a bare provider in missing-value errors.
pub const DEFAULT_PROVIDER_NAME: &str = "this provider";

/// Environment variable selecting the mutation guard policy for new properties.
pub const GUARD_POLICY_ENV: &str = "LAZYPROP_GUARD_POLICY";

/// Format version written into configuration cache entries.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// File extension for configuration cache entries.
pub const CACHE_ENTRY_EXT: &str = "json";
