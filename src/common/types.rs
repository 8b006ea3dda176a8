use ahash::AHashMap;

/// Sample timestamp, in milliseconds since the UNIX epoch.
pub type Timestamp = i64;

/// Free-form key/value metadata attached to endpoints, instance domains
/// and instances.
pub type Labels = AHashMap<String, String>;
