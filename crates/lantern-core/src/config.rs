use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

/// Settings for an [`Engine`](crate::Engine).
///
/// Every field has a default, so a partial document deserializes:
///
/// ```
/// # use lantern_core::EngineConfig;
/// let config: EngineConfig =
///     serde_json::from_str(r#"{"max_concurrency": 4, "dataloader": {"wait": 5}}"#).unwrap();
/// assert_eq!(config.max_concurrency, 4);
/// assert_eq!(config.dataloader.wait.as_millis(), 5);
/// assert_eq!(config.dataloader.max_batch, 100);
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ceiling on futures in flight per fan-out scope.
    pub max_concurrency: usize,
    pub dataloader: DataLoaderConfig,
    /// Message of the `@auth` rejection when the directive names none.
    pub unauthorized_message: String,
    /// Default lifetime of `@cache` entries.
    #[serde(with = "duration_ms")]
    pub cache_ttl: Duration,
    pub root_types: RootTypes,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 16,
            dataloader: DataLoaderConfig::default(),
            unauthorized_message: "unauthorized".to_string(),
            cache_ttl: Duration::from_secs(30 * 60),
            root_types: RootTypes::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct DataLoaderConfig {
    /// How long a pending batch collects keys.
    #[serde(with = "duration_ms")]
    pub wait: Duration,
    /// Key count at which a pending batch dispatches without waiting.
    pub max_batch: usize,
    #[serde(with = "duration_ms")]
    pub ttl: Duration,
    /// Interval of the full cache reset.
    #[serde(with = "duration_ms")]
    pub reset_interval: Duration,
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        Self {
            wait: Duration::from_millis(10),
            max_batch: 100,
            ttl: Duration::from_millis(300),
            reset_interval: Duration::from_secs(60),
        }
    }
}

/// Names of the root operation types.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct RootTypes {
    pub query: String,
    pub mutation: String,
    pub subscription: String,
}

impl Default for RootTypes {
    fn default() -> Self {
        Self {
            query: "Query".to_string(),
            mutation: "Mutation".to_string(),
            subscription: "Subscription".to_string(),
        }
    }
}

impl RootTypes {
    pub fn for_kind(&self, kind: lantern_parser::ast::OperationKind) -> &str {
        use lantern_parser::ast::OperationKind;
        match kind {
            OperationKind::Query => &self.query,
            OperationKind::Mutation => &self.mutation,
            OperationKind::Subscription => &self.subscription,
        }
    }
}

mod duration_ms {
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
