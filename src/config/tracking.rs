//! `[tracking]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[tracking]` section in sitefix.toml.
///
/// # Example
/// ```toml
/// [tracking]
/// id = "103602117"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct TrackingConfig {
    /// Counter identifier. Required by the `track` pass; there is no
    /// sensible default since the ID belongs to a specific account.
    #[serde(default = "defaults::tracking::id")]
    #[educe(Default = defaults::tracking::id())]
    pub id: Option<String>,
}
