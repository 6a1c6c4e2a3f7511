//! General application configuration.

use serde::{Deserialize, Serialize};
use tare_core::Units;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Unit system used when reporting weights in log output.
    #[serde(default)]
    pub units: Units,
}
