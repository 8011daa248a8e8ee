// nfchal/src/hal/builder.rs

use super::handle::{NfcHal, Ready, Uninitialized};
use crate::config::HalConfig;
use crate::platform::Platform;
use crate::{Error, Result};

/// Helper to construct an [`NfcHal`] with optional configuration.
#[derive(Debug, Default)]
pub struct NfcHalBuilder {
    platform: Option<Platform>,
    config: HalConfig,
}

impl NfcHalBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board services the controller will own.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_config(mut self, config: HalConfig) -> Self {
        self.config = config;
        self
    }

    /// Consume the builder without touching the chip.
    /// Requires a platform; otherwise returns `Communication`.
    pub fn build_uninitialized(self) -> Result<NfcHal<Uninitialized>> {
        match self.platform {
            Some(p) => Ok(NfcHal::new(p, self.config)),
            None => Err(Error::Communication),
        }
    }

    /// Build and run bring-up.
    pub fn build(self) -> Result<NfcHal<Ready>> {
        self.build_uninitialized()?.init()
    }
}
