// nfchal/src/hal/guard.rs

use std::ops::Deref;

use super::handle::{NfcHal, Ready};

/// Scoped exclusive access; releases the controller when dropped.
pub struct HalGuard<'a> {
    hal: &'a NfcHal<Ready>,
}

impl<'a> HalGuard<'a> {
    pub(crate) fn new(hal: &'a NfcHal<Ready>) -> Self {
        Self { hal }
    }
}

impl Deref for HalGuard<'_> {
    type Target = NfcHal<Ready>;

    fn deref(&self) -> &Self::Target {
        self.hal
    }
}

impl Drop for HalGuard<'_> {
    fn drop(&mut self) {
        self.hal.release();
    }
}
