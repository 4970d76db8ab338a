//! Per-category debug logging for requests and responses.
//!
//! Events are emitted through `tracing` at `DEBUG` level under the `restreq`
//! target, so a subscriber must be installed (and allow that level) for them
//! to show up. The flags decide which categories a given request emits.

use bitflags::bitflags;

pub(crate) const TARGET: &str = "restreq";

bitflags! {
    /// Categories of request/response detail to log.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DebugFlags: u32 {
        const REQ_BODY = 1 << 0;
        const REQ_HEADERS = 1 << 1;
        const REQ_COOKIES = 1 << 2;
        const RESP_BODY = 1 << 3;
        const RESP_HEADERS = 1 << 4;
        const RESP_COOKIES = 1 << 5;

        const REQUEST = Self::REQ_BODY.bits() | Self::REQ_HEADERS.bits() | Self::REQ_COOKIES.bits();
        const RESPONSE = Self::RESP_BODY.bits() | Self::RESP_HEADERS.bits() | Self::RESP_COOKIES.bits();
        const ALL = Self::REQUEST.bits() | Self::RESPONSE.bits();
    }
}

impl DebugFlags {
    /// Emit `message` if `category` is enabled. Returns whether it was.
    pub(crate) fn log(self, category: DebugFlags, message: impl FnOnce() -> String) -> bool {
        if !self.contains(category) {
            return false;
        }
        tracing::debug!(target: TARGET, "{}", message());
        true
    }
}
