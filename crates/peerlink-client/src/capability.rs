//! Transport capability detection
//!
//! Reports which real-time transport implementation the runtime
//! exposes. The environment cannot change underneath a running process,
//! so detection runs once and the answer is cached for the process
//! lifetime; session negotiation reads the cached value.

use std::sync::OnceLock;

use tracing::debug;

/// Peer-connection constructor symbols, probed in order of preference
const STANDARD_SYMBOL: &str = "RTCPeerConnection";
const WEBKIT_SYMBOL: &str = "webkitRTCPeerConnection";
const MOZ_SYMBOL: &str = "mozRTCPeerConnection";

/// Environment override consulted by [`detect`]
const BACKEND_ENV: &str = "PEERLINK_RTC_BACKEND";

/// Which peer-connection implementation is available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcSupport {
    /// Unprefixed standard implementation
    Standard,
    /// Chrome/WebKit-prefixed implementation
    Webkit,
    /// Firefox-prefixed implementation
    Moz,
    /// No real-time transport available
    Unsupported,
}

impl RtcSupport {
    pub fn is_supported(&self) -> bool {
        !matches!(self, RtcSupport::Unsupported)
    }
}

/// Classify support from an injected symbol probe
///
/// The probe answers whether the embedding runtime exposes a given
/// constructor symbol. Standard wins over prefixed implementations.
pub fn detect_with<F>(has_symbol: F) -> RtcSupport
where
    F: Fn(&str) -> bool,
{
    if has_symbol(STANDARD_SYMBOL) {
        RtcSupport::Standard
    } else if has_symbol(WEBKIT_SYMBOL) {
        RtcSupport::Webkit
    } else if has_symbol(MOZ_SYMBOL) {
        RtcSupport::Moz
    } else {
        RtcSupport::Unsupported
    }
}

/// Detect once and cache for the process lifetime
///
/// The embedding runtime can force a result through the
/// `PEERLINK_RTC_BACKEND` environment variable (`standard`, `webkit`,
/// `moz`, `none`); otherwise the answer follows the compiled-in
/// `webrtc` feature.
pub fn detect() -> RtcSupport {
    static DETECTED: OnceLock<RtcSupport> = OnceLock::new();
    *DETECTED.get_or_init(|| {
        let support = match std::env::var(BACKEND_ENV).ok().as_deref() {
            Some("standard") => RtcSupport::Standard,
            Some("webkit") => RtcSupport::Webkit,
            Some("moz") => RtcSupport::Moz,
            Some("none") => RtcSupport::Unsupported,
            Some(other) => {
                debug!(value = other, "unrecognized backend override, probing normally");
                default_support()
            }
            None => default_support(),
        };
        debug!(?support, "transport capability detected");
        support
    })
}

fn default_support() -> RtcSupport {
    if cfg!(feature = "webrtc") {
        RtcSupport::Standard
    } else {
        RtcSupport::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_preferred() {
        let support = detect_with(|_| true);
        assert_eq!(support, RtcSupport::Standard);
    }

    #[test]
    fn test_prefixed_fallbacks() {
        let support = detect_with(|symbol| symbol == WEBKIT_SYMBOL);
        assert_eq!(support, RtcSupport::Webkit);

        let support = detect_with(|symbol| symbol == MOZ_SYMBOL);
        assert_eq!(support, RtcSupport::Moz);
    }

    #[test]
    fn test_nothing_available() {
        let support = detect_with(|_| false);
        assert_eq!(support, RtcSupport::Unsupported);
        assert!(!support.is_supported());
    }

    #[test]
    fn test_detect_is_stable() {
        // cached for the process lifetime
        assert_eq!(detect(), detect());
    }
}
