//! MikroTik RouterOS platform definition.
//!
//! RouterOS writes console errors to stdout, for example:
//!
//! ```text
//! bad command name peer (line 1 column 15)
//! syntax error (line 1 column 7)
//! expected end of command (line 1 column 20)
//! ```
//!
//! The first form is what `/routing bgp peer` produces on RouterOS 7, where
//! the BGP menu was reorganised.

use crate::platform::PlatformDefinition;

/// Platform name for RouterOS.
pub const PLATFORM_NAME: &str = "routeros";

/// Create the RouterOS platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new(PLATFORM_NAME)
        .with_failure_pattern("bad command name")
        .with_failure_pattern("syntax error")
        .with_failure_pattern("expected end of command")
        .with_failure_pattern("no such item")
        .with_failure_pattern("input does not match any value")
        .with_failure_pattern("failure:")
}
