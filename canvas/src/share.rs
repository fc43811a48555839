//! Sharing collaborator contract.
//!
//! The core hands a finished [`ExportedImage`] to a [`ShareTarget`] and gets
//! back a [`ShareOutcome`]. Outcomes separate what the user should hear about
//! from what only goes to the log:
//!
//! - user cancellation is silent,
//! - an absent share surface is logged and otherwise ignored,
//! - a security or permission restriction is surfaced as a notice.

#[cfg(test)]
#[path = "share_test.rs"]
mod share_test;

use log::{debug, info, warn};

use crate::export::ExportedImage;

/// Result of handing an image to the sharing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The image was shared or saved.
    Shared,
    /// The user dismissed the share surface.
    Cancelled,
    /// No share surface exists in this environment.
    Unavailable,
    /// The environment refused for security or permission reasons.
    Restricted(String),
    /// Any other failure.
    Failed(String),
}

impl ShareOutcome {
    /// Classify a DOM exception name reported by the browser share call.
    ///
    /// `None` means the call resolved successfully.
    #[must_use]
    pub fn from_dom_error(name: Option<&str>, message: &str) -> Self {
        match name {
            None => Self::Shared,
            Some("AbortError") => Self::Cancelled,
            Some("NotAllowedError" | "SecurityError") => Self::Restricted(message.to_owned()),
            Some("NotSupportedError" | "TypeError") => Self::Unavailable,
            Some(other) => Self::Failed(format!("{other}: {message}")),
        }
    }

    /// Text to show the user, if this outcome warrants a notice.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Restricted(reason) => Some(format!("Sharing is blocked here: {reason}")),
            Self::Shared | Self::Cancelled | Self::Unavailable | Self::Failed(_) => None,
        }
    }

    /// Write this outcome to the log at the appropriate level.
    pub fn log(&self, filename: &str) {
        match self {
            Self::Shared => info!("shared {filename}"),
            Self::Cancelled => debug!("share of {filename} cancelled by user"),
            Self::Unavailable => info!("no share surface available for {filename}"),
            Self::Restricted(reason) => warn!("share of {filename} restricted: {reason}"),
            Self::Failed(reason) => warn!("share of {filename} failed: {reason}"),
        }
    }
}

/// A destination for exported images.
pub trait ShareTarget {
    /// Deliver `image`. Implementations must not panic; every failure is an outcome.
    fn share(&mut self, image: &ExportedImage) -> ShareOutcome;
}
