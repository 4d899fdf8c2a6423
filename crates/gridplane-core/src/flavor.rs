//! Browser flavor registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A browser flavor served by a dedicated node service.
///
/// Each flavor maps to exactly one node container image; the mapping is
/// total, so a flavor can never be registered without an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserFlavor {
    Chrome,
    Firefox,
}

impl BrowserFlavor {
    /// Service identifier used in resource names.
    pub fn identifier(&self) -> &'static str {
        match self {
            BrowserFlavor::Chrome => "chrome",
            BrowserFlavor::Firefox => "firefox",
        }
    }

    /// Node container image for this flavor (untagged).
    pub fn node_image(&self) -> &'static str {
        match self {
            BrowserFlavor::Chrome => "selenium/node-chrome",
            BrowserFlavor::Firefox => "selenium/node-firefox",
        }
    }

    /// The default flavor registry.
    pub fn default_registry() -> Vec<BrowserFlavor> {
        vec![BrowserFlavor::Chrome, BrowserFlavor::Firefox]
    }
}

impl fmt::Display for BrowserFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_mapping_is_total() {
        for flavor in BrowserFlavor::default_registry() {
            assert!(flavor.node_image().starts_with("selenium/node-"));
        }
    }

    #[test]
    fn parses_from_snake_case() {
        let flavor: BrowserFlavor = serde_json::from_str("\"chrome\"").unwrap();
        assert_eq!(flavor, BrowserFlavor::Chrome);
    }
}
