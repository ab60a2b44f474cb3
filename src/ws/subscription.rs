//! Per-connection subscription manager.
//!
//! Tracks which regions a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::HashSet;

use crate::domain::Region;

/// Region codes from a command, split into what parsed and what did not.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RegionSelection {
    /// Recognized regions, in request order without repeats.
    pub regions: Vec<Region>,
    /// Whether `"*"` was present.
    pub wildcard: bool,
    /// Codes outside the allow-list.
    pub rejected: Vec<String>,
}

impl RegionSelection {
    /// Parses a list of region codes; `"*"` selects every region.
    #[must_use]
    pub fn parse(codes: &[String]) -> Self {
        let mut selection = Self::default();
        for code in codes {
            if code.trim() == "*" {
                selection.wildcard = true;
            } else if let Ok(region) = code.parse::<Region>() {
                if !selection.regions.contains(&region) {
                    selection.regions.push(region);
                }
            } else {
                selection.rejected.push(code.clone());
            }
        }
        selection
    }
}

/// Manages the set of region subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed regions. If `subscribe_all` is true, this set is ignored.
    regions: HashSet<Region>,
    /// Whether the client subscribes to all regions (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds regions to the subscription set. `wildcard` enables all regions.
    pub fn subscribe(&mut self, regions: &[Region], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.regions.extend(regions.iter().copied());
    }

    /// Removes regions from the subscription set. `wildcard` clears the
    /// wildcard subscription.
    pub fn unsubscribe(&mut self, regions: &[Region], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for region in regions {
            self.regions.remove(region);
        }
    }

    /// Returns `true` if events for `region` should be forwarded.
    #[must_use]
    pub fn matches(&self, region: Region) -> bool {
        self.subscribe_all || self.regions.contains(&region)
    }

    /// Returns the number of explicitly subscribed regions.
    #[must_use]
    pub fn count(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
