// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal pattern matching and subscriptions

/// Pattern for matching signal names of the form `member:namespace`
/// Supports:
///   - Exact: "Timeout:xyz.openbmc_project.Watchdog"
///   - Single wildcard: "ThresholdAsserted:*" matches the member on any interface
///   - Category: "PropertiesChanged:**" matches all property changes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalPattern(String);

impl SignalPattern {
    pub fn new(pattern: &str) -> Self {
        Self(pattern.to_string())
    }

    /// Pattern matching one member on one namespace
    pub fn exact(member: &str, namespace: &str) -> Self {
        Self(format!("{member}:{namespace}"))
    }

    /// Pattern matching one member on any namespace
    pub fn member(member: &str) -> Self {
        Self(format!("{member}:*"))
    }

    /// Check if this pattern matches a signal name
    pub fn matches(&self, signal_name: &str) -> bool {
        // Empty pattern matches nothing
        if self.0.is_empty() {
            return false;
        }

        if self.0 == "*" || self.0 == "**" {
            return true;
        }

        let pattern_parts: Vec<&str> = self.0.split(':').collect();
        let signal_parts: Vec<&str> = signal_name.split(':').collect();

        Self::match_segments(&pattern_parts, &signal_parts)
    }

    fn match_segments(pattern: &[&str], signal: &[&str]) -> bool {
        match (pattern.first(), signal.first()) {
            (None, None) => true,
            (Some(&"**"), _) => true,
            (Some(&"*"), Some(_)) => Self::match_segments(&pattern[1..], &signal[1..]),
            (Some(p), Some(s)) if *p == *s => Self::match_segments(&pattern[1..], &signal[1..]),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Subscriber handle for unsubscribing
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub String);

/// A subscription to specific signal patterns
#[derive(Clone, Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub patterns: Vec<SignalPattern>,
    pub description: String,
}

impl Subscription {
    pub fn new(
        id: impl Into<String>,
        patterns: Vec<SignalPattern>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: SubscriberId(id.into()),
            patterns,
            description: description.into(),
        }
    }

    /// Check if any pattern matches the signal name
    pub fn matches(&self, signal_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(signal_name))
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
