// cat-manager-core/src/core/features.rs
// ============================================================================
// Module: Feature Evaluation
// Description: Per-request feature flag evaluation.
// Purpose: Gate UI affordances without process-wide mutable flag state.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`FeatureEvaluator`] answers "is this flag on for this request?" from a
//! [`FlagDescriptor`]. Evaluators are immutable and owned by whoever builds
//! the server, then passed into rendering explicitly. Every flag defaults to
//! off.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use crate::core::identifiers::AgencyId;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Flag that shows the add-kitten affordance on in-house agencies.
pub const ADD_KITTEN_FLAG: &str = "cat-display-add-kitten-button";

// ============================================================================
// SECTION: Descriptor
// ============================================================================

/// Inputs to a single flag evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDescriptor<'a> {
    /// Flag name.
    pub flag: &'a str,
    /// Requesting user.
    pub user_id: UserId,
    /// Agency the request is scoped to.
    pub agency_id: AgencyId,
}

// ============================================================================
// SECTION: Evaluator Trait
// ============================================================================

/// Feature flag evaluator.
pub trait FeatureEvaluator: Send + Sync {
    /// Returns true when the flag is on for the descriptor.
    fn enabled(&self, descriptor: &FlagDescriptor<'_>) -> bool;
}

/// Evaluator that reports every flag as off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledFeatures;

impl FeatureEvaluator for DisabledFeatures {
    fn enabled(&self, _descriptor: &FlagDescriptor<'_>) -> bool {
        false
    }
}

/// Evaluator backed by a closure.
pub struct FeaturePredicate<F> {
    /// Predicate invoked for each descriptor.
    predicate: F,
}

impl<F> FeaturePredicate<F>
where
    F: Fn(&FlagDescriptor<'_>) -> bool + Send + Sync,
{
    /// Wraps a predicate.
    pub const fn new(predicate: F) -> Self {
        Self {
            predicate,
        }
    }
}

impl<F> FeatureEvaluator for FeaturePredicate<F>
where
    F: Fn(&FlagDescriptor<'_>) -> bool + Send + Sync,
{
    fn enabled(&self, descriptor: &FlagDescriptor<'_>) -> bool {
        (self.predicate)(descriptor)
    }
}

impl<F> fmt::Debug for FeaturePredicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeaturePredicate").finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Static Flags
// ============================================================================

/// Targeting rule for one flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlagRule {
    /// Master switch.
    pub enabled: bool,
    /// Users the flag is limited to (empty means all users).
    pub users: BTreeSet<UserId>,
    /// Agencies the flag is limited to (empty means all agencies).
    pub agencies: BTreeSet<AgencyId>,
}

impl FlagRule {
    /// Returns a rule that is on for everyone.
    #[must_use]
    pub fn on() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Returns true when the rule matches the descriptor.
    #[must_use]
    pub fn matches(&self, descriptor: &FlagDescriptor<'_>) -> bool {
        self.enabled
            && (self.users.is_empty() || self.users.contains(&descriptor.user_id))
            && (self.agencies.is_empty() || self.agencies.contains(&descriptor.agency_id))
    }
}

/// Evaluator built from a fixed table of flag rules.
#[derive(Debug, Clone, Default)]
pub struct StaticFeatureFlags {
    /// Rules keyed by flag name.
    rules: BTreeMap<String, FlagRule>,
}

impl StaticFeatureFlags {
    /// Creates an empty table (every flag off).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a rule.
    #[must_use]
    pub fn with_rule(mut self, flag: impl Into<String>, rule: FlagRule) -> Self {
        self.rules.insert(flag.into(), rule);
        self
    }

    /// Returns a table with exactly one flag on for everyone.
    #[must_use]
    pub fn only(flag: impl Into<String>) -> Self {
        Self::new().with_rule(flag, FlagRule::on())
    }
}

impl FeatureEvaluator for StaticFeatureFlags {
    fn enabled(&self, descriptor: &FlagDescriptor<'_>) -> bool {
        self.rules.get(descriptor.flag).is_some_and(|rule| rule.matches(descriptor))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
