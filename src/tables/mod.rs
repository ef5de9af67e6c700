// RuleTable trait and implementations

pub mod postgres_mysql;

use crate::dialect::Dialect;
use crate::rule::RuleSet;

/// Trait for the rule table that converts one dialect's dumps into another's
pub trait RuleTable: Send + Sync {
    /// Dialect the input dump is written in
    fn source(&self) -> Dialect;

    /// Dialect the output dump targets
    fn target(&self) -> Dialect;

    /// Build the ordered rule set for this dialect pair
    fn rule_set(&self) -> RuleSet;
}
