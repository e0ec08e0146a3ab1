//! Fault type taxonomy.
//!
//! Every fault type belongs to one or more nested categories:
//!
//! - service-specific: `"service-specific"` and any type starting with `*`
//! - entitlement: `"entitlement"`
//! - service: `"service"`, `"script"`, `"origin"`, `"data"`, plus every
//!   service-specific and entitlement type
//! - user-agent: `"user-agent"`, `"runtime"`
//!
//! Known types are the union of service and user-agent types. Platform
//! types are the known types minus the service-specific ones: those are
//! raised by the runtime, never by a service.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Default type of a [`Fault`](crate::Fault) built without one.
pub const SERVICE_SPECIFIC: &str = "service-specific";

/// Literal service-specific types.
pub const SERVICE_SPECIFIC_TYPES: &[&str] = &[SERVICE_SPECIFIC];

/// Entitlement types.
pub const ENTITLEMENT_TYPES: &[&str] = &["entitlement"];

/// Literal service types, excluding the nested service-specific and
/// entitlement categories.
pub const SERVICE_TYPES: &[&str] = &["service", "script", "origin", "data"];

/// User-agent types.
pub const USER_AGENT_TYPES: &[&str] = &["user-agent", "runtime"];

fn wildcard() -> Option<&'static Regex> {
    static WILDCARD: OnceLock<Option<Regex>> = OnceLock::new();
    WILDCARD.get_or_init(|| Regex::new(r"^\*").ok()).as_ref()
}

/// A fault category. Each category's sentinel string is its name, so that
/// a catch clause listing `"service"` catches every service fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Raised by a service's own logic.
    ServiceSpecific,
    /// The user lacks an entitlement.
    Entitlement,
    /// Any fault attributable to a service.
    Service,
    /// Any fault attributable to the user agent.
    UserAgent,
}

impl Category {
    /// Every category, in sentinel order.
    pub const ALL: [Category; 4] = [
        Category::ServiceSpecific,
        Category::Entitlement,
        Category::Service,
        Category::UserAgent,
    ];

    /// The sentinel string naming this category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::ServiceSpecific => SERVICE_SPECIFIC,
            Category::Entitlement => "entitlement",
            Category::Service => "service",
            Category::UserAgent => "user-agent",
        }
    }

    /// The category a sentinel string names, if any.
    #[must_use]
    pub fn from_sentinel(s: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every category `fault_type` belongs to. Empty for unknown types.
#[must_use]
pub fn classify(fault_type: &str) -> BTreeSet<Category> {
    let mut categories = BTreeSet::new();
    if is_service_specific(fault_type) {
        categories.insert(Category::ServiceSpecific);
    }
    if ENTITLEMENT_TYPES.contains(&fault_type) {
        categories.insert(Category::Entitlement);
    }
    if !categories.is_empty() || SERVICE_TYPES.contains(&fault_type) {
        categories.insert(Category::Service);
    }
    if USER_AGENT_TYPES.contains(&fault_type) {
        categories.insert(Category::UserAgent);
    }
    categories
}

/// `"service-specific"` or any type starting with `*`.
#[must_use]
pub fn is_service_specific(fault_type: &str) -> bool {
    SERVICE_SPECIFIC_TYPES.contains(&fault_type)
        || wildcard().is_some_and(|re| re.is_match(fault_type))
}

/// Member of the full taxonomy.
#[must_use]
pub fn is_known(fault_type: &str) -> bool {
    !classify(fault_type).is_empty()
}

/// Member of the platform subset: known, but not service-specific.
#[must_use]
pub fn is_platform(fault_type: &str) -> bool {
    is_known(fault_type) && !is_service_specific(fault_type)
}

/// Whether a fault of type `fault_type` is caught by a clause listing
/// `requested`. An empty list catches everything; otherwise a listed type
/// must equal the fault's type or be the sentinel of one of its categories.
#[must_use]
pub fn matches<S: AsRef<str>>(fault_type: &str, requested: &[S]) -> bool {
    if requested.is_empty() {
        return true;
    }
    let categories = classify(fault_type);
    requested.iter().map(AsRef::as_ref).any(|r| {
        r == fault_type || Category::from_sentinel(r).is_some_and(|c| categories.contains(&c))
    })
}
