//! Namespace scopes.
//!
//! A scope is an immutable link in a chain running from the element being
//! processed up to the document root. Walking a tree means deriving a child
//! scope with [`NamespaceScope::push`] and handing it to the recursive call;
//! the parent scope is restored simply by returning.

use indexmap::IndexMap;

use crate::node::Element;

/// Namespace permanently bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Fallback prefix when no usable candidate is supplied.
const FALLBACK_PREFIX: &str = "ns";

/// Splits a qualified name into its prefix (empty when absent) and local part.
#[must_use]
pub fn split_qname(qname: &str) -> (&str, &str) {
    qname.split_once(':').unwrap_or(("", qname))
}

/// The local part of a qualified name.
#[must_use]
pub fn local_name(qname: &str) -> &str {
    split_qname(qname).1
}

/// Builds `prefix:local`, or just `local` for the empty prefix.
#[must_use]
pub fn qualified_name(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_owned()
    } else {
        format!("{prefix}:{local}")
    }
}

/// The attribute name declaring `prefix`: `xmlns` or `xmlns:prefix`.
#[must_use]
pub fn xmlns_attribute(prefix: &str) -> String {
    if prefix.is_empty() {
        "xmlns".to_owned()
    } else {
        format!("xmlns:{prefix}")
    }
}

/// The prefix declared by an attribute name, if it is a namespace declaration.
fn declared_prefix(attribute: &str) -> Option<&str> {
    match attribute {
        "xmlns" => Some(""),
        _ => attribute.strip_prefix("xmlns:"),
    }
}

/// Outcome of [`NamespaceScope::prefix_for`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixBinding {
    /// The namespace is already bound to this prefix in scope.
    Bound(String),
    /// No prefix is bound; this unused one should be declared.
    Fresh(String),
}

impl PrefixBinding {
    /// The prefix, whether bound or fresh.
    #[must_use]
    pub fn prefix(&self) -> &str {
        match self {
            PrefixBinding::Bound(p) | PrefixBinding::Fresh(p) => p,
        }
    }
}

/// Prefix to namespace bindings declared on one element, linked to the
/// bindings of its ancestors.
#[derive(Debug, Clone, Default)]
pub struct NamespaceScope<'p> {
    bindings: IndexMap<String, String>,
    parent: Option<&'p NamespaceScope<'p>>,
}

impl<'p> NamespaceScope<'p> {
    /// An empty scope with no ancestors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A child scope recording every `xmlns` / `xmlns:prefix` attribute of `element`.
    #[must_use]
    pub fn push(&'p self, element: &Element) -> NamespaceScope<'p> {
        let bindings = element
            .attributes
            .iter()
            .filter_map(|(name, uri)| Some((declared_prefix(name)?.to_owned(), uri.clone())))
            .collect();
        NamespaceScope {
            bindings,
            parent: Some(self),
        }
    }

    /// A child scope with a single binding.
    #[must_use]
    pub fn bind(&'p self, prefix: &str, uri: &str) -> NamespaceScope<'p> {
        let mut bindings = IndexMap::new();
        bindings.insert(prefix.to_owned(), uri.to_owned());
        NamespaceScope {
            bindings,
            parent: Some(self),
        }
    }

    /// Scopes from innermost to outermost.
    fn chain(&self) -> impl Iterator<Item = &NamespaceScope<'p>> {
        std::iter::successors(Some(self), |scope| scope.parent)
    }

    /// The innermost binding of `prefix`.
    #[must_use]
    pub fn lookup(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        self.chain()
            .find_map(|scope| scope.bindings.get(prefix))
            .map(String::as_str)
    }

    /// Resolves the namespace of a qualified element name. An unprefixed
    /// name resolves through the default namespace.
    #[must_use]
    pub fn find_namespace(&self, qname: &str) -> Option<&str> {
        self.lookup(split_qname(qname).0)
    }

    /// The shortest prefix currently bound to `uri`. Prefixes shadowed by an
    /// inner rebinding do not count.
    #[must_use]
    pub fn bound_prefix(&self, uri: &str) -> Option<&str> {
        self.chain()
            .flat_map(|scope| scope.bindings.iter())
            .filter(|(prefix, bound)| *bound == uri && self.lookup(prefix) == Some(uri))
            .map(|(prefix, _)| prefix.as_str())
            .min_by_key(|prefix| prefix.len())
    }

    fn is_declared(&self, prefix: &str) -> bool {
        self.chain().any(|scope| scope.bindings.contains_key(prefix))
    }

    /// Chooses a prefix for `uri`: an already bound one when possible,
    /// otherwise the first candidate (lowercase ASCII letters only, else
    /// `ns`) that is not declared anywhere in scope, retrying all candidates
    /// with suffixes 1, 2, ... until one is free.
    #[must_use]
    pub fn prefix_for(&self, uri: &str, candidates: &[&str]) -> PrefixBinding {
        if let Some(prefix) = self.bound_prefix(uri) {
            return PrefixBinding::Bound(prefix.to_owned());
        }
        let usable: Vec<&str> = if candidates.is_empty() {
            vec![FALLBACK_PREFIX]
        } else {
            candidates
                .iter()
                .map(|c| {
                    if !c.is_empty() && c.bytes().all(|b| b.is_ascii_lowercase()) {
                        *c
                    } else {
                        FALLBACK_PREFIX
                    }
                })
                .collect()
        };
        (0u32..)
            .flat_map(|n| {
                usable.iter().map(move |c| {
                    if n == 0 {
                        (*c).to_owned()
                    } else {
                        format!("{c}{n}")
                    }
                })
            })
            .find(|p| !self.is_declared(p))
            .map_or_else(|| PrefixBinding::Fresh(FALLBACK_PREFIX.to_owned()), PrefixBinding::Fresh)
    }
}
