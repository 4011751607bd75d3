//! Selector matching
//!
//! A compact CSS-like selector language over element trees:
//! - tokens separated by runs of spaces or tabs
//! - a bare token matches an element name, case-insensitively
//! - `#xxx` matches an element whose `id` attribute equals `xxx` exactly
//! - `>` marks a direct-child combinator; any other adjacency means
//!   "descendant"
//!
//! Matching is anchored: for each candidate element discovered by a
//! pre-order walk, tokens are consumed right-to-left while walking up the
//! candidate's ancestor chain. A mismatch under a direct-child combinator
//! rejects the candidate; a mismatch under a descendant combinator just
//! moves up one ancestor and retries.
//!
//! Compiled selectors are kept in a process-wide LRU cache keyed by the
//! selector string.

use super::set::{local_name, NodeSet};
use crate::dom::{NodeId, XmlDocument};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock};

const CACHE_CAPACITY: usize = 64;

/// One selector token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Element-name matcher, compared case-insensitively
    Name(String),
    /// Id matcher (`#xxx`), compared exactly against the `id` attribute
    Id(String),
    /// Direct-child combinator (`>`)
    Child,
}

/// A compiled selector: the token list, reversed so matching starts at the
/// innermost token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tokens: Vec<Token>,
}

impl Selector {
    /// Compile a selector string
    pub fn parse(selector: &str) -> Selector {
        let mut tokens: Vec<Token> = selector
            .split([' ', '\t'])
            .filter(|t| !t.is_empty())
            .map(|t| match t {
                ">" => Token::Child,
                _ if t.starts_with('#') => Token::Id(t[1..].to_string()),
                _ => Token::Name(t.to_string()),
            })
            .collect();
        tokens.reverse();
        Selector { tokens }
    }

    /// Compile via the process-wide cache
    pub fn compile_cached(selector: &str) -> Selector {
        let cache = selector_cache();
        if let Ok(mut cache) = cache.lock() {
            if let Some(compiled) = cache.get(selector) {
                return compiled.clone();
            }
            let compiled = Selector::parse(selector);
            cache.put(selector.to_string(), compiled.clone());
            return compiled;
        }
        Selector::parse(selector)
    }

    /// Check whether a candidate element matches, walking its ancestor
    /// chain while consuming tokens
    pub fn matches(&self, doc: &XmlDocument, candidate: NodeId) -> bool {
        if self.tokens.is_empty() {
            return false;
        }

        let mut current = Some(candidate);
        let mut pos = 0;
        let mut exact = true;

        while let Some(id) = current {
            let matched = match &self.tokens[pos] {
                Token::Id(want) => doc.get_attribute(id, "id") == Some(want.as_str()),
                Token::Name(want) => doc
                    .node_name(id)
                    .is_some_and(|name| local_name(name).eq_ignore_ascii_case(want)),
                // Child tokens are consumed after a match, never compared
                Token::Child => false,
            };

            if matched {
                pos += 1;
                if pos >= self.tokens.len() {
                    return true;
                }
                if self.tokens[pos] == Token::Child {
                    pos += 1;
                    // A trailing Child in the reversed list means the
                    // selector began with '>'; nothing can satisfy it
                    if pos >= self.tokens.len() {
                        return false;
                    }
                    exact = true;
                } else {
                    exact = false;
                }
            } else if exact {
                return false;
            }

            current = doc.get_node(id).and_then(|n| n.parent);
        }

        false
    }

    /// Search the subtrees of every member of the input set, pre-order, and
    /// collect matching elements. The input elements themselves are
    /// candidates too.
    pub fn find(&self, doc: &XmlDocument, set: &NodeSet) -> NodeSet {
        find_matching(doc, set, |doc, id| self.matches(doc, id))
    }
}

/// Pre-order search over the input set's subtrees with an arbitrary
/// element test
pub fn find_matching(
    doc: &XmlDocument,
    set: &NodeSet,
    test: impl Fn(&XmlDocument, NodeId) -> bool,
) -> NodeSet {
    let mut results = Vec::new();
    for member in set.iter() {
        search_subtree(doc, member, &test, &mut results);
    }
    NodeSet::new(results)
}

fn search_subtree(
    doc: &XmlDocument,
    node: NodeId,
    test: &impl Fn(&XmlDocument, NodeId) -> bool,
    results: &mut Vec<NodeId>,
) {
    let is_element = doc.get_node(node).is_some_and(|n| n.is_element());
    if !is_element {
        return;
    }
    if test(doc, node) {
        results.push(node);
    }
    for child in doc.children(node) {
        search_subtree(doc, child, test, results);
    }
}

fn selector_cache() -> &'static Mutex<LruCache<String, Selector>> {
    static CACHE: OnceLock<Mutex<LruCache<String, Selector>>> = OnceLock::new();
    CACHE.get_or_init(|| {
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Mutex::new(LruCache::new(capacity))
    })
}
