//! Operation dispatch
//!
//! The single entry point for set-level operations: an operation name
//! (case-insensitive) plus an ordered argument list is validated for
//! arity and argument types, then routed to the set contract methods,
//! axis resolution, or selector search. Unknown names and unsupported
//! name/arity combinations fail with one uniform error kind.

use super::axes::{self, Axis};
use super::selector::{find_matching, Selector};
use super::set::NodeSet;
use crate::dom::XmlDocument;
use crate::error::QueryError;
use std::collections::HashMap;

/// Predicate over a single-element set view
pub type Predicate<'a> = Box<dyn Fn(&XmlDocument, &NodeSet) -> bool + 'a>;
/// Projection over a single-element set view; None results are dropped
pub type Projection<'a> = Box<dyn Fn(&XmlDocument, &NodeSet) -> Option<Value> + 'a>;
/// Key extractor for map projections
pub type KeyExtractor<'a> = Box<dyn Fn(&XmlDocument, &NodeSet) -> String + 'a>;
/// Side-effecting action over a single-element set view
pub type Action<'a> = Box<dyn Fn(&XmlDocument, &NodeSet) + 'a>;

/// An operation argument
pub enum Arg<'a> {
    /// Explicit null (absent value)
    Null,
    Str(String),
    Int(i64),
    Set(NodeSet),
    Pred(Predicate<'a>),
    Func(Projection<'a>),
    Key(KeyExtractor<'a>),
    Action(Action<'a>),
}

impl Arg<'_> {
    /// Convenience constructor for string arguments
    pub fn str(s: impl Into<String>) -> Self {
        Arg::Str(s.into())
    }
}

/// An operation result
#[derive(Debug, PartialEq)]
pub enum Value {
    Set(NodeSet),
    Bool(bool),
    Int(i64),
    Str(String),
    Map(HashMap<String, NodeSet>),
    List(Vec<Value>),
    Unit,
}

impl Value {
    /// The node set inside, or None for scalar results
    pub fn into_set(self) -> Option<NodeSet> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// The boolean inside, or None
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer inside, or None
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The string inside, or None
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Dispatch an operation against a node set.
///
/// `doc` is mutable because the `attr` and `val` setters write through to
/// the referenced nodes; read-only operations never touch it.
pub fn invoke(
    doc: &mut XmlDocument,
    set: &NodeSet,
    name: &str,
    args: Vec<Arg<'_>>,
) -> Result<Value, QueryError> {
    let op = name.to_ascii_lowercase();
    let argc = args.len();

    match op.as_str() {
        // Recursive dispatch: first argument names the real operation
        "invoke" => {
            let mut rest = args.into_iter();
            match rest.next() {
                Some(Arg::Str(func)) => invoke(doc, set, &func, rest.collect()),
                _ => Err(QueryError::unsupported(&op, argc)),
            }
        }

        "equals" | "eq" => match args.as_slice() {
            [Arg::Set(other)] => Ok(Value::Bool(set == other)),
            [_] => Ok(Value::Bool(false)),
            _ => Err(QueryError::unsupported(&op, argc)),
        },

        "index" => Ok(Value::Int(set.index(doc))),
        "length" | "count" => Ok(Value::Int(set.count() as i64)),
        "name" | "n" => Ok(Value::Str(set.name(doc))),
        "path" => Ok(Value::Str(set.path(doc))),
        "any" => Ok(Value::Bool(set.any())),
        "empty" => Ok(Value::Bool(set.is_empty())),

        "first" | "last" | "nth" | "prev" | "next" | "parent" | "root" | "children"
        | "random" | "siblings" => dispatch_axis(doc, set, &op, &args),

        "attr" => dispatch_attr(doc, set, &op, &args),

        "each" => match args.as_slice() {
            [Arg::Action(action)] => {
                for node in set.iter() {
                    action(doc, &NodeSet::from_node(node));
                }
                Ok(Value::Unit)
            }
            _ => Err(QueryError::unsupported(&op, argc)),
        },

        "where" | "filter" => match args.as_slice() {
            // A predicate filters the set member by member, same level
            [Arg::Pred(pred)] => {
                let filtered: Vec<_> = set
                    .iter()
                    .filter(|&node| pred(doc, &NodeSet::from_node(node)))
                    .collect();
                Ok(Value::Set(NodeSet::new(filtered)))
            }
            // A string is a full selector search over the subtrees
            [Arg::Str(selector)] => Ok(Value::Set(run_selector(doc, set, selector))),
            _ => Err(QueryError::unsupported(&op, argc)),
        },

        "val" | "value" | "text" | "v" => match args.as_slice() {
            [] => Ok(Value::Str(set.value(doc))),
            [arg] => {
                let text = match arg {
                    Arg::Str(s) => s.clone(),
                    Arg::Int(i) => i.to_string(),
                    Arg::Null => String::new(),
                    _ => return Err(QueryError::unsupported(&op, argc)),
                };
                set.set_value(doc, &text);
                Ok(Value::Unit)
            }
            _ => Err(QueryError::unsupported(&op, argc)),
        },

        "map" | "todictionary" | "todict" => match args.as_slice() {
            [Arg::Key(key_of)] => {
                let mut map = HashMap::with_capacity(set.count());
                for node in set.iter() {
                    let view = NodeSet::from_node(node);
                    let key = key_of(doc, &view);
                    if map.insert(key.clone(), view).is_some() {
                        return Err(QueryError::DuplicateKey(key));
                    }
                }
                Ok(Value::Map(map))
            }
            _ => Err(QueryError::unsupported(&op, argc)),
        },

        "select" | "project" => match args.as_slice() {
            [Arg::Func(project)] => {
                let results: Vec<_> = set
                    .iter()
                    .filter_map(|node| project(doc, &NodeSet::from_node(node)))
                    .collect();
                Ok(Value::List(results))
            }
            _ => Err(QueryError::unsupported(&op, argc)),
        },

        "find" | "lookup" => match args.as_slice() {
            [Arg::Pred(pred)] => Ok(Value::Set(find_matching(doc, set, |doc, id| {
                pred(doc, &NodeSet::from_node(id))
            }))),
            [Arg::Str(selector)] => Ok(Value::Set(run_selector(doc, set, selector))),
            _ => Err(QueryError::unsupported(&op, argc)),
        },

        _ => Err(QueryError::unsupported(&op, argc)),
    }
}

fn dispatch_axis(
    doc: &XmlDocument,
    set: &NodeSet,
    op: &str,
    args: &[Arg<'_>],
) -> Result<Value, QueryError> {
    // nth takes exactly one integer; children takes zero or one; every
    // other axis takes none
    let pos = match (op, args) {
        ("nth", [Arg::Int(pos)]) => Some(*pos),
        ("children", [Arg::Int(pos)]) => Some(*pos),
        ("children", []) => None,
        ("nth", _) | ("children", _) => {
            return Err(QueryError::unsupported(op, args.len()));
        }
        (_, []) => None,
        _ => return Err(QueryError::unsupported(op, args.len())),
    };

    // Names outside the axis vocabulary never reach this point
    let axis = Axis::parse(op).ok_or_else(|| QueryError::unsupported(op, args.len()))?;
    axes::resolve(doc, set, axis, pos).map(Value::Set)
}

fn dispatch_attr(
    doc: &mut XmlDocument,
    set: &NodeSet,
    op: &str,
    args: &[Arg<'_>],
) -> Result<Value, QueryError> {
    match args {
        [name_arg] | [name_arg, _] => {
            let name = match name_arg {
                Arg::Str(name) => name,
                Arg::Null => {
                    return Err(QueryError::MissingArgument("attribute name".into()));
                }
                _ => return Err(QueryError::InvalidArgument("attribute name".into())),
            };
            match args {
                [_] => set.attr(doc, name).map(Value::Str),
                [_, value_arg] => {
                    let value = match value_arg {
                        Arg::Str(value) => Some(value.clone()),
                        Arg::Int(value) => Some(value.to_string()),
                        Arg::Null => None,
                        _ => {
                            return Err(QueryError::InvalidArgument("attribute value".into()));
                        }
                    };
                    set.set_attr(doc, name, value.as_deref())?;
                    // Echo the input set for chaining
                    Ok(Value::Set(set.clone()))
                }
                _ => Err(QueryError::unsupported(op, args.len())),
            }
        }
        _ => Err(QueryError::unsupported(op, args.len())),
    }
}

fn run_selector(doc: &XmlDocument, set: &NodeSet, selector: &str) -> NodeSet {
    if selector.trim().is_empty() {
        return NodeSet::empty();
    }
    Selector::compile_cached(selector).find(doc, set)
}
