//! Query and mutation engine
//!
//! - Set: the NodeSet value type and its contract methods
//! - Axes: navigation axes (first/last/nth/prev/next/parent/root/children/
//!   random/siblings)
//! - Selector: the mini-language for descendant/child/id matching
//! - Dispatch: the case-insensitive operation entry point

pub mod axes;
pub mod dispatch;
pub mod selector;
pub mod set;

pub use axes::Axis;
pub use dispatch::{invoke, Arg, Value};
pub use selector::Selector;
pub use set::NodeSet;
