//! Parsed rule trees
//!
//! A rule string parses into a binary tree of `&` / `|` combinators over
//! rule calls. Calls hold the rule function they resolved to at parse time,
//! so evaluation never consults the registry.

use std::fmt;

use smallvec::SmallVec;

use crate::registry::RuleFn;

/// Ordered rule parameters in their literal form (quotes kept)
pub type Params = SmallVec<[String; 2]>;

/// Logical operator joining two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `&`: both sides must pass
    And,
    /// `|`: either side must pass
    Or,
}

impl Operator {
    /// Source character for this operator
    pub fn symbol(&self) -> char {
        match self {
            Self::And => '&',
            Self::Or => '|',
        }
    }

    /// Build a node joining `left` and `right` with this operator
    pub fn join(self, left: Node, right: Node) -> Node {
        match self {
            Self::And => Node::And(Box::new(left), Box::new(right)),
            Self::Or => Node::Or(Box::new(left), Box::new(right)),
        }
    }
}

/// A node of a parsed rule tree
///
/// Combinators always carry both operands; the parser rejects input that
/// would leave one missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Left then right; fails on the first failure
    And(Box<Node>, Box<Node>),
    /// Left, then right only if left failed
    Or(Box<Node>, Box<Node>),
    /// A rule function call
    Rule(RuleCall),
}

impl Node {
    /// Number of rule calls in this subtree
    pub fn rule_count(&self) -> usize {
        match self {
            Self::And(left, right) | Self::Or(left, right) => {
                left.rule_count() + right.rule_count()
            }
            Self::Rule(_) => 1,
        }
    }

    /// Rule calls in evaluation order
    pub fn calls(&self) -> Vec<&RuleCall> {
        let mut out = Vec::new();
        self.collect_calls(&mut out);
        out
    }

    fn collect_calls<'a>(&'a self, out: &mut Vec<&'a RuleCall>) {
        match self {
            Self::And(left, right) | Self::Or(left, right) => {
                left.collect_calls(out);
                right.collect_calls(out);
            }
            Self::Rule(call) => out.push(call),
        }
    }
}

/// Structural rendering with explicit grouping, e.g. `((a & b) | eq:1,2)`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(left, right) => write!(f, "({left} & {right})"),
            Self::Or(left, right) => write!(f, "({left} | {right})"),
            Self::Rule(call) => write!(f, "{call}"),
        }
    }
}

/// A resolved rule call: name, parameters and the function to run
#[derive(Clone)]
pub struct RuleCall {
    name: String,
    params: Params,
    rule: RuleFn,
}

impl RuleCall {
    /// Create a rule call
    pub fn new(name: impl Into<String>, params: Params, rule: RuleFn) -> Self {
        Self {
            name: name.into(),
            params,
            rule,
        }
    }

    /// Rule name as written
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in their literal form
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// The resolved rule function
    pub fn rule(&self) -> &RuleFn {
        &self.rule
    }
}

impl fmt::Debug for RuleCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleCall")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

/// Calls compare by name and parameters. Two parses of the same text under
/// the same registry resolve to the same function.
impl PartialEq for RuleCall {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl fmt::Display for RuleCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.params.is_empty() {
            write!(f, ":{}", self.params.join(","))?;
        }
        Ok(())
    }
}

/// The parse of one rule string
///
/// An empty rule string parses to a tree without a root, which always passes.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTree {
    source: String,
    root: Option<Node>,
}

impl RuleTree {
    /// Create a tree for `source`
    pub fn new(source: impl Into<String>, root: Option<Node>) -> Self {
        Self {
            source: source.into(),
            root,
        }
    }

    /// The rule text this tree was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root node, absent for an empty rule
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Check if the rule text contained no rules
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of rule calls in the tree
    pub fn rule_count(&self) -> usize {
        self.root.as_ref().map_or(0, Node::rule_count)
    }
}

impl fmt::Display for RuleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(node) => write!(f, "{node}"),
            None => f.write_str("<empty>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::rule_fn;

    fn call(name: &str, params: &[&str]) -> Node {
        Node::Rule(RuleCall::new(
            name,
            params.iter().map(|p| (*p).to_string()).collect(),
            rule_fn(|_| Ok(())),
        ))
    }

    #[test]
    fn test_display_groups_explicitly() {
        let tree = Operator::Or.join(
            Operator::And.join(call("a", &[]), call("b", &[])),
            call("eq", &["1", "'x'"]),
        );
        assert_eq!(tree.to_string(), "((a & b) | eq:1,'x')");
    }

    #[test]
    fn test_rule_count_and_call_order() {
        let tree = Operator::And.join(
            call("a", &[]),
            Operator::Or.join(call("b", &[]), call("c", &[])),
        );
        assert_eq!(tree.rule_count(), 3);
        let names: Vec<_> = tree.calls().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_calls_compare_structurally() {
        assert_eq!(call("eq", &["1"]), call("eq", &["1"]));
        assert_ne!(call("eq", &["1"]), call("eq", &["2"]));
    }

    #[test]
    fn test_empty_tree() {
        let tree = RuleTree::new("", None);
        assert!(tree.is_empty());
        assert_eq!(tree.rule_count(), 0);
        assert_eq!(tree.to_string(), "<empty>");
    }
}
