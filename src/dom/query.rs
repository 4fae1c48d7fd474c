//! Tree queries built from small composable predicates.
//!
//! Queries are written once against [`TreeNode`] and work on any tree that
//! implements it:
//!
//! ```ignore
//! let trigger = is_tag("time").and(has_attr("class", "feed"));
//! let marked = not(is_tag("time")).and(has_attr("class", "feed"));
//! let time = find(&document, &trigger);
//! ```
//!
//! Searches are depth-first and pre-order, starting with the root itself.

use smallvec::SmallVec;

/// Read and minimal write access to a document tree node.
pub trait TreeNode: Sized {
    /// Lowercase tag name, `None` for non-element nodes.
    fn tag(&self) -> Option<&str>;

    /// Attribute value, `Some("")` for a bare attribute.
    fn attr(&self, name: &str) -> Option<&str>;

    fn children(&self) -> &[Self];

    fn children_mut(&mut self) -> &mut [Self];

    /// Change the tag of an element, keeping attributes and children.
    /// No-op for non-element nodes.
    fn rename(&mut self, tag: &str);

    /// Append the plain text of this subtree, markup stripped.
    fn write_text(&self, out: &mut String);

    /// Append the serialized markup of this subtree.
    fn write_markup(&self, out: &mut String);

    fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }
}

// ============================================================================
// Predicates
// ============================================================================

/// A test on a single node, usable against any [`TreeNode`].
pub trait Predicate {
    fn matches<N: TreeNode>(&self, node: &N) -> bool;

    /// Both predicates must hold.
    fn and<P: Predicate>(self, other: P) -> And<Self, P>
    where
        Self: Sized,
    {
        And(self, other)
    }
}

/// Element with the given tag name.
#[derive(Debug, Clone, Copy)]
pub struct IsTag(&'static str);

pub const fn is_tag(name: &'static str) -> IsTag {
    IsTag(name)
}

impl Predicate for IsTag {
    fn matches<N: TreeNode>(&self, node: &N) -> bool {
        node.tag().is_some_and(|tag| tag.eq_ignore_ascii_case(self.0))
    }
}

/// Node carrying `name="value"` exactly.
#[derive(Debug, Clone, Copy)]
pub struct HasAttr {
    name: &'static str,
    value: &'static str,
}

pub const fn has_attr(name: &'static str, value: &'static str) -> HasAttr {
    HasAttr { name, value }
}

impl Predicate for HasAttr {
    fn matches<N: TreeNode>(&self, node: &N) -> bool {
        node.attr(self.name) == Some(self.value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct And<A, B>(A, B);

impl<A: Predicate, B: Predicate> Predicate for And<A, B> {
    fn matches<N: TreeNode>(&self, node: &N) -> bool {
        self.0.matches(node) && self.1.matches(node)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Not<P>(P);

/// Negate a predicate.
pub const fn not<P>(predicate: P) -> Not<P> {
    Not(predicate)
}

impl<P: Predicate> Predicate for Not<P> {
    fn matches<N: TreeNode>(&self, node: &N) -> bool {
        !self.0.matches(node)
    }
}

// ============================================================================
// Paths
// ============================================================================

/// Location of a node as child indices from some root.
///
/// The empty path is the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath(SmallVec<[usize; 8]>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn resolve<'a, N: TreeNode>(&self, root: &'a N) -> Option<&'a N> {
        self.0
            .iter()
            .try_fold(root, |node, &i| node.children().get(i))
    }

    pub fn resolve_mut<'a, N: TreeNode>(&self, root: &'a mut N) -> Option<&'a mut N> {
        self.0
            .iter()
            .try_fold(root, |node, &i| node.children_mut().get_mut(i))
    }
}

// ============================================================================
// Search
// ============================================================================

/// First node matching `predicate`.
pub fn find<'a, N, P>(root: &'a N, predicate: &P) -> Option<&'a N>
where
    N: TreeNode,
    P: Predicate,
{
    if predicate.matches(root) {
        return Some(root);
    }
    root.children().iter().find_map(|child| find(child, predicate))
}

/// Path of the first node matching `predicate`.
pub fn find_path<N, P>(root: &N, predicate: &P) -> Option<NodePath>
where
    N: TreeNode,
    P: Predicate,
{
    let mut path = NodePath::root();
    find_path_in(root, predicate, &mut path).then_some(path)
}

fn find_path_in<N, P>(node: &N, predicate: &P, path: &mut NodePath) -> bool
where
    N: TreeNode,
    P: Predicate,
{
    if predicate.matches(node) {
        return true;
    }
    for (i, child) in node.children().iter().enumerate() {
        path.0.push(i);
        if find_path_in(child, predicate, path) {
            return true;
        }
        path.0.pop();
    }
    false
}
