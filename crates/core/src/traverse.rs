//! Document-order tree walking without recursion.
//!
//! [`Descendants`] keeps its own worklist, so deeply nested or adversarial
//! markup cannot grow the call stack. The iterator is lazy and `Clone`: a
//! clone taken mid-walk resumes from the same position.

use ego_tree::NodeRef;
use scraper::node::Node as RawNode;

/// Pre-order, depth-first iterator over a subtree.
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    stack: Vec<NodeRef<'a, RawNode>>,
}

impl<'a> Descendants<'a> {
    /// Walks `root` and everything below it.
    pub(crate) fn including(root: NodeRef<'a, RawNode>) -> Self {
        Self { stack: vec![root] }
    }

    /// Walks everything below `root`, skipping `root` itself.
    pub(crate) fn below(root: NodeRef<'a, RawNode>) -> Self {
        Self { stack: root.children().rev().collect() }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a, RawNode>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reversed so the first child is popped next.
        self.stack.extend(node.children().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn tags(iter: Descendants<'_>) -> Vec<String> {
        iter.filter_map(|node| node.value().as_element().map(|el| el.name().to_string())).collect()
    }

    #[test]
    fn test_preorder_document_order() {
        let html = Html::parse_fragment("<div><p><b>x</b></p><ul><li>a</li></ul></div><span></span>");
        let order = tags(Descendants::including(html.tree.root()));
        assert_eq!(order, vec!["html", "div", "p", "b", "ul", "li", "span"]);
    }

    #[test]
    fn test_below_skips_root() {
        let html = Html::parse_fragment("<section><p>one</p></section>");
        let root = html.tree.root();
        assert!(tags(Descendants::below(root)).contains(&"section".to_string()));

        let section = Descendants::including(root)
            .find(|n| n.value().as_element().is_some_and(|el| el.name() == "section"))
            .unwrap();
        assert_eq!(tags(Descendants::below(section)), vec!["p"]);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let depth = 20_000;
        let markup = format!("{}text{}", "<span>".repeat(depth), "</span>".repeat(depth));
        let html = Html::parse_fragment(&markup);
        let count = Descendants::including(html.tree.root()).count();
        assert!(count > 100);
    }

    #[test]
    fn test_clone_resumes_from_same_position() {
        let html = Html::parse_fragment("<p>a</p><p>b</p><p>c</p>");
        let mut walk = Descendants::including(html.tree.root());
        walk.next();
        walk.next();
        let rest = walk.clone();
        assert_eq!(walk.count(), rest.count());
    }
}
