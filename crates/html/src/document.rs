use crate::select::Selector;
use crate::types::{Id, Node, NodeId};
use crate::{parse_document, parse_fragment};

/// An owned DOM tree plus the id allocator for the nodes adopted into it.
///
/// Ids are never reused: replaced subtrees take their ids with them, and newly inserted
/// nodes always get fresh ones.
#[derive(Debug, Clone)]
pub struct Document {
    root: Node,
    next_id: NodeId,
}

impl Document {
    pub fn parse(input: &str) -> Self {
        Self::from_node(parse_document(input))
    }

    pub fn from_node(root: Node) -> Self {
        let mut doc = Self { root, next_id: 1 };
        let mut root = std::mem::replace(&mut doc.root, Node::text(""));
        doc.adopt(&mut root);
        doc.root = root;
        doc
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Assigns fresh ids to every unset node in `node`'s subtree.
    pub fn adopt(&mut self, node: &mut Node) {
        fn walk(node: &mut Node, next: &mut NodeId) {
            if node.id().is_unset() {
                node.set_id(Id(*next));
                *next = next.wrapping_add(1);
            }
            if let Some(children) = node.children_mut() {
                for c in children {
                    walk(c, next);
                }
            }
        }
        walk(node, &mut self.next_id);
    }

    pub fn get(&self, id: Id) -> Option<&Node> {
        find_node_by_id(&self.root, id)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut Node> {
        find_node_by_id_mut(&mut self.root, id)
    }

    pub fn query_selector(&self, selector: &Selector) -> Option<Id> {
        self.query_selector_all(selector).into_iter().next()
    }

    pub fn query_selector_all(&self, selector: &Selector) -> Vec<Id> {
        let mut out = Vec::new();
        collect_matches(&self.root, &mut Vec::new(), selector, None, false, &mut out);
        out
    }

    /// Matches strictly inside `scope` (the scope element itself is excluded), with the
    /// scope's own ancestors still visible to combinators.
    pub fn query_selector_all_within(&self, scope: Id, selector: &Selector) -> Vec<Id> {
        let mut out = Vec::new();
        collect_matches(&self.root, &mut Vec::new(), selector, Some(scope), false, &mut out);
        out
    }

    pub fn query_selector_within(&self, scope: Id, selector: &Selector) -> Option<Id> {
        self.query_selector_all_within(scope, selector)
            .into_iter()
            .next()
    }

    /// `document.getElementById`.
    pub fn element_by_html_id(&self, html_id: &str) -> Option<Id> {
        fn walk(node: &Node, html_id: &str) -> Option<Id> {
            if node.element_name().is_some() && node.attr("id") == Some(html_id) {
                return Some(node.id());
            }
            node.children().iter().find_map(|c| walk(c, html_id))
        }
        walk(&self.root, html_id)
    }

    pub fn first_element_named(&self, tag: &str) -> Option<Id> {
        fn walk(node: &Node, tag: &str) -> Option<Id> {
            if node.is_element_named(tag) {
                return Some(node.id());
            }
            node.children().iter().find_map(|c| walk(c, tag))
        }
        walk(&self.root, tag)
    }

    pub fn body(&self) -> Option<Id> {
        self.first_element_named("body")
    }

    /// Ids from `id` up to (and including) the document root. Empty if `id` is unknown.
    pub fn ancestors_or_self(&self, id: Id) -> Vec<Id> {
        fn walk(node: &Node, id: Id, path: &mut Vec<Id>) -> bool {
            path.push(node.id());
            if node.id() == id {
                return true;
            }
            for c in node.children() {
                if walk(c, id, path) {
                    return true;
                }
            }
            path.pop();
            false
        }
        let mut path = Vec::new();
        walk(&self.root, id, &mut path);
        path.reverse();
        path
    }

    /// `Element.closest`: nearest ancestor-or-self matching `selector`.
    pub fn closest(&self, id: Id, selector: &Selector) -> Option<Id> {
        let mut chain: Vec<&Node> = self
            .ancestors_or_self(id)
            .into_iter()
            .rev()
            .filter_map(|a| self.get(a))
            .collect();
        // chain is root first; test from the node outwards
        while let Some(node) = chain.pop() {
            if selector.matches(node, &chain) {
                return Some(node.id());
            }
        }
        None
    }

    pub fn contains(&self, ancestor: Id, id: Id) -> bool {
        self.ancestors_or_self(id).contains(&ancestor)
    }

    /// Replaces the children of `parent`, adopting the new nodes. Returns false if `parent`
    /// is missing or cannot hold children.
    pub fn replace_children(&mut self, parent: Id, mut children: Vec<Node>) -> bool {
        for c in &mut children {
            clear_ids(c);
            self.adopt(c);
        }
        match self.get_mut(parent).and_then(Node::children_mut) {
            Some(slot) => {
                *slot = children;
                true
            }
            None => false,
        }
    }

    /// `element.innerHTML = html`.
    pub fn set_inner_html(&mut self, parent: Id, html: &str) -> bool {
        self.replace_children(parent, parse_fragment(html))
    }

    /// `parent.prepend(node)`; returns the id given to `node`.
    pub fn prepend_child(&mut self, parent: Id, mut node: Node) -> Option<Id> {
        clear_ids(&mut node);
        self.adopt(&mut node);
        let new_id = node.id();
        let slot = self.get_mut(parent)?.children_mut()?;
        slot.insert(0, node);
        Some(new_id)
    }

    /// Text of the first `<title>`, trimmed.
    pub fn title(&self) -> Option<String> {
        let id = self.first_element_named("title")?;
        let text = self.get(id)?.text_content();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Sets `<title>` text if the document has one.
    pub fn set_title(&mut self, title: &str) -> bool {
        match self.first_element_named("title") {
            Some(id) => self.replace_children(id, vec![Node::text(title)]),
            None => false,
        }
    }
}

fn clear_ids(node: &mut Node) {
    node.set_id(Id::UNSET);
    if let Some(children) = node.children_mut() {
        for c in children {
            clear_ids(c);
        }
    }
}

fn collect_matches<'a>(
    node: &'a Node,
    ancestors: &mut Vec<&'a Node>,
    selector: &Selector,
    scope: Option<Id>,
    inside: bool,
    out: &mut Vec<Id>,
) {
    let in_scope = scope.is_none() || inside;
    if in_scope && selector.matches(node, ancestors) {
        out.push(node.id());
    }
    let inside_children = inside || scope == Some(node.id());
    ancestors.push(node);
    for c in node.children() {
        collect_matches(c, ancestors, selector, scope, inside_children, out);
    }
    ancestors.pop();
}

pub fn find_node_by_id(node: &Node, id: Id) -> Option<&Node> {
    if node.id() == id {
        return Some(node);
    }
    node.children().iter().find_map(|c| find_node_by_id(c, id))
}

pub fn find_node_by_id_mut(node: &mut Node, id: Id) -> Option<&mut Node> {
    if node.id() == id {
        return Some(node);
    }
    node.children_mut()?
        .iter_mut()
        .find_map(|c| find_node_by_id_mut(c, id))
}
