use crate::tokenizer::tokenize;
use crate::types::{Id, Node, Token};

/// Parses a full document. Node ids are left unset; callers adopt the tree into a document.
pub fn parse_document(input: &str) -> Node {
    build_dom(&tokenize(input))
}

/// Parses markup meant to be assigned as the children of an existing element.
pub fn parse_fragment(input: &str) -> Vec<Node> {
    match parse_document(input) {
        Node::Document { children, .. } => children,
        other => vec![other],
    }
}

/// Deepest element nesting the builder produces. Start tags past this depth are attached to
/// the deepest open element instead of nesting further, so tree walks stay shallow.
pub const MAX_TREE_DEPTH: usize = 512;

pub fn build_dom(tokens: &[Token]) -> Node {
    let mut arena = NodeArena::new();
    let root_index = arena.push(ArenaNode::Document {
        doctype: None,
        children: Vec::new(),
    });

    let mut open_elements: Vec<usize> = Vec::new();
    // names of elements opened past MAX_TREE_DEPTH, which are kept flat
    let mut flattened: Vec<&str> = Vec::new();

    for token in tokens {
        match token {
            Token::Doctype(s) => {
                arena.set_doctype(root_index, s.clone());
            }
            Token::Comment(c) => {
                let parent_index = open_elements.last().copied().unwrap_or(root_index);
                arena.add_child(parent_index, ArenaNode::Comment { text: c.clone() });
            }
            Token::Text(txt) => {
                if !txt.is_empty() {
                    let parent_index = open_elements.last().copied().unwrap_or(root_index);
                    arena.add_child(parent_index, ArenaNode::Text { text: txt.clone() });
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                // <p> and <li> cannot nest directly in themselves.
                if (name == "p" || name == "li")
                    && open_elements
                        .last()
                        .is_some_and(|&open| arena.is_element_named(open, name))
                {
                    open_elements.pop();
                }
                let parent_index = open_elements.last().copied().unwrap_or(root_index);
                let new_index = arena.add_child(
                    parent_index,
                    ArenaNode::Element {
                        name: name.clone(),
                        attributes: attributes.clone(),
                        children: Vec::new(),
                    },
                );

                if *self_closing {
                    continue;
                }
                if open_elements.len() < MAX_TREE_DEPTH {
                    open_elements.push(new_index);
                } else {
                    flattened.push(name);
                }
            }
            Token::EndTag(name) => {
                if let Some(pos) = flattened.iter().rposition(|open| open.eq_ignore_ascii_case(name)) {
                    flattened.truncate(pos);
                    continue;
                }
                // Stray end tags (nothing open with that name) are ignored.
                if let Some(pos) = open_elements
                    .iter()
                    .rposition(|&open| arena.is_element_named(open, name))
                {
                    open_elements.truncate(pos);
                }
            }
        }
    }

    arena.into_dom(root_index)
}

#[derive(Debug)]
enum ArenaNode {
    Document {
        doctype: Option<String>,
        children: Vec<usize>,
    },
    Element {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        children: Vec<usize>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl ArenaNode {
    fn children(&self) -> Option<&[usize]> {
        match self {
            ArenaNode::Document { children, .. } | ArenaNode::Element { children, .. } => {
                Some(children)
            }
            ArenaNode::Text { .. } | ArenaNode::Comment { .. } => None,
        }
    }
}

#[derive(Debug)]
struct NodeArena {
    nodes: Vec<ArenaNode>,
}

impl NodeArena {
    fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn push(&mut self, node: ArenaNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        index
    }

    fn add_child(&mut self, parent_index: usize, child: ArenaNode) -> usize {
        let child_index = self.push(child);
        match &mut self.nodes[parent_index] {
            ArenaNode::Document { children, .. } | ArenaNode::Element { children, .. } => {
                children.push(child_index);
            }
            _ => unreachable!("dom builder parent cannot have children"),
        }
        child_index
    }

    fn set_doctype(&mut self, root_index: usize, doctype: String) {
        let ArenaNode::Document { doctype: dt, .. } = &mut self.nodes[root_index] else {
            unreachable!("dom builder root is always a document node");
        };
        *dt = Some(doctype);
    }

    fn is_element_named(&self, node_index: usize, target: &str) -> bool {
        match &self.nodes[node_index] {
            ArenaNode::Element { name, .. } => name.eq_ignore_ascii_case(target),
            _ => false,
        }
    }

    fn into_dom(self, root_index: usize) -> Node {
        let mut nodes = self.nodes;
        let mut built_nodes: Vec<Node> = Vec::with_capacity(nodes.len());

        fn take_children(n: usize, built: &mut Vec<Node>) -> Vec<Node> {
            let split = built.len() - n;
            built.split_off(split)
        }

        // Iterative postorder: a node is built on its second visit, when its direct children
        // are the last `child_count` entries of `built_nodes`, in document order.
        let mut stack: Vec<(usize, bool)> = vec![(root_index, false)];

        while let Some((node_index, visited)) = stack.pop() {
            if !visited {
                stack.push((node_index, true));
                if let Some(children) = nodes[node_index].children() {
                    for &child_index in children.iter().rev() {
                        stack.push((child_index, false));
                    }
                }
                continue;
            }

            let node = match &mut nodes[node_index] {
                ArenaNode::Document { doctype, children } => Node::Document {
                    id: Id::UNSET,
                    doctype: doctype.take(),
                    children: take_children(children.len(), &mut built_nodes),
                },
                ArenaNode::Element {
                    name,
                    attributes,
                    children,
                } => Node::Element {
                    id: Id::UNSET,
                    name: std::mem::take(name),
                    attributes: std::mem::take(attributes),
                    children: take_children(children.len(), &mut built_nodes),
                },
                ArenaNode::Text { text } => Node::Text {
                    id: Id::UNSET,
                    text: std::mem::take(text),
                },
                ArenaNode::Comment { text } => Node::Comment {
                    id: Id::UNSET,
                    text: std::mem::take(text),
                },
            };

            built_nodes.push(node);
        }

        debug_assert_eq!(built_nodes.len(), 1, "dom builder builds exactly one root");
        built_nodes.pop().unwrap_or(Node::Document {
            id: Id::UNSET,
            doctype: None,
            children: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().filter_map(Node::element_name).collect()
    }

    #[test]
    fn parse_document_builds_nested_tree() {
        let dom = parse_document(
            "<!DOCTYPE html><html><head><title>T</title></head><body><div class=container><p>x</p></div></body></html>",
        );
        let Node::Document {
            doctype, children, ..
        } = &dom
        else {
            panic!("expected document root");
        };
        assert_eq!(doctype.as_deref(), Some("DOCTYPE html"));
        assert_eq!(names(children), vec!["html"]);
        assert_eq!(names(children[0].children()), vec!["head", "body"]);
        let body = &children[0].children()[1];
        assert_eq!(body.children()[0].attr("class"), Some("container"));
    }

    #[test]
    fn stray_end_tag_does_not_close_ancestors() {
        let dom = parse_document("<div><span>a</b>b</span>c</div>");
        let div = &dom.children()[0];
        assert_eq!(div.children().len(), 2);
        assert_eq!(div.children()[0].text_content(), "ab");
        assert_eq!(div.children()[1].text_content(), "c");
    }

    #[test]
    fn end_tag_closes_unclosed_descendants() {
        let dom = parse_document("<section><div><em>x</section><p>y</p>");
        assert_eq!(names(dom.children()), vec!["section", "p"]);
    }

    #[test]
    fn sibling_list_items_are_implicitly_closed() {
        let dom = parse_document("<ul><li>a<li>b<li>c</ul>");
        let ul = &dom.children()[0];
        assert_eq!(names(ul.children()), vec!["li", "li", "li"]);
    }

    #[test]
    fn parse_fragment_returns_top_level_nodes() {
        let nodes = parse_fragment("<nav class=main-nav></nav><!-- c -->tail");
        assert_eq!(nodes.len(), 3);
        assert!(nodes[0].is_element_named("nav"));
        assert!(matches!(&nodes[1], Node::Comment { text, .. } if text == " c "));
        assert!(matches!(&nodes[2], Node::Text { text, .. } if text == "tail"));
    }

    fn depth_and_elements(root: &Node) -> (usize, usize) {
        let mut deepest = 0;
        let mut elements = 0;
        let mut stack = vec![(root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if node.element_name().is_some() {
                elements += 1;
                deepest = deepest.max(depth);
            }
            for c in node.children() {
                stack.push((c, depth + 1));
            }
        }
        (deepest, elements)
    }

    #[test]
    fn build_dom_caps_nesting_depth() {
        let depth = 10_000;
        let input = "<div>".repeat(depth) + "<p>tail</p>" + &"</div>".repeat(depth) + "<span>after</span>";
        let dom = parse_document(&input);
        let (deepest, elements) = depth_and_elements(&dom);
        // every element is kept; the ones past the cap become leaves of the deepest open div
        assert_eq!(elements, depth + 2);
        assert_eq!(deepest, MAX_TREE_DEPTH + 1);
        assert_eq!(names(dom.children()), vec!["div", "span"]);
    }

    #[test]
    fn nesting_below_the_cap_is_untouched() {
        let depth = MAX_TREE_DEPTH;
        let input = "<div>".repeat(depth) + &"</div>".repeat(depth);
        let (deepest, elements) = depth_and_elements(&parse_document(&input));
        assert_eq!((deepest, elements), (depth, depth));
    }
}
