//! Builds the read-only result view as a node tree.
//!
//! Strings from the backend only ever become [`Node::Text`] leaves; front-ends
//! insert those as text nodes, so a character name or a line of dialogue can
//! never be interpreted as markup.

use crate::core::storyboard::{PageEntry, Storyboard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Section,
    Div,
    Span,
    Strong,
    H2,
    P,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element {
        tag: Tag,
        class: &'static str,
        children: Vec<Node>,
    },
    Text(String),
}

impl Node {
    fn element(tag: Tag, class: &'static str, children: Vec<Node>) -> Self {
        Node::Element { tag, class, children }
    }

    fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Elements and text leaves in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        match self {
            Node::Text(_) => 1,
            Node::Element { children, .. } => 1 + children.iter().map(Node::node_count).sum::<usize>(),
        }
    }

    pub fn class(&self) -> Option<&'static str> {
        match self {
            Node::Element { class, .. } => Some(*class),
            Node::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element { children, .. } => children,
            Node::Text(_) => &[],
        }
    }

    /// Depth-first search for descendants with the given class.
    pub fn find_all(&self, class: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect_class(class, &mut found);
        found
    }

    fn collect_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Node>) {
        if self.class() == Some(class) {
            found.push(self);
        }
        for child in self.children() {
            child.collect_class(class, found);
        }
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Element { children, .. } => children.iter().map(Node::text_content).collect(),
        }
    }

    /// Plain-text outline, one line per block holding only inline content.
    pub fn to_outline(&self) -> String {
        let mut lines = Vec::new();
        self.collect_lines(&mut lines);
        lines.join("\n")
    }

    fn collect_lines(&self, lines: &mut Vec<String>) {
        let Node::Element { tag, children, .. } = self else {
            return;
        };

        let inline = children
            .iter()
            .all(|c| matches!(c, Node::Text(_) | Node::Element { tag: Tag::Strong | Tag::Span, .. }));
        if !inline || *tag == Tag::Section {
            for child in children {
                child.collect_lines(lines);
            }
            return;
        }

        // Badges read better space-separated
        let separator = if children.iter().all(|c| matches!(c, Node::Element { tag: Tag::Span, .. })) {
            " "
        } else {
            ""
        };
        let line = children
            .iter()
            .map(Node::text_content)
            .collect::<Vec<_>>()
            .join(separator);
        if !line.is_empty() {
            lines.push(line);
        }
    }
}

pub const LABEL_CHARACTERS: &str = "Characters";
pub const LABEL_BACKGROUND: &str = "Background";
pub const LABEL_DIALOGUE: &str = "Dialogue";
pub const LABEL_EXPRESSION: &str = "Expression / Pose";

/// Rebuilds the whole result view for `storyboard`.
pub fn render(storyboard: &Storyboard) -> Node {
    let hashtags = storyboard
        .hashtags
        .iter()
        .map(|tag| Node::element(Tag::Span, "hashtag", vec![Node::text(tag)]))
        .collect();

    let pages = storyboard.pages.iter().map(page_card).collect();

    Node::element(
        Tag::Section,
        "storyboard",
        vec![
            Node::element(Tag::H2, "story-title", vec![Node::text(&storyboard.whole_title)]),
            Node::element(Tag::P, "story-topic", vec![Node::text(&storyboard.story_topic)]),
            Node::element(Tag::Div, "hashtags", hashtags),
            Node::element(Tag::Div, "pages-container", pages),
        ],
    )
}

fn content_section(label: &'static str, value: Node) -> Node {
    Node::element(
        Tag::Div,
        "content-section",
        vec![
            Node::element(Tag::Div, "content-label", vec![Node::text(label)]),
            value,
        ],
    )
}

fn page_card(page: &PageEntry) -> Node {
    let characters = page
        .character
        .iter()
        .map(|name| Node::element(Tag::Span, "character-tag", vec![Node::text(name)]))
        .collect();

    let dialogue = page
        .dialogue
        .iter()
        .map(|entry| {
            Node::element(
                Tag::Div,
                "dialogue-item",
                vec![
                    Node::element(Tag::Strong, "speaker", vec![Node::text(format!("{}:", entry.speaker))]),
                    Node::text(format!(" \"{}\"", entry.line)),
                ],
            )
        })
        .collect();

    Node::element(
        Tag::Div,
        "page-card",
        vec![
            Node::element(Tag::Div, "page-number", vec![Node::text(format!("Page {}", page.page))]),
            Node::element(
                Tag::Div,
                "page-content",
                vec![
                    content_section(LABEL_CHARACTERS, Node::element(Tag::Div, "characters", characters)),
                    content_section(
                        LABEL_BACKGROUND,
                        Node::element(Tag::Div, "content-value", vec![Node::text(&page.background)]),
                    ),
                    content_section(LABEL_DIALOGUE, Node::element(Tag::Div, "dialogue", dialogue)),
                    content_section(
                        LABEL_EXPRESSION,
                        Node::element(Tag::Div, "content-value", vec![Node::text(&page.expression_pose)]),
                    ),
                ],
            ),
        ],
    )
}
