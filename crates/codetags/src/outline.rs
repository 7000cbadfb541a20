//! Structural outline export.
//!
//! [`DocumentOutline`] is the shape handed to hosts that render a code browser: groups of nodes
//! with their kind description and priority, nested for scope-like elements. Unlike
//! [`CodeElement`](crate::CodeElement), every outline type compares **all** of its fields, so two
//! outlines are equal only if the trees are structurally identical.

use crate::model::{Class, CodeElement, Document, Kind, Scope};
use serde::Serialize;

/// One element in the outline tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineNode {
    /// Element name.
    pub name: String,
    /// Element kind.
    pub kind: Kind,
    /// Zero-based start line, used as the navigation target.
    pub line: usize,
    /// Enclosing scope name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Child groups (scope-like elements only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<OutlineGroup>,
}

impl OutlineNode {
    /// Collect this node and all descendants in pre-order.
    pub fn flatten_preorder<'a>(&'a self, out: &mut Vec<&'a OutlineNode>) {
        out.push(self);
        for group in &self.groups {
            for item in &group.items {
                item.flatten_preorder(out);
            }
        }
    }

    /// Find all nodes with the given name (pre-order).
    pub fn find_by_name<'a>(&'a self, name: &str, out: &mut Vec<&'a OutlineNode>) {
        if self.name == name {
            out.push(self);
        }
        for group in &self.groups {
            for item in &group.items {
                item.find_by_name(name, out);
            }
        }
    }
}

/// A group of same-kind nodes, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineGroup {
    /// Kind-key shared by the items.
    pub kind: Kind,
    /// Human description (e.g. "Function Definitions").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display priority.
    pub priority: i32,
    /// Items sorted by name.
    pub items: Vec<OutlineNode>,
}

impl OutlineGroup {
    /// Description if set, otherwise the kind-key.
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(self.kind.as_str())
    }
}

/// A whole document outline (top-level groups).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DocumentOutline {
    /// Top-level groups in display order.
    pub groups: Vec<OutlineGroup>,
}

impl DocumentOutline {
    /// Build the outline of a document.
    pub fn from_document(document: &Document) -> Self {
        Self {
            groups: scope_groups(document.scope(), document.elements()),
        }
    }

    /// Returns true if there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|group| group.items.is_empty())
    }

    /// Return the top-level node count.
    pub fn top_level_count(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }

    /// Flatten all nodes in pre-order.
    pub fn flatten_preorder(&self) -> Vec<&OutlineNode> {
        let mut out = Vec::new();
        for group in &self.groups {
            for item in &group.items {
                item.flatten_preorder(&mut out);
            }
        }
        out
    }

    /// Find all nodes with the given name (pre-order).
    pub fn find_by_name(&self, name: &str) -> Vec<&OutlineNode> {
        let mut out = Vec::new();
        for group in &self.groups {
            for item in &group.items {
                item.find_by_name(name, &mut out);
            }
        }
        out
    }
}

impl Document {
    /// Build the structural outline of this document.
    pub fn to_outline(&self) -> DocumentOutline {
        DocumentOutline::from_document(self)
    }
}

fn scope_groups(scope: &Scope, groups: Vec<(&Kind, Vec<&CodeElement>)>) -> Vec<OutlineGroup> {
    groups
        .into_iter()
        .map(|(kind, items)| OutlineGroup {
            kind: kind.clone(),
            description: scope.description(kind).map(str::to_string),
            priority: scope.priority(kind),
            items: items.into_iter().map(node).collect(),
        })
        .collect()
}

fn node(element: &CodeElement) -> OutlineNode {
    OutlineNode {
        name: element.name().to_string(),
        kind: element.kind().clone(),
        line: element.line(),
        scope: element.scope().map(str::to_string),
        groups: element.as_class().map(class_groups).unwrap_or_default(),
    }
}

fn class_groups(class: &Class) -> Vec<OutlineGroup> {
    scope_groups(class.members(), class.elements())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.set_description(Kind::Function, "Function Definitions");
        doc.set_priority(Kind::Class, 2);
        doc.add_function(Tag::function("main", 10));
        let mut class = Class::new("Point", 0);
        class.add_method(Tag::method("norm", 3));
        class.add_variable(Tag::variable("x", 1));
        doc.add_class(class);
        doc
    }

    #[test]
    fn test_outline_groups_follow_priority() {
        let outline = sample().to_outline();
        let kinds: Vec<&str> = outline.groups.iter().map(|g| g.kind.as_str()).collect();
        assert_eq!(kinds, vec!["class", "function"]);
        assert_eq!(outline.groups[1].label(), "Function Definitions");
        assert_eq!(outline.groups[0].label(), "class");
        assert_eq!(outline.top_level_count(), 2);
    }

    #[test]
    fn test_member_groups_have_labels() {
        let outline = sample().to_outline();
        let point = &outline.groups[0].items[0];
        let labels: Vec<&str> = point.groups.iter().map(OutlineGroup::label).collect();
        assert_eq!(labels, vec!["Class Variables", "Methods"]);
    }

    #[test]
    fn test_outline_flatten_and_find() {
        let outline = sample().to_outline();
        let names: Vec<&str> = outline
            .flatten_preorder()
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, vec!["Point", "x", "norm", "main"]);

        let found = outline.find_by_name("norm");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 3);
        assert_eq!(found[0].scope.as_deref(), Some("Point"));
    }

    #[test]
    fn test_outline_is_structural() {
        let mut other = sample();
        other.add_variable(Tag::variable("main", 10));
        assert_ne!(sample().to_outline(), other.to_outline());
        assert_eq!(sample().to_outline(), sample().to_outline());
        assert!(Document::new().to_outline().is_empty());
    }
}
