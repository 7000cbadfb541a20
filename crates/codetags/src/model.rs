//! Scoped tag tree.
//!
//! A scanner fills a [`Document`] with [`CodeElement`]s grouped by [`Kind`]. Scope-like elements
//! ([`Class`]) carry their own groups of children, so the result is a small ownership tree: every
//! element belongs to exactly one parent scope.
//!
//! Elements compare and order by **name only**. Sorted views are therefore stable, deterministic
//! and independent of source position; de-duplication by name (e.g. a shell function declared
//! twice) relies on the same comparison.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Category of a code element, used as the grouping key ("kind-key") inside a [`Scope`].
///
/// The well-known variants cover what the bundled scanners emit; [`Kind::Custom`] lets a scanner
/// introduce any other category without touching the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A class (or class-like container).
    Class,
    /// A free function.
    Function,
    /// A function attached to a class.
    Method,
    /// A variable, field or configuration key.
    Variable,
    /// A preprocessor / macro definition.
    Macro,
    /// A document or installer section.
    Section,
    /// A procedure (Tcl).
    Procedure,
    /// A namespace.
    Namespace,
    /// A package (Perl, SystemVerilog).
    Package,
    /// A hardware module.
    Module,
    /// A task (Verilog).
    Task,
    /// A jump label (batch files).
    Label,
    /// A style class or style tag.
    Style,
    /// An element identifier (`#id` selectors).
    Id,
    /// A markup tag selector.
    Tag,
    /// A class property.
    Property,
    /// A scanner-defined kind.
    Custom(String),
}

impl Kind {
    /// The kind-key string for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Class => "class",
            Self::Function => "function",
            Self::Method => "method",
            Self::Variable => "variable",
            Self::Macro => "macro",
            Self::Section => "section",
            Self::Procedure => "procedure",
            Self::Namespace => "namespace",
            Self::Package => "package",
            Self::Module => "module",
            Self::Task => "task",
            Self::Label => "label",
            Self::Style => "style",
            Self::Id => "id",
            Self::Tag => "tag",
            Self::Property => "property",
            Self::Custom(name) => name,
        }
    }

    /// Build a kind from a free-form kind-key. Well-known keys map to their variant.
    pub fn custom(name: impl Into<String>) -> Self {
        let name = name.into();
        match Self::from(name.as_str()) {
            Self::Custom(_) => Self::Custom(name),
            known => known,
        }
    }
}

impl From<&str> for Kind {
    fn from(value: &str) -> Self {
        match value {
            "class" => Self::Class,
            "function" => Self::Function,
            "method" => Self::Method,
            "variable" => Self::Variable,
            "macro" => Self::Macro,
            "section" => Self::Section,
            "procedure" => Self::Procedure,
            "namespace" => Self::Namespace,
            "package" => Self::Package,
            "module" => Self::Module,
            "task" => Self::Task,
            "label" => Self::Label,
            "style" => Self::Style,
            "id" => Self::Id,
            "tag" => Self::Tag,
            "property" => Self::Property,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Kind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A leaf element: one recognized named construct.
#[derive(Debug, Clone)]
pub struct Tag {
    /// Element name as written in the source.
    pub name: String,
    /// Zero-based line index where the element starts.
    pub line: usize,
    /// Element category.
    pub kind: Kind,
    /// Name of the enclosing scope, if any.
    pub scope: Option<String>,
}

impl Tag {
    /// Create a top-level tag.
    pub fn new(name: impl Into<String>, line: usize, kind: Kind) -> Self {
        Self {
            name: name.into(),
            line,
            kind,
            scope: None,
        }
    }

    /// Create a [`Kind::Function`] tag.
    pub fn function(name: impl Into<String>, line: usize) -> Self {
        Self::new(name, line, Kind::Function)
    }

    /// Create a [`Kind::Method`] tag.
    pub fn method(name: impl Into<String>, line: usize) -> Self {
        Self::new(name, line, Kind::Method)
    }

    /// Create a [`Kind::Variable`] tag.
    pub fn variable(name: impl Into<String>, line: usize) -> Self {
        Self::new(name, line, Kind::Variable)
    }

    /// Set the enclosing scope name.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

/// A scope-like element (class, package, module, namespace, section...).
#[derive(Debug, Clone)]
pub struct Class {
    /// Element name as written in the source.
    pub name: String,
    /// Zero-based line index of the header.
    pub line: usize,
    /// Element category, [`Kind::Class`] unless the scanner says otherwise.
    pub kind: Kind,
    /// Name of the enclosing scope, if any.
    pub scope: Option<String>,
    members: Scope,
}

impl Class {
    /// Create an empty class. Method and variable groups come with their usual descriptions;
    /// scanners override them through [`Class::members_mut`].
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        let mut members = Scope::new();
        members.set_description(Kind::Variable, "Class Variables");
        members.set_description(Kind::Method, "Methods");
        Self {
            name: name.into(),
            line,
            kind: Kind::Class,
            scope: None,
            members,
        }
    }

    /// Override the element kind (e.g. [`Kind::Package`]).
    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the enclosing scope name.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Add a child under `kind`. Children without a scope get this class as their scope.
    pub fn add_element(&mut self, kind: Kind, element: impl Into<CodeElement>) {
        let mut element = element.into();
        if element.scope().is_none() {
            element.set_scope(self.name.clone());
        }
        self.members.add_element(kind, element);
    }

    /// Add a method.
    pub fn add_method(&mut self, method: Tag) {
        self.add_element(Kind::Method, method);
    }

    /// Add a class variable.
    pub fn add_variable(&mut self, variable: Tag) {
        self.add_element(Kind::Variable, variable);
    }

    /// Methods sorted by name.
    pub fn methods(&self) -> Vec<&CodeElement> {
        self.members.sorted(&Kind::Method)
    }

    /// Class variables sorted by name.
    pub fn variables(&self) -> Vec<&CodeElement> {
        self.members.sorted(&Kind::Variable)
    }

    /// The member scope.
    pub fn members(&self) -> &Scope {
        &self.members
    }

    /// Mutable access to the member scope (descriptions, priorities).
    pub fn members_mut(&mut self) -> &mut Scope {
        &mut self.members
    }

    /// Child groups in display order: variables, methods, then every other kind in first-use
    /// order. Each group is sorted by name.
    pub fn elements(&self) -> Vec<(&Kind, Vec<&CodeElement>)> {
        let mut out = Vec::new();
        for fixed in [Kind::Variable, Kind::Method] {
            if let Some((kind, _)) = self.members.groups.get_key_value(&fixed) {
                out.push((kind, self.members.sorted(kind)));
            }
        }
        for kind in self.members.groups.keys() {
            if *kind != Kind::Variable && *kind != Kind::Method {
                out.push((kind, self.members.sorted(kind)));
            }
        }
        out.retain(|(_, items)| !items.is_empty());
        out
    }
}

/// One recognized construct: either a leaf [`Tag`] or a scope-like [`Class`].
///
/// Equality and ordering consider the name only, so two elements of different kinds with the
/// same name compare equal.
#[derive(Debug, Clone)]
pub enum CodeElement {
    /// A leaf element.
    Tag(Tag),
    /// An element with children.
    Class(Class),
}

impl CodeElement {
    /// Element name.
    pub fn name(&self) -> &str {
        match self {
            Self::Tag(tag) => &tag.name,
            Self::Class(class) => &class.name,
        }
    }

    /// Zero-based start line.
    pub fn line(&self) -> usize {
        match self {
            Self::Tag(tag) => tag.line,
            Self::Class(class) => class.line,
        }
    }

    /// Element kind.
    pub fn kind(&self) -> &Kind {
        match self {
            Self::Tag(tag) => &tag.kind,
            Self::Class(class) => &class.kind,
        }
    }

    /// Enclosing scope name.
    pub fn scope(&self) -> Option<&str> {
        match self {
            Self::Tag(tag) => tag.scope.as_deref(),
            Self::Class(class) => class.scope.as_deref(),
        }
    }

    fn set_scope(&mut self, scope: String) {
        match self {
            Self::Tag(tag) => tag.scope = Some(scope),
            Self::Class(class) => class.scope = Some(scope),
        }
    }

    /// The class payload, if this element is scope-like.
    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Self::Class(class) => Some(class),
            Self::Tag(_) => None,
        }
    }

    /// Mutable class payload, if this element is scope-like.
    pub fn as_class_mut(&mut self) -> Option<&mut Class> {
        match self {
            Self::Class(class) => Some(class),
            Self::Tag(_) => None,
        }
    }

    /// Number of elements in this subtree, including `self`.
    pub fn count(&self) -> usize {
        match self {
            Self::Tag(_) => 1,
            Self::Class(class) => 1 + class.members.len(),
        }
    }
}

impl From<Tag> for CodeElement {
    fn from(tag: Tag) -> Self {
        Self::Tag(tag)
    }
}

impl From<Class> for CodeElement {
    fn from(class: Class) -> Self {
        Self::Class(class)
    }
}

impl PartialEq for CodeElement {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for CodeElement {}

impl PartialOrd for CodeElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CodeElement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

/// Children grouped by kind-key, with per-kind descriptions and display priorities.
///
/// Groups keep the order in which their kind was first used; [`Scope::elements`] re-orders
/// them by descending priority with a stable sort, so equal priorities keep first-use order.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    groups: IndexMap<Kind, Vec<CodeElement>>,
    descriptions: HashMap<Kind, String>,
    priorities: HashMap<Kind, i32>,
}

impl Scope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `element` under `kind`, creating the group on first use.
    pub fn add_element(&mut self, kind: Kind, element: impl Into<CodeElement>) {
        self.push(kind, element.into());
    }

    /// Append and return the index of the element inside its group.
    pub(crate) fn push(&mut self, kind: Kind, element: CodeElement) -> usize {
        let group = self.groups.entry(kind).or_default();
        group.push(element);
        group.len() - 1
    }

    /// Elements of `kind` in insertion order (empty if the kind is unknown).
    pub fn get(&self, kind: &Kind) -> &[CodeElement] {
        self.groups.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable elements of `kind`, if the group exists.
    pub fn get_mut(&mut self, kind: &Kind) -> Option<&mut Vec<CodeElement>> {
        self.groups.get_mut(kind)
    }

    /// Elements of `kind` sorted by name.
    pub fn sorted(&self, kind: &Kind) -> Vec<&CodeElement> {
        let mut items: Vec<&CodeElement> = self.get(kind).iter().collect();
        items.sort();
        items
    }

    /// Returns `true` if an element called `name` exists under `kind`.
    pub fn contains(&self, kind: &Kind, name: &str) -> bool {
        self.get(kind).iter().any(|element| element.name() == name)
    }

    /// Human description of `kind`.
    pub fn description(&self, kind: &Kind) -> Option<&str> {
        self.descriptions.get(kind).map(String::as_str)
    }

    /// Set the human description of `kind`.
    pub fn set_description(&mut self, kind: Kind, description: impl Into<String>) {
        self.descriptions.insert(kind, description.into());
    }

    /// Display priority of `kind` (default `0`).
    pub fn priority(&self, kind: &Kind) -> i32 {
        self.priorities.get(kind).copied().unwrap_or(0)
    }

    /// Set the display priority of `kind`. Higher priorities are listed first.
    pub fn set_priority(&mut self, kind: Kind, priority: i32) {
        self.priorities.insert(kind, priority);
    }

    /// Kind-keys in first-use order.
    pub fn kinds(&self) -> impl Iterator<Item = &Kind> {
        self.groups.keys()
    }

    /// Kind-keys ordered by descending priority; ties keep first-use order.
    pub fn kinds_by_priority(&self) -> Vec<&Kind> {
        let mut kinds: Vec<&Kind> = self.groups.keys().collect();
        kinds.sort_by(|a, b| self.priority(b).cmp(&self.priority(a)));
        kinds
    }

    /// Non-empty groups in priority order, each sorted by name.
    pub fn elements(&self) -> Vec<(&Kind, Vec<&CodeElement>)> {
        self.kinds_by_priority()
            .into_iter()
            .map(|kind| (kind, self.sorted(kind)))
            .filter(|(_, items)| !items.is_empty())
            .collect()
    }

    /// Returns `true` if no group holds an element.
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// Total number of elements in this scope, counted recursively.
    pub fn len(&self) -> usize {
        self.groups
            .values()
            .flat_map(|group| group.iter())
            .map(CodeElement::count)
            .sum()
    }
}

/// Root scope returned by every scanner.
///
/// Besides the generic [`Scope`] operations it offers accessors for the three common groups
/// (functions, variables, classes) and a "last class" cursor: scanners that discover members
/// after a class header attach them through [`Document::last_class_mut`] until they decide the
/// class body has ended and call [`Document::clear_last_class`].
#[derive(Debug, Clone, Default)]
pub struct Document {
    scope: Scope,
    last_class: Option<usize>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level function.
    pub fn add_function(&mut self, function: Tag) {
        self.scope.add_element(Kind::Function, function);
    }

    /// Top-level functions sorted by name.
    pub fn functions(&self) -> Vec<&CodeElement> {
        self.scope.sorted(&Kind::Function)
    }

    /// Add a top-level variable.
    pub fn add_variable(&mut self, variable: Tag) {
        self.scope.add_element(Kind::Variable, variable);
    }

    /// Top-level variables sorted by name.
    pub fn variables(&self) -> Vec<&CodeElement> {
        self.scope.sorted(&Kind::Variable)
    }

    /// Register `class` under [`Kind::Class`] and make it the last class.
    pub fn add_class(&mut self, class: Class) {
        let index = self.scope.push(Kind::Class, class.into());
        self.last_class = Some(index);
    }

    /// Classes sorted by name.
    pub fn classes(&self) -> Vec<&Class> {
        let mut classes: Vec<&Class> = self
            .scope
            .get(&Kind::Class)
            .iter()
            .filter_map(CodeElement::as_class)
            .collect();
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        classes
    }

    /// First class registered under `name`.
    pub fn class_mut(&mut self, name: &str) -> Option<&mut Class> {
        self.scope
            .get_mut(&Kind::Class)?
            .iter_mut()
            .filter_map(CodeElement::as_class_mut)
            .find(|class| class.name == name)
    }

    /// The class most recently added with [`Document::add_class`], unless cleared.
    pub fn last_class(&self) -> Option<&Class> {
        let index = self.last_class?;
        self.scope.get(&Kind::Class).get(index)?.as_class()
    }

    /// Mutable access to the last class.
    pub fn last_class_mut(&mut self) -> Option<&mut Class> {
        let index = self.last_class?;
        self.scope.get_mut(&Kind::Class)?.get_mut(index)?.as_class_mut()
    }

    /// Forget the last class; later members go to the top level.
    pub fn clear_last_class(&mut self) {
        self.last_class = None;
    }

    /// Add an element under an arbitrary kind-key.
    pub fn add_element(&mut self, kind: Kind, element: impl Into<CodeElement>) {
        self.scope.add_element(kind, element);
    }

    /// Elements of `kind` in insertion order.
    pub fn get(&self, kind: &Kind) -> &[CodeElement] {
        self.scope.get(kind)
    }

    /// Returns `true` if an element called `name` exists under `kind`.
    pub fn contains(&self, kind: &Kind, name: &str) -> bool {
        self.scope.contains(kind, name)
    }

    /// Set the human description of a top-level kind.
    pub fn set_description(&mut self, kind: Kind, description: impl Into<String>) {
        self.scope.set_description(kind, description);
    }

    /// Set the display priority of a top-level kind.
    pub fn set_priority(&mut self, kind: Kind, priority: i32) {
        self.scope.set_priority(kind, priority);
    }

    /// Non-empty top-level groups in descending priority order, each sorted by name.
    pub fn elements(&self) -> Vec<(&Kind, Vec<&CodeElement>)> {
        self.scope.elements()
    }

    /// The root scope.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns `true` if nothing was recognized.
    pub fn is_empty(&self) -> bool {
        self.scope.is_empty()
    }

    /// Total number of elements, counted recursively.
    pub fn len(&self) -> usize {
        self.scope.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&CodeElement]) -> Vec<String> {
        items.iter().map(|e| e.name().to_string()).collect()
    }

    #[test]
    fn test_kind_round_trips_through_kind_key() {
        assert_eq!(Kind::from("method"), Kind::Method);
        assert_eq!(Kind::custom("task"), Kind::Task);
        assert_eq!(Kind::custom("interface"), Kind::Custom("interface".to_string()));
        assert_eq!(Kind::Custom("interface".to_string()).as_str(), "interface");
    }

    #[test]
    fn test_elements_equal_by_name_only() {
        let a = CodeElement::from(Tag::function("run", 1));
        let b = CodeElement::from(Tag::variable("run", 9));
        let c = CodeElement::from(Class::new("run", 3));
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(CodeElement::from(Tag::function("Zed", 0)) < CodeElement::from(Tag::function("abc", 0)));
    }

    #[test]
    fn test_add_element_creates_group_lazily() {
        let mut scope = Scope::new();
        assert!(scope.get(&Kind::Macro).is_empty());
        scope.add_element(Kind::Macro, Tag::new("MAX", 4, Kind::Macro));
        assert_eq!(scope.get(&Kind::Macro).len(), 1);
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn test_kinds_by_priority_is_stable_on_ties() {
        let mut scope = Scope::new();
        scope.add_element(Kind::Variable, Tag::variable("v", 0));
        scope.add_element(Kind::Macro, Tag::new("m", 0, Kind::Macro));
        scope.add_element(Kind::Function, Tag::function("f", 0));
        scope.add_element(Kind::Section, Tag::new("s", 0, Kind::Section));
        scope.set_priority(Kind::Function, 2);
        scope.set_priority(Kind::Section, 2);

        let kinds: Vec<&str> = scope.kinds_by_priority().iter().map(|k| k.as_str()).collect();
        assert_eq!(kinds, vec!["function", "section", "variable", "macro"]);
    }

    #[test]
    fn test_class_elements_order() {
        let mut class = Class::new("Widget", 0);
        class.add_element(Kind::Class, Class::new("Inner", 5));
        class.add_method(Tag::method("draw", 2));
        class.add_variable(Tag::variable("width", 1));
        class.add_method(Tag::method("area", 3));

        let groups: Vec<(&str, Vec<String>)> = class
            .elements()
            .into_iter()
            .map(|(kind, items)| (kind.as_str(), names(&items)))
            .collect();
        assert_eq!(
            groups,
            vec![
                ("variable", vec!["width".to_string()]),
                ("method", vec!["area".to_string(), "draw".to_string()]),
                ("class", vec!["Inner".to_string()]),
            ]
        );
        assert_eq!(class.methods()[0].scope(), Some("Widget"));
    }

    #[test]
    fn test_last_class_cursor() {
        let mut doc = Document::new();
        assert!(doc.last_class().is_none());

        doc.add_class(Class::new("A", 0));
        doc.add_class(Class::new("B", 4));
        doc.last_class_mut()
            .unwrap()
            .add_method(Tag::method("run", 5));
        assert_eq!(doc.last_class().unwrap().name, "B");

        doc.clear_last_class();
        assert!(doc.last_class().is_none());
        assert!(doc.last_class_mut().is_none());

        let classes = doc.classes();
        assert_eq!(classes[0].name, "A");
        assert_eq!(names(&classes[1].methods()), vec!["run".to_string()]);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_sorted_views_on_empty_document() {
        let doc = Document::new();
        assert!(doc.functions().is_empty());
        assert!(doc.variables().is_empty());
        assert!(doc.classes().is_empty());
        assert!(doc.elements().is_empty());
        assert!(doc.is_empty());
    }
}
