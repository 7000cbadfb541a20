use codetags::{Class, CodeElement, Document, Kind, Tag};
use pretty_assertions::assert_eq;
use serde_json::json;

fn names(items: &[&CodeElement]) -> Vec<String> {
    items.iter().map(|e| e.name().to_string()).collect()
}

#[test]
fn test_accessors_sort_by_name_not_line() {
    let mut doc = Document::new();
    for (name, line) in [("zeta", 0), ("alpha", 9), ("Mid", 4), ("alpha", 2)] {
        doc.add_function(Tag::function(name, line));
        doc.add_variable(Tag::variable(name, line));
    }
    assert_eq!(names(&doc.functions()), vec!["Mid", "alpha", "alpha", "zeta"]);
    assert_eq!(names(&doc.variables()), vec!["Mid", "alpha", "alpha", "zeta"]);
    // Stable: equal names keep insertion order.
    let lines: Vec<usize> = doc.functions().iter().map(|e| e.line()).collect();
    assert_eq!(lines, vec![4, 9, 2, 0]);
}

#[test]
fn test_last_class_cursor() {
    let mut doc = Document::new();
    assert!(doc.last_class().is_none());

    doc.add_class(Class::new("B", 0));
    doc.last_class_mut()
        .expect("class just added")
        .add_method(Tag::method("run", 1));
    doc.add_class(Class::new("A", 3));
    doc.last_class_mut()
        .expect("class just added")
        .add_variable(Tag::variable("count", 4));
    doc.clear_last_class();
    assert!(doc.last_class_mut().is_none());

    let classes = doc.classes();
    assert_eq!(classes[0].name, "A");
    assert_eq!(names(&classes[0].variables()), vec!["count"]);
    assert_eq!(names(&classes[1].methods()), vec!["run"]);
    assert_eq!(doc.len(), 4);
}

#[test]
fn test_custom_kinds_and_priorities() {
    let mut doc = Document::new();
    let section = Kind::from("section");
    let widget = Kind::from("widget");
    assert_eq!(section, Kind::Section);
    assert_eq!(widget, Kind::custom("widget"));

    doc.add_element(widget.clone(), Tag::new("w", 0, widget.clone()));
    doc.add_element(section.clone(), Tag::new("s", 1, section.clone()));
    doc.add_function(Tag::function("f", 2));
    doc.set_priority(Kind::Function, 5);

    let order: Vec<&str> = doc.elements().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(order, vec!["function", "widget", "section"]);
    assert!(doc.contains(&widget, "w"));
    assert!(!doc.contains(&section, "w"));
}

#[test]
fn test_outline_serializes_to_json() {
    let mut doc = Document::new();
    doc.set_description(Kind::Function, "Function Definitions");
    doc.add_function(Tag::function("main", 12));
    let mut class = Class::new("Parser", 0);
    class.add_method(Tag::method("parse", 3));
    doc.add_class(class);

    let value = serde_json::to_value(doc.to_outline()).expect("outline serializes");
    assert_eq!(
        value,
        json!({
            "groups": [
                {
                    "kind": "function",
                    "description": "Function Definitions",
                    "priority": 0,
                    "items": [{ "name": "main", "kind": "function", "line": 12 }]
                },
                {
                    "kind": "class",
                    "priority": 0,
                    "items": [{
                        "name": "Parser",
                        "kind": "class",
                        "line": 0,
                        "groups": [{
                            "kind": "method",
                            "description": "Methods",
                            "priority": 0,
                            "items": [{
                                "name": "parse",
                                "kind": "method",
                                "line": 3,
                                "scope": "Parser"
                            }]
                        }]
                    }]
                }
            ]
        })
    );
}
