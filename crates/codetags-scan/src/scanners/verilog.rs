//! Verilog / SystemVerilog scanner.
//!
//! Character-level scan that tracks block comments across lines, string literals, and an explicit
//! brace counter (keywords inside `{...}` concatenations and constraints are ignored). Design
//! units (`module`, `interface`, `program`, `package`, `class`) open scopes closed by their
//! `end*` keyword; `task` and `function` declarations become members of the innermost scope, and
//! nothing inside a task or function body is scanned until its `endtask` / `endfunction`.

use codetags::{Class, Document, Kind, LineCursor, Tag, is_identifier_char};

/// Build the outline of a Verilog or SystemVerilog source file.
pub fn generate_tags<S: AsRef<str>>(lines: &[S]) -> Document {
    let mut doc = Document::new();
    doc.set_description(Kind::Macro, "Macro Definitions");
    doc.set_description(Kind::Package, "Packages");
    doc.set_description(Kind::Module, "Modules");
    doc.set_description(Kind::Class, "Class Definitions");
    doc.set_description(Kind::Task, "Task Definitions");
    doc.set_description(Kind::Function, "Function Definitions");
    doc.set_priority(Kind::Macro, 5);
    doc.set_priority(Kind::Package, 4);
    doc.set_priority(Kind::Module, 3);
    doc.set_priority(Kind::Class, 2);
    doc.set_priority(Kind::Task, 1);

    let mut scanner = Scanner::default();
    for (lnum, line) in lines.iter().enumerate() {
        scanner.scan_line(&mut doc, lnum, line.as_ref());
    }
    if !scanner.units.is_empty() || scanner.body.is_some() {
        tracing::trace!(
            open_units = scanner.units.len(),
            "verilog: design units left open at end of input"
        );
    }
    while !scanner.units.is_empty() {
        scanner.close_unit(&mut doc);
    }
    doc
}

/// An open design unit.
struct Unit {
    class: Class,
    end: &'static str,
}

/// What the next identifiers will name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Unit(UnitKind),
    /// `prototype`: no body follows. `external`: an `extern` declaration whose definition
    /// appears elsewhere, so it is not reported.
    Routine {
        task: bool,
        prototype: bool,
        external: bool,
    },
    Define,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitKind {
    Module,
    Interface,
    Program,
    Package,
    Class,
}

impl UnitKind {
    fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "module" | "macromodule" => Self::Module,
            "interface" => Self::Interface,
            "program" => Self::Program,
            "package" => Self::Package,
            "class" => Self::Class,
            _ => return None,
        })
    }

    fn end_keyword(self) -> &'static str {
        match self {
            Self::Module => "endmodule",
            Self::Interface => "endinterface",
            Self::Program => "endprogram",
            Self::Package => "endpackage",
            Self::Class => "endclass",
        }
    }

    fn kind(self) -> Kind {
        match self {
            Self::Module => Kind::Module,
            Self::Interface => Kind::custom("interface"),
            Self::Program => Kind::custom("program"),
            Self::Package => Kind::Package,
            Self::Class => Kind::Class,
        }
    }
}

struct Pending {
    kind: PendingKind,
    line: usize,
    words: Vec<String>,
    /// The previous token was `::` (out-of-body method definition).
    qualified: Option<String>,
}

#[derive(Default)]
struct Scanner {
    in_comment: bool,
    braces: usize,
    units: Vec<Unit>,
    /// `endtask` / `endfunction` that ends the routine body being skipped.
    body: Option<&'static str>,
    pending: Option<Pending>,
    /// Qualifiers seen in the current statement (`extern`, `pure`, ...).
    qualifiers: Vec<String>,
}

const SKIPPED_WORDS: &[&str] = &[
    "automatic", "static", "virtual", "local", "protected", "void", "logic", "bit", "reg",
    "int", "integer", "byte", "shortint", "longint", "real", "string", "signed", "unsigned",
];

impl Scanner {
    fn scan_line(&mut self, doc: &mut Document, lnum: usize, line: &str) {
        let mut cur = LineCursor::new(line);
        while let Some(c) = cur.peek() {
            if self.in_comment {
                if cur.skip_past("*/") {
                    self.in_comment = false;
                }
                continue;
            }
            if cur.starts_with("//") {
                break;
            }
            if cur.eat("/*") {
                self.in_comment = true;
                continue;
            }
            match c {
                '"' => {
                    cur.skip_quoted('"');
                }
                '{' => {
                    self.braces += 1;
                    cur.bump();
                }
                '}' => {
                    self.braces = self.braces.saturating_sub(1);
                    cur.bump();
                }
                '`' => {
                    cur.bump();
                    if cur.starts_with("define") && self.body.is_none() {
                        cur.eat("define");
                        self.pending = Some(Pending::new(PendingKind::Define, lnum));
                    } else {
                        cur.eat_identifier();
                    }
                }
                ';' | '(' | '#' => {
                    cur.bump();
                    self.finish_pending(doc);
                    if c == ';' {
                        self.qualifiers.clear();
                    }
                }
                ':' if cur.peek_nth(1) == Some(':') => {
                    cur.bump_n(2);
                    if let Some(pending) = self.pending.as_mut() {
                        pending.qualified = pending.words.pop();
                    }
                }
                c if (c.is_alphabetic() || c == '_' || c == '$') && cur.at_word_start() => {
                    let word = cur.eat_while(|c| is_identifier_char(c) || c == '$');
                    self.word(doc, lnum, word);
                }
                c if c.is_ascii_digit() => {
                    cur.eat_while(|c| is_identifier_char(c) || c == '\'' || c == '.');
                }
                _ => {
                    cur.bump();
                }
            }
        }
        // `define NAME value` ends with the line.
        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.kind == PendingKind::Define)
        {
            self.finish_pending(doc);
        }
    }

    fn word(&mut self, doc: &mut Document, lnum: usize, word: &str) {
        if let Some(end) = self.body {
            if word == end {
                self.body = None;
                self.qualifiers.clear();
            }
            return;
        }
        if self.braces > 0 {
            return;
        }
        if let Some(pending) = self.pending.as_mut() {
            if pending.kind == PendingKind::Define {
                pending.words.push(word.to_string());
                self.finish_pending(doc);
                return;
            }
            // `interface class Name;`
            if pending.kind == PendingKind::Unit(UnitKind::Interface) && word == "class" {
                pending.kind = PendingKind::Unit(UnitKind::Class);
                return;
            }
            if !SKIPPED_WORDS.contains(&word) {
                pending.words.push(word.to_string());
            }
            if matches!(pending.kind, PendingKind::Unit(_)) && !pending.words.is_empty() {
                self.finish_pending(doc);
            }
            return;
        }

        let qualified_by = |name: &str| self.qualifiers.iter().any(|q| q == name);
        if let Some(unit) = UnitKind::from_keyword(word) {
            // `typedef class Name;` and `virtual interface bus_if vif;` declare, not define.
            let declaration = qualified_by("typedef")
                || (unit == UnitKind::Interface && qualified_by("virtual"));
            if declaration {
                self.qualifiers.push(word.to_string());
            } else {
                self.pending = Some(Pending::new(PendingKind::Unit(unit), lnum));
            }
        } else if word == "task" || word == "function" {
            let external = qualified_by("extern");
            let prototype =
                external || qualified_by("pure") || qualified_by("import") || qualified_by("export");
            self.pending = Some(Pending::new(
                PendingKind::Routine {
                    task: word == "task",
                    prototype,
                    external,
                },
                lnum,
            ));
        } else if word.starts_with("end")
            && self.units.last().is_some_and(|unit| unit.end == word)
        {
            self.close_unit(doc);
        } else {
            self.qualifiers.push(word.to_string());
        }
    }

    fn finish_pending(&mut self, doc: &mut Document) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let Some(name) = pending.words.last().cloned() else {
            // `function` with no name yet (e.g. `function (`): nothing to report, but a
            // non-prototype routine still has a body to skip.
            if let PendingKind::Routine {
                task,
                prototype: false,
                ..
            } = pending.kind
            {
                self.body = Some(routine_end(task));
            }
            return;
        };
        let line = pending.line;
        match pending.kind {
            PendingKind::Define => {
                doc.add_element(Kind::Macro, Tag::new(name, line, Kind::Macro));
            }
            PendingKind::Unit(unit) => {
                let mut class = Class::new(name, line).with_kind(unit.kind());
                let members = class.members_mut();
                members.set_description(Kind::Task, "Tasks");
                members.set_description(Kind::Function, "Functions");
                self.units.push(Unit {
                    class,
                    end: unit.end_keyword(),
                });
            }
            PendingKind::Routine {
                task,
                prototype,
                external,
            } => {
                if !prototype {
                    self.body = Some(routine_end(task));
                }
                if external {
                    return;
                }
                if let Some(owner) = pending.qualified.as_deref()
                    && let Some(class) = doc.class_mut(owner)
                {
                    let member = member_kind(task, true);
                    class.add_element(member.clone(), Tag::new(name, line, member));
                    return;
                }
                match self.units.last_mut() {
                    Some(unit) => {
                        let in_class = unit.class.kind == Kind::Class;
                        let member = member_kind(task, in_class);
                        unit.class
                            .add_element(member.clone(), Tag::new(name, line, member));
                    }
                    None if task => doc.add_element(Kind::Task, Tag::new(name, line, Kind::Task)),
                    None => doc.add_function(Tag::function(name, line)),
                }
            }
        }
    }

    fn close_unit(&mut self, doc: &mut Document) {
        let Some(unit) = self.units.pop() else {
            return;
        };
        let kind = unit.class.kind.clone();
        match (self.units.last_mut(), kind) {
            (Some(parent), kind) => parent.class.add_element(kind, unit.class),
            (None, Kind::Class) => {
                doc.add_class(unit.class);
                doc.clear_last_class();
            }
            (None, kind) => doc.add_element(kind, unit.class),
        }
    }
}

impl Pending {
    fn new(kind: PendingKind, line: usize) -> Self {
        Self {
            kind,
            line,
            words: Vec::new(),
            qualified: None,
        }
    }
}

fn routine_end(task: bool) -> &'static str {
    if task { "endtask" } else { "endfunction" }
}

fn member_kind(task: bool, in_class: bool) -> Kind {
    match (task, in_class) {
        (true, _) => Kind::Task,
        (false, true) => Kind::Method,
        (false, false) => Kind::Function,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn named(items: &[codetags::CodeElement]) -> Vec<(String, usize)> {
        items
            .iter()
            .map(|e| (e.name().to_string(), e.line()))
            .collect()
    }

    #[test]
    fn test_module_with_tasks_and_functions() {
        let doc = generate_tags(&[
            "`define WIDTH 8",
            "module counter #(parameter N = 4) (input clk);",
            "  task automatic reset_all;",
            "    begin",
            "      function_like = 0; // task fake;",
            "    end",
            "  endtask",
            "  function [7:0] next_value(input [7:0] v);",
            "    next_value = {v, 1'b0};",
            "  endfunction",
            "endmodule",
            "function integer top_level;",
            "endfunction",
        ]);
        assert_eq!(named(doc.get(&Kind::Macro)), vec![("WIDTH".to_string(), 0)]);
        let modules = doc.get(&Kind::Module);
        assert_eq!(named(modules), vec![("counter".to_string(), 1)]);
        let counter = modules[0].as_class().unwrap();
        assert_eq!(
            named(counter.members().get(&Kind::Task)),
            vec![("reset_all".to_string(), 2)]
        );
        assert_eq!(
            named(counter.members().get(&Kind::Function)),
            vec![("next_value".to_string(), 7)]
        );
        assert_eq!(named(doc.get(&Kind::Function)), vec![("top_level".to_string(), 11)]);
    }

    #[test]
    fn test_classes_and_prototypes() {
        let doc = generate_tags(&[
            "package pkg;",
            "endpackage",
            "/* class Hidden;",
            "endclass */",
            "class Packet extends Base;",
            "  rand bit [7:0] data;",
            "  constraint c { data < 10; }",
            "  extern function void pack();",
            "  pure virtual task send();",
            "  function new();",
            "  endfunction",
            "endclass",
            "function void Packet::pack();",
            "endfunction",
        ]);
        assert_eq!(named(doc.get(&Kind::Package)), vec![("pkg".to_string(), 0)]);
        let classes = doc.classes();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "Packet");
        let methods: Vec<(&str, usize)> = classes[0]
            .methods()
            .iter()
            .map(|e| (e.name(), e.line()))
            .collect();
        assert_eq!(methods, vec![("new", 9), ("pack", 12)]);
        let tasks = classes[0].members().get(&Kind::Task);
        assert_eq!(named(tasks), vec![("send".to_string(), 8)]);
        assert!(doc.functions().is_empty());
    }

    #[test]
    fn test_forward_declarations_do_not_open_scopes() {
        let doc = generate_tags(&[
            "typedef class Packet;",
            "class Driver;",
            "  virtual interface bus_if vif;",
            "  task run();",
            "  endtask",
            "endclass",
            "virtual class Base;",
            "endclass",
            "interface class Shape;",
            "  pure virtual function int area();",
            "endclass",
            "function void free_fn();",
            "endfunction",
        ]);
        let classes: Vec<&str> = doc.classes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(classes, vec!["Base", "Driver", "Shape"]);
        assert!(doc.get(&Kind::custom("interface")).is_empty());

        let driver = doc.classes()[1];
        assert_eq!(named(driver.members().get(&Kind::Task)), vec![("run".to_string(), 3)]);
        assert_eq!(
            driver.members().description(&Kind::Task),
            Some("Tasks")
        );
        assert_eq!(doc.classes()[2].methods()[0].name(), "area");
        assert_eq!(named(doc.get(&Kind::Function)), vec![("free_fn".to_string(), 11)]);
    }

    #[test]
    fn test_unterminated_input() {
        let doc = generate_tags(&["module m(", "task t", "/* open comment"]);
        assert_eq!(doc.get(&Kind::Module).len(), 1);
    }
}
