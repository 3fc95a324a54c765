#![no_main]

//! Fuzz target for document validation and compilation
//!
//! Builds structured documents around the known configuration keys, loads
//! them and resolves every entry of the result.

use arbitrary::Arbitrary;
use container_config::{
    ArrayConfiguration, Bindings, ClassMetadata, ClassRegistry, Configuration, Container,
    ExtensionFn, FactoryContainer, FnFactory, Value,
};
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value as Json};
use std::sync::Arc;

const KEYS: [&str; 9] = [
    "parameters",
    "aliases",
    "invokables",
    "factories",
    "extensions",
    "tags",
    "mappers",
    "passes",
    "unknown",
];

const NAMES: [&str; 6] = ["a", "b", "make", "extend", "Clock", "Listener"];

#[derive(Debug, Arbitrary)]
enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Name(u8),
    Text(String),
    Array(Vec<Node>),
    Object(Vec<(u8, Node)>),
}

impl Node {
    fn json(&self, depth: usize) -> Json {
        if depth > 4 {
            return Json::Null;
        }

        match self {
            Node::Null => Json::Null,
            Node::Bool(b) => Json::Bool(*b),
            Node::Int(n) => Json::from(*n),
            Node::Name(i) => Json::from(NAMES[*i as usize % NAMES.len()]),
            Node::Text(s) => Json::from(s.as_str()),
            Node::Array(items) => Json::Array(items.iter().map(|n| n.json(depth + 1)).collect()),
            Node::Object(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, n)| (NAMES[*k as usize % NAMES.len()].to_owned(), n.json(depth + 1)))
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Document {
    top_level: Option<Node>,
    sections: Vec<(u8, Node)>,
}

impl Document {
    fn json(&self) -> Json {
        if let Some(node) = &self.top_level {
            return node.json(0);
        }

        let sections: Map<String, Json> = self
            .sections
            .iter()
            .map(|(k, n)| (KEYS[*k as usize % KEYS.len()].to_owned(), n.json(1)))
            .collect();
        Json::Object(sections)
    }
}

fn bindings() -> Arc<Bindings> {
    let classes = ClassRegistry::new()
        .with(ClassMetadata::interface("Listener"))
        .with(ClassMetadata::new("Clock", |_| Ok(Value::from("tick"))).implements("Listener"));

    Arc::new(
        Bindings::new()
            .with_classes(Arc::new(classes))
            .with_factory(FnFactory::new("make", |c| c.get("a")))
            .with_extension(ExtensionFn::new("extend", |_, v| Ok(v))),
    )
}

fuzz_target!(|document: Document| {
    let configuration = ArrayConfiguration::new(bindings(), "fuzz.json", document.json());

    let Ok(entry) = configuration.entry() else {
        return;
    };

    let container = FactoryContainer::new(entry.factories());
    for id in container.factories().ids() {
        // Resolution may fail (missing ids, cycles) but must never panic
        let _ = container.get(id);
    }
});
