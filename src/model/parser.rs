//! XML diagram import.
//!
//! Builds the element tree from BPMN/DMN XML and reports recoverable
//! problems (duplicate ids, unresolved references) as import warnings.
//! Malformed XML or an unexpected root element is a fatal parse error and
//! surfaces through the runner's internal-error path.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::config::LinterKind;
use crate::core::errors::{DiaglintError, Result};
use crate::model::element::{DiagramModel, Element, ImportWarning};

/// Map a declared namespace URI to the canonical prefix used in type names.
fn canonical_prefix(uri: &str) -> Option<&'static str> {
    match uri {
        "http://www.omg.org/spec/BPMN/20100524/MODEL" => Some("bpmn"),
        "http://www.omg.org/spec/BPMN/20100524/DI" => Some("bpmndi"),
        "http://www.omg.org/spec/DD/20100524/DI" => Some("di"),
        "http://www.omg.org/spec/DD/20100524/DC" => Some("dc"),
        "https://www.omg.org/spec/DMN/20191111/MODEL/"
        | "http://www.omg.org/spec/DMN/20180521/MODEL/"
        | "http://www.omg.org/spec/DMN/20151101/dmn.xsd" => Some("dmn"),
        "https://www.omg.org/spec/DMN/20191111/DMNDI/"
        | "http://www.omg.org/spec/DMN/20180521/DMNDI/" => Some("dmndi"),
        _ => None,
    }
}

/// Element type names are the capitalized local name, the model-library
/// convention (`startEvent` element, `bpmn:StartEvent` type).
fn type_local_name(local: &str) -> String {
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

struct PendingElement {
    element: Element,
    scope: HashMap<String, String>,
}

/// Parse `xml` into a diagram model, collecting import warnings.
pub fn parse(kind: LinterKind, xml: &str) -> Result<(DiagramModel, Vec<ImportWarning>)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<PendingElement> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let pending = open_element(&start, stack.last())?;
                stack.push(pending);
            }
            Ok(Event::Empty(start)) => {
                let pending = open_element(&start, stack.last())?;
                attach(pending.element, &mut stack, &mut root)?;
            }
            Ok(Event::End(_)) => {
                let pending = stack
                    .pop()
                    .ok_or_else(|| DiaglintError::parse("unexpected closing tag"))?;
                attach(pending.element, &mut stack, &mut root)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(DiaglintError::parse(format!("invalid XML: {err}"))),
        }
    }

    if !stack.is_empty() {
        return Err(DiaglintError::parse("unexpected end of document"));
    }

    let root = root.ok_or_else(|| DiaglintError::parse("document has no root element"))?;

    let expected_root = format!("{}:Definitions", kind.prefix());
    if root.type_name() != expected_root {
        return Err(DiaglintError::parse(format!(
            "expected a <{}:definitions> root element, found <{}>",
            kind.prefix(),
            root.local_name
        )));
    }

    let warnings = collect_import_warnings(&root);
    Ok((DiagramModel { kind, root }, warnings))
}

/// Build an element from a start tag, resolving its namespace scope.
fn open_element(start: &BytesStart<'_>, parent: Option<&PendingElement>) -> Result<PendingElement> {
    let mut scope = parent.map(|p| p.scope.clone()).unwrap_or_default();
    let mut attributes = IndexMap::new();

    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|err| DiaglintError::parse(format!("invalid attribute: {err}")))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|err| DiaglintError::parse(format!("invalid attribute value: {err}")))?
            .into_owned();

        if key == "xmlns" {
            scope.insert(String::new(), value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.insert(prefix.to_string(), value);
        } else {
            attributes.insert(key, value);
        }
    }

    let raw_name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let (prefix, local) = match raw_name.split_once(':') {
        Some((prefix, local)) => (prefix.to_string(), local.to_string()),
        None => (String::new(), raw_name),
    };

    let type_name = match scope.get(&prefix).map(String::as_str).and_then(canonical_prefix) {
        Some(canonical) => format!("{canonical}:{}", type_local_name(&local)),
        None if prefix.is_empty() => type_local_name(&local),
        None => format!("{prefix}:{}", type_local_name(&local)),
    };

    Ok(PendingElement {
        element: Element {
            type_name,
            local_name: local,
            attributes,
            children: Vec::new(),
        },
        scope,
    })
}

/// Attach a completed element to its parent, or install it as the root.
fn attach(
    element: Element,
    stack: &mut Vec<PendingElement>,
    root: &mut Option<Element>,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.element.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(DiaglintError::parse("document has multiple root elements"))
    }
}

/// Collect duplicate-id and unresolved-reference warnings.
fn collect_import_warnings(root: &Element) -> Vec<ImportWarning> {
    let mut warnings = Vec::new();
    let mut ids = HashSet::new();

    for element in root.iter() {
        if let Some(id) = element.id() {
            if !ids.insert(id.to_string()) {
                warnings.push(ImportWarning {
                    element_id: Some(id.to_string()),
                    message: format!("duplicate element id <{id}>"),
                });
            }
        }
    }

    for element in root.iter() {
        for (key, value) in &element.attributes {
            if key.ends_with("Ref") && !value.is_empty() && !ids.contains(value.as_str()) {
                warnings.push(ImportWarning {
                    element_id: element.id().map(ToOwned::to_owned),
                    message: format!("unresolved reference <{value}>"),
                });
            }
        }
    }

    warnings
}
