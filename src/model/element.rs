//! In-memory diagram element tree.

use indexmap::IndexMap;

use crate::core::config::LinterKind;

/// A single element of a parsed diagram.
#[derive(Debug, Clone)]
pub struct Element {
    /// Canonical type name, e.g. `bpmn:UserTask` or `dmn:Decision`.
    pub type_name: String,
    /// Local XML element name as written, e.g. `userTask`.
    pub local_name: String,
    /// Attributes in document order, excluding namespace declarations.
    pub attributes: IndexMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// Canonical type name of this element.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The `id` attribute, if present.
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// The `name` attribute, if present and non-blank.
    pub fn name(&self) -> Option<&str> {
        self.attribute("name").filter(|name| !name.trim().is_empty())
    }

    /// Look up an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Depth-first iterator over this element and all of its descendants,
    /// in document order.
    pub fn iter(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Depth-first element iterator returned by [`Element::iter`].
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// A parsed diagram: the root `definitions` element and the linter type it
/// was imported for.
#[derive(Debug, Clone)]
pub struct DiagramModel {
    /// Linter type the model was imported for.
    pub kind: LinterKind,
    /// The root element.
    pub root: Element,
}

impl DiagramModel {
    /// Iterate over every element in the model in document order.
    pub fn elements(&self) -> Descendants<'_> {
        self.root.iter()
    }
}

/// A recoverable problem encountered while importing a diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportWarning {
    /// Id of the element the warning is attributed to, when known.
    pub element_id: Option<String>,
    /// Warning description.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(type_name: &str, id: &str) -> Element {
        let mut attributes = IndexMap::new();
        attributes.insert("id".to_string(), id.to_string());
        Element {
            type_name: type_name.to_string(),
            local_name: type_name.split(':').last().unwrap().to_string(),
            attributes,
            children: Vec::new(),
        }
    }

    #[test]
    fn iteration_is_depth_first_document_order() {
        let mut process = leaf("bpmn:Process", "Process_1");
        process.children.push(leaf("bpmn:StartEvent", "Start_1"));
        process.children.push(leaf("bpmn:EndEvent", "End_1"));
        let mut root = leaf("bpmn:Definitions", "Definitions_1");
        root.children.push(process);

        let order: Vec<&str> = root.iter().map(|el| el.type_name()).collect();
        assert_eq!(
            order,
            vec![
                "bpmn:Definitions",
                "bpmn:Process",
                "bpmn:StartEvent",
                "bpmn:EndEvent"
            ]
        );
    }

    #[test]
    fn blank_names_are_treated_as_missing() {
        let mut element = leaf("bpmn:Task", "Task_1");
        element
            .attributes
            .insert("name".to_string(), "   ".to_string());
        assert!(element.name().is_none());
    }
}
