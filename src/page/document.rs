//! Document - In-Memory DOM Snapshot

use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Document shared between the scheduler's strategies and chart controllers
pub type SharedDocument = Arc<RwLock<Document>>;

/// A single element of the DOM contract
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: AHashMap<String, String>,
    /// Current value for form controls
    pub value: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Snapshot of the page: URL path, connectivity flag and elements
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    path: String,
    /// Mirrors `navigator.onLine`
    pub online: bool,
    elements: Vec<Element>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Document {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            online: true,
            elements: Vec::new(),
        }
    }

    /// Wrap into a shareable handle
    pub fn into_shared(self) -> SharedDocument {
        Arc::new(RwLock::new(self))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.push(element);
        self
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id.as_deref() == Some(id))
    }

    pub fn element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id.as_deref() == Some(id))
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.element_by_id(id).is_some()
    }

    /// Whether any element carries `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.elements.iter().any(|e| e.has_class(class))
    }

    pub fn elements_with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements.iter().filter(move |e| e.has_class(class))
    }

    pub fn first_with_class_mut(&mut self, class: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.has_class(class))
    }

    pub fn attribute(&self, id: &str, name: &str) -> Option<&str> {
        self.element_by_id(id).and_then(|e| e.attr(name))
    }

    /// Set an attribute; returns false when the element does not exist
    pub fn set_attribute(&mut self, id: &str, name: &str, value: impl Into<String>) -> bool {
        match self.element_by_id_mut(id) {
            Some(element) => {
                element.attributes.insert(name.to_string(), value.into());
                true
            }
            None => false,
        }
    }

    pub fn input_value(&self, id: &str) -> Option<&str> {
        self.element_by_id(id).and_then(|e| e.value.as_deref())
    }

    pub fn set_input_value(&mut self, id: &str, value: impl Into<String>) -> bool {
        match self.element_by_id_mut(id) {
            Some(element) => {
                element.value = Some(value.into());
                true
            }
            None => false,
        }
    }
}
