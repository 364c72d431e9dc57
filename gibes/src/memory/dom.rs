use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::selector::{Selector, Subject};
use crate::dom::{
    Display, Document, Element, Event, EventKind, Handler, Observe, Outcome, Visibility,
};

const FORM_CONTROLS: [&str; 3] = ["input", "select", "textarea"];

/// Markup for one element, appended with [`MemoryDocument::append`].
#[derive(Debug, Clone, Default)]
pub struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    value: String,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn data(self, key: &str, value: &str) -> Self {
        self.attr(&format!("data-{}", key), value)
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Initial value of a form control, restored on form reset.
    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }
}

struct NodeData {
    node: Node,
    current_value: String,
    display: Option<Display>,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl NodeData {
    fn is_control(&self) -> bool {
        FORM_CONTROLS.contains(&self.node.tag.as_str())
    }
}

impl Subject for NodeData {
    fn tag(&self) -> &str {
        &self.node.tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.node.attrs.get(name).map(String::as_str)
    }

    fn has_class(&self, class: &str) -> bool {
        self.node.classes.iter().any(|c| c == class)
    }
}

type SharedHandler = Rc<RefCell<Handler<MemoryElement>>>;
type SharedObserver = Rc<RefCell<Box<dyn FnMut(Visibility) -> Observe>>>;

struct Listener {
    node: usize,
    kind: EventKind,
    handler: SharedHandler,
}

struct Observer {
    id: usize,
    node: usize,
    callback: SharedObserver,
}

#[derive(Default)]
struct Tree {
    nodes: Vec<NodeData>,
    roots: Vec<usize>,
    listeners: Vec<Listener>,
    observers: Vec<Observer>,
    next_observer: usize,
}

impl Tree {
    /// Pre-order walk starting at `from`, or over the whole document.
    fn document_order(&self, from: Option<usize>) -> Vec<usize> {
        let mut order = Vec::new();
        let mut stack: Vec<usize> = match from {
            Some(index) => self.nodes[index].children.iter().rev().copied().collect(),
            None => self.roots.iter().rev().copied().collect(),
        };
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(self.nodes[index].children.iter().rev().copied());
        }
        order
    }

    fn ancestors(&self, index: usize) -> Vec<usize> {
        let mut ancestors = Vec::new();
        let mut current = self.nodes[index].parent;
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.nodes[parent].parent;
        }
        ancestors
    }

    fn matches(&self, index: usize, selector: &Selector) -> bool {
        let ancestors: Vec<&NodeData> = self
            .ancestors(index)
            .into_iter()
            .map(|i| &self.nodes[i])
            .collect();
        selector.matches(&self.nodes[index], &ancestors)
    }

    fn select(&self, from: Option<usize>, selector: &str) -> Vec<usize> {
        let Some(selector) = Selector::parse(selector) else {
            tracing::warn!("Unsupported selector: {}", selector);
            return Vec::new();
        };
        self.document_order(from)
            .into_iter()
            .filter(|index| self.matches(*index, &selector))
            .collect()
    }
}

/// A headless document for driving the behaviors without a browser.
#[derive(Clone, Default)]
pub struct MemoryDocument {
    tree: Rc<RefCell<Tree>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, parent: Option<&MemoryElement>, node: Node) -> MemoryElement {
        let mut tree = self.tree.borrow_mut();
        let index = tree.nodes.len();
        tree.nodes.push(NodeData {
            current_value: node.value.clone(),
            node,
            display: None,
            parent: parent.map(|p| p.index),
            children: Vec::new(),
        });
        match parent {
            Some(parent) => tree.nodes[parent.index].children.push(index),
            None => tree.roots.push(index),
        }
        self.element(index)
    }

    /// Reports a new visible ratio for `target`. Any ratio above zero counts
    /// as intersecting.
    pub fn set_visibility(&self, target: &MemoryElement, ratio: f64) {
        self.report_visibility(
            target,
            Visibility {
                ratio,
                intersecting: ratio > 0.0,
            },
        );
    }

    /// Delivers one intersection report for `target` to its observers.
    pub fn report_visibility(&self, target: &MemoryElement, visibility: Visibility) {
        let observers: Vec<(usize, SharedObserver)> = self
            .tree
            .borrow()
            .observers
            .iter()
            .filter(|o| o.node == target.index)
            .map(|o| (o.id, o.callback.clone()))
            .collect();

        for (id, callback) in observers {
            let decision = (callback.borrow_mut())(visibility);
            if decision == Observe::Stop {
                self.tree.borrow_mut().observers.retain(|o| o.id != id);
            }
        }
    }

    pub fn observer_count(&self) -> usize {
        self.tree.borrow().observers.len()
    }

    fn element(&self, index: usize) -> MemoryElement {
        MemoryElement {
            tree: self.tree.clone(),
            index,
        }
    }
}

impl Document for MemoryDocument {
    type Element = MemoryElement;

    fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        let tree = self.tree.borrow();
        let index = tree
            .document_order(None)
            .into_iter()
            .find(|index| tree.nodes[*index].attr("id") == Some(id))?;
        Some(self.element(index))
    }

    fn query_all(&self, selector: &str) -> Vec<MemoryElement> {
        let indices = self.tree.borrow().select(None, selector);
        indices.into_iter().map(|index| self.element(index)).collect()
    }

    fn observe_visibility(
        &self,
        target: &MemoryElement,
        _threshold: f64,
        callback: Box<dyn FnMut(Visibility) -> Observe>,
    ) {
        let mut tree = self.tree.borrow_mut();
        let id = tree.next_observer;
        tree.next_observer += 1;
        tree.observers.push(Observer {
            id,
            node: target.index,
            callback: Rc::new(RefCell::new(callback)),
        });
    }
}

#[derive(Clone)]
pub struct MemoryElement {
    tree: Rc<RefCell<Tree>>,
    index: usize,
}

impl std::fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tree = self.tree.borrow();
        let node = &tree.nodes[self.index].node;
        f.debug_struct("MemoryElement")
            .field("tag", &node.tag)
            .field("attrs", &node.attrs)
            .field("classes", &node.classes)
            .finish()
    }
}

impl MemoryElement {
    pub fn display(&self) -> Option<Display> {
        self.tree.borrow().nodes[self.index].display
    }

    pub fn value(&self) -> String {
        self.tree.borrow().nodes[self.index].current_value.clone()
    }

    /// Clicks and reports whether a handler cancelled the default action.
    pub fn dispatch_click(&self) -> Outcome {
        self.dispatch(EventKind::Click)
    }

    pub fn submit(&self) -> Outcome {
        self.dispatch(EventKind::Submit)
    }

    /// Runs the listeners on this element and then on each ancestor.
    fn dispatch(&self, kind: EventKind) -> Outcome {
        let handlers: Vec<SharedHandler> = {
            let tree = self.tree.borrow();
            let mut path = vec![self.index];
            path.extend(tree.ancestors(self.index));
            path.iter()
                .flat_map(|node| {
                    tree.listeners
                        .iter()
                        .filter(move |l| l.node == *node && l.kind == kind)
                        .map(|l| l.handler.clone())
                })
                .collect()
        };

        let event = Event {
            kind,
            target: Some(self.clone()),
        };
        let mut outcome = Outcome::Proceed;
        for handler in handlers {
            if (handler.borrow_mut())(&event) == Outcome::PreventDefault {
                outcome = Outcome::PreventDefault;
            }
        }
        outcome
    }

    fn with_node<T>(&self, f: impl FnOnce(&mut NodeData) -> T) -> T {
        f(&mut self.tree.borrow_mut().nodes[self.index])
    }
}

impl Element for MemoryElement {
    fn tag_name(&self) -> String {
        self.with_node(|n| n.node.tag.to_ascii_uppercase())
    }

    fn data(&self, key: &str) -> Option<String> {
        self.with_node(|n| n.attr(&format!("data-{}", key)).map(str::to_string))
    }

    fn set_text(&self, text: &str) {
        self.with_node(|n| n.node.text = text.to_string());
    }

    fn text(&self) -> String {
        self.with_node(|n| n.node.text.clone())
    }

    fn set_display(&self, display: Display) {
        self.with_node(|n| n.display = Some(display));
    }

    fn add_class(&self, class: &str) {
        self.with_node(|n| {
            if !n.has_class(class) {
                n.node.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, class: &str) {
        self.with_node(|n| n.node.classes.retain(|c| c != class));
    }

    fn has_class(&self, class: &str) -> bool {
        self.with_node(|n| Subject::has_class(n, class))
    }

    fn set_value(&self, value: &str) {
        self.with_node(|n| {
            if n.is_control() {
                n.current_value = value.to_string();
            }
        });
    }

    fn form_entries(&self) -> Vec<(String, String)> {
        let tree = self.tree.borrow();
        if tree.nodes[self.index].node.tag != "form" {
            return Vec::new();
        }
        tree.document_order(Some(self.index))
            .into_iter()
            .map(|index| &tree.nodes[index])
            .filter(|n| n.is_control())
            .filter_map(|n| Some((n.attr("name")?.to_string(), n.current_value.clone())))
            .collect()
    }

    fn reset_form(&self) {
        let mut tree = self.tree.borrow_mut();
        if tree.nodes[self.index].node.tag != "form" {
            return;
        }
        for index in tree.document_order(Some(self.index)) {
            let node = &mut tree.nodes[index];
            if node.is_control() {
                node.current_value = node.node.value.clone();
            }
        }
    }

    fn query_all(&self, selector: &str) -> Vec<Self> {
        let indices = self.tree.borrow().select(Some(self.index), selector);
        indices
            .into_iter()
            .map(|index| MemoryElement {
                tree: self.tree.clone(),
                index,
            })
            .collect()
    }

    fn click(&self) {
        self.dispatch_click();
    }

    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree) && self.index == other.index
    }

    fn listen(&self, kind: EventKind, handler: Handler<Self>) {
        self.tree.borrow_mut().listeners.push(Listener {
            node: self.index,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_order_queries() {
        let document = MemoryDocument::new();
        let list = document.append(None, Node::new("ul").id("list"));
        let first = document.append(Some(&list), Node::new("li").class("item").text("one"));
        document.append(Some(&first), Node::new("li").class("item").text("nested"));
        document.append(Some(&list), Node::new("li").class("item").text("two"));

        let texts: Vec<String> = document.query_all("#list .item").iter().map(|e| e.text()).collect();
        assert_eq!(texts, vec!["one", "nested", "two"]);

        let scoped: Vec<String> = first.query_all("li").iter().map(|e| e.text()).collect();
        assert_eq!(scoped, vec!["nested"]);
    }

    #[test]
    fn test_click_bubbles_with_original_target() {
        let document = MemoryDocument::new();
        let outer = document.append(None, Node::new("div"));
        let inner = document.append(Some(&outer), Node::new("button"));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        outer.listen(
            EventKind::Click,
            Box::new(move |event| {
                log.borrow_mut().push(event.target.as_ref().map(|t| t.tag_name()));
                Outcome::PreventDefault
            }),
        );

        assert_eq!(inner.dispatch_click(), Outcome::PreventDefault);
        assert_eq!(*seen.borrow(), vec![Some("BUTTON".to_string())]);
    }

    #[test]
    fn test_form_reset_restores_defaults() {
        let document = MemoryDocument::new();
        let form = document.append(None, Node::new("form"));
        let email = document.append(Some(&form), Node::new("input").attr("name", "email"));
        let plan = document.append(Some(&form), Node::new("input").attr("name", "plan").value("basic"));
        document.append(Some(&form), Node::new("input").value("unnamed"));

        email.set_value("a@b.c");
        plan.set_value("pro");
        assert_eq!(
            form.form_entries(),
            vec![
                ("email".to_string(), "a@b.c".to_string()),
                ("plan".to_string(), "pro".to_string())
            ]
        );

        form.reset_form();
        assert_eq!(email.value(), "");
        assert_eq!(plan.value(), "basic");
    }
}
