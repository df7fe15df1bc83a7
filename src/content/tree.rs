//! Rendered content tree
//!
//! An arena of block/inline elements standing in for the rendered note body.
//! Handles are generational: once a subtree is removed its slots are recycled
//! and every old `NodeId` into it goes dead, which is how re-renders look to
//! anything that cached an element.

// ─────────────────────────────────────────────────────────────────────────────
// Handles and Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Non-owning, generational handle to an element in a [`ContentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Axis-aligned rectangle in page coordinates (pixels).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Same rectangle shifted vertically by `dy`.
    pub fn translate_y(&self, dy: f32) -> Self {
        Self {
            top: self.top + dy,
            ..*self
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Elements
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    id: Option<String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Rect,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// Tag name of the synthetic document node every connected element hangs off.
pub const DOCUMENT_TAG: &str = "#document";

/// Arena-backed element tree with a single document node.
#[derive(Debug)]
pub struct ContentTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    document: NodeId,
    mutation_epoch: u64,
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTree {
    /// Create an empty tree holding only the document node.
    pub fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            document: NodeId {
                index: 0,
                generation: 0,
            },
            mutation_epoch: 0,
        };
        tree.document = tree.alloc(Element {
            tag: DOCUMENT_TAG.to_string(),
            id: None,
            text: String::new(),
            parent: None,
            children: Vec::new(),
            rect: Rect::default(),
        });
        tree
    }

    /// The document node (always connected).
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Counter bumped by every structural or text change.
    ///
    /// Layout (rect) updates do not count as mutations.
    pub fn mutation_epoch(&self) -> u64 {
        self.mutation_epoch
    }

    fn alloc(&mut self, element: Element) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.element = Some(element);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                element: Some(element),
            });
            NodeId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    fn get(&self, node: NodeId) -> Option<&Element> {
        self.slots
            .get(node.index as usize)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_ref())
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.slots
            .get_mut(node.index as usize)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_mut())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a detached element with the given tag name (lowercased).
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Element {
            tag: tag.to_ascii_lowercase(),
            id: None,
            text: String::new(),
            parent: None,
            children: Vec::new(),
            rect: Rect::default(),
        })
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    ///
    /// Returns `false` if either handle is dead or the move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return false;
        }
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            return false;
        }
        self.unlink(child);
        if let Some(el) = self.get_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.get_mut(parent) {
            el.children.push(child);
        }
        self.mutation_epoch += 1;
        true
    }

    fn unlink(&mut self, node: NodeId) {
        let parent = self.get(node).and_then(|el| el.parent);
        if let Some(parent) = parent {
            if let Some(el) = self.get_mut(parent) {
                el.children.retain(|c| *c != node);
            }
        }
        if let Some(el) = self.get_mut(node) {
            el.parent = None;
        }
    }

    /// Detach a node from its parent. The node stays alive but disconnected.
    pub fn detach(&mut self, node: NodeId) {
        if node == self.document || self.get(node).is_none() {
            return;
        }
        self.unlink(node);
        self.mutation_epoch += 1;
    }

    /// Detach a node and free its whole subtree; all handles into it go dead.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.document || self.get(node).is_none() {
            return;
        }
        self.unlink(node);
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if let Some(el) = slot.element.take() {
                stack.extend(el.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
            }
        }
        self.mutation_epoch += 1;
    }

    /// Remove every child of `parent` (freeing them).
    pub fn clear_children(&mut self, parent: NodeId) {
        let children = self.children(parent).to_vec();
        for child in children {
            self.remove(child);
        }
    }

    /// Set the element's own text.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(el) = self.get_mut(node) {
            if el.text != text {
                el.text = text.to_string();
                self.mutation_epoch += 1;
            }
        }
    }

    /// Set or clear the element's `id` attribute.
    pub fn set_element_id(&mut self, node: NodeId, id: Option<&str>) {
        if let Some(el) = self.get_mut(node) {
            el.id = id.filter(|s| !s.is_empty()).map(str::to_string);
            self.mutation_epoch += 1;
        }
    }

    /// Set the element's layout rectangle (page coordinates).
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(el) = self.get_mut(node) {
            el.rect = rect;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether the handle still refers to a live element (connected or not).
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    /// Whether the element is alive and reachable from the document node.
    pub fn is_connected(&self, node: NodeId) -> bool {
        if self.get(node).is_none() {
            return false;
        }
        node == self.document || self.ancestors(node).any(|a| a == self.document)
    }

    /// Lowercase tag name, or `None` for a dead handle.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.get(node).map(|el| el.tag.as_str())
    }

    /// The `id` attribute, if set.
    pub fn element_id(&self, node: NodeId) -> Option<&str> {
        self.get(node).and_then(|el| el.id.as_deref())
    }

    /// The element's own text (not including descendants).
    pub fn own_text(&self, node: NodeId) -> &str {
        self.get(node).map(|el| el.text.as_str()).unwrap_or("")
    }

    /// The element's layout rectangle.
    pub fn rect(&self, node: NodeId) -> Option<Rect> {
        self.get(node).map(|el| el.rect)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|el| el.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    /// Iterate over the ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |n| self.parent(*n))
    }

    /// All descendants of `node` in document (preorder) order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Own text of `node` followed by the text of all its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut text = self.own_text(node).to_string();
        for d in self.descendants(node) {
            text.push_str(self.own_text(d));
        }
        text
    }

    /// First connected element with the given `id`, in document order.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.descendants(self.document)
            .into_iter()
            .find(|n| self.element_id(*n) == Some(id))
    }

    /// Full height of the element's content box: its own height or the
    /// furthest descendant bottom, whichever is larger.
    pub fn scroll_height(&self, node: NodeId) -> f32 {
        let Some(rect) = self.rect(node) else {
            return 0.0;
        };
        self.descendants(node)
            .into_iter()
            .filter_map(|d| self.rect(d))
            .map(|r| r.bottom() - rect.top)
            .fold(rect.height, f32::max)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
