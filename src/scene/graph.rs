use tracing::trace;

use crate::core::{BBox, Size};
use crate::error::{ChartError, ChartResult};
use crate::render::{DrawCommand, LinePrimitive, RectPrimitive, RenderFrame, TextPrimitive};

use super::{Node, NodeId, NodeKind};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Retained scene graph: an arena of nodes rooted at one group.
///
/// Sibling order is paint order (later siblings paint on top). Hit testing
/// walks the tree front-to-back and only ever returns leaves.
#[derive(Debug, Clone)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    size: Size,
}

impl Scene {
    #[must_use]
    pub fn new(size: Size) -> Self {
        let mut scene = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId::new(0, 0),
            size,
        };
        scene.root = scene.create(NodeKind::Group);
        scene
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Number of live nodes, attached or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    /// Creates a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let node = Node::new(kind);
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId::new(index, slot.generation);
        }
        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId::new(index, 0)
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    #[must_use]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    fn require(&self, id: NodeId) -> ChartResult<&Node> {
        self.node(id)
            .ok_or(ChartError::UnknownNode { index: id.index() })
    }

    fn require_mut(&mut self, id: NodeId) -> ChartResult<&mut Node> {
        self.node_mut(id)
            .ok_or(ChartError::UnknownNode { index: id.index() })
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or_default()
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    pub fn set_translation(&mut self, id: NodeId, x: f64, y: f64) -> ChartResult<()> {
        let node = self.require_mut(id)?;
        node.translation_x = x;
        node.translation_y = y;
        Ok(())
    }

    #[must_use]
    pub fn translation(&self, id: NodeId) -> Option<(f64, f64)> {
        self.node(id)
            .map(|node| (node.translation_x, node.translation_y))
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> ChartResult<()> {
        self.require_mut(id)?.visible = visible;
        Ok(())
    }

    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|node| node.visible)
    }

    /// Appends `child` as the last (topmost) child of `parent`, detaching it
    /// from its current parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> ChartResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` under `parent` immediately before `before`.
    ///
    /// Falls back to appending when `before` is `None` or is not a child of
    /// `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: Option<NodeId>,
    ) -> ChartResult<()> {
        self.require(parent)?;
        self.require(child)?;
        if child == parent || self.is_ancestor(child, parent) {
            return Err(ChartError::InvalidData(
                "scene node cannot be inserted into its own subtree".to_owned(),
            ));
        }

        self.detach(child);
        let parent_node = self.require_mut(parent)?;
        let position = before.and_then(|anchor| {
            parent_node
                .children
                .iter()
                .position(|sibling| *sibling == anchor)
        });
        match position {
            Some(index) => parent_node.children.insert(index, child),
            None => parent_node.children.push(child),
        }
        self.require_mut(child)?.parent = Some(parent);
        trace!(parent = parent.index(), child = child.index(), "scene insert");
        Ok(())
    }

    /// Detaches `child` from `parent`. Returns `false` when it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child);
        true
    }

    /// Detaches and frees `id` with its whole subtree. Returns `false` for
    /// unknown handles.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        if !self.contains(id) || id == self.root {
            return false;
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index() as usize];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index());
            }
        }
        true
    }

    /// Destroys every child of `parent`.
    pub fn clear_children(&mut self, parent: NodeId) {
        let children = self.children(parent).to_vec();
        for child in children {
            self.destroy(child);
        }
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|sibling| *sibling != child);
        }
        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = None;
        }
    }

    fn is_ancestor(&self, candidate: NodeId, mut id: NodeId) -> bool {
        while let Some(parent) = self.parent(id) {
            if parent == candidate {
                return true;
            }
            id = parent;
        }
        false
    }

    /// Bounds of `id`'s visible content in its own local space.
    ///
    /// Child translations are applied; the node's own translation is not.
    #[must_use]
    pub fn bbox(&self, id: NodeId) -> Option<BBox> {
        let node = self.node(id)?;
        if let Some(shape) = node.kind.shape_bbox() {
            return Some(shape);
        }
        node.children
            .iter()
            .filter_map(|child| {
                let child_node = self.node(*child)?;
                if !child_node.visible {
                    return None;
                }
                self.bbox(*child)
                    .map(|bbox| bbox.translated(child_node.translation_x, child_node.translation_y))
            })
            .reduce(BBox::union)
    }

    /// Accumulated translation of `id` and all its ancestors.
    #[must_use]
    pub fn world_translation(&self, id: NodeId) -> (f64, f64) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else {
                break;
            };
            dx += node.translation_x;
            dy += node.translation_y;
            current = node.parent;
        }
        (dx, dy)
    }

    /// Bounds of `id` in surface coordinates.
    #[must_use]
    pub fn world_bbox(&self, id: NodeId) -> Option<BBox> {
        let (dx, dy) = self.world_translation(id);
        self.bbox(id).map(|bbox| bbox.translated(dx, dy))
    }

    /// Returns the topmost pickable leaf under the surface point `(x, y)`
    /// within the subtree rooted at `id`.
    #[must_use]
    pub fn pick_node(&self, id: NodeId, x: f64, y: f64) -> Option<NodeId> {
        let parent_offset = self
            .parent(id)
            .map_or((0.0, 0.0), |parent| self.world_translation(parent));
        self.pick_local(id, x - parent_offset.0, y - parent_offset.1)
    }

    fn pick_local(&self, id: NodeId, x: f64, y: f64) -> Option<NodeId> {
        let node = self.node(id)?;
        if !node.visible {
            return None;
        }
        let local_x = x - node.translation_x;
        let local_y = y - node.translation_y;
        match node.kind.shape_bbox() {
            Some(bbox) => (node.pickable && bbox.contains_point(local_x, local_y)).then_some(id),
            None => node
                .children
                .iter()
                .rev()
                .find_map(|child| self.pick_local(*child, local_x, local_y)),
        }
    }

    /// Flattens the visible tree into back-to-front draw commands.
    #[must_use]
    pub fn render_frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.size);
        self.emit(self.root, 0.0, 0.0, &mut frame);
        frame
    }

    fn emit(&self, id: NodeId, offset_x: f64, offset_y: f64, frame: &mut RenderFrame) {
        let Some(node) = self.node(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        let x = offset_x + node.translation_x;
        let y = offset_y + node.translation_y;
        match &node.kind {
            NodeKind::Group => {
                for child in &node.children {
                    self.emit(*child, x, y, frame);
                }
            }
            NodeKind::Rect(rect) => {
                let primitive =
                    RectPrimitive::new(rect.x + x, rect.y + y, rect.width, rect.height, rect.fill)
                        .with_border(rect.stroke_width, rect.stroke);
                frame.commands.push(DrawCommand::Rect(primitive));
            }
            NodeKind::Line(line) => {
                frame
                    .commands
                    .push(DrawCommand::Line(LinePrimitive::new(
                        line.x1 + x,
                        line.y1 + y,
                        line.x2 + x,
                        line.y2 + y,
                        line.stroke_width,
                        line.color,
                    )));
            }
            NodeKind::Text(text) => {
                if text.text.is_empty() {
                    return;
                }
                frame
                    .commands
                    .push(DrawCommand::Text(TextPrimitive::new(
                        text.text.clone(),
                        text.x + x,
                        text.y + y,
                        text.font_size,
                        text.color,
                        text.align,
                    )));
            }
        }
    }
}
