//! Depth-first, pre-order walks over the layer/group tree.
//!
//! Each node yields its layers, then its objects, then descends into its
//! groups in order. Walks borrow the tree and allocate only their stack.

use crate::model::group::Group;
use crate::model::layer::Layer;
use crate::model::object::TiledObject;

/// One visited node: the map root (no `group`) or a group.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// `None` for the map root.
    pub group: Option<&'a Group>,
    /// Direct child layers.
    pub layers: &'a [Layer],
    /// Loose objects attached to the node.
    pub objects: &'a [TiledObject],
}

impl<'a> Frame<'a> {
    /// Objects held by this node's object layers, then its own loose objects.
    pub fn all_objects(self) -> impl Iterator<Item = &'a TiledObject> + 'a {
        self.layers
            .iter()
            .flat_map(|l| l.objects().iter())
            .chain(self.objects.iter())
    }
}

/// Lazy pre-order iterator over the nodes of a layer tree.
pub struct GroupWalk<'a> {
    root: Option<Frame<'a>>,
    root_groups: &'a [Group],
    stack: Vec<std::slice::Iter<'a, Group>>,
}

impl<'a> GroupWalk<'a> {
    pub(crate) fn new(layers: &'a [Layer], objects: &'a [TiledObject], groups: &'a [Group]) -> Self {
        GroupWalk {
            root: Some(Frame {
                group: None,
                layers,
                objects,
            }),
            root_groups: groups,
            stack: Vec::new(),
        }
    }

    /// Walks a subtree, starting with `group` itself.
    pub fn from_group(group: &'a Group) -> Self {
        GroupWalk {
            root: Some(Frame {
                group: Some(group),
                layers: &group.layers,
                objects: &group.objects,
            }),
            root_groups: &group.groups,
            stack: Vec::new(),
        }
    }
}

impl<'a> Iterator for GroupWalk<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Frame<'a>> {
        if let Some(root) = self.root.take() {
            self.stack.push(self.root_groups.iter());
            return Some(root);
        }
        while let Some(top) = self.stack.last_mut() {
            if let Some(g) = top.next() {
                self.stack.push(g.groups.iter());
                return Some(Frame {
                    group: Some(g),
                    layers: &g.layers,
                    objects: &g.objects,
                });
            }
            self.stack.pop();
        }
        None
    }
}

/// Every layer reached by `walk`.
pub fn layers<'a>(walk: GroupWalk<'a>) -> impl Iterator<Item = &'a Layer> + 'a {
    walk.flat_map(|f| f.layers.iter())
}

/// Every object reached by `walk`, see [`Frame::all_objects`].
pub fn objects<'a>(walk: GroupWalk<'a>) -> impl Iterator<Item = &'a TiledObject> + 'a {
    walk.flat_map(Frame::all_objects)
}

/// Every group reached by `walk`, skipping the map root.
pub fn groups<'a>(walk: GroupWalk<'a>) -> impl Iterator<Item = &'a Group> + 'a {
    walk.filter_map(|f| f.group)
}
