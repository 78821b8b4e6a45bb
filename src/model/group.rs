use crate::model::layer::Layer;
use crate::model::object::TiledObject;
use crate::model::property::Properties;

/// A folder of layers, loose objects and nested groups. Children are owned, so the tree has no cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Shares the id space of layers.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Hidden groups hide all their children in the editor.
    pub visible: bool,
    /// Locked against editing.
    pub locked: bool,
    /// Custom properties.
    pub properties: Properties,
    /// Direct child layers, in file order.
    pub layers: Vec<Layer>,
    /// Objects attached to the group itself.
    pub objects: Vec<TiledObject>,
    /// Nested groups, in file order.
    pub groups: Vec<Group>,
}

impl Group {
    /// An empty, visible, unlocked group.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Group {
            id,
            name: name.into(),
            visible: true,
            locked: false,
            properties: Properties::new(),
            layers: Vec::new(),
            objects: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Appends a child layer.
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Appends a loose object.
    pub fn with_object(mut self, object: TiledObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Appends a nested group.
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }
}
