use crate::error::{MapError, Result};
use std::fmt;
use std::str::FromStr;

/// The value tag of a custom property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PropertyType {
    /// `true` / `false`.
    Bool,
    /// Integer.
    Int,
    /// Floating point.
    Float,
    /// Free text; the tag when none is written.
    #[default]
    String,
    /// `#AARRGGBB`.
    Color,
    /// Path relative to the map.
    File,
    /// Object id reference.
    Object,
    /// Instance of a user-defined class.
    Class,
}

impl PropertyType {
    /// The tag as written in map files.
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Bool => "bool",
            PropertyType::Int => "int",
            PropertyType::Float => "float",
            PropertyType::String => "string",
            PropertyType::Color => "color",
            PropertyType::File => "file",
            PropertyType::Object => "object",
            PropertyType::Class => "class",
        }
    }
}

impl FromStr for PropertyType {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "bool" => PropertyType::Bool,
            "int" => PropertyType::Int,
            "float" => PropertyType::Float,
            "string" => PropertyType::String,
            "color" => PropertyType::Color,
            "file" => PropertyType::File,
            "object" => PropertyType::Object,
            "class" => PropertyType::Class,
            other => {
                return Err(MapError::malformed(
                    "property",
                    format!("unknown property type '{other}'"),
                ))
            }
        })
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A custom property. The value is kept as written; `kind` says how to read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Unique within its [`Properties`].
    pub name: String,
    /// Value tag.
    pub kind: PropertyType,
    /// Custom class name, only for `PropertyType::Class`.
    pub property_type: Option<String>,
    /// Raw value text.
    pub value: String,
}

impl Property {
    /// A property with no class name.
    pub fn new(name: impl Into<String>, kind: PropertyType, value: impl Into<String>) -> Self {
        Property {
            name: name.into(),
            kind,
            property_type: None,
            value: value.into(),
        }
    }

    /// Builds a property from attribute strings, defaulting the tag to `string`.
    pub fn from_attributes(
        name: &str,
        kind: Option<&str>,
        property_type: Option<&str>,
        value: &str,
    ) -> Result<Self> {
        if name.is_empty() {
            return Err(MapError::malformed("property", "name is empty"));
        }
        let kind = match kind {
            Some(k) if !k.is_empty() => k.parse()?,
            _ => PropertyType::default(),
        };
        let property_type = match (kind, property_type) {
            (PropertyType::Class, Some(t)) if !t.is_empty() => Some(t.to_owned()),
            (PropertyType::Class, _) => None,
            (_, Some(t)) if !t.is_empty() => {
                return Err(MapError::malformed(
                    format!("property '{name}'"),
                    format!("propertytype '{t}' given for non-class type '{kind}'"),
                ))
            }
            _ => None,
        };
        Ok(Property {
            name: name.to_owned(),
            kind,
            property_type,
            value: value.to_owned(),
        })
    }
}

/// Ordered property collection with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<Property>);

impl Properties {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a property. Fails if the name is already present.
    pub fn insert(&mut self, prop: Property) -> Result<()> {
        if self.get(&prop.name).is_some() {
            return Err(MapError::malformed(
                format!("property '{}'", prop.name),
                "duplicate name",
            ));
        }
        self.0.push(prop);
        Ok(())
    }

    /// Property named `name`.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.0.iter().find(|p| p.name == name)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No properties at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Properties in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.0.iter()
    }

    /// Raw value text, whatever the tag.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).map(|p| p.value.as_str())
    }

    /// Accepts `true`/`false` and `1`/`0`.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)?.value.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    /// Value parsed as an integer.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name)?.value.trim().parse().ok()
    }

    /// Like [`Properties::get_i64`], `None` when out of `i32` range.
    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get_i64(name).and_then(|v| i32::try_from(v).ok())
    }

    /// Value parsed as a float.
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        self.get(name)?.value.trim().parse().ok()
    }
}

impl TryFrom<Vec<Property>> for Properties {
    type Error = MapError;

    fn try_from(props: Vec<Property>) -> Result<Self> {
        let mut out = Properties::new();
        for p in props {
            out.insert(p)?;
        }
        Ok(out)
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_type_defaults_to_string() {
        let p = Property::from_attributes("theme", None, None, "forest").unwrap();
        assert_eq!(p.kind, PropertyType::String);
        assert_eq!(p.property_type, None);
    }

    #[test]
    fn class_keeps_custom_type_name() {
        let p = Property::from_attributes("stats", Some("class"), Some("Stats"), "{}").unwrap();
        assert_eq!(p.kind, PropertyType::Class);
        assert_eq!(p.property_type.as_deref(), Some("Stats"));
    }

    #[test]
    fn custom_type_name_on_plain_type_is_malformed() {
        let err = Property::from_attributes("hp", Some("int"), Some("Stats"), "3").unwrap_err();
        assert!(matches!(err, MapError::MalformedEntity { .. }));
    }

    #[test]
    fn rejects_unknown_tag_and_empty_name() {
        assert!(Property::from_attributes("x", Some("vector"), None, "").is_err());
        assert!(Property::from_attributes("", None, None, "v").is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut props = Properties::new();
        props.insert(Property::new("a", PropertyType::Int, "1")).unwrap();
        let err = props.insert(Property::new("a", PropertyType::Int, "2")).unwrap_err();
        assert!(matches!(err, MapError::MalformedEntity { .. }));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn typed_getters_read_raw_values() {
        let props = Properties::try_from(vec![
            Property::new("solid", PropertyType::Bool, "true"),
            Property::new("difficulty", PropertyType::Int, "3"),
            Property::new("big_id", PropertyType::Object, "5000000000"),
            Property::new("gravity", PropertyType::Float, "9.8"),
        ])
        .unwrap();

        assert_eq!(props.get_bool("solid"), Some(true));
        assert_eq!(props.get_i32("difficulty"), Some(3));
        assert_eq!(props.get_i64("big_id"), Some(5_000_000_000));
        assert_eq!(props.get_i32("big_id"), None);
        assert_eq!(props.get_f32("gravity"), Some(9.8));
        assert_eq!(props.get_str("missing"), None);
    }
}
