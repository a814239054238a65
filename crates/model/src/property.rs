//! Ordered, case-insensitive property collections.

use crate::variant::Variant;

/// The prefix marking a property as metadata.
///
/// Metadata properties always iterate (and serialize) after plain
/// properties, whatever order they were inserted in.
pub const META_PREFIX: &str = "__";

/// One named value inside a [`PropertyCollection`].
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    value: Variant,
}

impl Property {
    /// Creates a property.
    pub fn new(name: impl Into<String>, value: impl Into<Variant>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The property name, as first inserted.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The property value.
    pub fn value(&self) -> &Variant {
        &self.value
    }

    /// True if the name carries the metadata prefix.
    pub fn is_meta(&self) -> bool {
        self.name.starts_with(META_PREFIX)
    }
}

/// An ordered list of named values with case-insensitive unique names.
///
/// Setting a name that already exists (in any casing) replaces its value in
/// place without moving it or growing the collection. Iteration yields plain
/// properties first, in insertion order, then metadata properties (`__`
/// prefix), also in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyCollection {
    items: Vec<Property>,
}

impl PropertyCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of properties held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if no properties are held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sets a property, replacing the value in place when the name already
    /// exists (case-insensitive). The first-inserted spelling of the name is
    /// kept.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Variant>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => self.items[i].value = value,
            None => self.items.push(Property { name, value }),
        }
    }

    /// Looks a value up by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&Variant> {
        self.position(name).map(|i| &self.items[i].value)
    }

    /// Looks a value up mutably by name, case-insensitively.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variant> {
        self.position(name).map(|i| &mut self.items[i].value)
    }

    /// True when a property with this name exists, in any casing.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Removes a property by name, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Variant> {
        self.position(name).map(|i| self.items.remove(i).value)
    }

    /// Iterates plain properties first (insertion order), then metadata
    /// properties (insertion order).
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.items
            .iter()
            .filter(|p| !p.is_meta())
            .chain(self.items.iter().filter(|p| p.is_meta()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
    }
}

impl<N: Into<String>, V: Into<Variant>> FromIterator<(N, V)> for PropertyCollection {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut collection = PropertyCollection::new();
        for (name, value) in iter {
            collection.set(name, value);
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut props = PropertyCollection::new();
        props.set("Id", 1);
        props.set("Name", "first");
        props.set("ID", 2);

        assert_eq!(props.len(), 2);
        assert_eq!(props.get("id"), Some(&Variant::Int(2)));
        // Position and spelling of the first insert are preserved.
        let names: Vec<_> = props.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["Id", "Name"]);
    }

    #[test]
    fn test_meta_properties_iterate_last() {
        let mut props = PropertyCollection::new();
        props.set("__meta", "m1");
        props.set("Id", 1);
        props.set("__sort", "id");
        props.set("Name", "n");

        let names: Vec<_> = props.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["Id", "Name", "__meta", "__sort"]);
    }

    #[test]
    fn test_get_case_insensitive() {
        let mut props = PropertyCollection::new();
        props.set("CustomerName", "Ada");
        assert_eq!(
            props.get("customername"),
            Some(&Variant::Text("Ada".into()))
        );
        assert!(props.get("missing").is_none());
    }

    #[test]
    fn test_from_iterator() {
        let props: PropertyCollection = vec![("A", 1), ("B", 2)].into_iter().collect();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("b"), Some(&Variant::Int(2)));
    }
}
