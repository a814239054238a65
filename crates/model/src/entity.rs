//! The hypermedia entity graph.

use crate::action::EntityAction;
use crate::link::Link;
use crate::property::PropertyCollection;
use crate::variant::Variant;

/// One hypermedia resource node.
///
/// An entity carries its class tags, an optional title, the roles it plays
/// when nested inside a parent, its ordered properties, nested child
/// entities, available actions, and navigation links. Entities are built
/// fresh per request and never shared.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    /// Ordered, duplicate-free class tags.
    pub classes: Vec<String>,
    /// Human-readable title.
    pub title: Option<String>,
    /// Roles this entity plays relative to its parent (nested entities only).
    pub rels: Vec<String>,
    /// Ordered named values.
    pub properties: PropertyCollection,
    /// Nested child entities, in render order.
    pub entities: Vec<Entity>,
    /// Available mutating operations.
    pub actions: Vec<EntityAction>,
    /// Navigation links.
    pub links: Vec<Link>,
}

impl Entity {
    /// Creates an empty entity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class tag unless already present (case-insensitive).
    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    /// True when the entity carries the class tag, in any casing.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c.eq_ignore_ascii_case(class))
    }

    /// Adds a rel unless already present (case-insensitive).
    pub fn add_rel(&mut self, rel: impl Into<String>) {
        let rel = rel.into();
        if !self.rels.iter().any(|r| r.eq_ignore_ascii_case(&rel)) {
            self.rels.push(rel);
        }
    }

    /// Sets the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Sets a property (replace-in-place semantics, see
    /// [`PropertyCollection::set`]).
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Variant>) {
        self.properties.set(name, value);
    }

    /// Looks a property value up by name, case-insensitively.
    pub fn property(&self, name: &str) -> Option<&Variant> {
        self.properties.get(name)
    }

    /// Appends a child entity.
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Appends an action.
    pub fn add_action(&mut self, action: EntityAction) {
        self.actions.push(action);
    }

    /// Appends a link.
    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Finds the first link playing the given role.
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.has_rel(rel))
    }

    /// Finds an action by name, case-insensitively.
    pub fn action(&self, name: &str) -> Option<&EntityAction> {
        self.actions
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Child entities playing the given role.
    pub fn entities_with_rel<'a>(&'a self, rel: &'a str) -> impl Iterator<Item = &'a Entity> {
        self.entities
            .iter()
            .filter(move |e| e.rels.iter().any(|r| r.eq_ignore_ascii_case(rel)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::rel;

    #[test]
    fn test_class_dedup() {
        let mut entity = Entity::new();
        entity.add_class("order");
        entity.add_class("Order");
        assert_eq!(entity.classes, vec!["order"]);
    }

    #[test]
    fn test_link_lookup_by_rel() {
        let mut entity = Entity::new();
        entity.add_link(Link::new(rel::SELF, "/orders/1"));
        entity.add_link(Link::new(rel::NEXT, "/orders?offset=2"));

        assert_eq!(entity.link(rel::NEXT).map(|l| l.href.as_str()), Some("/orders?offset=2"));
        assert!(entity.link(rel::PREVIOUS).is_none());
    }

    #[test]
    fn test_entities_with_rel() {
        let mut parent = Entity::new();
        let mut row = Entity::new();
        row.add_rel(rel::ROW);
        parent.add_entity(row);
        parent.add_entity(Entity::new());

        assert_eq!(parent.entities_with_rel(rel::ROW).count(), 1);
    }
}
