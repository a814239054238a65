//! Well-known class and rel vocabularies used across the framework.

/// Standard entity class tags.
pub mod class {
    /// A plain data resource fragment.
    pub const DATA: &str = "data";
    /// A tabular resource fragment.
    pub const ROWS: &str = "rows";
    /// One row of a tabular fragment.
    pub const ROW: &str = "row";
    /// A card list fragment.
    pub const CARDS: &str = "cards";
    /// One card of a card list.
    pub const CARD: &str = "card";
    /// The filter action of a tabular resource.
    pub const FILTER: &str = "filter";
    /// An index (menu) resource.
    pub const INDEX: &str = "index";
    /// A creation blueprint action.
    pub const BLUEPRINT: &str = "blueprint";
    /// An error rendered as an entity.
    pub const FAULT: &str = "fault";
    /// Marks every entity produced by the render pipeline.
    pub const HYPER: &str = "hyper";
}

/// Standard link/action/child-entity roles.
pub mod rel {
    /// The canonical address of the current resource.
    pub const SELF: &str = "self";
    /// The first page of the current result set.
    pub const FIRST: &str = "first";
    /// The page before the current one.
    pub const PREVIOUS: &str = "previous";
    /// The page after the current one.
    pub const NEXT: &str = "next";
    /// A generic navigation link.
    pub const LINK: &str = "link";
    /// One row child entity.
    pub const ROW: &str = "row";
    /// One card child entity.
    pub const CARD: &str = "card";
    /// An entry of an index resource.
    pub const INDEX: &str = "index";
}
