//! End-to-end pipeline coverage over a small in-memory order catalog.

use folio_model::{DataKind, Link, Record, Variant, class, rel};
use folio_render::{
    CancelToken, FetchContext, FieldAccess, FilterField, HasData, HasFilter, HasRows, Paper,
    PaperResult, RenderConfig, RenderError, RenderPipeline, RouteRegistry,
};

fn catalog() -> Vec<Record> {
    [
        (1, "Alpha", 10.0),
        (2, "Beta", 20.0),
        (3, "Gamma", 30.0),
        (4, "Delta", 40.0),
        (5, "Epsilon", 50.0),
    ]
    .into_iter()
    .map(|(id, name, total)| {
        let mut row = Record::new();
        row.set("Id", id as i64);
        row.set("Name", name);
        row.set("Total", total);
        row
    })
    .collect()
}

#[derive(Default)]
struct OrderList;

impl Paper for OrderList {
    fn type_name(&self) -> &str {
        "orders"
    }
    fn title(&self) -> Option<String> {
        Some("Orders".into())
    }
    fn as_rows(&self) -> Option<&dyn HasRows> {
        Some(self)
    }
    fn as_filter(&self) -> Option<&dyn HasFilter> {
        Some(self)
    }
    fn as_filter_mut(&mut self) -> Option<&mut dyn HasFilter> {
        Some(self)
    }
}

impl HasRows for OrderList {
    fn rows(&self, _ctx: &FetchContext<'_>) -> PaperResult<Option<Vec<Record>>> {
        Ok(Some(catalog()))
    }
    fn row_links(&self, row: &Record) -> Vec<Link> {
        match row.get("Id").and_then(|v| v.as_int()) {
            Some(id) => vec![Link::new(rel::SELF, format!("./{id}"))],
            None => Vec::new(),
        }
    }
}

impl HasFilter for OrderList {
    fn filter_fields(&self) -> Vec<FilterField> {
        vec![
            FilterField::new("name", DataKind::Text),
            FilterField::new("total", DataKind::Decimal),
        ]
    }
}

#[derive(Default)]
struct OrderDetail {
    id: Option<i64>,
}

impl FieldAccess for OrderDetail {
    fn field_names(&self) -> Vec<String> {
        vec!["id".into()]
    }
    fn get_field(&self, name: &str) -> Option<Variant> {
        name.eq_ignore_ascii_case("id")
            .then(|| self.id.map(Variant::Int).unwrap_or(Variant::Null))
    }
    fn set_field(&mut self, name: &str, value: Variant) -> bool {
        if name.eq_ignore_ascii_case("id") {
            self.id = value.coerce(DataKind::Int).and_then(|v| v.as_int());
            self.id.is_some()
        } else {
            false
        }
    }
}

impl Paper for OrderDetail {
    fn type_name(&self) -> &str {
        "order"
    }
    fn as_fields(&self) -> Option<&dyn FieldAccess> {
        Some(self)
    }
    fn as_fields_mut(&mut self) -> Option<&mut dyn FieldAccess> {
        Some(self)
    }
    fn as_data(&self) -> Option<&dyn HasData> {
        Some(self)
    }
}

impl HasData for OrderDetail {
    fn data(&self, _ctx: &FetchContext<'_>) -> PaperResult<Option<Record>> {
        Ok(catalog()
            .into_iter()
            .find(|row| row.get("Id").and_then(|v| v.as_int()) == self.id))
    }
}

fn shop() -> RouteRegistry {
    let registry = RouteRegistry::new();
    registry
        .register("/orders", || Box::new(OrderList))
        .unwrap();
    registry
        .register("/orders/{id}", || Box::new(OrderDetail::default()))
        .unwrap();
    registry
}

fn row_ids(entity: &folio_model::Entity) -> Vec<i64> {
    entity
        .entities_with_rel(rel::ROW)
        .filter_map(|row| row.property("Id")?.as_int())
        .collect()
}

#[test]
fn first_page_renders_window_and_next_link() {
    let pipeline = RenderPipeline::default();
    let entity = pipeline.render(&shop(), "/orders?limit=2&sort%5B%5D=id%3Adesc");

    assert!(entity.has_class(class::HYPER));
    assert!(entity.has_class("orders"));
    assert!(entity.has_class(class::ROWS));
    assert_eq!(entity.title.as_deref(), Some("Orders"));
    assert_eq!(row_ids(&entity), vec![5, 4]);

    // applied sort echoed as metadata
    assert_eq!(
        entity.property("__sort"),
        Some(&Variant::List(vec![Variant::Text("id:desc".into())]))
    );

    // lookahead saw more rows: forward link only
    let next = entity.link(rel::NEXT).expect("next link");
    assert!(next.href.contains("offset=2"));
    assert!(next.href.contains("limit=2"));
    assert!(entity.link(rel::PREVIOUS).is_none());
    assert!(entity.link(rel::FIRST).is_none());
    assert!(entity.link(rel::SELF).is_some());
}

#[test]
fn middle_page_by_number_links_both_ways() {
    let pipeline = RenderPipeline::default();
    let entity = pipeline.render(&shop(), "/orders?limit=2&page=2");

    assert_eq!(row_ids(&entity), vec![3, 4]);
    assert!(entity.link(rel::FIRST).is_some());
    assert_eq!(
        entity.link(rel::PREVIOUS).map(|l| l.href.as_str()),
        Some("/orders?limit=2&page=1")
    );
    assert_eq!(
        entity.link(rel::NEXT).map(|l| l.href.as_str()),
        Some("/orders?limit=2&page=3")
    );
}

#[test]
fn last_page_has_no_next_link() {
    let pipeline = RenderPipeline::default();
    let entity = pipeline.render(&shop(), "/orders?limit=2&page=3");

    assert_eq!(row_ids(&entity), vec![5]);
    assert!(entity.link(rel::NEXT).is_none());
    assert!(entity.link(rel::PREVIOUS).is_some());
}

#[test]
fn filters_apply_before_windowing() {
    let pipeline = RenderPipeline::default();
    // %25 decodes to '%': wildcard match on names containing 'a'
    let entity = pipeline.render(&shop(), "/orders?name=%25a%25&limit=10");

    assert_eq!(row_ids(&entity), vec![1, 2, 3, 4]);
    assert!(entity.link(rel::NEXT).is_none());

    // the filter action echoes the applied value on its field
    let action = entity.action("filter").expect("filter action");
    assert!(action.classes.iter().any(|c| c == class::FILTER));
    let field = action.field("name").expect("name field");
    assert_eq!(field.value, Variant::Text("%a%".into()));
    assert_eq!(field.allow_wildcards, Some(true));
}

#[test]
fn range_filter_spans_min_and_max_parameters() {
    let pipeline = RenderPipeline::default();
    let entity = pipeline.render(&shop(), "/orders?total.min=20&total.max=40");
    assert_eq!(row_ids(&entity), vec![2, 3, 4]);
}

#[test]
fn detail_route_binds_path_capture() {
    let pipeline = RenderPipeline::default();
    let entity = pipeline.render(&shop(), "/orders/3");

    assert!(entity.has_class(class::DATA));
    assert!(entity.has_class("order"));
    assert_eq!(entity.property("Id"), Some(&Variant::Int(3)));
    assert_eq!(entity.property("Name"), Some(&Variant::Text("Gamma".into())));
    assert_eq!(
        entity.link(rel::SELF).map(|l| l.href.as_str()),
        Some("/orders/3")
    );
}

#[test]
fn row_links_resolve_against_current_resource() {
    let pipeline = RenderPipeline::default();
    let entity = pipeline.render(&shop(), "/orders?limit=1");

    let row = entity.entities_with_rel(rel::ROW).next().expect("one row");
    assert_eq!(
        row.link(rel::SELF).map(|l| l.href.as_str()),
        Some("/orders/1")
    );
}

#[test]
fn api_root_prefixes_rooted_hrefs() {
    let config = RenderConfig {
        api_root: "/api".into(),
        ..RenderConfig::default()
    };
    let pipeline = RenderPipeline::new(config);
    let entity = pipeline.render(&shop(), "/orders?limit=1");

    let row = entity.entities_with_rel(rel::ROW).next().expect("one row");
    // "./1" resolves against the current resource, not the API root
    assert_eq!(
        row.link(rel::SELF).map(|l| l.href.as_str()),
        Some("/orders/1")
    );
}

#[test]
fn index_paper_renders_menu_links_and_blueprints() {
    use folio_model::EntityAction;
    use folio_render::{HasBlueprint, HasIndex};

    struct Home;
    impl Paper for Home {
        fn type_name(&self) -> &str {
            "home"
        }
        fn as_index(&self) -> Option<&dyn HasIndex> {
            Some(self)
        }
        fn as_blueprint(&self) -> Option<&dyn HasBlueprint> {
            Some(self)
        }
    }
    impl HasIndex for Home {
        fn index(&self) -> PaperResult<Vec<Link>> {
            Ok(vec![Link::new(rel::LINK, "/orders").with_title("Orders")])
        }
    }
    impl HasBlueprint for Home {
        fn blueprint(&self) -> PaperResult<Vec<EntityAction>> {
            Ok(vec![EntityAction::new("create-order", "/orders")])
        }
    }

    let registry = RouteRegistry::new();
    registry.register("/home", || Box::new(Home)).unwrap();

    let config = RenderConfig {
        api_root: "/api".into(),
        ..RenderConfig::default()
    };
    let entity = RenderPipeline::new(config).render(&registry, "/home");

    assert!(entity.has_class(class::INDEX));
    assert!(entity.has_class(class::BLUEPRINT));

    // the menu entry picks up the index rel and resolves against the API root
    let menu = entity.link(rel::INDEX).expect("index link");
    assert_eq!(menu.href, "/api/orders");
    assert_eq!(menu.title.as_deref(), Some("Orders"));

    let create = entity.action("create-order").expect("blueprint action");
    assert_eq!(create.href, "/api/orders");
}

#[test]
fn rows_lookahead_survives_shorter_cards_fragment() {
    use folio_render::HasCards;

    struct Board;
    impl Paper for Board {
        fn type_name(&self) -> &str {
            "board"
        }
        fn as_rows(&self) -> Option<&dyn HasRows> {
            Some(self)
        }
        fn as_cards(&self) -> Option<&dyn HasCards> {
            Some(self)
        }
    }
    impl HasRows for Board {
        fn rows(&self, _ctx: &FetchContext<'_>) -> PaperResult<Option<Vec<Record>>> {
            Ok(Some(catalog()))
        }
    }
    impl HasCards for Board {
        fn cards(&self, _ctx: &FetchContext<'_>) -> PaperResult<Option<Vec<Record>>> {
            Ok(Some(catalog().into_iter().take(2).collect()))
        }
    }

    let registry = RouteRegistry::new();
    registry.register("/board", || Box::new(Board)).unwrap();

    let entity = RenderPipeline::default().render(&registry, "/board?limit=2");
    assert!(entity.has_class(class::ROWS));
    assert!(entity.has_class(class::CARDS));

    // the rows fragment saw more records even though every card fit the page
    assert!(entity.link(rel::NEXT).is_some());
}

#[test]
fn unknown_path_renders_not_found_fault() {
    let pipeline = RenderPipeline::default();
    let entity = pipeline.render(&shop(), "/nowhere");

    assert!(entity.has_class(class::FAULT));
    assert_eq!(entity.property("Status"), Some(&Variant::Int(404)));
    let message = entity
        .property("Message")
        .and_then(|v| v.as_text())
        .unwrap();
    assert!(message.contains("/nowhere"));
}

#[test]
fn fired_cancel_token_renders_cancelled_fault() {
    let pipeline = RenderPipeline::default();
    let cancel = CancelToken::new();
    cancel.cancel();

    let error = pipeline
        .try_render(&shop(), "/orders", cancel)
        .expect_err("cancelled");
    assert!(matches!(error, RenderError::Cancelled));
    assert_eq!(error.to_entity().property("Status"), Some(&Variant::Int(499)));
}

#[test]
fn failing_source_becomes_convention_fault() {
    struct Broken;
    impl Paper for Broken {
        fn type_name(&self) -> &str {
            "broken"
        }
        fn as_rows(&self) -> Option<&dyn HasRows> {
            Some(self)
        }
    }
    impl HasRows for Broken {
        fn rows(&self, _ctx: &FetchContext<'_>) -> PaperResult<Option<Vec<Record>>> {
            Err("backing store unreachable".into())
        }
    }

    let registry = RouteRegistry::new();
    registry.register("/broken", || Box::new(Broken)).unwrap();

    let entity = RenderPipeline::default().render(&registry, "/broken");
    assert!(entity.has_class(class::FAULT));
    assert_eq!(entity.property("Status"), Some(&Variant::Int(500)));
    let message = entity
        .property("Message")
        .and_then(|v| v.as_text())
        .unwrap();
    assert!(message.contains("rows failed on broken"));
    assert!(message.contains("backing store unreachable"));
}

#[test]
fn rendered_entity_serializes_to_wire_dialect() {
    let pipeline = RenderPipeline::default();
    let json = pipeline
        .render_json(&shop(), "/orders/3")
        .expect("serializable");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["properties"]["id"], serde_json::json!(3));
    assert_eq!(value["properties"]["name"], serde_json::json!("Gamma"));
    assert!(
        value["class"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("data"))
    );
}
