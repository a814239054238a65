//! The route registry: templates mapped to domain-object factories.

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::RenderError;
use crate::paper::Paper;
use crate::uri::UriTemplate;
use crate::uri::template::base_name;

/// Builds a fresh domain object for one request.
pub type PaperFactory = Box<dyn Fn() -> Box<dyn Paper> + Send + Sync>;

struct Route {
    template: UriTemplate,
    type_name: String,
    factory: PaperFactory,
}

/// Maps request paths to domain-object factories.
///
/// Registration validates the template and checks that every placeholder has
/// a same-named field on the routed type; a route failing either check is
/// excluded and the fault reported once, here, rather than surfacing on every
/// request.
///
/// The registry is explicit shared state: hosts build one, hand it to the
/// pipeline, and may keep registering routes while serving.
#[derive(Default)]
pub struct RouteRegistry {
    routes: RwLock<Vec<Route>>,
}

impl RouteRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route. The factory is invoked once immediately to probe
    /// placeholder bindings, then once per matching request.
    pub fn register<F>(&self, template: &str, factory: F) -> Result<(), RenderError>
    where
        F: Fn() -> Box<dyn Paper> + Send + Sync + 'static,
    {
        let template = UriTemplate::compile(template).inspect_err(|fault| {
            warn!(%fault, "route excluded");
        })?;

        let probe = factory();
        let type_name = probe.type_name().to_string();
        for name in template.names() {
            let base = base_name(name);
            let bound = probe
                .as_fields()
                .map(|fields| fields.has_field(base))
                .unwrap_or(false);
            if !bound {
                let fault = RenderError::Binding {
                    type_name: type_name.clone(),
                    placeholder: base.to_string(),
                };
                warn!(template = template.template(), %fault, "route excluded");
                return Err(fault);
            }
        }

        debug!(
            template = template.template(),
            type_name = %type_name,
            "route registered"
        );
        self.routes.write().push(Route {
            template,
            type_name,
            factory: Box::new(factory),
        });
        Ok(())
    }

    /// Registers a route at the template derived from the type name (see
    /// [`derive_template`]).
    pub fn register_derived<F>(&self, factory: F) -> Result<(), RenderError>
    where
        F: Fn() -> Box<dyn Paper> + Send + Sync + 'static,
    {
        let template = derive_template(factory().type_name());
        self.register(&template, factory)
    }

    /// Finds the first route matching a path, instantiating its domain
    /// object. Routes match in registration order.
    pub fn resolve(&self, path: &str) -> Option<(Box<dyn Paper>, UriTemplate)> {
        let routes = self.routes.read();
        for route in routes.iter() {
            if route.template.matches(path).is_some() {
                debug!(
                    path,
                    template = route.template.template(),
                    type_name = %route.type_name,
                    "route matched"
                );
                return Some(((route.factory)(), route.template.clone()));
            }
        }
        None
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    /// True when no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }
}

/// Derives a route template from a type name: path segments per `::`
/// module segment, kebab-cased. `shop::OrderList` becomes
/// `/shop/order-list`.
pub fn derive_template(type_name: &str) -> String {
    let mut template = String::new();
    for segment in type_name.split("::") {
        if segment.is_empty() {
            continue;
        }
        template.push('/');
        for (i, ch) in segment.chars().enumerate() {
            if ch.is_ascii_uppercase() {
                if i > 0 {
                    template.push('-');
                }
                template.push(ch.to_ascii_lowercase());
            } else {
                template.push(ch);
            }
        }
    }
    if template.is_empty() {
        "/".to_string()
    } else {
        template
    }
}
