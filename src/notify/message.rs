//! Rendering of notification texts.

use handlebars::Handlebars;
use serde::Serialize;

use crate::monitor::Transition;
use crate::site::Site;

use super::DeliveryError;

const DOWN: &str = "down";
const RECOVERED: &str = "recovered";

/// Compiled Handlebars templates for the two transition messages.
///
/// Templates see `{{url}}` and `{{owner}}`. Output is not HTML-escaped,
/// since it is sent as plain chat text.
#[derive(Debug, Clone)]
pub struct MessageTemplates {
    registry: Handlebars<'static>,
}

/// Template variables for one site.
#[derive(Serialize)]
struct MessageData<'a> {
    url: &'a str,
    owner: &'a str,
}

impl MessageTemplates {
    /// Default text sent when a site goes down.
    pub const DEFAULT_DOWN: &'static str = "{{url}} it's down 🚨";

    /// Default text sent when a site comes back online.
    pub const DEFAULT_RECOVERED: &'static str = "{{url}} it's back online ✅";

    /// Compiles the given templates.
    ///
    /// # Errors
    ///
    /// Returns a description of the first template that fails to compile.
    pub fn new(down: &str, recovered: &str) -> Result<Self, String> {
        compile(down, recovered).map(|registry| Self { registry })
    }

    /// Renders the message announcing `transition` for `site`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Template`] if rendering fails.
    pub fn render(&self, transition: Transition, site: &Site) -> Result<String, DeliveryError> {
        let name = match transition {
            Transition::WentDown => DOWN,
            Transition::Recovered => RECOVERED,
        };
        let data = MessageData {
            url: site.url.as_str(),
            owner: site.owner_id.as_str(),
        };

        self.registry
            .render(name, &data)
            .map_err(|e| DeliveryError::Template(e.to_string()))
    }
}

impl Default for MessageTemplates {
    fn default() -> Self {
        match compile(Self::DEFAULT_DOWN, Self::DEFAULT_RECOVERED) {
            Ok(registry) => Self { registry },
            Err(e) => {
                tracing::error!("Built-in message templates failed to compile: {e}");
                Self {
                    registry: Handlebars::new(),
                }
            }
        }
    }
}

/// Builds a registry holding both templates, without HTML escaping.
fn compile(down: &str, recovered: &str) -> Result<Handlebars<'static>, String> {
    let mut registry = Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(DOWN, down)
        .map_err(|e| format!("down template: {e}"))?;
    registry
        .register_template_string(RECOVERED, recovered)
        .map_err(|e| format!("recovered template: {e}"))?;

    Ok(registry)
}
