use std::fmt::Display;

use url::Url;

use crate::{ErrorKind, Label, Result};

/// Request template used by default: the RIPEstat announced-prefixes
/// endpoint, queried by AS number
pub const DEFAULT_TEMPLATE: &str =
    "https://stat.ripe.net/data/announced-prefixes/data.json?resource=";

/// Builds target URLs from identifiers and recovers the identifier
/// (the [`Label`]) from a target again.
///
/// A template is a fixed URL prefix; the identifier is appended verbatim.
/// Recovering the label strips the prefix off the target string, so
/// `template.label(&template.render(id))` always yields `id`.
///
/// ```
/// use batchfetch_lib::Template;
/// # fn main() -> batchfetch_lib::Result<()> {
/// let template = Template::new("https://example.com/data.json?resource=")?;
/// let target = template.render("AS3333");
/// assert_eq!(target, "https://example.com/data.json?resource=AS3333");
/// assert_eq!(template.label(&target)?.as_str(), "AS3333");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template {
    prefix: String,
}

impl Template {
    /// Create a new template from a URL prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidTemplate`] if the prefix is blank or does
    /// not form a valid absolute URL once an identifier is appended.
    pub fn new<S: Into<String>>(prefix: S) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.trim().is_empty() || Url::parse(&format!("{prefix}0")).is_err() {
            return Err(ErrorKind::InvalidTemplate(prefix));
        }
        Ok(Template { prefix })
    }

    /// The URL prefix of this template
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Render the raw target string for an identifier
    #[must_use]
    pub fn render(&self, identifier: &str) -> String {
        format!("{}{identifier}", self.prefix)
    }

    /// Build the target URL for an identifier
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidTarget`] if the rendered target is not a
    /// valid URL.
    pub fn build(&self, identifier: &str) -> Result<Url> {
        parse_target(&self.render(identifier))
    }

    /// Recover the label from a raw target string
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnlabelableTarget`] if the target was not built
    /// from this template or carries no identifier.
    pub fn label(&self, target: &str) -> Result<Label> {
        match target.strip_prefix(&self.prefix) {
            Some(identifier) if !identifier.trim().is_empty() => Ok(Label::from(identifier)),
            _ => Err(ErrorKind::UnlabelableTarget(target.to_string())),
        }
    }
}

impl Default for Template {
    fn default() -> Self {
        Template {
            prefix: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{identifier}}", self.prefix)
    }
}

pub(crate) fn parse_target(target: &str) -> Result<Url> {
    Url::parse(target).map_err(|e| ErrorKind::InvalidTarget(target.to_string(), e))
}
