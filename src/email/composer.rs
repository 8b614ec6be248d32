use crate::routes::error_chain_fmt;
use minijinja::{path_loader, AutoEscape, Environment, ErrorKind};
use serde::Serialize;
use std::path::Path;

/// Renders email bodies from the templates in a directory.
///
/// Every template is HTML-escaped, whatever its extension, so values such as
/// a subject or a display name cannot inject markup.
#[derive(Debug)]
pub struct MailComposer {
    env: Environment<'static>,
}

#[derive(thiserror::Error)]
pub enum ComposeError {
    #[error("Template {0} not found.")]
    TemplateNotFound(String),
    #[error("Failed to render template {0}.")]
    Render(String, #[source] minijinja::Error),
}

impl std::fmt::Debug for ComposeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl MailComposer {
    pub fn new(template_dir: impl AsRef<Path>) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(template_dir.as_ref().to_path_buf()));
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        Self { env }
    }

    pub fn render<S: Serialize>(&self, template: &str, variables: S) -> Result<String, ComposeError> {
        let compiled = self.env.get_template(template).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => ComposeError::TemplateNotFound(template.to_string()),
            _ => ComposeError::Render(template.to_string(), e),
        })?;
        compiled
            .render(variables)
            .map_err(|e| ComposeError::Render(template.to_string(), e))
    }
}
