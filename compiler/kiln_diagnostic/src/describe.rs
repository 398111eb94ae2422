//! Description formatter lookup.

use rustc_hash::FxHashMap;

use crate::{Description, ModuleId};

/// Renders descriptions produced by one module.
pub trait DescriptionFormatter {
    fn format_description(&self, description: &Description) -> String;
}

impl<F> DescriptionFormatter for F
where
    F: Fn(&Description) -> String,
{
    fn format_description(&self, description: &Description) -> String {
        self(description)
    }
}

/// Resolves a module id to text for its description.
///
/// This is the seam the formatter uses; it must answer synchronously.
pub trait FormatDescription {
    fn format_description(&self, module: &ModuleId, description: &Description) -> String;
}

/// Renders `String` and `&'static str` payloads verbatim, anything else
/// through its `Debug` implementation.
#[derive(Copy, Clone, Debug, Default)]
pub struct TextFormatter;

impl DescriptionFormatter for TextFormatter {
    fn format_description(&self, description: &Description) -> String {
        if let Some(text) = description.downcast_ref::<String>() {
            text.clone()
        } else if let Some(text) = description.downcast_ref::<&'static str>() {
            (*text).to_string()
        } else {
            format!("{description:?}")
        }
    }
}

impl FormatDescription for TextFormatter {
    fn format_description(&self, _module: &ModuleId, description: &Description) -> String {
        DescriptionFormatter::format_description(self, description)
    }
}

/// Formatters keyed by module id.
///
/// Modules without a registered formatter are rendered by
/// [`TextFormatter`].
#[derive(Default)]
pub struct FormatterRegistry {
    formatters: FxHashMap<ModuleId, Box<dyn DescriptionFormatter>>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        FormatterRegistry {
            formatters: FxHashMap::default(),
        }
    }

    /// Register (or replace) the formatter for `module`.
    pub fn register(
        &mut self,
        module: impl Into<ModuleId>,
        formatter: impl DescriptionFormatter + 'static,
    ) {
        self.formatters.insert(module.into(), Box::new(formatter));
    }

    /// Builder-style [`FormatterRegistry::register`].
    #[must_use]
    pub fn with(
        mut self,
        module: impl Into<ModuleId>,
        formatter: impl DescriptionFormatter + 'static,
    ) -> Self {
        self.register(module, formatter);
        self
    }

    pub fn contains(&self, module: &ModuleId) -> bool {
        self.formatters.contains_key(module)
    }
}

impl FormatDescription for FormatterRegistry {
    fn format_description(&self, module: &ModuleId, description: &Description) -> String {
        match self.formatters.get(module) {
            Some(formatter) => formatter.format_description(description),
            None => DescriptionFormatter::format_description(&TextFormatter, description),
        }
    }
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut modules: Vec<&str> = self.formatters.keys().map(ModuleId::as_str).collect();
        modules.sort_unstable();
        f.debug_struct("FormatterRegistry")
            .field("modules", &modules)
            .finish()
    }
}
