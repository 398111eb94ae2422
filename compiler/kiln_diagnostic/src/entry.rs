use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Identifies the formatter able to render a [`Description`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(name: impl Into<String>) -> Self {
        ModuleId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(name: &str) -> Self {
        ModuleId(name.to_string())
    }
}

impl From<String> for ModuleId {
    fn from(name: String) -> Self {
        ModuleId(name)
    }
}

/// Payload types that can be carried as a [`Description`].
///
/// Blanket-implemented for every `'static + Debug + Send + Sync` type.
pub trait DescriptionValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> DescriptionValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Opaque diagnostic payload.
///
/// Only the formatter registered for the entry's [`ModuleId`] knows its
/// concrete type; everything else treats it as a black box with a `Debug`
/// rendering.
#[derive(Clone)]
pub struct Description(Arc<dyn DescriptionValue>);

impl Description {
    pub fn new<T: DescriptionValue>(value: T) -> Self {
        Description(Arc::new(value))
    }

    /// A plain-text payload.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text.into())
    }

    /// Borrow the payload as `T` if that is its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        let value: &dyn DescriptionValue = &*self.0;
        value.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Where in a source a diagnostic points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    Line(u32),
    LineCol(u32, u32),
}

/// One warning or error.
#[derive(Clone, Debug)]
pub struct DiagnosticEntry {
    pub location: Option<Location>,
    pub module: ModuleId,
    pub description: Description,
}

impl DiagnosticEntry {
    /// An entry with no location.
    pub fn new(module: impl Into<ModuleId>, description: Description) -> Self {
        DiagnosticEntry {
            location: None,
            module: module.into(),
            description,
        }
    }

    /// Attach a line number.
    #[must_use]
    pub fn at_line(mut self, line: u32) -> Self {
        self.location = Some(Location::Line(line));
        self
    }

    /// Attach a line and column.
    #[must_use]
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.location = Some(Location::LineCol(line, column));
        self
    }
}

/// Diagnostics attributed to one source.
///
/// The compiled file may report problems in other sources (an included
/// header, say), so outcomes carry a list of groups rather than a flat
/// list of entries. An empty `source` means "the file being compiled".
#[derive(Clone, Debug)]
pub struct DiagnosticGroup {
    pub source: PathBuf,
    pub entries: Vec<DiagnosticEntry>,
}

impl DiagnosticGroup {
    pub fn new(source: impl Into<PathBuf>, entries: Vec<DiagnosticEntry>) -> Self {
        DiagnosticGroup {
            source: source.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
