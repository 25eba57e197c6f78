//! Rendering context handle

use std::fmt;
use std::rc::Rc;

/// Shared handle to the active rendering context
///
/// The scene graph stores and propagates it but attaches no meaning to it
/// beyond identity: assigning a different handle to a node is what triggers
/// that node's one-time setup. Clones compare equal; separately created
/// handles never do.
#[derive(Clone)]
pub struct RenderContext {
    inner: Rc<ContextInfo>,
}

#[derive(Debug)]
struct ContextInfo {
    label: String,
    sample_count: u32,
}

impl RenderContext {
    /// Create a new context handle
    pub fn new(label: impl Into<String>, sample_count: u32) -> Self {
        Self {
            inner: Rc::new(ContextInfo {
                label: label.into(),
                sample_count,
            }),
        }
    }

    /// Human readable name of the context
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// MSAA sample count the context renders with
    pub fn sample_count(&self) -> u32 {
        self.inner.sample_count
    }
}

impl PartialEq for RenderContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for RenderContext {}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("label", &self.inner.label)
            .field("sample_count", &self.inner.sample_count)
            .finish()
    }
}
