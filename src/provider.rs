//! The narrow metadata interface the inspector is built on.
//!
//! Anything that can answer these questions about a named class can back a
//! [`ClassInspector`](crate::ClassInspector): the TypeScript
//! [`SourceRegistry`](crate::SourceRegistry) or a table built by hand in tests.

use crate::descriptor::{ConstantValue, Visibility};
use crate::error::InspectError;
use std::path::PathBuf;

/// A property or method as seen from the inspected class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberMeta {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    /// Canonical name of the declaring class
    pub declaring_class: String,
    pub doc_comment: Option<String>,
}

impl MemberMeta {
    pub fn new(name: &str, visibility: Visibility, is_static: bool, declaring_class: &str) -> Self {
        Self {
            name: name.to_string(),
            visibility,
            is_static,
            declaring_class: declaring_class.to_string(),
            doc_comment: None,
        }
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc_comment = Some(doc.to_string());
        self
    }
}

pub trait ClassMetadataProvider {
    /// Reference to a resolved class
    type Handle: Copy;

    fn resolve(&self, name: &str) -> Result<Self::Handle, InspectError>;

    /// Canonical name, which may differ from the identifier passed to `resolve`.
    fn name(&self, class: Self::Handle) -> String;

    /// Canonical name of the parent class.
    fn parent(&self, class: Self::Handle) -> Option<String>;

    /// Interfaces implemented directly or transitively.
    fn interface_names(&self, class: Self::Handle) -> Vec<String>;

    fn trait_names(&self, class: Self::Handle) -> Vec<String>;

    /// Own and inherited constants, without duplicates.
    fn constants(&self, class: Self::Handle) -> Vec<(String, ConstantValue)>;

    /// Own and inherited properties of every visibility.
    fn properties(&self, class: Self::Handle) -> Vec<MemberMeta>;

    /// Own and inherited methods of every visibility.
    fn methods(&self, class: Self::Handle) -> Vec<MemberMeta>;

    fn is_abstract(&self, class: Self::Handle) -> bool;
    fn is_cloneable(&self, class: Self::Handle) -> bool;
    fn is_final(&self, class: Self::Handle) -> bool;
    fn is_instantiable(&self, class: Self::Handle) -> bool;
    fn is_interface(&self, class: Self::Handle) -> bool;
    fn is_internal(&self, class: Self::Handle) -> bool;
    fn is_iterable(&self, class: Self::Handle) -> bool;
    fn is_trait(&self, class: Self::Handle) -> bool;
    fn is_user_defined(&self, class: Self::Handle) -> bool;

    /// File the class is defined in, `None` for classes without a source.
    fn file_name(&self, class: Self::Handle) -> Option<PathBuf>;
}
