pub mod config;
pub mod descriptor;
pub mod error;
pub mod inspector;
pub mod parser;
pub mod provider;
pub mod registry;
pub mod render;
pub mod scanner;

pub use descriptor::{ClassDescriptor, ClassFlags, ConstantValue, MemberInfo, Visibility};
pub use error::InspectError;
pub use inspector::ClassInspector;
pub use provider::{ClassMetadataProvider, MemberMeta};
pub use registry::SourceRegistry;
