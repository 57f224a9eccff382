//! Knowledge-source adapter implementations.
//!
//! Each module provides a struct implementing [`crate::adapter::SourceAdapter`]
//! for one upstream source. [`SourceRegistry`] holds one adapter per
//! [`crate::types::Source`] and dispatches by tag.

mod help_center;

pub mod docs;
pub mod knowledge_base;
pub mod registry;
pub mod zendesk;

pub use docs::DocsAdapter;
pub use knowledge_base::KnowledgeBaseAdapter;
pub use registry::SourceRegistry;
pub use zendesk::ZendeskAdapter;
