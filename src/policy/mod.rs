// * Policy helpers interpreting each settings group for the pipeline:
// * request identity, repeated-segment filtering, and URL scoping.

pub mod dedup;
pub mod identity;
pub mod scope;

pub use dedup::RepetitionFilter;
pub use identity::UserAgentPool;
pub use scope::UrlPolicy;
