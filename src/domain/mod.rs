//! Domain logic - pure release rules independent of files and git

pub mod branch;
pub mod category;
pub mod commit;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use branch::BranchContext;
pub use category::ChangeCategory;
pub use commit::ParsedCommit;
pub use prerelease::PreRelease;
pub use tag::{Tag, TagPattern};
pub use version::{SemanticVersion, VersionBump};
