/// Represents the branch a release is prepared from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub is_release: bool,
}

impl BranchContext {
    /// Create a branch context, marking it as a release branch when its name
    /// appears in `release_branches`
    pub fn new(name: impl Into<String>, release_branches: &[String]) -> Self {
        let name = name.into();
        let is_release = release_branches.iter().any(|b| *b == name);

        BranchContext { name, is_release }
    }

    /// Check if releases are expected to be cut from this branch
    pub fn is_release_branch(&self) -> bool {
        self.is_release
    }
}
