use git2::{Repository as Git2Repo, RepositoryInitOptions, Signature};
use release_prep::git::{Git2Repository, Repository};
use tempfile::TempDir;

fn init_repo() -> (TempDir, Git2Repo) {
    let dir = TempDir::new().unwrap();
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = Git2Repo::init_opts(dir.path(), &opts).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test Author").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
    }
    (dir, repo)
}

fn commit(repo: &Git2Repo, message: &str) -> git2::Oid {
    let sig = Signature::now("Test Author", "test@example.com").unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

fn tag(repo: &Git2Repo, name: &str, oid: git2::Oid) {
    let object = repo.find_object(oid, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap();
}

#[test]
fn test_latest_tag_and_commits_since() {
    let (dir, raw) = init_repo();
    commit(&raw, "Initial commit");
    let released = commit(&raw, "feat: first feature");
    tag(&raw, "v1.0.0", released);
    commit(&raw, "fix: handle empty input\n\nLonger body text");
    commit(&raw, "feat(ui): add dark mode");

    let repo = Git2Repository::open(dir.path()).unwrap();
    assert_eq!(repo.latest_tag().unwrap(), Some("v1.0.0".to_string()));

    let commits = repo.commits_since(Some("v1.0.0")).unwrap();
    let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["fix: handle empty input", "feat(ui): add dark mode"]);
    assert!(commits.iter().all(|c| c.author == "Test Author"));
    assert!(commits.iter().all(|c| c.hash.len() == 8 && c.date.len() == 10));

    assert_eq!(repo.commits_since(None).unwrap().len(), 4);
}

#[test]
fn test_latest_tag_is_nearest() {
    let (dir, raw) = init_repo();
    let first = commit(&raw, "one");
    tag(&raw, "v0.1.0", first);
    let second = commit(&raw, "two");
    tag(&raw, "v0.2.0", second);
    commit(&raw, "three");

    let repo = Git2Repository::open(dir.path()).unwrap();
    assert_eq!(repo.latest_tag().unwrap(), Some("v0.2.0".to_string()));
}

#[test]
fn test_no_tags() {
    let (dir, raw) = init_repo();
    commit(&raw, "Initial commit");

    let repo = Git2Repository::open(dir.path()).unwrap();
    assert_eq!(repo.latest_tag().unwrap(), None);
}

#[test]
fn test_unknown_since_tag_is_an_error() {
    let (dir, raw) = init_repo();
    commit(&raw, "Initial commit");

    let repo = Git2Repository::open(dir.path()).unwrap();
    assert!(repo.commits_since(Some("v9.9.9")).is_err());
}

#[test]
fn test_current_branch() {
    let (dir, raw) = init_repo();
    let repo = Git2Repository::open(dir.path()).unwrap();
    // Unborn HEAD
    assert_eq!(repo.current_branch().unwrap(), None);

    commit(&raw, "Initial commit");
    assert_eq!(repo.current_branch().unwrap(), Some("main".to_string()));
}

#[test]
fn test_create_annotated_tag() {
    let (dir, raw) = init_repo();
    let head = commit(&raw, "Initial commit");

    let repo = Git2Repository::open(dir.path()).unwrap();
    repo.create_tag("v1.0.0", "Release v1.0.0").unwrap();

    let reference = raw.find_reference("refs/tags/v1.0.0").unwrap();
    let annotated = reference.peel_to_tag().unwrap();
    assert_eq!(annotated.message().map(str::trim), Some("Release v1.0.0"));
    assert_eq!(reference.peel_to_commit().unwrap().id(), head);
    assert_eq!(repo.latest_tag().unwrap(), Some("v1.0.0".to_string()));
}
