//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use herald::{GitHubError, PageFetcher, PullRequestRecord};
use serde_json::{Map, Value, json};

/// A GitHub user object with every field octocrab deserializes.
pub fn mock_user(login: &str, id: u64) -> Value {
    let api = format!("https://api.github.com/users/{}", login);
    let mut user = Map::new();
    user.insert("login".into(), json!(login));
    user.insert("id".into(), json!(id));
    user.insert("node_id".into(), json!(format!("U_{}", id)));
    user.insert("avatar_url".into(), json!(format!("https://avatars.githubusercontent.com/u/{}", id)));
    user.insert("gravatar_id".into(), json!(""));
    user.insert("url".into(), json!(api));
    user.insert("html_url".into(), json!(format!("https://github.com/{}", login)));
    for (key, suffix) in [
        ("followers_url", "/followers"),
        ("following_url", "/following{/other_user}"),
        ("gists_url", "/gists{/gist_id}"),
        ("starred_url", "/starred{/owner}{/repo}"),
        ("subscriptions_url", "/subscriptions"),
        ("organizations_url", "/orgs"),
        ("repos_url", "/repos"),
        ("events_url", "/events{/privacy}"),
        ("received_events_url", "/received_events"),
    ] {
        user.insert(key.into(), json!(format!("{}{}", api, suffix)));
    }
    user.insert("type".into(), json!("User"));
    user.insert("site_admin".into(), json!(false));
    Value::Object(user)
}

/// A repository object for `owner/repo`.
pub fn mock_repo() -> Value {
    let api = "https://api.github.com/repos/owner/repo";
    let mut repo = Map::new();
    repo.insert("id".into(), json!(1));
    repo.insert("node_id".into(), json!("R_1"));
    repo.insert("name".into(), json!("repo"));
    repo.insert("full_name".into(), json!("owner/repo"));
    repo.insert("owner".into(), mock_user("owner", 1));
    repo.insert("private".into(), json!(false));
    repo.insert("html_url".into(), json!("https://github.com/owner/repo"));
    repo.insert("description".into(), Value::Null);
    repo.insert("fork".into(), json!(false));
    repo.insert("url".into(), json!(api));
    for (key, suffix) in [
        ("forks_url", "/forks"),
        ("keys_url", "/keys{/key_id}"),
        ("collaborators_url", "/collaborators{/collaborator}"),
        ("teams_url", "/teams"),
        ("hooks_url", "/hooks"),
        ("issue_events_url", "/issues/events{/number}"),
        ("events_url", "/events"),
        ("assignees_url", "/assignees{/user}"),
        ("branches_url", "/branches{/branch}"),
        ("tags_url", "/tags"),
        ("blobs_url", "/git/blobs{/sha}"),
        ("git_tags_url", "/git/tags{/sha}"),
        ("git_refs_url", "/git/refs{/sha}"),
        ("trees_url", "/git/trees{/sha}"),
        ("statuses_url", "/statuses/{sha}"),
        ("languages_url", "/languages"),
        ("stargazers_url", "/stargazers"),
        ("contributors_url", "/contributors"),
        ("subscribers_url", "/subscribers"),
        ("subscription_url", "/subscription"),
        ("commits_url", "/commits{/sha}"),
        ("git_commits_url", "/git/commits{/sha}"),
        ("comments_url", "/comments{/number}"),
        ("issue_comment_url", "/issues/comments{/number}"),
        ("contents_url", "/contents/{+path}"),
        ("compare_url", "/compare/{base}...{head}"),
        ("merges_url", "/merges"),
        ("archive_url", "/{archive_format}{/ref}"),
        ("downloads_url", "/downloads"),
        ("issues_url", "/issues{/number}"),
        ("pulls_url", "/pulls{/number}"),
        ("milestones_url", "/milestones{/number}"),
        ("notifications_url", "/notifications{?since,all,participating}"),
        ("labels_url", "/labels{/name}"),
        ("releases_url", "/releases{/id}"),
        ("deployments_url", "/deployments"),
    ] {
        repo.insert(key.into(), json!(format!("{}{}", api, suffix)));
    }
    Value::Object(repo)
}

/// A closed pull request as GitHub's list endpoint returns it.
///
/// `merge_sha` of `None` models a PR closed without merging.
pub fn mock_pr(number: u64, merge_sha: Option<&str>, labels: &[&str]) -> Value {
    let api = format!("https://api.github.com/repos/owner/repo/pulls/{}", number);
    let html = format!("https://github.com/owner/repo/pull/{}", number);
    let issue = format!("https://api.github.com/repos/owner/repo/issues/{}", number);

    let label_objects: Vec<Value> = labels
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "id": i + 1,
                "node_id": format!("L_{}", i + 1),
                "url": format!("https://api.github.com/repos/owner/repo/labels/{}", name),
                "name": name,
                "color": "ededed",
                "default": false
            })
        })
        .collect();

    let branch = |label: &str, r: &str| {
        json!({
            "label": label,
            "ref": r,
            "sha": format!("{:040x}", number),
            "user": mock_user("owner", 1),
            "repo": mock_repo()
        })
    };

    let merged_at = merge_sha.map(|_| "2024-03-01T12:00:00Z");

    let mut pr = Map::new();
    pr.insert("url".into(), json!(api));
    pr.insert("id".into(), json!(number * 1000));
    pr.insert("node_id".into(), json!(format!("PR_{}", number)));
    pr.insert("html_url".into(), json!(html));
    pr.insert("diff_url".into(), json!(format!("{}.diff", html)));
    pr.insert("patch_url".into(), json!(format!("{}.patch", html)));
    pr.insert("issue_url".into(), json!(issue));
    pr.insert("commits_url".into(), json!(format!("{}/commits", api)));
    pr.insert("review_comments_url".into(), json!(format!("{}/comments", api)));
    pr.insert("review_comment_url".into(), json!("https://api.github.com/repos/owner/repo/pulls/comments{/number}"));
    pr.insert("comments_url".into(), json!(format!("{}/comments", issue)));
    pr.insert("statuses_url".into(), json!("https://api.github.com/repos/owner/repo/statuses/0"));
    pr.insert("number".into(), json!(number));
    pr.insert("state".into(), json!("closed"));
    pr.insert("locked".into(), json!(false));
    pr.insert("title".into(), json!(format!("PR {}", number)));
    pr.insert("body".into(), Value::Null);
    pr.insert("user".into(), mock_user("contributor", 100));
    pr.insert("labels".into(), json!(label_objects));
    pr.insert("assignee".into(), Value::Null);
    pr.insert("assignees".into(), json!([]));
    pr.insert("requested_reviewers".into(), json!([]));
    pr.insert("requested_teams".into(), json!([]));
    pr.insert("milestone".into(), Value::Null);
    pr.insert("created_at".into(), json!("2024-02-01T00:00:00Z"));
    pr.insert("updated_at".into(), json!("2024-03-01T12:00:00Z"));
    pr.insert("closed_at".into(), json!("2024-03-01T12:00:00Z"));
    pr.insert("merged_at".into(), json!(merged_at));
    pr.insert("merge_commit_sha".into(), json!(merge_sha));
    pr.insert("head".into(), branch("contributor:topic", "topic"));
    pr.insert("base".into(), branch("owner:main", "main"));
    pr.insert("draft".into(), json!(false));
    pr.insert("author_association".into(), json!("CONTRIBUTOR"));
    pr.insert(
        "_links".into(),
        json!({
            "self": { "href": api },
            "html": { "href": html },
            "issue": { "href": issue },
            "comments": { "href": format!("{}/comments", issue) },
            "review_comments": { "href": format!("{}/comments", api) },
            "review_comment": { "href": "https://api.github.com/repos/owner/repo/pulls/comments{/number}" },
            "commits": { "href": format!("{}/commits", api) },
            "statuses": { "href": "https://api.github.com/repos/owner/repo/statuses/0" }
        }),
    );
    Value::Object(pr)
}

/// A record as the cache stores it.
pub fn record(id: u64, hash: &str, labels: &[&str]) -> PullRequestRecord {
    PullRequestRecord {
        id,
        merge_commit_hash: Some(hash.to_string()),
        labels: labels.iter().map(|s| s.to_string()).collect(),
        link: format!("https://github.com/owner/repo/pull/{}", id),
    }
}

/// In-memory page source: serves the scripted pages, then empty pages.
pub struct ScriptedFetcher {
    pages: VecDeque<Result<Vec<PullRequestRecord>, GitHubError>>,
    page: u32,
    pub requested: Arc<Mutex<Vec<u32>>>,
}

impl ScriptedFetcher {
    pub fn new(pages: Vec<Vec<PullRequestRecord>>) -> Self {
        Self::with_results(pages.into_iter().map(Ok).collect())
    }

    pub fn with_results(pages: Vec<Result<Vec<PullRequestRecord>, GitHubError>>) -> Self {
        Self {
            pages: pages.into(),
            page: 1,
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle for inspecting requested page numbers after the fetcher moves.
    pub fn requests(&self) -> Arc<Mutex<Vec<u32>>> {
        self.requested.clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn next(&mut self) -> Result<Vec<PullRequestRecord>, GitHubError> {
        self.requested.lock().unwrap().push(self.page);
        self.page += 1;
        self.pages.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// A single-merge release list in enumerator JSON.
pub fn release_json(title: &str, merges: &[(&str, &str, u64)]) -> String {
    let merges: Vec<Value> = merges
        .iter()
        .map(|(hash, message, id)| {
            json!({
                "id": id,
                "message": message,
                "href": format!("https://github.com/owner/repo/pull/{}", id),
                "commit": { "hash": hash }
            })
        })
        .collect();

    json!([{
        "title": title,
        "date": "2024-03-02T09:00:00.000Z",
        "niceDate": "2 March 2024",
        "href": format!("https://github.com/owner/repo/compare/v0.0.0...{}", title),
        "merges": merges
    }])
    .to_string()
}
