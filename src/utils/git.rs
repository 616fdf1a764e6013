use std::process::Command;

/// Owner and name of the `origin` remote, when it points at GitHub.
pub fn get_current_repo() -> Option<(String, String)> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    parse_github_url(String::from_utf8_lossy(&output.stdout).trim())
}

/// Accepts SSH (`git@github.com:owner/repo.git`) and HTTPS remotes.
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    let (_, path) = url.split_once("github.com")?;
    let mut parts = path.trim_start_matches([':', '/']).split('/');
    let owner = parts.next()?;
    let repo = parts.next()?;
    parse_repo_slug(&format!("{}/{}", owner, repo))
}

/// Parses `owner/name`.
pub fn parse_repo_slug(slug: &str) -> Option<(String, String)> {
    let (owner, repo) = slug.trim().split_once('/')?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssh_and_https_remotes_resolve() {
        assert_eq!(
            parse_github_url("git@github.com:backstage/backstage.git"),
            Some(("backstage".to_string(), "backstage".to_string()))
        );
        assert_eq!(
            parse_github_url("https://github.com/rust-lang/rust"),
            Some(("rust-lang".to_string(), "rust".to_string()))
        );
        assert_eq!(parse_github_url("https://gitlab.com/a/b"), None);
    }

    #[test]
    fn repo_slugs_need_owner_and_name() {
        assert_eq!(
            parse_repo_slug("backstage/backstage"),
            Some(("backstage".to_string(), "backstage".to_string()))
        );
        assert_eq!(parse_repo_slug("backstage"), None);
        assert_eq!(parse_repo_slug("a/b/c"), None);
        assert_eq!(parse_repo_slug("/b"), None);
    }
}
