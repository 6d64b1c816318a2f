//! Git remote URL parsing

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Host, organisation and repository name of a git remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    pub host: String,
    pub organisation: String,
    pub name: String,
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // https://host/org/repo(.git), ssh://git@host(:port)/org/repo(.git),
        // git@host:org/repo(.git)
        Regex::new(
            r"^(?:(?:https?|ssh|git)://(?:[^@/]+@)?(?P<host>[^/:]+)(?::\d+)?/|(?:[^@/]+@)?(?P<scp_host>[^/:]+):)(?P<path>.+?)(?:\.git)?/?$",
        )
        .expect("valid git URL pattern")
    })
}

impl GitInfo {
    pub fn parse(url: &str) -> Result<Self> {
        let invalid = || Error::InvalidGitUrl(url.to_string());
        let captures = url_pattern().captures(url.trim()).ok_or_else(invalid)?;

        let host = captures
            .name("host")
            .or_else(|| captures.name("scp_host"))
            .map(|m| m.as_str().to_string())
            .ok_or_else(invalid)?;

        // Nested groups keep everything but the last segment as organisation
        let path = &captures["path"];
        let (organisation, name) = path.rsplit_once('/').ok_or_else(invalid)?;
        if organisation.is_empty() || name.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            host,
            organisation: organisation.to_string(),
            name: name.to_string(),
        })
    }
}

/// Name of the pipeline activity recording a build,
/// `<org>-<repo>-<branch>-<build>` in lower case
pub fn pipeline_activity_name(source_url: &str, branch: &str, build_number: &str) -> Result<String> {
    let info = GitInfo::parse(source_url)?;
    Ok(format!("{}-{}-{}-{}", info.organisation, info.name, branch, build_number).to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(host: &str, organisation: &str, name: &str) -> GitInfo {
        GitInfo {
            host: host.to_string(),
            organisation: organisation.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_https_urls() {
        assert_eq!(
            GitInfo::parse("https://github.com/jenkins-x-apps/jx-app-jacoco.git").unwrap(),
            info("github.com", "jenkins-x-apps", "jx-app-jacoco")
        );
        assert_eq!(
            GitInfo::parse("https://github.com/acme/roadrunner").unwrap(),
            info("github.com", "acme", "roadrunner")
        );
        assert_eq!(
            GitInfo::parse("http://bob@gitea.local:3000/acme/roadrunner/").unwrap(),
            info("gitea.local", "acme", "roadrunner")
        );
    }

    #[test]
    fn test_ssh_urls() {
        assert_eq!(
            GitInfo::parse("git@github.com:acme/roadrunner.git").unwrap(),
            info("github.com", "acme", "roadrunner")
        );
        assert_eq!(
            GitInfo::parse("ssh://git@bitbucket.org:7999/acme/roadrunner.git").unwrap(),
            info("bitbucket.org", "acme", "roadrunner")
        );
    }

    #[test]
    fn test_nested_groups() {
        assert_eq!(
            GitInfo::parse("https://gitlab.com/acme/team/roadrunner.git").unwrap(),
            info("gitlab.com", "acme/team", "roadrunner")
        );
    }

    #[test]
    fn test_invalid_urls() {
        for url in ["", "roadrunner", "https://github.com/roadrunner", "not a url"] {
            assert!(
                matches!(GitInfo::parse(url), Err(Error::InvalidGitUrl(_))),
                "{} should be rejected",
                url
            );
        }
    }

    #[test]
    fn test_pipeline_activity_name_is_lowercase() {
        let name = pipeline_activity_name("https://github.com/Acme/RoadRunner.git", "PR-12", "3").unwrap();
        assert_eq!(name, "acme-roadrunner-pr-12-3");
    }
}
