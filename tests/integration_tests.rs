//! Integration tests for the Git Status MCP Server
//!
//! These tests drive the dispatcher against real repositories created in
//! temporary directories. They are skipped when no git executable is found.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use serde_json::{json, Value};

use git_status_mcp_server::config::Config;
use git_status_mcp_server::error::McpError;
use git_status_mcp_server::exec::ProcessRunner;
use git_status_mcp_server::git::GitClient;
use git_status_mcp_server::mcp::dispatcher::Dispatcher;
use git_status_mcp_server::mcp::tools::builtin_registry;
use git_status_mcp_server::mcp::types::{CallToolResult, ToolResultContent};

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir` with a throwaway identity, panicking on failure
fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=Test User",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Fresh repository on branch `main` with the given commit messages,
/// committed in order (the last message is the newest commit)
fn repo_with_commits(messages: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
    for msg in messages {
        git(dir.path(), &["commit", "-q", "--allow-empty", "-m", msg]);
    }
    dir
}

fn dispatcher(default_directory: Option<&Path>) -> Dispatcher {
    let config = Config {
        default_directory: default_directory.map(Path::to_path_buf),
        ..Config::default()
    };
    let runner = Arc::new(ProcessRunner::new(config.timeout));
    let git = Arc::new(GitClient::new(runner, &config));
    Dispatcher::new(builtin_registry(git).unwrap())
}

fn text(result: &CallToolResult) -> &str {
    match &result.content[0] {
        ToolResultContent::Text { text } => text,
    }
}

/// Commit lines of a git-log response (everything after the header)
fn commit_lines(result: &CallToolResult) -> Vec<&str> {
    let body = text(result)
        .split_once("\n\n")
        .map(|(_, body)| body)
        .unwrap_or_default();
    body.lines().collect()
}

mod discovery_tests {
    use super::*;

    #[test]
    fn test_every_listed_tool_resolves() {
        let d = dispatcher(None);
        let tools = d.handle_list_tools();
        assert_eq!(tools.len(), 2);
        for tool in &tools {
            assert_eq!(tool.input_schema["type"], "object");
            assert!(tool.description.is_some());
        }
    }

    #[test]
    fn test_schema_fields() {
        let d = dispatcher(None);
        let tools = d.handle_list_tools();
        let status = &tools[0].input_schema["properties"];
        let log = &tools[1].input_schema["properties"];

        assert_eq!(status.as_object().unwrap().len(), 1);
        assert_eq!(status["directory"]["type"], "string");
        assert_eq!(log["directory"]["type"], "string");
        assert_eq!(log["count"]["type"], "integer");
        assert_eq!(log["count"]["default"], 10);
    }

    #[tokio::test]
    async fn test_unknown_tool_fails_at_protocol_level() {
        let d = dispatcher(None);
        let err = d
            .handle_call_tool("git-commit", json!({"message": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::UnknownTool { .. }));
    }
}

mod git_log_tests {
    use super::*;

    #[tokio::test]
    async fn test_five_commits_listed_newest_first() {
        if !git_available() {
            return;
        }
        let repo = repo_with_commits(&["c5", "c4", "c3", "c2", "c1"]);
        let d = dispatcher(None);

        let result = d
            .handle_call_tool(
                "git-log",
                json!({"directory": repo.path().to_str().unwrap(), "count": 5}),
            )
            .await
            .unwrap();

        assert!(!result.is_error, "{}", text(&result));
        assert!(text(&result).starts_with("Recent Git Commits (5 most recent):\n\n"));
        let lines = commit_lines(&result);
        let subjects: Vec<_> = lines
            .iter()
            .map(|l| l.split_once(' ').unwrap().1)
            .collect();
        assert_eq!(subjects, vec!["c1", "c2", "c3", "c4", "c5"]);
        assert!(text(&result).ends_with('\n'));
    }

    #[tokio::test]
    async fn test_count_limits_lines_and_is_repeatable() {
        if !git_available() {
            return;
        }
        let repo = repo_with_commits(&["one", "two", "three", "four"]);
        let d = dispatcher(Some(repo.path()));

        for n in 0..=4u64 {
            let first = d.handle_call_tool("git-log", json!({"count": n})).await.unwrap();
            let second = d.handle_call_tool("git-log", json!({"count": n})).await.unwrap();
            assert_eq!(commit_lines(&first).len(), n as usize);
            assert_eq!(text(&first), text(&second));
        }
    }

    #[tokio::test]
    async fn test_default_count_is_ten() {
        if !git_available() {
            return;
        }
        let messages: Vec<String> = (1..=12).map(|i| format!("commit {}", i)).collect();
        let refs: Vec<&str> = messages.iter().map(String::as_str).collect();
        let repo = repo_with_commits(&refs);
        let d = dispatcher(Some(repo.path()));

        let result = d.handle_call_tool("git-log", json!({})).await.unwrap();
        assert_eq!(commit_lines(&result).len(), 10);
    }

    #[tokio::test]
    async fn test_not_a_repository_is_error_envelope() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let d = dispatcher(None);

        let result = d
            .handle_call_tool("git-log", json!({"directory": dir.path().to_str().unwrap()}))
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(text(&result).starts_with("Error running git log: "));
    }
}

mod git_status_tests {
    use super::*;

    #[tokio::test]
    async fn test_untracked_file_with_default_directory() {
        if !git_available() {
            return;
        }
        let repo = repo_with_commits(&["initial"]);
        std::fs::write(repo.path().join("a.txt"), "hello\n").unwrap();
        let d = dispatcher(Some(repo.path()));

        let result = d.handle_call_tool("git-status", json!({})).await.unwrap();
        assert!(!result.is_error, "{}", text(&result));

        let body = text(&result);
        let branch_at = body.find("Current branch: main").unwrap();
        let status_at = body.find("?? a.txt").unwrap();
        let remotes_at = body.find("Remotes:\n").unwrap();
        assert!(branch_at < status_at && status_at < remotes_at);
        assert!(body.contains("No remotes configured"));
    }

    #[tokio::test]
    async fn test_clean_tree_reports_no_changes() {
        if !git_available() {
            return;
        }
        let repo = repo_with_commits(&["initial"]);
        let d = dispatcher(None);

        let result = d
            .handle_call_tool("git-status", json!({"directory": repo.path().to_str().unwrap()}))
            .await
            .unwrap();
        assert!(!result.is_error);
        assert!(text(&result).contains("Working directory clean - no changes detected"));
    }

    #[tokio::test]
    async fn test_remotes_are_listed() {
        if !git_available() {
            return;
        }
        let repo = repo_with_commits(&["initial"]);
        git(
            repo.path(),
            &["remote", "add", "origin", "https://example.com/project.git"],
        );
        let d = dispatcher(Some(repo.path()));

        let result = d.handle_call_tool("git-status", json!({})).await.unwrap();
        assert!(text(&result).contains("origin\thttps://example.com/project.git (fetch)"));
    }

    #[tokio::test]
    async fn test_not_a_repository_is_error_envelope() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let d = dispatcher(Some(dir.path()));

        let result = d.handle_call_tool("git-status", json!({})).await.unwrap();
        assert!(result.is_error);
        assert!(text(&result).contains("Please ensure:"));
    }

    #[tokio::test]
    async fn test_missing_directory_is_error_envelope() {
        let d = dispatcher(None);
        let result = d
            .handle_call_tool("git-status", json!({"directory": "/definitely/not/a/dir"}))
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(text(&result).contains("/definitely/not/a/dir"));
    }

    #[tokio::test]
    async fn test_missing_git_binary_is_error_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            git_bin: "definitely-not-git-xyz".to_string(),
            default_directory: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let runner = Arc::new(ProcessRunner::new(config.timeout));
        let git = Arc::new(GitClient::new(runner, &config));
        let d = Dispatcher::new(builtin_registry(git).unwrap());

        let result = d.handle_call_tool("git-status", json!({})).await.unwrap();
        assert!(result.is_error);
        assert!(text(&result).contains("failed to start 'definitely-not-git-xyz'"));
    }
}

mod argument_tests {
    use super::*;

    #[tokio::test]
    async fn test_rejected_argument_is_error_envelope() {
        let d = dispatcher(None);
        let result = d
            .handle_call_tool("git-log", json!({"count": [1, 2]}))
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(text(&result).contains("Invalid argument 'count'"));
    }

    #[tokio::test]
    async fn test_non_object_arguments_are_error_envelope() {
        let d = dispatcher(None);
        let result = d
            .handle_call_tool("git-status", Value::String("/tmp".into()))
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(text(&result).contains("Invalid argument 'arguments'"));
    }
}
