// GitHub API endpoint functions.
// Provides typed methods for fetching data from the GitHub REST API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{AnalyzerError, Result};

use super::client::GitHubClient;
use super::types::{ContentResponse, FileTree, RepoStats, RepositoryResponse, TreeResponse};

impl GitHubClient {
    /// Get repository statistics.
    pub async fn get_repo_stats(&mut self, owner: &str, repo: &str) -> Result<RepoStats> {
        let response = self.get(&format!("/repos/{}/{}", owner, repo)).await?;
        let raw: RepositoryResponse = response.json().await?;
        Ok(RepoStats::from(raw))
    }

    /// Get the recursive file tree for a branch.
    pub async fn get_file_tree(
        &mut self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<FileTree> {
        let params = [("recursive", "1")];
        let response = self
            .get_with_params(
                &format!("/repos/{}/{}/git/trees/{}", owner, repo, branch),
                &params,
            )
            .await?;
        let raw: TreeResponse = response.json().await?;
        Ok(FileTree::from(raw))
    }

    /// Get a file's content on a branch, decoded from base64 to text.
    pub async fn get_file_content(
        &mut self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<String> {
        let params = [("ref", branch)];
        let response = self
            .get_with_params(&format!("/repos/{}/{}/contents/{}", owner, repo, path), &params)
            .await?;
        let raw: ContentResponse = response.json().await?;
        decode_content(&raw)
    }
}

/// Decode a contents-API payload. GitHub returns base64 with embedded
/// newlines; anything non-UTF-8 is rejected rather than garbled.
fn decode_content(raw: &ContentResponse) -> Result<String> {
    if raw.encoding != "base64" {
        return Err(AnalyzerError::Other(format!(
            "unexpected content encoding: {}",
            raw.encoding
        )));
    }

    let stripped: String = raw.content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(stripped)
        .map_err(|e| AnalyzerError::Other(format!("invalid base64 content: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|_| AnalyzerError::Other("file content is not valid UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_content_strips_newlines() {
        // "hello world" encoded, split across lines as GitHub does.
        let raw = ContentResponse {
            content: "aGVsbG8g\nd29ybGQ=\n".to_string(),
            encoding: "base64".to_string(),
        };
        assert_eq!(decode_content(&raw).unwrap(), "hello world");
    }

    #[test]
    fn test_decode_content_rejects_unknown_encoding() {
        let raw = ContentResponse {
            content: "hello".to_string(),
            encoding: "utf-8".to_string(),
        };
        assert!(decode_content(&raw).is_err());
    }

    #[test]
    fn test_decode_content_rejects_binary() {
        let raw = ContentResponse {
            content: BASE64.encode([0xff, 0xfe, 0x00, 0x01]),
            encoding: "base64".to_string(),
        };
        assert!(decode_content(&raw).is_err());
    }
}
