//! Platform identification.

use std::path::Path;

use tracing::debug;

/// Platform used when nothing identifies the host.
pub const UNKNOWN_PLATFORM: &str = "unknown";

/// Read-only description of the host, supplied at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformContext {
    platform_id: String,
}

impl PlatformContext {
    pub fn new(platform_id: &str) -> Self {
        Self {
            platform_id: platform_id.to_string(),
        }
    }

    /// Take the platform from the `ID=` line of an os-release file.
    ///
    /// Falls back to [`UNKNOWN_PLATFORM`] when the file or the line is missing.
    pub fn from_os_release(path: &Path) -> Self {
        let platform = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| parse_os_release_id(&content));

        match platform {
            Some(id) => Self { platform_id: id },
            None => {
                debug!(path = %path.display(), "No platform ID found in os-release");
                Self::new(UNKNOWN_PLATFORM)
            }
        }
    }

    pub fn platform_id(&self) -> &str {
        &self.platform_id
    }
}

fn parse_os_release_id(content: &str) -> Option<String> {
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("ID="))
        .map(|value| value.trim_matches(|c| c == '"' || c == '\'').to_string())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_os_release() {
        let content = "NAME=\"Ubuntu\"\nVERSION_ID=\"22.04\"\nID=ubuntu\nID_LIKE=debian\n";
        assert_eq!(parse_os_release_id(content).as_deref(), Some("ubuntu"));
    }

    #[test]
    fn test_parse_quoted_id() {
        assert_eq!(
            parse_os_release_id("ID=\"centos\"\n").as_deref(),
            Some("centos")
        );
    }

    #[test]
    fn test_missing_os_release() {
        let dir = TempDir::new().unwrap();
        let ctx = PlatformContext::from_os_release(&dir.path().join("os-release"));
        assert_eq!(ctx.platform_id(), UNKNOWN_PLATFORM);
    }

    #[test]
    fn test_os_release_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("os-release");
        std::fs::write(&path, "ID=debian\n").unwrap();
        assert_eq!(PlatformContext::from_os_release(&path).platform_id(), "debian");
    }
}
