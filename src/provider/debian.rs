//! Boot links on Debian-family systems.
//!
//! A service is enabled when a start link `S<NN><service>` exists in one of
//! the multi-user runlevel directories. Links are created with `update-rc.d`.

use std::path::Path;

use crate::error::ApplyResult;
use crate::services::DesiredAction;

use super::init::InitProvider;

const UPDATE_RC_D: &str = "update-rc.d";

/// Runlevels checked for start links.
const RUNLEVELS: [u8; 4] = [2, 3, 4, 5];

/// Whether any multi-user runlevel has a start link for the service.
pub(super) fn has_boot_links(rc_root: &Path, service: &str) -> bool {
    RUNLEVELS.iter().any(|level| {
        let dir = rc_root.join(format!("rc{}.d", level));
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return false;
        };
        entries
            .filter_map(Result::ok)
            .any(|entry| is_start_link(&entry.file_name().to_string_lossy(), service))
    })
}

fn is_start_link(file_name: &str, service: &str) -> bool {
    let Some(rest) = file_name.strip_prefix('S') else {
        return false;
    };
    match (rest.get(..2), rest.get(2..)) {
        (Some(order), Some(name)) => order.chars().all(|c| c.is_ascii_digit()) && name == service,
        _ => false,
    }
}

pub(super) fn enable(provider: &InitProvider<'_>, service: &str) -> ApplyResult<Vec<String>> {
    let line = provider.run_checked(
        service,
        DesiredAction::Enable,
        UPDATE_RC_D,
        &[service, "defaults"],
    )?;
    Ok(vec![line])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathsConfig;
    use crate::executor::MockRunner;
    use crate::provider::ProviderKind;
    use tempfile::TempDir;

    #[test]
    fn test_is_start_link() {
        assert!(is_start_link("S20scalaris", "scalaris"));
        assert!(!is_start_link("K20scalaris", "scalaris"));
        assert!(!is_start_link("S20scalaris-monitor", "scalaris"));
        assert!(!is_start_link("Sxxscalaris", "scalaris"));
        assert!(!is_start_link("S2scalaris", "scalaris"));
    }

    #[test]
    fn test_has_boot_links() {
        let dir = TempDir::new().unwrap();
        assert!(!has_boot_links(dir.path(), "scalaris"));

        let rc3 = dir.path().join("rc3.d");
        std::fs::create_dir_all(&rc3).unwrap();
        std::fs::write(rc3.join("S20scalaris-monitor"), "").unwrap();
        assert!(!has_boot_links(dir.path(), "scalaris"));
        assert!(has_boot_links(dir.path(), "scalaris-monitor"));
    }

    #[test]
    fn test_shutdown_runlevels_ignored() {
        let dir = TempDir::new().unwrap();
        let rc0 = dir.path().join("rc0.d");
        std::fs::create_dir_all(&rc0).unwrap();
        std::fs::write(rc0.join("S20scalaris"), "").unwrap();
        assert!(!has_boot_links(dir.path(), "scalaris"));
    }

    #[test]
    fn test_enable_runs_update_rc_d() {
        let paths = PathsConfig::default();
        let runner = MockRunner::new();
        let provider = InitProvider::new(ProviderKind::DebianInit, &paths, &runner);

        let lines = enable(&provider, "scalaris").unwrap();
        assert_eq!(lines, vec!["update-rc.d scalaris defaults"]);
    }
}
