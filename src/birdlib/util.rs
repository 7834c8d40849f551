pub fn version_label() -> String {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_DESC: &str = env!("GIT_DESC");
    #[allow(clippy::const_is_empty)]
    if GIT_DESC.is_empty() {
        format!("Version {VERSION}")
    } else {
        const GIT_DIRTY: &str = env!("GIT_DIRTY");
        let is_dirty = GIT_DIRTY == "true";
        format!(
            "Version {VERSION} ({GIT_DESC}{})",
            if is_dirty { " DIRTY" } else { "" }
        )
    }
}

#[test]
fn test_version_label() {
    assert!(version_label().starts_with(&format!("Version {}", env!("CARGO_PKG_VERSION"))));
}
