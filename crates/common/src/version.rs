//! Build version information, stamped at compile time by `build.rs`.

/// Human-readable version string: crate version plus build timestamp.
pub fn build_info() -> String {
    format!(
        "{} (built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIMESTAMP")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_carries_version() {
        assert!(build_info().contains(env!("CARGO_PKG_VERSION")));
    }
}
