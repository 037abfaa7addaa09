use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Version and build profile of the running binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub version: String,
    pub build_profile: String,
    pub build_features: Vec<String>,
}

impl Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "filetree {} ({})", self.version, self.build_profile)?;
        if !self.build_features.is_empty() {
            write!(f, " [{}]", self.build_features.join(", "))?;
        }
        Ok(())
    }
}

pub fn build_info() -> BuildInfo {
    let build_profile = if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    };

    let mut build_features = Vec::new();
    if cfg!(feature = "testkit") {
        build_features.push("testkit".to_string());
    }

    BuildInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_profile: build_profile.to_string(),
        build_features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_display() {
        let info = build_info();
        let rendered = info.to_string();
        assert!(rendered.starts_with("filetree "));
        assert!(rendered.contains(&info.version));
    }
}
