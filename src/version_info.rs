const PKG_NAME: &str = env!("CARGO_PKG_NAME");
const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn govee_api_version() -> &'static str {
    PKG_VERSION
}

/// eg: `govee-api/0.1.0 (linux; x86_64)`
pub fn user_agent() -> String {
    format!(
        "{PKG_NAME}/{PKG_VERSION} ({os}; {arch})",
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn user_agent_shape() {
        let ua = user_agent();
        assert!(ua.starts_with(&format!("govee-api/{} (", govee_api_version())));
        assert!(ua.ends_with(&format!("; {})", std::env::consts::ARCH)));
    }
}
