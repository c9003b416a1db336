use serde::{Deserialize, Serialize};

use nrgrip_core::FormatVersion;

/// When a cue sheet's trailing mode byte must equal the session mode byte.
///
/// Images written by older Nero releases leave that byte unreliable, so the
/// check is only enforced on V2 images unless configured otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionModeCheck {
    Never,
    #[default]
    NewerFormatOnly,
    Always,
}

impl SessionModeCheck {
    pub fn applies_to(&self, version: FormatVersion) -> bool {
        match self {
            Self::Never => false,
            Self::NewerFormatOnly => version == FormatVersion::V2,
            Self::Always => true,
        }
    }
}

impl std::str::FromStr for SessionModeCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "never" | "off" => Ok(Self::Never),
            "newer-format-only" | "v2" | "default" => Ok(Self::NewerFormatOnly),
            "always" | "strict" => Ok(Self::Always),
            other => Err(format!("unknown session mode check '{}'", other)),
        }
    }
}

/// Options that control how an image is parsed.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub session_mode_check: SessionModeCheck,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_mode_check(mut self, check: SessionModeCheck) -> Self {
        self.session_mode_check = check;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_mode_check_applies() {
        let check = SessionModeCheck::default();
        assert!(check.applies_to(FormatVersion::V2));
        assert!(!check.applies_to(FormatVersion::V1));
        assert!(SessionModeCheck::Always.applies_to(FormatVersion::V1));
        assert!(!SessionModeCheck::Never.applies_to(FormatVersion::V2));
    }

    #[test]
    fn test_session_mode_check_from_str() {
        assert_eq!("always".parse(), Ok(SessionModeCheck::Always));
        assert_eq!("Never".parse(), Ok(SessionModeCheck::Never));
        assert_eq!(
            "newer-format-only".parse(),
            Ok(SessionModeCheck::NewerFormatOnly)
        );
        assert!("sometimes".parse::<SessionModeCheck>().is_err());
    }
}
