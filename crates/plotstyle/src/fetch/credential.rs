//! Access tokens for private configuration repositories.

use std::fmt;

/// Sentinel that disables credential reuse for font downloads.
pub const NO_CREDENTIAL: &str = "none";

/// An access token sent as `Authorization: token <value>`.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("token {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

/// Which credential font downloads use during a theme load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontCredential {
    /// Reuse the credential of the theme load itself.
    #[default]
    Inherit,
    /// Fetch fonts without any credential.
    Disabled,
    /// Fetch fonts with this credential.
    Token(Credential),
}

impl FontCredential {
    /// Interprets an optional user-supplied value.
    ///
    /// `None` inherits, the sentinel `"none"` disables, anything else is a
    /// token.
    pub fn from_option(value: Option<&str>) -> Self {
        match value {
            None => FontCredential::Inherit,
            Some(NO_CREDENTIAL) => FontCredential::Disabled,
            Some(token) => FontCredential::Token(Credential::new(token)),
        }
    }

    /// The credential to use for fonts given the theme-load credential.
    pub fn resolve<'a>(&'a self, theme_credential: Option<&'a Credential>) -> Option<&'a Credential> {
        match self {
            FontCredential::Inherit => theme_credential,
            FontCredential::Disabled => None,
            FontCredential::Token(token) => Some(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_token() {
        let credential = Credential::new("ghp_secret");
        assert_eq!(format!("{credential:?}"), "Credential(***)");
        assert_eq!(credential.header_value(), "token ghp_secret");
    }

    #[test]
    fn font_credential_precedence() {
        let theme = Credential::new("theme-token");

        let inherit = FontCredential::from_option(None);
        assert_eq!(inherit.resolve(Some(&theme)), Some(&theme));
        assert_eq!(inherit.resolve(None), None);

        let disabled = FontCredential::from_option(Some("none"));
        assert_eq!(disabled, FontCredential::Disabled);
        assert_eq!(disabled.resolve(Some(&theme)), None);

        let explicit = FontCredential::from_option(Some("font-token"));
        assert_eq!(
            explicit.resolve(Some(&theme)),
            Some(&Credential::new("font-token"))
        );
        assert_eq!(explicit.resolve(None), Some(&Credential::new("font-token")));
    }

    #[test]
    fn sentinel_is_case_sensitive() {
        assert_eq!(
            FontCredential::from_option(Some("None")),
            FontCredential::Token(Credential::new("None"))
        );
    }
}
