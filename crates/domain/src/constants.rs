//! Wire-level constants
//!
//! Header names, media types and the production SmartThings endpoints.

// Production endpoints
pub const DEFAULT_BASE_URL: &str = "https://api.smartthings.com";
pub const DEFAULT_AUTH_URL: &str = "https://auth-global.api.smartthings.com/oauth/token";
pub const DEFAULT_KEY_API_URL: &str = "https://key.smartthings.com";

// Header names
pub const HEADER_ACCEPT: &str = "Accept";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_CORRELATION: &str = "X-ST-CORRELATION";

// Media types
pub const MEDIA_TYPE_JSON: &str = "application/json";
pub const MEDIA_TYPE_FORM: &str = "application/x-www-form-urlencoded";
pub const VERSIONED_MEDIA_TYPE_PREFIX: &str = "application/vnd.smartthings+json;v=";

// Refresh grant
pub const GRANT_TYPE_REFRESH_TOKEN: &str = "refresh_token";

/// Render the versioned `Accept` media type for an API version.
pub fn versioned_media_type(version: &str) -> String {
    format!("{VERSIONED_MEDIA_TYPE_PREFIX}{version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_media_type() {
        assert_eq!(versioned_media_type("20170916"), "application/vnd.smartthings+json;v=20170916");
        assert_eq!(versioned_media_type("1"), "application/vnd.smartthings+json;v=1");
    }
}
