use std::fmt;

use super::errors::CredentialError;

/// Authorization schemes understood by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// `Authorization: Bearer <token>` (access and refresh tokens)
    Bearer,
    /// `Authorization: ApiKey <key>` (webhook callers)
    ApiKey,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Bearer => "Bearer",
            Scheme::ApiKey => "ApiKey",
        }
    }

    fn matches(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential carried by an `Authorization` header, tagged by scheme.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    ApiKey(String),
}

impl Credential {
    pub fn scheme(&self) -> Scheme {
        match self {
            Credential::Bearer(_) => Scheme::Bearer,
            Credential::ApiKey(_) => Scheme::ApiKey,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Credential::Bearer(value) | Credential::ApiKey(value) => value,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            Credential::Bearer(value) | Credential::ApiKey(value) => value,
        }
    }
}

// Credentials are secrets; keep them out of debug output.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential::{}(<redacted>)", self.scheme())
    }
}

/// Parse an `Authorization` header value into a typed credential.
///
/// The scheme is matched case-insensitively against `Bearer` and `ApiKey`.
///
/// # Errors
/// * `Missing` - Header absent or empty
/// * `Malformed` - Header is not exactly `<scheme> <value>`
/// * `SchemeMismatch` - Scheme is neither `Bearer` nor `ApiKey`
/// * `EmptyValue` - Scheme present but the credential is blank
pub fn parse(header: Option<&str>) -> Result<Credential, CredentialError> {
    let (scheme_name, value) = split_header(header)?;

    let credential = if Scheme::Bearer.matches(scheme_name) {
        Credential::Bearer(checked_value(value)?)
    } else if Scheme::ApiKey.matches(scheme_name) {
        Credential::ApiKey(checked_value(value)?)
    } else {
        return Err(CredentialError::SchemeMismatch {
            expected: format!("{} or {}", Scheme::Bearer, Scheme::ApiKey),
        });
    };

    Ok(credential)
}

/// Extract the credential for one expected scheme.
///
/// # Errors
/// Same failure kinds as [`parse`], with `SchemeMismatch` naming `expected`.
pub fn extract(header: Option<&str>, expected: Scheme) -> Result<String, CredentialError> {
    let (scheme_name, value) = split_header(header)?;

    if !expected.matches(scheme_name) {
        return Err(CredentialError::SchemeMismatch {
            expected: expected.as_str().to_string(),
        });
    }

    checked_value(value)
}

/// Shorthand for `extract(header, Scheme::Bearer)`.
pub fn bearer_token(header: Option<&str>) -> Result<String, CredentialError> {
    extract(header, Scheme::Bearer)
}

/// Shorthand for `extract(header, Scheme::ApiKey)`.
pub fn api_key(header: Option<&str>) -> Result<String, CredentialError> {
    extract(header, Scheme::ApiKey)
}

fn split_header(header: Option<&str>) -> Result<(&str, &str), CredentialError> {
    let header = match header {
        Some(h) if !h.trim().is_empty() => h.trim_start(),
        _ => return Err(CredentialError::Missing),
    };

    header
        .split_once(char::is_whitespace)
        .ok_or(CredentialError::Malformed)
}

fn checked_value(value: &str) -> Result<String, CredentialError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(CredentialError::EmptyValue);
    }

    // A third whitespace-separated part means the header is not `<scheme> <value>`.
    if value.contains(char::is_whitespace) {
        return Err(CredentialError::Malformed);
    }

    Ok(value.to_string())
}
