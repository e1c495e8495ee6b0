//! Credential defaults read from the process environment

use serde_json::Value;

use crate::config::sources::Fragment;

/// Environment variable supplying the default `accountSid`
pub const ACCOUNT_SID_VAR: &str = "TWILIO_SID";

/// Environment variable supplying the default `accountToken`
pub const ACCOUNT_TOKEN_VAR: &str = "TWILIO_TOKEN";

const CREDENTIAL_VARS: [(&str, &str); 2] = [
    (ACCOUNT_SID_VAR, "accountSid"),
    (ACCOUNT_TOKEN_VAR, "accountToken"),
];

/// Build the environment fragment through `lookup`
///
/// Only variables that are set contribute a field.
pub fn environment_fragment<F>(lookup: F) -> Fragment
where
    F: Fn(&str) -> Option<String>,
{
    CREDENTIAL_VARS
        .iter()
        .filter_map(|(var, field)| lookup(var).map(|value| (field.to_string(), Value::String(value))))
        .collect()
}

/// Look a variable up in the real process environment
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
