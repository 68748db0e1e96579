use std::collections::HashMap;

use super::FetchError;

pub(crate) const SERVICE_NAME: &str = "dayslip";

/// Keyring account holding the TickTick Open API token.
pub const TICKTICK_ACCOUNT: &str = "ticktick";

fn attributes(account: &str) -> HashMap<&str, &str> {
    let mut attrs = HashMap::new();
    attrs.insert("service", SERVICE_NAME);
    attrs.insert("account", account);
    attrs
}

/// Store an API token in the system keyring via Secret Service.
pub async fn store_token(account: &str, token: &str) -> Result<(), FetchError> {
    let keyring = oo7::Keyring::new()
        .await
        .map_err(|e| FetchError::Credentials(format!("Failed to connect to keyring: {}", e)))?;

    keyring
        .create_item(
            &format!("dayslip {} token", account),
            &attributes(account),
            token.as_bytes(),
            true, // replace existing
        )
        .await
        .map_err(|e| FetchError::Credentials(format!("Failed to store token: {}", e)))?;

    Ok(())
}

/// Load an API token from the system keyring.
pub async fn load_token(account: &str) -> Result<Option<String>, FetchError> {
    let keyring = oo7::Keyring::new()
        .await
        .map_err(|e| FetchError::Credentials(format!("Failed to connect to keyring: {}", e)))?;

    let items = keyring
        .search_items(&attributes(account))
        .await
        .map_err(|e| FetchError::Credentials(format!("Failed to search keyring: {}", e)))?;

    let Some(item) = items.first() else {
        return Ok(None);
    };
    let secret_bytes = item
        .secret()
        .await
        .map_err(|e| FetchError::Credentials(format!("Failed to read secret: {}", e)))?;
    let token = String::from_utf8(secret_bytes.to_vec())
        .map_err(|e| FetchError::Credentials(format!("Invalid UTF-8 in secret: {}", e)))?;
    Ok(Some(token))
}
