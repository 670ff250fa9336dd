use anyhow::{Result, bail};
use log::info;

use crate::{interceptor::mask_token, storage::StorageSlot};

/// Stores the access token sent with every following request.
#[tracing::instrument(skip(slot, token))]
pub fn set(slot: &StorageSlot, token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        bail!("Access token must not be empty");
    }
    if !slot.set(token) {
        bail!("Could not save the access token: storage is unavailable");
    }
    info!("Stored access token {}", mask_token(token));
    println!("Access token saved.");
    Ok(())
}

#[tracing::instrument(skip(slot))]
pub fn show(slot: &StorageSlot) -> Result<()> {
    match describe(slot) {
        Some(masked) => println!("{}", masked),
        None => println!("No access token stored."),
    }
    Ok(())
}

#[tracing::instrument(skip(slot))]
pub fn clear(slot: &StorageSlot) -> Result<()> {
    if !slot.remove() {
        bail!("Could not remove the access token: storage is unavailable");
    }
    println!("Access token removed.");
    Ok(())
}

/// The stored token, masked for display.
pub fn describe(slot: &StorageSlot) -> Option<String> {
    slot.get()
        .filter(|token| !token.trim().is_empty())
        .map(|token| mask_token(token.trim()))
}
