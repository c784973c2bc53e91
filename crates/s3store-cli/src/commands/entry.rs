//! Cache entry commands: set, get, del and keys

use s3store_backend::CacheStore;
use s3store_core::error::{StoreError, StoreResult};
use s3store_core::types::CacheValue;

use super::CommandContext;

/// Parse a command-line value as JSON, falling back to a plain string
pub fn parse_value(input: &str, raw: bool) -> CacheValue {
    if raw {
        return CacheValue::from(input);
    }

    serde_json::from_str::<CacheValue>(input).unwrap_or_else(|_| CacheValue::from(input))
}

/// Render a value the way it is stored
pub fn render_value(value: &CacheValue) -> StoreResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialization {
        key: String::new(),
        message: e.to_string(),
    })
}

pub async fn set(key: &str, input: &str, raw: bool, ctx: &CommandContext) -> StoreResult<()> {
    let store = ctx.open_store().await?;
    let value = parse_value(input, raw);

    if !store.is_cacheable_value(&value) {
        ctx.output.warn(&format!("Refusing to store null under '{}'", key));
        return Ok(());
    }

    store.set(key, value).await?;

    let location = store.location_for(key);
    ctx.output.success(&format!("Stored '{}'", key));
    ctx.output.info(&location.url);
    Ok(())
}

pub async fn get(key: &str, ctx: &CommandContext) -> StoreResult<()> {
    let store = ctx.open_store().await?;

    match store.get(key).await? {
        Some(value) => ctx.output.data(&render_value(&value)?),
        None => ctx.output.warn(&format!("'{}' not found", key)),
    }
    Ok(())
}

/// Delete a key. A fresh store has an empty index, so with try-get the key
/// is resolved first; without it the derived location is deleted directly.
pub async fn del(key: &str, ctx: &CommandContext) -> StoreResult<()> {
    let store = ctx.open_store().await?;

    if !store.options().tryget {
        store.delete_derived(key).await?;
        ctx.output.success(&format!("Deleted '{}'", key));
        return Ok(());
    }

    if store.get(key).await?.is_none() {
        ctx.output.warn(&format!("'{}' not found, nothing to delete", key));
        return Ok(());
    }

    store.del(key).await?;
    ctx.output.success(&format!("Deleted '{}'", key));
    Ok(())
}

pub async fn keys(candidates: &[String], ctx: &CommandContext) -> StoreResult<()> {
    let store = ctx.open_store().await?;

    for key in candidates {
        store.get(key).await?;
    }

    let mut found = store.keys().await?;
    found.sort();
    for key in found {
        ctx.output.data(&key);
    }
    Ok(())
}
