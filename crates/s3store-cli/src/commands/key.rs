//! Key codec commands

use s3store_cache::KeyCodec;
use s3store_core::error::StoreResult;

use super::CommandContext;

pub async fn encode(key: &str, site: Option<String>, ctx: &CommandContext) -> StoreResult<()> {
    ctx.output.data(&encoded_key(key, site, ctx).await?);
    Ok(())
}

/// Token of `key`, stripping `--site` or else the configured site
pub async fn encoded_key(key: &str, site: Option<String>, ctx: &CommandContext) -> StoreResult<String> {
    let site = match site {
        Some(site) => Some(site),
        None => ctx.configured_site().await?,
    };

    Ok(KeyCodec::new(site).encode(key))
}

/// Tokens decode to the canonical key, so no site is involved
pub fn decode(token: &str, ctx: &CommandContext) -> StoreResult<()> {
    ctx.output.data(&KeyCodec::default().decode(token)?);
    Ok(())
}
