/// Wraps a fallible lookup with an optional Redis cache.
///
/// With a cache, a hit is returned as-is; on a miss the future is awaited,
/// its value queued for a background write, and returned. Without a cache the
/// future is simply awaited. Cache read failures count as misses.
///
/// # Arguments
/// * `$cache`: `Option<&Cache>`, or any type with the same
///   `get_or_miss` / `set_in_background` methods
/// * `$key`: the `CacheKey` for the value
/// * `$ttl`: time-to-live in seconds
/// * `$future`: future producing `AppResult<T>` on a miss
///
/// # Example
/// ```rust,ignore
/// let entry: CatalogEntry = cached!(
///     self.cache.as_ref(),
///     CacheKey::Video(id.to_string()),
///     VIDEO_CACHE_TTL,
///     self.fetch_one(&id)
/// )?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $future:expr) => {{
        let cache = $cache;
        let key = $key;
        match cache {
            Some(cache) => match cache.get_or_miss(&key).await {
                Some(hit) => Ok(hit),
                None => {
                    let value = $future.await?;
                    cache.set_in_background(&key, &value, $ttl);
                    Ok(value)
                }
            },
            None => $future.await,
        }
    }};
}
