/// Read-through caching against Redis.
///
/// Looks the key up first and returns the cached value on a hit. On a miss the
/// block is awaited, its value is queued for a background write with the given
/// TTL, and then returned. Errors from the block propagate with `?`, so nothing
/// is cached for a failed fetch.
///
/// # Arguments
/// * `$cache`: a [`Cache`](crate::db::Cache) (anything with `get_from_cache` and
///   `set_in_background`).
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write.
/// * `$ttl`: time-to-live in seconds.
/// * `$block`: future computing the value on a miss.
///
/// # Example
/// ```rust,ignore
/// let places: Vec<Place> = cached!(
///     self.cache,
///     CacheKey::PlaceDetails(place_id.to_string()),
///     DETAILS_CACHE_TTL,
///     async move { self.fetch_details(place_id).await }
/// )?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
