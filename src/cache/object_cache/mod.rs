pub mod moka;
pub mod redis;

use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::cache::register::{BoxedObjectCacheFuture, register_object_cache_plugin};
use crate::errors::LmsError;

/// 注册内置缓存后端
pub fn register_builtin_plugins() {
    register_object_cache_plugin(
        "moka",
        Arc::new(|| -> BoxedObjectCacheFuture {
            Box::pin(async {
                self::moka::MokaCacheWrapper::new()
                    .map(|cache| Box::new(cache) as Box<dyn ObjectCache>)
                    .map_err(LmsError::cache_connection)
            })
        }),
    );
    register_object_cache_plugin(
        "redis",
        Arc::new(|| -> BoxedObjectCacheFuture {
            Box::pin(async {
                self::redis::RedisObjectCache::new()
                    .map(|cache| Box::new(cache) as Box<dyn ObjectCache>)
                    .map_err(LmsError::cache_connection)
            })
        }),
    );
}
