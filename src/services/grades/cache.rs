//! GPA / GPAX 缓存键与失效
//!
//! 每个学生有一个缓存代号，GPA 键都带上读取时的代号。成绩写入提交后换一个新代号，
//! 写入前开始计算的读请求只会把结果存到旧代号下，之后的读取不会再命中它。

use crate::cache::{CacheResult, ObjectCache};

fn generation_key(student_id: i64) -> String {
    format!("gpa-gen:{student_id}")
}

pub fn gpa_key(student_id: i64, generation: &str, semester_id: i64) -> String {
    format!("gpa:{student_id}:{generation}:{semester_id}")
}

pub fn gpax_key(student_id: i64, generation: &str) -> String {
    format!("gpax:{student_id}:{generation}")
}

/// 当前代号；不存在时（首次读取或已过期）立即生成一个
///
/// 必须在读取数据库之前调用。
pub async fn generation(cache: &dyn ObjectCache, student_id: i64) -> String {
    match cache.get_raw(&generation_key(student_id)).await {
        CacheResult::Found(generation) => generation,
        _ => bump_generation(cache, student_id).await,
    }
}

async fn bump_generation(cache: &dyn ObjectCache, student_id: i64) -> String {
    let generation = format!("{:016x}", rand::random::<u64>());
    cache
        .insert_raw(generation_key(student_id), generation.clone(), 0)
        .await;
    generation
}

/// 成绩写入提交后调用，使该学生已缓存的 GPA / GPAX 全部失效
pub async fn invalidate_student(cache: &dyn ObjectCache, student_id: i64) {
    let generation = bump_generation(cache, student_id).await;
    tracing::debug!(
        "GPA cache generation for student {} is now {}",
        student_id,
        generation
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::cache::{get_json, insert_json};

    #[test]
    fn test_cache_keys() {
        assert_eq!(gpa_key(100, "g1", 3), "gpa:100:g1:3");
        assert_eq!(gpax_key(100, "g1"), "gpax:100:g1");
    }

    #[tokio::test]
    async fn test_generation_is_stable_until_invalidated() {
        let cache = MokaCacheWrapper::with_capacity(100, 60);
        let first = generation(&cache, 7).await;
        assert_eq!(generation(&cache, 7).await, first);

        invalidate_student(&cache, 7).await;
        assert_ne!(generation(&cache, 7).await, first);
    }

    #[tokio::test]
    async fn test_result_computed_before_write_is_not_served() {
        let cache = MokaCacheWrapper::with_capacity(100, 60);

        // 读请求先取得代号，随后成绩写入提交并失效
        let before = generation(&cache, 7).await;
        invalidate_student(&cache, 7).await;
        // 读请求此时才写回旧结果
        insert_json(&cache, gpa_key(7, &before, 1), &3.0_f64, 0).await;

        let now = generation(&cache, 7).await;
        assert_eq!(get_json::<f64>(&cache, &gpa_key(7, &now, 1)).await, None);
        assert_eq!(get_json::<f64>(&cache, &gpa_key(7, &before, 1)).await, Some(3.0));
    }
}
