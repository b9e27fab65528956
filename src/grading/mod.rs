//! 测评与评分的纯计算逻辑
//!
//! 本模块不做任何 I/O：存储层读取数据后调用这里的函数做判定与推导，
//! 再把结果写回。所有时间相关的判断都由调用方传入 `now`。

pub mod attempt;
pub mod auto_grade;
pub mod gpa;
pub mod score;
pub mod submission;

/// 四舍五入保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(2.675_000_1), 2.68);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(3.5), 3.5);
    }
}
