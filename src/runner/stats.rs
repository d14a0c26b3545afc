//! Run statistics shown after the program output

/// Shown instead of an empty output
pub const NO_OUTPUT_MESSAGE: &str = "程序已成功执行，无输出内容";

/// Smallest memory figure ever reported, in MB
const MIN_REPORTED_MB: f64 = 0.1;

/// Memory estimate in MB, never below 0.1
pub fn memory_mb(bytes: usize) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0)).max(MIN_REPORTED_MB)
}

/// `编译成功！` trailer with run time (seconds, 3 decimals) and memory (MB, 1 decimal)
pub fn trailer(elapsed_ms: f64, memory_bytes: usize) -> String {
    format!(
        "\n编译成功！\n运行时间: {:.3}秒\n内存使用: {:.1}MB",
        elapsed_ms / 1000.0,
        memory_mb(memory_bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_has_floor() {
        assert_eq!(memory_mb(0), 0.1);
        assert_eq!(memory_mb(3 * 1024 * 1024), 3.0);
    }

    #[test]
    fn test_trailer_format() {
        assert_eq!(
            trailer(1234.0, 64),
            "\n编译成功！\n运行时间: 1.234秒\n内存使用: 0.1MB"
        );
    }
}
