//! 摘要算法 - 基础设施层
//!
//! 只暴露"对字符串取 MD5"的能力。网页端的 JS 实现必须与这里逐字节一致，
//! 因此使用标准 MD5，不做任何截断或自定义填充。

/// 计算 UTF-8 字节串的 MD5，返回 32 位小写十六进制字符串
pub fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_answers() {
        assert_eq!(md5_hex("hello"), "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex("73"), "d2ddea18f00665ce8623e36bd4e3c7c5");
        assert_eq!(md5_hex("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_selection_key_digest() {
        assert_eq!(md5_hex("0,2,5:7"), "dc1f877d17cd23a5a73cffcfd7824307");
    }

    #[test]
    fn test_digest_shape() {
        let h = md5_hex("any student, any chapter");
        assert_eq!(h.len(), 32);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
