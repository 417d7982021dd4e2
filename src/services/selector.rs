//! 个性化选题 - 业务能力层
//!
//! 纯函数：同样的（章节, 候选题, 学期, 学号）永远选出同一道题。
//! `assets/select_using_hash.js` 中有同一算法的网页端实现，两边的键串拼接方式必须完全一致。

use crate::error::{AppResult, SelectionError};
use crate::infrastructure::md5_hex;
use crate::workflow::AssignmentCtx;
use tracing::trace;

/// 拼接选题用的键串：`学号,章节,题1:题2:...`
///
/// 候选题按给定顺序拼接，不排序。
pub fn selection_key(student_id: &str, chapter: u32, candidates: &[String]) -> String {
    format!("{},{},{}", student_id, chapter, candidates.join(":"))
}

/// 摘要最后 4 个十六进制字符的值，范围 `0..=65535`
pub fn digest_tail(digest: &str) -> AppResult<i64> {
    let illegal = || SelectionError::IllegalDigest {
        digest: digest.to_string(),
    };
    let tail = digest
        .len()
        .checked_sub(4)
        .and_then(|start| digest.get(start..))
        .ok_or_else(illegal)?;
    Ok(i64::from_str_radix(tail, 16).map_err(|_| illegal())?)
}

/// 为学生选出候选题中的一道，返回下标 `0..n`
///
/// 候选列表为空时返回错误，不会退回任何默认值。
pub fn select_using_hash(ctx: &AssignmentCtx) -> AppResult<usize> {
    let n = ctx.candidates.len();
    if n == 0 {
        return Err(SelectionError::EmptyCandidates {
            chapter: ctx.chapter,
        }
        .into());
    }

    let key = selection_key(&ctx.student_id, ctx.chapter, &ctx.candidates);
    let digest = md5_hex(&key);
    let k = digest_tail(&digest)?;
    // 重修的学生换一道题
    let k = k + ctx.term.ordinal();
    let index = k.rem_euclid(n as i64) as usize;

    trace!("{} key={} digest={} -> {}", ctx, key, digest, index);
    Ok(index)
}
