/// 日志工具模块
///
/// 提供日志初始化和输出格式的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 设置了 `RUST_LOG` 时以它为准，否则详细模式为 debug，普通模式为 info。
/// 日志写到 stderr，stdout 留给 `labels` 等命令的输出。重复调用不会出错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `command`: 子命令名称
/// - `book`: 教材代号
pub fn log_startup(command: &str, book: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 作业工具启动 - {}", command);
    info!("📚 教材: {}", book);
    info!(
        "🕐 开始时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 记录命令完成信息
///
/// # 参数
/// - `command`: 子命令名称
/// - `outputs`: 写出的文件
pub fn log_command_done(command: &str, outputs: &[String]) {
    info!("{}", "─".repeat(60));
    info!("✅ {} 完成", command);
    for out in outputs {
        info!("📄 已写入: {}", out);
    }
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("free-fall|dropped-ball", 9), "free-fall...");
        assert_eq!(truncate_text("短文本", 10), "短文本");
    }
}
