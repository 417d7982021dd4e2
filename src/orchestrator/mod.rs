//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责文件读写和命令调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 持有配置
//! - 加载题目目录与排期
//! - 分发子命令，输出启动和完成横幅
//!
//! ### `commands` - 子命令处理
//! - 每个子命令一个函数
//! - 读入输入文件，调用报表层，写出结果
//!
//! ## 层次关系
//!
//! ```text
//! app (分发 Command)
//!     ↓
//! commands (单个子命令)
//!     ↓
//! reports (纯函数报表)
//!     ↓
//! workflow::StudentAssignment (单个学生的作业)
//!     ↓
//! services (能力层：parse / schedule / select / describe)
//!     ↓
//! infrastructure (基础设施：md5)
//! ```
//!
//! ## 设计原则
//!
//! 1. **只有编排层读写文件**：下层全部是纯函数，便于测试
//! 2. **向下依赖**：编排层 → reports → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和参数整理

pub mod app;
pub mod commands;

pub use app::App;
