//! # HW Whiz
//!
//! 个性化作业工具：把手写的作业流排成每次作业，按学号为每名学生从可互换的题目中选出一道，
//! 并生成 CSV、LaTeX 和网页等各类输出
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 与业务无关的底层能力
//! - `md5_hex` - 选题用的摘要函数，必须与网页端实现逐位一致
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `chunk_parser` - 解析作业段
//! - `schedule` - 把作业流排到各次作业上
//! - `selector` - 按学号选题
//! - `describe` - 题目描述与排序
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一名学生"的完整作业
//! - `AssignmentCtx` - 选题上下文（学号 + 学期 + 候选题）
//! - `StudentAssignment` - 遍历排期，逐组选题并应用排除规则
//!
//! ### ④ 报表层（Reports）
//! - `reports/` - 纯函数，输出字符串
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/app` - 持有配置，分发子命令
//! - `orchestrator/commands` - 单个子命令的文件读写
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod reports;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Catalog, ProblemKey, ProblemRef, Roster, Student, Term};
pub use orchestrator::App;
pub use services::{parse_hw, select_using_hash, Schedule};
pub use workflow::{AssignmentCtx, StudentAssignment};
