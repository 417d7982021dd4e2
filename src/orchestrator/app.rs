//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **持有配置**：合并命令行、环境变量和配置文件后的 `Config`
//! 2. **共享输入**：题目目录和排期只在需要时加载一次，按引用传给各命令
//! 3. **命令分发**：把子命令交给 `commands` 中对应的处理函数
//! 4. **日志汇总**：启动横幅和完成横幅

use crate::cli::Command;
use crate::config::Config;
use crate::models::loaders::{load_catalog, load_parsed_streams};
use crate::models::Catalog;
use crate::orchestrator::commands;
use crate::services::Schedule;
use crate::utils::logging::{log_command_done, log_startup};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 加载当前教材的题目目录
    pub async fn catalog(&self) -> Result<Catalog> {
        let path = Path::new(&self.config.problems_csv);
        load_catalog(path, &self.config.book)
            .await
            .with_context(|| format!("无法加载题目目录 {}", path.display()))
    }

    /// 读取 parse-hw 的输出并生成排期
    pub async fn schedule(&self, input: &Path, catalog: &Catalog) -> Result<Schedule> {
        let streams = load_parsed_streams(input)
            .await
            .with_context(|| format!("无法读取作业数据 {}", input.display()))?;
        let schedule = Schedule::build(&streams, catalog)?;
        info!("🗓️ 共 {} 次作业", schedule.set_count());
        Ok(schedule)
    }

    /// 运行一个子命令
    pub async fn run(&self, command: Command) -> Result<()> {
        let name = command.name();
        log_startup(name, &self.config.book);

        let outputs = match command {
            Command::ParseHw { input, output } => commands::parse_hw(self, &input, &output).await?,
            Command::HwTable {
                input,
                output,
                filters,
            } => commands::hw_table(self, &input, &output, &filters).await?,
            Command::PointsPossible {
                input,
                output,
                filters,
                no_header,
            } => commands::points_possible(self, &input, &output, &filters, !no_header).await?,
            Command::SetsCsv {
                input,
                output,
                term,
                gradebook,
                class,
                exclude_if,
                exclude_if_class_and_flag,
                no_header,
            } => {
                let args = commands::SetsCsvArgs {
                    term,
                    gradebook,
                    class,
                    exclude_if,
                    exclude_if_class_and_flag,
                    header: !no_header,
                };
                commands::sets_csv(self, &input, &output, args).await?
            }
            Command::RosterCsv { gradebook, output } => commands::roster_csv(gradebook.as_deref(), &output).await?,
            Command::SelfService {
                input,
                output,
                term,
                class_title,
                section,
                boilerplate,
                instructions,
                exclude_if,
            } => {
                let args = commands::SelfServiceArgs {
                    term,
                    class_title,
                    section,
                    boilerplate,
                    instructions,
                    exclude_if,
                };
                commands::self_service(self, &input, &output, args).await?
            }
            Command::Groups {
                gradebook,
                output,
                class_title,
                section,
            } => commands::groups(gradebook.as_deref(), &output, &class_title, &section).await?,
            Command::Report {
                input,
                output,
                output2,
                reading,
                due,
                sets,
                filters,
            } => {
                let args = commands::ReportArgs {
                    reading,
                    due,
                    sets,
                    filters,
                };
                commands::report(self, &input, &output, &output2, args).await?
            }
            Command::Labels { chapter, numbers } => commands::labels(self, chapter, &numbers.join(" ")).await?,
            Command::Solutions {
                output,
                class_title,
                sets,
                gradebook,
                sources_dir,
            } => {
                let args = commands::SolutionsArgs {
                    class_title,
                    sets,
                    gradebook,
                    sources_dir,
                };
                commands::solutions(self, &output, args).await?
            }
        };

        log_command_done(name, &outputs);
        Ok(())
    }
}
