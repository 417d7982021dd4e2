use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 个性化作业工具：解析作业流、按学号分配题目、生成各类报表
#[derive(Parser, Debug)]
#[command(name = "hw-whiz")]
#[command(about = "Homework scheduling and per-student problem assignment")]
pub struct Cli {
    /// TOML 配置文件
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 教材代号，覆盖配置文件和环境变量
    #[arg(long, global = true)]
    pub book: Option<String>,

    /// problems.csv 路径，覆盖配置文件和环境变量
    #[arg(long, global = true)]
    pub problems_csv: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// 计分相关的标记选项
#[derive(Args, Debug, Clone, Default)]
pub struct FlagFilters {
    /// 带有其中任一标记的题目算作附加题
    #[arg(long, default_value = "")]
    pub ec_if: String,

    /// 带有其中任一标记的题目不布置
    #[arg(long, default_value = "")]
    pub exclude_if: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// 把 YAML 作业流解析为 JSON
    ParseHw {
        /// 手写的 hw.yaml
        #[arg(short, long)]
        input: PathBuf,
        /// 输出的 hw.json
        #[arg(short, long)]
        output: PathBuf,
    },
    /// 生成 LaTeX 作业一览表
    HwTable {
        /// parse-hw 生成的 JSON
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        filters: FlagFilters,
    },
    /// 生成每次作业的分值 CSV
    PointsPossible {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        filters: FlagFilters,
        /// 不输出表头
        #[arg(long)]
        no_header: bool,
    },
    /// 为每名学生选题，生成 sets.csv
    SetsCsv {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// 学期，例如 f14
        #[arg(long)]
        term: String,
        /// 成绩册 JSON；不指定或文件不存在时使用假花名册
        #[arg(long)]
        gradebook: Option<PathBuf>,
        /// 只输出该班级的学生
        #[arg(long)]
        class: Option<String>,
        /// 带有其中任一标记的题目不布置
        #[arg(long, default_value = "")]
        exclude_if: String,
        /// 对某个班级排除带有指定标记的题目
        #[arg(long, num_args = 2, value_names = ["CLASS", "FLAGS"])]
        exclude_if_class_and_flag: Option<Vec<String>>,
        #[arg(long)]
        no_header: bool,
    },
    /// 从成绩册生成 roster.csv
    RosterCsv {
        #[arg(long)]
        gradebook: Option<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// 生成学生自助查询作业的网页
    SelfService {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        term: String,
        #[arg(long)]
        class_title: String,
        /// 上课时段：m 为周一三，t 为周二四
        #[arg(long, default_value = "")]
        section: String,
        /// 放在作业清单最前面的 HTML 片段
        #[arg(long)]
        boilerplate: Option<PathBuf>,
        /// 输入学号前显示的说明 HTML 片段
        #[arg(long)]
        instructions: Option<PathBuf>,
        #[arg(long, default_value = "")]
        exclude_if: String,
    },
    /// 生成随机分组网页
    Groups {
        #[arg(long)]
        gradebook: Option<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        class_title: String,
        #[arg(long, default_value = "")]
        section: String,
    },
    /// 对照课程日程生成进度报告
    Report {
        #[arg(short, long)]
        input: PathBuf,
        /// 每次课的安排表
        #[arg(short, long)]
        output: PathBuf,
        /// 按章节统计的题目布置情况
        #[arg(long)]
        output2: PathBuf,
        #[arg(long)]
        reading: PathBuf,
        #[arg(long)]
        due: PathBuf,
        #[arg(long)]
        sets: PathBuf,
        #[command(flatten)]
        filters: FlagFilters,
    },
    /// 把题号换成标签，输出到 stdout
    Labels {
        #[arg(long)]
        chapter: u32,
        /// 以空白分隔的题号
        numbers: Vec<String>,
    },
    /// 生成每名学生的解答 LaTeX
    Solutions {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        class_title: String,
        #[arg(long)]
        sets: PathBuf,
        #[arg(long)]
        gradebook: Option<PathBuf>,
        /// 解答源文件的上级目录，其下每个子目录中放 `<标签>.tex`
        #[arg(long)]
        sources_dir: PathBuf,
    },
}

impl Command {
    /// 子命令名称，用于日志
    pub fn name(&self) -> &'static str {
        match self {
            Command::ParseHw { .. } => "parse-hw",
            Command::HwTable { .. } => "hw-table",
            Command::PointsPossible { .. } => "points-possible",
            Command::SetsCsv { .. } => "sets-csv",
            Command::RosterCsv { .. } => "roster-csv",
            Command::SelfService { .. } => "self-service",
            Command::Groups { .. } => "groups",
            Command::Report { .. } => "report",
            Command::Labels { .. } => "labels",
            Command::Solutions { .. } => "solutions",
        }
    }
}
