//! 子命令处理 - 编排层
//!
//! 每个函数负责一个子命令：读入文件、调用报表层、写出结果，返回写出的文件列表。
//! 业务规则都在下层，这里只做文件读写和参数整理。

use crate::cli::FlagFilters;
use crate::models::loaders::{
    load_optional_text, load_raw_streams, load_roster, load_solution_sources, read_text, write_text,
};
use crate::models::Term;
use crate::orchestrator::App;
use crate::reports::groups_page::render_groups_page;
use crate::reports::hw_table::render_hw_table;
use crate::reports::labels::render_labels;
use crate::reports::points::{render_points_possible, PointsOptions};
use crate::reports::progress::{render_progress_report, ProgressSources};
use crate::reports::roster_csv::render_roster_csv;
use crate::reports::self_service::{build_hw_data, render_self_service_page, SelfServiceOptions};
use crate::reports::sets_csv::{parse_sets_csv, render_sets_csv, SetsCsvOptions};
use crate::reports::solutions::{labels_needing_sources, render_solutions, SolutionsOptions};
use crate::reports::class_title_with_section;
use crate::services::parse_hw as parse_streams;
use crate::workflow::ExclusionRules;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct SetsCsvArgs {
    pub term: String,
    pub gradebook: Option<PathBuf>,
    pub class: Option<String>,
    pub exclude_if: String,
    pub exclude_if_class_and_flag: Option<Vec<String>>,
    pub header: bool,
}

pub struct SelfServiceArgs {
    pub term: String,
    pub class_title: String,
    pub section: String,
    pub boilerplate: Option<PathBuf>,
    pub instructions: Option<PathBuf>,
    pub exclude_if: String,
}

pub struct ReportArgs {
    pub reading: PathBuf,
    pub due: PathBuf,
    pub sets: PathBuf,
    pub filters: FlagFilters,
}

pub struct SolutionsArgs {
    pub class_title: String,
    pub sets: PathBuf,
    pub gradebook: Option<PathBuf>,
    pub sources_dir: PathBuf,
}

fn points_options(filters: &FlagFilters) -> PointsOptions {
    PointsOptions {
        ec_if: filters.ec_if.clone(),
        exclude_if: filters.exclude_if.clone(),
    }
}

async fn write_output(path: &Path, content: &str) -> Result<Vec<String>> {
    write_text(path, content).await?;
    Ok(vec![path.display().to_string()])
}

pub async fn parse_hw(app: &App, input: &Path, output: &Path) -> Result<Vec<String>> {
    let catalog = app.catalog().await?;
    let raw = load_raw_streams(input)
        .await
        .with_context(|| format!("无法读取作业流 {}", input.display()))?;
    let parsed = parse_streams(&raw, &catalog)?;
    let json = serde_json::to_string_pretty(&parsed)?;
    write_output(output, &json).await
}

pub async fn hw_table(app: &App, input: &Path, output: &Path, filters: &FlagFilters) -> Result<Vec<String>> {
    let catalog = app.catalog().await?;
    let schedule = app.schedule(input, &catalog).await?;
    let tex = render_hw_table(&schedule, &catalog, &points_options(filters));
    write_output(output, &tex).await
}

pub async fn points_possible(
    app: &App,
    input: &Path,
    output: &Path,
    filters: &FlagFilters,
    header: bool,
) -> Result<Vec<String>> {
    let catalog = app.catalog().await?;
    let schedule = app.schedule(input, &catalog).await?;
    let csv = render_points_possible(&schedule, &catalog, &points_options(filters), header)?;
    write_output(output, &csv).await
}

pub async fn sets_csv(app: &App, input: &Path, output: &Path, args: SetsCsvArgs) -> Result<Vec<String>> {
    let term = Term::parse(&args.term)?;
    let catalog = app.catalog().await?;
    let schedule = app.schedule(input, &catalog).await?;

    let gradebook = match args.gradebook {
        Some(p) if !p.exists() => {
            info!("成绩册 {} 不存在，使用假花名册", p.display());
            None
        }
        other => other,
    };
    let roster = load_roster(gradebook.as_deref(), &app.config().fake_student_key).await?;

    let exclude_if_class_and_flag = match args.exclude_if_class_and_flag {
        None => None,
        Some(pair) => match <[String; 2]>::try_from(pair) {
            Ok([class, flags]) => Some((class, flags)),
            Err(v) => bail!("--exclude-if-class-and-flag 需要两个参数，实际为 {:?}", v),
        },
    };
    let opts = SetsCsvOptions {
        term,
        only_class: args.class,
        rules: ExclusionRules {
            exclude_if: args.exclude_if,
            exclude_if_class_and_flag,
        },
        header: args.header,
    };
    let csv = render_sets_csv(&schedule, &roster, &opts)?;
    write_output(output, &csv).await
}

pub async fn roster_csv(gradebook: Option<&Path>, output: &Path) -> Result<Vec<String>> {
    let Some(gradebook) = gradebook else {
        warn!("⚠️ 没有指定成绩册，不生成 roster.csv");
        return Ok(Vec::new());
    };
    if !gradebook.exists() {
        warn!("⚠️ 成绩册 {} 不存在，不生成 roster.csv", gradebook.display());
        return Ok(Vec::new());
    }
    let roster = load_roster(Some(gradebook), "").await?;
    let csv = render_roster_csv(&roster)?;
    write_output(output, &csv).await
}

pub async fn self_service(app: &App, input: &Path, output: &Path, args: SelfServiceArgs) -> Result<Vec<String>> {
    let term = Term::parse(&args.term)?;
    let catalog = app.catalog().await?;
    let schedule = app.schedule(input, &catalog).await?;

    let boilerplate = load_optional_text(args.boilerplate.as_deref())
        .await
        .context("无法读取 boilerplate")?;
    let instructions = load_optional_text(args.instructions.as_deref())
        .await
        .context("无法读取说明文件")?;

    let opts = SelfServiceOptions {
        term,
        class_title: class_title_with_section(&args.class_title, &args.section),
        exclude_if: args.exclude_if,
        boilerplate,
        instructions,
        id_digits: app.config().student_id_digits,
        defined_on: chrono::Local::now().format("%m-%d-%Y").to_string(),
    };
    let data = build_hw_data(&schedule, &catalog, opts.term, &opts.boilerplate, &opts.exclude_if);
    let html = render_self_service_page(&data, &opts)?;
    write_output(output, &html).await
}

pub async fn groups(gradebook: Option<&Path>, output: &Path, class_title: &str, section: &str) -> Result<Vec<String>> {
    let Some(gradebook) = gradebook else {
        warn!("⚠️ 没有指定成绩册，不生成随机分组网页");
        return Ok(Vec::new());
    };
    if !gradebook.exists() {
        warn!("⚠️ 成绩册 {} 不存在，不生成随机分组网页", gradebook.display());
        return Ok(Vec::new());
    }
    let roster = load_roster(Some(gradebook), "").await?;
    let html = render_groups_page(&roster, &class_title_with_section(class_title, section))?;
    write_output(output, &html).await
}

pub async fn report(app: &App, input: &Path, output: &Path, output2: &Path, args: ReportArgs) -> Result<Vec<String>> {
    let catalog = app.catalog().await?;
    let schedule = app.schedule(input, &catalog).await?;

    let reading = read_text(&args.reading).await?;
    let due = read_text(&args.due).await?;
    let sets_path = args.sets.display().to_string();
    let rows = parse_sets_csv(&read_text(&args.sets).await?, &sets_path)?;
    let reading_path = args.reading.display().to_string();
    let due_path = args.due.display().to_string();

    let src = ProgressSources {
        reading: &reading,
        reading_path: &reading_path,
        due: &due,
        due_path: &due_path,
        sets: &rows,
    };
    let out = render_progress_report(&schedule, &catalog, &points_options(&args.filters), &src)?;

    let mut written = write_output(output, &out.report).await?;
    written.extend(write_output(output2, &out.problems_assigned).await?);
    Ok(written)
}

pub async fn labels(app: &App, chapter: u32, numbers: &str) -> Result<Vec<String>> {
    let catalog = app.catalog().await?;
    print!("{}", render_labels(&catalog, chapter, numbers));
    Ok(Vec::new())
}

pub async fn solutions(app: &App, output: &Path, args: SolutionsArgs) -> Result<Vec<String>> {
    let catalog = app.catalog().await?;
    let sets_path = args.sets.display().to_string();
    let rows = parse_sets_csv(&read_text(&args.sets).await?, &sets_path)?;
    let roster = load_roster(args.gradebook.as_deref(), &app.config().fake_student_key).await?;

    let needed = labels_needing_sources(&catalog, &rows)?;
    let sources = load_solution_sources(&args.sources_dir, &needed)
        .await
        .with_context(|| format!("无法扫描解答目录 {}", args.sources_dir.display()))?;

    let opts = SolutionsOptions {
        class_title: args.class_title,
        sets_path,
        gradebook_path: args
            .gradebook
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(fake roster)".to_string()),
    };
    let tex = render_solutions(&catalog, &roster, &rows, &sources, &opts)?;
    write_output(output, &tex).await
}
