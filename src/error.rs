use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 题目目录（problems.csv）错误
    #[error("题目目录错误: {0}")]
    Catalog(#[from] CatalogError),
    /// 作业流解析错误
    #[error("作业解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 作业排期错误
    #[error("排期错误: {0}")]
    Schedule(#[from] ScheduleError),
    /// 选题错误
    #[error("选题错误: {0}")]
    Selection(#[from] SelectionError),
    /// 花名册错误
    #[error("花名册错误: {0}")]
    Roster(#[from] RosterError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// YAML 解析失败
    #[error("YAML解析失败 ({path}): {source}")]
    YamlParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// CSV 读写失败
    #[error("CSV处理失败 ({path}): {source}")]
    CsvFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 行格式不合法
    #[error("文件 {path} 中存在非法行: {line}")]
    IllegalLine { path: String, line: String },
}

/// 题目目录错误
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 题号格式非法
    #[error("非法题号: {number}")]
    IllegalProblemNumber { number: String },
    /// 标签重复定义
    #[error("标签 {label} 在 {path} 中对教材 {book} 重复定义")]
    DuplicateLabel {
        label: String,
        path: String,
        book: String,
    },
    /// 同一道题有两个标签
    #[error("题目 {problem} 定义了两个标签 {first} 和 {second} (教材 {book})")]
    TwoLabels {
        problem: String,
        first: String,
        second: String,
        book: String,
    },
    /// 标签含有非法字符
    #[error("标签 {label} 含有非法字符；合法字符为 a-z, A-Z, 0-9, -, _, .")]
    IllegalLabel { label: String },
    /// 通配符没有匹配到任何标签
    #[error("通配模式 {pattern} 没有匹配到任何标签")]
    WildcardNoMatch { pattern: String },
    /// 标签不存在
    #[error("标签 {label} 不存在")]
    UnknownLabel { label: String },
    /// 题目没有标签
    #[error("第 {chapter} 章第 {number} 题没有对应的标签")]
    NoLabelForProblem { chapter: u32, number: String },
}

/// 作业流解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 标记中含有非法字符
    #[error("输入 '{chunk}' 中的标记 '{flags}' 含有非法字符 '{illegal}'，可能缺少分号")]
    IllegalFlagChar {
        chunk: String,
        flags: String,
        illegal: char,
    },
    /// 标记重复
    #[error("输入 '{chunk}' 中的标记 '{flags}' 有重复，可能缺少分号")]
    DuplicateFlag { chunk: String, flags: String },
    /// 个性化题组中没有任何可解析的题目
    #[error("输入 '{chunk}' 中的题组 '{group}' 没有解析到任何题目")]
    UnresolvedGroup { chunk: String, group: String },
    /// 个性化题组为空
    #[error("个性化题组不能为空")]
    EmptyGroup,
    /// 学期格式非法
    #[error("学期 '{term}' 的格式不是 f14 这种形式")]
    IllegalTerm { term: String },
}

/// 作业排期错误
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// 同一道题在两次作业中出现且未指定小题
    #[error("题目 {problem} ({label}) 同时出现在第 {first} 次和第 {second} 次作业中，且第二次没有指定小题")]
    AssignedTwice {
        problem: String,
        label: String,
        first: usize,
        second: usize,
    },
    /// 注释引用的标签不存在
    #[error("注释引用了题目 {label}，但该标签未定义；注释内容: {text}")]
    NoteForUnknownLabel { label: String, text: String },
    /// 注释引用的题目没有被布置
    #[error("注释引用了题目 {label}，但该题没有出现在任何一次作业中")]
    NoteForUnassignedProblem { label: String },
    /// due.csv 中的日期不在 reading.csv 中
    #[error("{due_path} 中的日期 {date} 不在 {reading_path} 中")]
    UnknownDueDate {
        date: String,
        due_path: String,
        reading_path: String,
    },
}

/// 选题错误
#[derive(Debug, Error)]
pub enum SelectionError {
    /// 候选题列表为空
    #[error("第 {chapter} 章的候选题列表为空")]
    EmptyCandidates { chapter: u32 },
    /// 摘要末尾不是十六进制数
    #[error("摘要 {digest} 的末 4 位不是十六进制数")]
    IllegalDigest { digest: String },
    /// 选出的下标超出候选题范围
    #[error("第 {chapter} 章选出下标 {index}，但只有 {count} 道候选题")]
    IndexOutOfRange {
        chapter: u32,
        index: usize,
        count: usize,
    },
}

/// 花名册错误
#[derive(Debug, Error)]
pub enum RosterError {
    /// 学生没有设置班级
    #[error("成绩册中学生 {student} 没有设置班级")]
    ClassNotSet { student: String },
    /// 部分学生有班级、部分没有
    #[error("部分学生设置了班级，另一部分没有；未设置班级的学生: {students}")]
    MixedClasses { students: String },
    /// 学生出现在一个文件中但不在另一个文件中
    #[error("学生 {student} 出现在 {present_in} 中，但不在 {missing_from} 中")]
    StudentMismatch {
        student: String,
        present_in: String,
        missing_from: String,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::JsonParseFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::File(FileError::YamlParseFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::File(FileError::CsvFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 JSON 解析错误
    pub fn json_parse_failed(path: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::File(FileError::JsonParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 YAML 解析错误
    pub fn yaml_parse_failed(path: impl Into<String>, source: serde_yaml::Error) -> Self {
        AppError::File(FileError::YamlParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 CSV 处理错误
    pub fn csv_failed(path: impl Into<String>, source: csv::Error) -> Self {
        AppError::File(FileError::CsvFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建非法行错误
    pub fn illegal_line(path: impl Into<String>, line: impl Into<String>) -> Self {
        AppError::File(FileError::IllegalLine {
            path: path.into(),
            line: line.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
