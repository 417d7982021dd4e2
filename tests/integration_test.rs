use hw_whiz::cli::{Command, FlagFilters};
use hw_whiz::models::loaders::load_parsed_streams;
use hw_whiz::reports::self_service::{build_hw_data, render_for_student};
use hw_whiz::reports::sets_csv::parse_sets_csv;
use hw_whiz::utils::logging;
use hw_whiz::{App, Catalog, Config, Schedule, Term};
use std::path::{Path, PathBuf};

const PROBLEMS_CSV: &str = "\
lm,2,5,free-fall,0
lm,2,7,dropped-ball,1
lm,2,g3,galileo-tower,0
lm,3,1,projectile-a,0
lm,3,2,projectile-b,1
lm,4,12,ramp,0
fund,1,1,limits,0
";

const HW_YAML: &str = r#"
- stream: kinematics
  chunks:
    - "free-fall|galileo-tower, dropped-ball ; o:projectile-a"
    - "projectile-b/a"
  notes:
    free-fall: "Use g = 9.8 m/s2 for $$."
    1: "Second week."
- stream: dynamics
  delay: 1
  chunks:
    - "*:ramp"
"#;

const GRADEBOOK: &str = r#"{"data":{"roster":{
  "doe_jane":{"id":"00123456","class":"210"},
  "roe_rick":{"id":"12345678","class":"210"},
  "gone_guy":{"id":"1","class":"210","dropped":"true"}
}}}"#;

struct Fixture {
    dir: tempfile::TempDir,
    app: App,
}

impl Fixture {
    fn new() -> Self {
        logging::init(false);
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        std::fs::write(dir.path().join("problems.csv"), PROBLEMS_CSV).unwrap();
        std::fs::write(dir.path().join("hw.yaml"), HW_YAML).unwrap();
        std::fs::write(dir.path().join("class.gb"), GRADEBOOK).unwrap();

        let config = Config {
            problems_csv: dir.path().join("problems.csv").display().to_string(),
            book: "lm".to_string(),
            ..Config::default()
        };
        Self {
            dir,
            app: App::new(config),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).unwrap()
    }

    async fn parse_hw(&self) {
        self.app
            .run(Command::ParseHw {
                input: self.path("hw.yaml"),
                output: self.path("hw.json"),
            })
            .await
            .expect("parse-hw 失败");
    }

    async fn sets_csv(&self, gradebook: Option<&Path>) {
        self.app
            .run(Command::SetsCsv {
                input: self.path("hw.json"),
                output: self.path("sets.csv"),
                term: "f14".to_string(),
                gradebook: gradebook.map(Path::to_path_buf),
                class: None,
                exclude_if: String::new(),
                exclude_if_class_and_flag: None,
                no_header: false,
            })
            .await
            .expect("sets-csv 失败");
    }
}

#[tokio::test]
async fn test_parse_hw_writes_json() {
    let fx = Fixture::new();
    fx.parse_hw().await;

    let streams = load_parsed_streams(&fx.path("hw.json")).await.unwrap();
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0].stream, "kinematics");
    assert_eq!(streams[1].delay, 1);
    // 笔记保持 YAML 中的顺序
    assert_eq!(streams[0].notes[0].key, "free-fall");
    assert_eq!(streams[0].notes[1].key, "1");
}

#[tokio::test]
async fn test_sets_csv_matches_self_service_page() {
    let fx = Fixture::new();
    fx.parse_hw().await;
    fx.sets_csv(Some(&fx.path("class.gb"))).await;

    let rows = parse_sets_csv(&fx.read("sets.csv"), "sets.csv").unwrap();
    // 两名在读学生，各 5 个题组；退课学生不出现
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|r| r.student != "gone_guy"));
    assert!(rows.iter().any(|r| r.set == 2 && r.ch == 4 && r.num == "12" && r.flags == "*"));

    let catalog = Catalog::parse(PROBLEMS_CSV, "lm", "problems.csv").unwrap();
    let streams = load_parsed_streams(&fx.path("hw.json")).await.unwrap();
    let schedule = Schedule::build(&streams, &catalog).unwrap();
    let data = build_hw_data(&schedule, &catalog, Term::parse("f14").unwrap(), "", "");

    for (key, id) in [("doe_jane", "00123456"), ("roe_rick", "12345678")] {
        let html = render_for_student(&data, id).unwrap();
        let mine: Vec<_> = rows.iter().filter(|r| r.student == key).collect();
        assert_eq!(mine.len(), 5);
        for r in &mine {
            let needle = format!("{}-{}{}", r.ch, r.num, r.parts);
            assert!(html.contains(&needle), "{key}: {needle} 不在网页中: {html}");
        }

        // 只有分到 2-5 的学生才看到对应的提示
        let got_free_fall = mine.iter().any(|r| r.ch == 2 && r.num == "5");
        assert_eq!(html.contains("Use g = 9.8 m/s2 for 2-5."), got_free_fall);
        assert!(html.contains("<p>Second week.</p>"));
    }
}

#[tokio::test]
async fn test_sets_csv_without_gradebook_uses_fake_roster() {
    let fx = Fixture::new();
    fx.parse_hw().await;
    fx.sets_csv(Some(&fx.path("missing.gb"))).await;

    let rows = parse_sets_csv(&fx.read("sets.csv"), "sets.csv").unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r.student == "blow_joe"));
}

#[tokio::test]
async fn test_tables_and_pages() {
    let fx = Fixture::new();
    fx.parse_hw().await;

    fx.app
        .run(Command::PointsPossible {
            input: fx.path("hw.json"),
            output: fx.path("points.csv"),
            filters: FlagFilters::default(),
            no_header: false,
        })
        .await
        .unwrap();
    // 2-7、3-2 书后有答案，不计分
    assert_eq!(
        fx.read("points.csv"),
        "set,paper_or_online,pts,ec\n1,p,1,0\n1,o,1,0\n2,p,0,1\n2,o,0,0\n"
    );

    fx.app
        .run(Command::HwTable {
            input: fx.path("hw.json"),
            output: fx.path("table.tex"),
            filters: FlagFilters::default(),
        })
        .await
        .unwrap();
    let tex = fx.read("table.tex");
    assert!(tex.contains("\\underline{2(5|g3)}"));
    assert!(tex.contains("\\noindent{\\textbf{Homework 2}}"));

    fx.app
        .run(Command::SelfService {
            input: fx.path("hw.json"),
            output: fx.path("hw.html"),
            term: "f14".to_string(),
            class_title: "Physics 210".to_string(),
            section: "m".to_string(),
            boilerplate: None,
            instructions: None,
            exclude_if: String::new(),
        })
        .await
        .unwrap();
    let html = fx.read("hw.html");
    assert!(html.contains("<title>Homework Assignments for Physics 210, Mon-Wed section, f2014</title>"));
    assert!(html.contains(r#""type":"indiv""#));

    fx.app
        .run(Command::RosterCsv {
            gradebook: Some(fx.path("class.gb")),
            output: fx.path("roster.csv"),
        })
        .await
        .unwrap();
    assert_eq!(fx.read("roster.csv"), "doe_jane,Doe,Jane,210\nroe_rick,Roe,Rick,210\n");

    fx.app
        .run(Command::Groups {
            gradebook: Some(fx.path("class.gb")),
            output: fx.path("groups.html"),
            class_title: "Physics 210".to_string(),
            section: String::new(),
        })
        .await
        .unwrap();
    assert!(fx.read("groups.html").contains("Jane Doe\nRick Roe"));
}

#[tokio::test]
async fn test_report_and_solutions() {
    let fx = Fixture::new();
    fx.parse_hw().await;
    fx.sets_csv(Some(&fx.path("class.gb"))).await;

    std::fs::write(fx.path("reading.csv"), "01-05,\"ch. 2\"\n01-07,\"ch. 3\"\n01-09,\"ch. 4\"\n").unwrap();
    std::fs::write(fx.path("due.csv"), "1,01-07\n2,01-09\n").unwrap();
    fx.app
        .run(Command::Report {
            input: fx.path("hw.json"),
            output: fx.path("report.txt"),
            output2: fx.path("assigned.txt"),
            reading: fx.path("reading.csv"),
            due: fx.path("due.csv"),
            sets: fx.path("sets.csv"),
            filters: FlagFilters::default(),
        })
        .await
        .unwrap();
    let report = fx.read("report.txt");
    assert!(report.contains("kinematics"));
    assert!(report.contains("dynamics"));
    assert!(report.contains("both are 2"));
    assert!(fx.read("assigned.txt").contains("------ chapter 2 ------\nassigned: 5 7 g3\n"));

    std::fs::create_dir_all(fx.path("solns").join("kin")).unwrap();
    std::fs::write(fx.path("solns").join("kin").join("ramp.tex"), "Use $F=ma$.").unwrap();
    fx.app
        .run(Command::Solutions {
            output: fx.path("solutions.tex"),
            class_title: "Physics 210".to_string(),
            sets: fx.path("sets.csv"),
            gradebook: Some(fx.path("class.gb")),
            sources_dir: fx.path("solns"),
        })
        .await
        .unwrap();
    let tex = fx.read("solutions.tex");
    assert!(tex.contains("Jane Doe"));
    assert!(tex.contains("Rick Roe"));
    assert!(tex.contains("\\noindent\\textbf{4-12}\\quad %\nUse $F=ma$.\n\\par\n"));
    assert!(tex.contains("solution in the back of the book"));
}

#[tokio::test]
async fn test_bad_term_is_rejected() {
    let fx = Fixture::new();
    fx.parse_hw().await;
    let result = fx
        .app
        .run(Command::SetsCsv {
            input: fx.path("hw.json"),
            output: fx.path("sets.csv"),
            term: "fall2014".to_string(),
            gradebook: None,
            class: None,
            exclude_if: String::new(),
            exclude_if_class_and_flag: None,
            no_header: false,
        })
        .await;
    assert!(result.is_err());
    assert!(!fx.path("sets.csv").exists());
}
