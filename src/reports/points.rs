use crate::error::AppResult;
use crate::models::Catalog;
use crate::reports::csv_to_string;
use crate::services::Schedule;

/// 计分选项
#[derive(Debug, Clone, Default)]
pub struct PointsOptions {
    /// 带有其中任一标记的题目算作附加题
    pub ec_if: String,
    /// 带有其中任一标记的题目不布置
    pub exclude_if: String,
}

/// 一次作业需要批改的题数，按（纸质/联网）×（必做/附加）统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointsCount {
    pub paper: usize,
    pub paper_ec: usize,
    pub online: usize,
    pub online_ec: usize,
}

impl PointsCount {
    pub fn get(&self, online: bool, extra_credit: bool) -> usize {
        match (online, extra_credit) {
            (false, false) => self.paper,
            (false, true) => self.paper_ec,
            (true, false) => self.online,
            (true, true) => self.online_ec,
        }
    }

    fn slot(&mut self, online: bool, extra_credit: bool) -> &mut usize {
        match (online, extra_credit) {
            (false, false) => &mut self.paper,
            (false, true) => &mut self.paper_ec,
            (true, false) => &mut self.online,
            (true, true) => &mut self.online_ec,
        }
    }

    pub fn add(&mut self, other: &PointsCount) {
        self.paper += other.paper;
        self.paper_ec += other.paper_ec;
        self.online += other.online;
        self.online_ec += other.online_ec;
    }
}

/// 统计一次作业的分值；书后有答案的题不计分
pub fn points_possible_on_set(schedule: &Schedule, set_number: usize, catalog: &Catalog, opts: &PointsOptions) -> PointsCount {
    let mut count = PointsCount::default();
    for chunk in schedule.chunks(set_number) {
        for fg in chunk {
            if fg.flags.contains_any_of(&opts.exclude_if) {
                continue;
            }
            let online = fg.flags.is_online();
            let extra_credit = fg.flags.is_extra_credit() || fg.flags.contains_any_of(&opts.ec_if);
            let graded = fg
                .groups
                .iter()
                .filter(|g| !catalog.has_solution(&g.first().key()))
                .count();
            *count.slot(online, extra_credit) += graded;
        }
    }
    count
}

/// 生成 `set,paper_or_online,pts,ec` CSV
pub fn render_points_possible(schedule: &Schedule, catalog: &Catalog, opts: &PointsOptions, header: bool) -> AppResult<String> {
    let mut w = csv::Writer::from_writer(Vec::new());
    if header {
        w.write_record(["set", "paper_or_online", "pts", "ec"])?;
    }
    for set_number in schedule.set_numbers() {
        let c = points_possible_on_set(schedule, set_number, catalog, opts);
        for (code, online) in [("p", false), ("o", true)] {
            w.write_record([
                set_number.to_string(),
                code.to_string(),
                c.get(online, false).to_string(),
                c.get(online, true).to_string(),
            ])?;
        }
    }
    csv_to_string(w)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::catalog::tests::sample_catalog;
    use crate::models::RawStream;
    use crate::services::parse_hw;

    pub(crate) fn sample_schedule() -> Schedule {
        let c = sample_catalog();
        let raw = RawStream {
            stream: "kinematics".to_string(),
            delay: 0,
            chunks: vec![
                // 2-7 书后有答案，不计分
                "free-fall|galileo-tower, dropped-ball ; o:projectile-a ; *:ramp".to_string(),
                "oc:projectile-b/a".to_string(),
            ],
            notes: vec![],
        };
        Schedule::build(&parse_hw(&[raw], &c).unwrap(), &c).unwrap()
    }

    #[test]
    fn test_points_possible_on_set() {
        let c = sample_catalog();
        let s = sample_schedule();
        let count = points_possible_on_set(&s, 1, &c, &PointsOptions::default());
        assert_eq!(
            count,
            PointsCount {
                paper: 1,
                paper_ec: 1,
                online: 1,
                online_ec: 0
            }
        );

        let opts = PointsOptions {
            ec_if: "o".to_string(),
            exclude_if: "*".to_string(),
        };
        let count = points_possible_on_set(&s, 1, &c, &opts);
        assert_eq!(count.get(false, true), 0);
        assert_eq!(count.get(true, true), 1);
        assert_eq!(count.get(true, false), 0);
    }

    #[test]
    fn test_render_points_possible() {
        let c = sample_catalog();
        let s = sample_schedule();
        let csv = render_points_possible(&s, &c, &PointsOptions::default(), true).unwrap();
        // 3-2 书后有答案，第 2 次作业没有需要批改的题
        assert_eq!(
            csv,
            "set,paper_or_online,pts,ec\n1,p,1,1\n1,o,1,0\n2,p,0,0\n2,o,0,0\n"
        );
        let no_header = render_points_possible(&s, &c, &PointsOptions::default(), false).unwrap();
        assert!(no_header.starts_with("1,p,"));
    }
}
