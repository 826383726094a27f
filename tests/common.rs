use diff_annotations::logger;

pub fn logger_init() {
    logger::init(log::LevelFilter::Debug);
}

pub const TWO_HUNKS: &str = include_str!("fixtures/two_hunks.diff");
pub const MULTI_FILE: &str = include_str!("fixtures/multi_file.diff");
