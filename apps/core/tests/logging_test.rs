use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use palette_core::logging;
use palette_core::model::{Command, CommandSet};
use palette_core::options::Options;
use palette_core::palette::CommandPalette;

#[test]
fn init_opens_log_and_records_engine_warnings() {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "palette-core-logging-{}-{unique}",
        std::process::id()
    ));

    assert!(logging::log_path().is_none());
    logging::init(&dir).expect("logging should initialize");
    let path = logging::log_path().expect("log path should be set after init");
    assert_eq!(path, dir.join("palette.log"));

    let mut palette = CommandPalette::from_commands(
        CommandSet::new().with("a", Command::new("Alpha")),
        Options::default(),
    );
    palette.upsert("b", Command::new("Alpha")).unwrap();

    let contents = fs::read_to_string(path).unwrap();
    assert!(contents.contains("[WARN]"));
    assert!(contents.contains("reuses the name 'Alpha'"));

    fs::remove_dir_all(&dir).unwrap();
}
