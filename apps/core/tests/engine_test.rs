use std::sync::{Arc, Mutex};

use palette_core::dispatch::DispatchTable;
use palette_core::model::{Command, CommandSet};
use palette_core::options::{Options, SortStrategy};
use palette_core::palette::CommandPalette;

fn file_commands() -> CommandSet {
    CommandSet::new()
        .with(
            "a",
            Command::new("Open File")
                .with_aliases(&["Open"])
                .with_callback("openFile"),
        )
        .with(
            "b",
            Command::new("Save File")
                .with_aliases(&["Save"])
                .with_callback("saveFile"),
        )
}

fn recording_table(log: &Arc<Mutex<Vec<String>>>) -> Arc<DispatchTable> {
    let open_log = Arc::clone(log);
    let save_log = Arc::clone(log);
    Arc::new(
        DispatchTable::new()
            .with("openFile", move |id| open_log.lock().unwrap().push(format!("open:{id}")))
            .with("saveFile", move |id| save_log.lock().unwrap().push(format!("save:{id}"))),
    )
}

#[test]
fn substring_query_with_alphabetical_sort() {
    let options = Options {
        sort: Some(SortStrategy::Alphabetical),
        ..Default::default()
    };
    let mut palette = CommandPalette::from_commands(file_commands(), options);

    assert_eq!(palette.listen("file"), vec!["Open File", "Save File"]);
}

#[test]
fn executes_accumulate_rank_and_drive_rank_sort() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let options = Options {
        ranking: true,
        ..Default::default()
    };
    let mut palette =
        CommandPalette::from_commands(file_commands(), options).with_dispatch_target(recording_table(&log));

    for _ in 0..3 {
        palette.execute("Open File").unwrap();
    }
    palette.execute("Save File").unwrap();

    assert_eq!(palette.rankings().get(&["Open File"]).unwrap(), vec![3]);
    assert_eq!(palette.rankings().get(&["Save File"]).unwrap(), vec![1]);

    palette.options_mut().sort = Some(SortStrategy::Rank);
    let names: Vec<String> = palette
        .listen("")
        .into_iter()
        .filter(|text| text.ends_with("File"))
        .collect();
    assert_eq!(names, vec!["Open File", "Save File"]);

    let calls = log.lock().unwrap().clone();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], "open:Open File");
    assert_eq!(calls[3], "save:Save File");
}

#[test]
fn rank_sort_orders_aliases_with_their_owner() {
    let options = Options {
        ranking: true,
        sort: Some(SortStrategy::Rank),
        ..Default::default()
    };
    let mut palette = CommandPalette::from_commands(file_commands(), options)
        .with_dispatch_target(Arc::new(DispatchTable::new().with("saveFile", |_| {}).with("openFile", |_| {})));

    palette.execute("Save").unwrap();
    assert_eq!(palette.listen(""), vec!["Save", "Save File", "Open", "Open File"]);
}

#[test]
fn exact_mode_only_matches_prefixes() {
    let options = Options {
        exact: true,
        ..Default::default()
    };
    let mut palette = CommandPalette::from_commands(file_commands(), options);

    assert_eq!(palette.listen("open"), vec!["Open", "Open File"]);
    assert!(palette.listen("file").is_empty());
}

#[test]
fn removed_command_no_longer_matches() {
    let options = Options {
        sort: Some(SortStrategy::Alphabetical),
        ..Default::default()
    };
    let mut palette = CommandPalette::from_commands(file_commands(), options);

    assert_eq!(palette.remove(&["Open File"]).unwrap(), 1);
    assert_eq!(palette.listen("file"), vec!["Save File"]);
    assert!(palette.listen("open").is_empty());
}

#[test]
fn reset_ranking_returns_command_to_zero() {
    let options = Options {
        ranking: true,
        ..Default::default()
    };
    let mut palette = CommandPalette::from_commands(file_commands(), options)
        .with_dispatch_target(Arc::new(DispatchTable::new().with("openFile", |_| {})));
    for _ in 0..3 {
        palette.execute("Open File").unwrap();
    }

    let outcome = palette.rankings().reset(&["Open File"]).unwrap();
    assert!(outcome.all_resolved());
    assert_eq!(palette.rankings().get(&["Open File"]).unwrap(), vec![0]);
}

#[test]
fn ranking_disabled_leaves_rank_alone() {
    let mut palette = CommandPalette::from_commands(file_commands(), Options::default())
        .with_dispatch_target(Arc::new(DispatchTable::new().with("openFile", |_| {})));

    palette.execute("Open").unwrap();
    assert_eq!(palette.rankings().get(&["Open File"]).unwrap(), vec![0]);
}

#[test]
fn clear_resets_every_rank() {
    let commands = file_commands()
        .with("c", Command::new("Close").with_rank(7))
        .with("d", Command::new("Quit").with_rank(2));
    let mut palette = CommandPalette::from_commands(commands, Options::default());

    palette.rankings().clear();
    assert_eq!(
        palette.rankings().get(&["Close", "Quit", "Open File"]).unwrap(),
        vec![0, 0, 0]
    );
}

#[test]
fn changed_compares_content_between_listens() {
    let mut palette = CommandPalette::from_commands(file_commands(), Options::default());

    palette.listen("file");
    assert!(palette.changed());

    palette.listen("FILE");
    assert!(!palette.changed(), "same content must not count as a change");
    assert_eq!(palette.previous_matched(), palette.matched());

    palette.listen("save");
    assert!(palette.changed());
    assert_eq!(palette.matched(), ["Save", "Save File"]);
}

#[test]
fn options_changes_apply_to_later_calls_only() {
    let mut palette = CommandPalette::from_commands(file_commands(), Options::default());
    let before = palette.listen("File");

    palette.options_mut().case = true;
    let sensitive = palette.listen("file");

    assert_eq!(before, vec!["Open File", "Save File"]);
    assert!(sensitive.is_empty());
}
