use std::fs;

use subcue::clock::{SimulatedClock, Transport};
use subcue::controller::{EditorController, RowEvent, ViewUpdate};
use subcue::store::SubtitleStore;
use tempfile::TempDir;

#[test]
fn edit_session_round_trips_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("song.txt");
    fs::write(
        &path,
        "[0.000]Intro\n[abc]broken\n[12.500]Hello world\nfree text\n",
    )
    .unwrap();

    let mut controller =
        EditorController::new(SubtitleStore::new(), SimulatedClock::new(), Vec::<ViewUpdate>::new());
    let report = controller.select_subtitle_file(Some(path.clone())).unwrap().unwrap();
    assert_eq!((report.loaded, report.skipped, report.ignored), (2, 1, 1));

    controller.audio_loaded(Ok(30.0));
    controller.seek_normalized(0.7);
    let added = controller.add_line();
    controller
        .handle_row(RowEvent::TextCommitted(added, "Outro".to_string()))
        .unwrap();
    let intro = controller.store().id_at(0).unwrap();
    assert!(controller
        .handle_row(RowEvent::TimeCommitted(intro, "notanumber".to_string()))
        .is_err());
    controller.save().unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "[0.000]Intro\n[12.500]Hello world\n[21.000]Outro\n"
    );

    let mut reloaded = SubtitleStore::new();
    reloaded.load(&path).unwrap();
    assert_eq!(reloaded.active_line_at(5.0), "Intro");
    assert_eq!(reloaded.active_line_at(12.5), "Hello world");
    assert_eq!(reloaded.active_line_at(25.0), "Outro");
}

#[test]
fn playback_shows_lines_in_turn() {
    let mut store = SubtitleStore::new();
    store.add(1.0, "one");
    store.add(2.0, "two");
    let mut clock = SimulatedClock::new();
    clock.set_clip(3.0);
    let mut controller = EditorController::new(store, clock, Vec::<ViewUpdate>::new());

    controller.play();
    let mut shown = Vec::new();
    for _ in 0..6 {
        controller.tick();
        controller.clock_mut().advance(0.5);
    }
    for update in controller.view() {
        if let ViewUpdate::ActiveText(text) = update {
            if shown.last() != Some(text) {
                shown.push(text.clone());
            }
        }
    }

    assert_eq!(shown, vec!["".to_string(), "one".to_string(), "two".to_string()]);
}
