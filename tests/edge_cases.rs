use lucky_wheel::{
    Entry, WheelConfig, WheelError,
    entry::{format_entries, parse_entries},
    rng::{RandomSource, ScriptedRandom},
    selector::select,
    store::{CONFIG_KEY, EntryStore, FileStorage, MemoryStorage, Storage},
};

#[test]
fn settings_text_skips_blanks_and_reads_weights() {
    let text = "  Apple \n\nPear: 3\n   \nPlum | 0\nFig: -2\nKiwi: lots\n";
    let entries = parse_entries(text);
    assert_eq!(
        entries,
        vec![
            Entry::new("Apple", 1),
            Entry::new("Pear", 3),
            Entry::new("Plum", 0),
            Entry::new("Fig", 0),
            Entry::new("Kiwi: lots", 1),
        ]
    );
}

#[test]
fn settings_text_survives_format_and_parse() {
    let entries = vec![Entry::new("Car", 1), Entry::new("Voucher", 5), Entry::new("Mug", 0)];
    assert_eq!(parse_entries(&format_entries(&entries)), entries);
}

#[test]
fn single_entry_config_is_invalid() {
    let cfg = WheelConfig::new(vec![Entry::unit("Only")], 3);
    assert!(matches!(cfg.validate(), Err(WheelError::InvalidConfiguration(_))));
}

#[test]
fn zero_duration_is_invalid() {
    let cfg = WheelConfig::new(vec![Entry::unit("A"), Entry::unit("B")], 0);
    assert!(matches!(cfg.validate(), Err(WheelError::InvalidConfiguration(_))));
}

#[test]
fn depleted_iff_all_weights_zero() {
    let mut r = ScriptedRandom::new([0.5]);
    assert!(matches!(select(&[Entry::new("A", 0), Entry::new("B", 0)], &mut r), Err(WheelError::Depleted)));
    assert!(select(&[Entry::new("A", 0), Entry::new("B", 1)], &mut r).is_ok());
    assert!(matches!(select(&[], &mut r), Err(WheelError::Depleted)));
}

#[test]
fn draw_near_top_of_range_lands_in_last_weighted_slot() {
    let entries = vec![Entry::new("A", 1), Entry::new("B", 1), Entry::new("C", 0)];
    let mut r = ScriptedRandom::new([1.0]);
    assert_eq!(select(&entries, &mut r).unwrap(), 1);
}

// Returns the closed upper bound, which a real uniform source never yields.
struct TopOfRange;

impl RandomSource for TopOfRange {
    fn uniform(&mut self) -> f64 {
        1.0
    }
}

#[test]
fn walk_without_winner_falls_back_to_last_eligible() {
    // r = 1.0 * 2 = 2.0; the walk ends at exactly 0 and never goes negative.
    let entries = vec![Entry::new("A", 1), Entry::new("B", 1), Entry::new("C", 0), Entry::new("D", 0)];
    assert_eq!(select(&entries, &mut TopOfRange).unwrap(), 1);
}

#[test]
fn file_store_round_trips_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wheel.json");
    let mut store = EntryStore::new(FileStorage::new(&path));
    assert!(store.load().unwrap().is_none(), "Missing file loads as absent");
    let cfg = WheelConfig::new(vec![Entry::new("A", 2), Entry::new("B", 0)], 5);
    store.save(&cfg).unwrap();
    let reopened = EntryStore::new(FileStorage::new(&path));
    assert_eq!(reopened.load().unwrap(), Some(cfg));
}

#[test]
fn file_store_reset_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wheel.json");
    let mut storage = FileStorage::new(&path);
    storage.set(CONFIG_KEY, "[]").unwrap();
    assert!(path.exists());
    storage.reset().unwrap();
    assert!(!path.exists());
    storage.reset().unwrap();
}

#[test]
fn stored_entries_without_weight_default_to_one() {
    let mut mem = MemoryStorage::new();
    mem.set(CONFIG_KEY, r#"{"entries":[{"label":"A"},"B",{"label":"C","weight":4}]}"#).unwrap();
    let cfg = EntryStore::new(mem).load().unwrap().unwrap();
    assert_eq!(cfg.entries, vec![Entry::new("A", 1), Entry::new("B", 1), Entry::new("C", 4)]);
    assert_eq!(cfg.spin_duration_secs, 3);
}
