//! Unit tests for level calculations.

use studyhub::gamification::LevelTable;

#[test]
fn test_level_ladder_from_defaults() {
    let table = LevelTable::default();

    // Level 2 starts at 100, level 3 at 300
    assert_eq!(table.level_for_xp(250), 2);
    assert_eq!(table.level_for_xp(300), 3);
    assert_eq!(table.level_for_xp(599), 3);
    assert_eq!(table.level_for_xp(600), 4);
}

#[test]
fn test_custom_thresholds() {
    let table = LevelTable::new(vec![0, 10, 25]);

    assert_eq!(table.max_level(), 3);
    assert_eq!(table.level_for_xp(0), 1);
    assert_eq!(table.level_for_xp(9), 1);
    assert_eq!(table.level_for_xp(10), 2);
    assert_eq!(table.level_for_xp(24), 2);
    assert_eq!(table.level_for_xp(25), 3);
    assert_eq!(table.xp_to_next_level(10), 15);
    assert_eq!(table.xp_to_next_level(25), 0);
    assert_eq!(table.progress_percentage(25), 100.0);
}

#[test]
fn test_level_matches_xp_after_awards() {
    let table = LevelTable::default();

    // Simulate an XP ledger and confirm the derived level at every step
    let rewards = [50, 100, 10, 100, 75, 5, 50];
    let mut total = 0i64;
    for reward in rewards {
        total += reward;
        let level = table.level_for_xp(total);
        assert!(level >= 1);
        assert!(table.xp_to_next_level(total) >= 0);
        let progress = table.progress_percentage(total);
        assert!((0.0..=100.0).contains(&progress));
    }
    assert_eq!(total, 390);
    assert_eq!(table.level_for_xp(total), 3);
}
