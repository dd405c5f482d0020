//! Tests for holiday table filtering, the country directory and the holiday cache.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use meeting_engine::{
    find_suitable_slots, group_by_month, CountryDirectory, HolidayCache, HolidayQuery, HolidayRow,
    HolidayTable, MonthGrid, PlannerError, Selection,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn row(country: &str, d: NaiveDate, name: &str) -> HolidayRow {
    HolidayRow {
        country: country.to_string(),
        date: d,
        name: name.to_string(),
    }
}

fn sample_table() -> HolidayTable {
    HolidayTable::new(vec![
        row("Germany", date(2025, 12, 26), "Second Day of Christmas"),
        row("France", date(2025, 12, 25), "Noël"),
        row("Germany", date(2025, 12, 25), "Christmas Day"),
        row("United Kingdom", date(2025, 12, 25), "Christmas Day"),
        row("United Kingdom", date(2025, 12, 26), "Boxing Day"),
        row("France", date(2025, 11, 11), "Armistice"),
        row("Norway", date(2026, 1, 1), "New Year's Day"),
    ])
}

fn sample_directory() -> CountryDirectory {
    let zones: BTreeMap<String, String> = [
        ("France", "Europe/Paris"),
        ("Germany", "Europe/Berlin"),
        ("United Kingdom", "Europe/London"),
        ("Australia", "Australia/Sydney"),
    ]
    .into_iter()
    .map(|(c, z)| (c.to_string(), z.to_string()))
    .collect();

    let mut groups = BTreeMap::new();
    groups.insert(
        "steering".to_string(),
        vec!["France".to_string(), "Norway".to_string(), "United Kingdom".to_string()],
    );

    CountryDirectory::new(zones, groups).unwrap()
}

// ── HolidayTable ────────────────────────────────────────────────────────────

#[test]
fn countries_and_years_are_sorted_and_unique() {
    let table = sample_table();
    assert_eq!(
        table.countries(),
        vec!["France", "Germany", "Norway", "United Kingdom"]
    );
    assert_eq!(table.years(), vec![2025, 2026]);
    assert_eq!(table.len(), 7);
}

#[test]
fn filter_by_month_sorts_by_date_then_country() {
    let table = sample_table();
    let rows = table.filter(&HolidayQuery::month(2025, 12)).unwrap();

    let got: Vec<(NaiveDate, &str)> = rows.iter().map(|r| (r.date, r.country.as_str())).collect();
    assert_eq!(
        got,
        vec![
            (date(2025, 12, 25), "France"),
            (date(2025, 12, 25), "Germany"),
            (date(2025, 12, 25), "United Kingdom"),
            (date(2025, 12, 26), "Germany"),
            (date(2025, 12, 26), "United Kingdom"),
        ]
    );
}

#[test]
fn filter_by_country_selection() {
    let table = sample_table();
    let query = HolidayQuery::month(2025, 12).countries(["France"]);
    let rows = table.filter(&query).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Noël");
}

#[test]
fn search_is_case_insensitive_substring() {
    let table = sample_table();
    let query = HolidayQuery::month(2025, 12).search("CHRISTMAS");
    let rows = table.filter(&query).unwrap();

    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.name.to_lowercase().contains("christmas")));
}

#[test]
fn blank_search_matches_everything() {
    let table = sample_table();
    let rows = table.filter(&HolidayQuery::month(2025, 12).search("   ")).unwrap();
    assert_eq!(rows.len(), 5);
}

#[test]
fn filter_rejects_bad_month() {
    let err = sample_table().filter(&HolidayQuery::month(2025, 13)).unwrap_err();
    assert_eq!(err, PlannerError::InvalidMonth(13));
}

#[test]
fn holiday_dates_feed_the_month_grid() {
    let table = sample_table();
    let dates = table
        .holiday_dates(&["United Kingdom", "Norway"], 2025, 12)
        .unwrap();
    assert_eq!(dates.len(), 2);

    let grid = MonthGrid::new(2025, 12, &dates).unwrap();
    assert_eq!(grid.holiday_count(), 2);
}

#[test]
fn holiday_dates_with_no_countries_is_empty() {
    let table = sample_table();
    let none: [&str; 0] = [];
    assert!(table.holiday_dates(&none, 2025, 12).unwrap().is_empty());
}

#[test]
fn group_by_month_orders_groups() {
    let table = sample_table();
    let groups = group_by_month(table.rows());

    let keys: Vec<(i32, u32)> = groups.keys().copied().collect();
    assert_eq!(keys, vec![(2025, 11), (2025, 12), (2026, 1)]);
    assert_eq!(groups[&(2025, 12)].len(), 5);
}

#[test]
fn rows_deserialize_with_holiday_alias() {
    let json = r#"[{"country":"Italy","date":"2025-08-15","holiday":"Ferragosto"}]"#;
    let rows: Vec<HolidayRow> = serde_json::from_str(json).unwrap();
    assert_eq!(rows[0], row("Italy", date(2025, 8, 15), "Ferragosto"));
}

// ── CountryDirectory ────────────────────────────────────────────────────────

#[test]
fn zones_for_skips_unmapped_countries_and_keeps_order() {
    let dir = sample_directory();
    let zones = dir.zones_for(&["United Kingdom", "Atlantis", "France"]);
    let names: Vec<&str> = zones.iter().map(|z| z.as_str()).collect();
    assert_eq!(names, vec!["Europe/London", "Europe/Paris"]);
}

#[test]
fn directory_zones_plug_into_slot_search() {
    let dir = sample_directory();
    let zones = dir.zones_for(&["France", "Germany"]);
    let slots = find_suitable_slots(&zones, date(2025, 6, 15)).unwrap();
    assert_eq!(slots.len(), 22);
}

#[test]
fn directory_rejects_invalid_zone() {
    let mut zones = BTreeMap::new();
    zones.insert("Nowhere".to_string(), "Not/AZone".to_string());
    let err = CountryDirectory::new(zones, BTreeMap::new()).unwrap_err();
    assert_eq!(err, PlannerError::InvalidTimeZone("Not/AZone".to_string()));
}

#[test]
fn group_selection_is_limited_to_available_countries() {
    let dir = sample_directory();
    let available = ["France", "Germany", "United Kingdom"];

    let selected = dir
        .selection(&Selection::Group("steering".to_string()), &available)
        .unwrap();
    assert_eq!(selected, vec!["France", "United Kingdom"]);

    assert!(dir.selection(&Selection::None, &available).unwrap().is_empty());
    assert_eq!(dir.selection(&Selection::All, &available).unwrap().len(), 3);
}

#[test]
fn unknown_group_is_an_error() {
    let dir = sample_directory();
    let err = dir
        .selection(&Selection::Group("board".to_string()), &["France"])
        .unwrap_err();
    assert_eq!(err, PlannerError::UnknownGroup("board".to_string()));
}

#[test]
fn countries_lists_mapped_countries_sorted() {
    let dir = sample_directory();
    let names: Vec<&str> = dir.countries().map(|(c, _)| c).collect();
    assert_eq!(names, vec!["Australia", "France", "Germany", "United Kingdom"]);
    assert_eq!(dir.group("steering").map(|g| g.len()), Some(3));
    assert!(dir.group("board").is_none());
}

// ── HolidayCache ────────────────────────────────────────────────────────────

#[test]
fn cache_loads_once_until_invalidated() {
    let mut cache = HolidayCache::new();
    let mut loads = 0;

    for _ in 0..3 {
        let table = cache
            .get_or_load("holidays-2025.json", || {
                loads += 1;
                Ok::<_, String>(sample_table())
            })
            .unwrap();
        assert_eq!(table.len(), 7);
    }
    assert_eq!(loads, 1);
    assert_eq!(cache.len(), 1);

    assert!(cache.invalidate("holidays-2025.json"));
    assert!(!cache.invalidate("holidays-2025.json"));
    assert!(cache.get("holidays-2025.json").is_none());

    cache
        .get_or_load("holidays-2025.json", || {
            loads += 1;
            Ok::<_, String>(HolidayTable::default())
        })
        .unwrap();
    assert_eq!(loads, 2);
}

#[test]
fn cache_keeps_nothing_when_loader_fails() {
    let mut cache = HolidayCache::new();
    let err = cache
        .get_or_load("broken.json", || Err("file is truncated"))
        .unwrap_err();

    assert_eq!(err, PlannerError::Load("file is truncated".to_string()));
    assert!(cache.is_empty());
}

#[test]
fn cache_keys_are_independent() {
    let mut cache = HolidayCache::new();
    cache
        .get_or_load("a", || Ok::<_, String>(sample_table()))
        .unwrap();
    cache
        .get_or_load("b", || Ok::<_, String>(HolidayTable::default()))
        .unwrap();

    assert_eq!(cache.get("a").map(HolidayTable::len), Some(7));
    assert_eq!(cache.get("b").map(HolidayTable::len), Some(0));
    cache.clear();
    assert!(cache.is_empty());
}
