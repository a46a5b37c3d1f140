use std::sync::Arc;

use super::aggregate::{
    Aggregates, count_by_type, count_by_year, movie_durations, rating_distribution, top_countries,
    tv_season_counts,
};
use super::filter::{FilterSelection, filtered_indices, init_selection};
use super::loader::{CatalogCache, derive_duration, load_file, parse_date};
use super::model::{Catalog, Title};

fn t(
    name: &str,
    kind: &str,
    country: Option<&str>,
    year: i32,
    rating: Option<&str>,
    duration: Option<&str>,
    listed_in: Option<&str>,
) -> Title {
    let (duration_minutes, num_seasons) = derive_duration(duration);
    Title {
        title: name.into(),
        kind: kind.into(),
        country: country.map(Into::into),
        date_added: None,
        release_year: year,
        rating: rating.map(Into::into),
        duration: duration.map(Into::into),
        listed_in: listed_in.map(Into::into),
        duration_minutes,
        num_seasons,
    }
}

/// The two-row catalog used by several filter and aggregation tests.
fn india_catalog() -> Catalog {
    Catalog::from_titles(vec![
        t(
            "Dust and Echoes",
            "Movie",
            Some("United States, India"),
            2015,
            Some("PG-13"),
            Some("90 min"),
            Some("Dramas, Thrillers"),
        ),
        t(
            "Harbor Lights",
            "TV Show",
            Some("India"),
            2019,
            Some("TV-MA"),
            Some("2 Seasons"),
            Some("Crime TV Shows"),
        ),
    ])
}

fn wide_selection() -> FilterSelection {
    FilterSelection {
        year_range: (1900, 2100),
        ..FilterSelection::default()
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

#[test]
fn duration_in_minutes_sets_only_minutes() {
    assert_eq!(derive_duration(Some("90 min")), (Some(90), None));
}

#[test]
fn duration_in_seasons_sets_only_seasons() {
    assert_eq!(derive_duration(Some("3 Seasons")), (None, Some(3)));
    assert_eq!(derive_duration(Some("1 Season")), (None, Some(1)));
}

#[test]
fn missing_or_unrecognized_duration_sets_neither() {
    assert_eq!(derive_duration(None), (None, None));
    assert_eq!(derive_duration(Some("min")), (None, None));
    assert_eq!(derive_duration(Some("two hours")), (None, None));
    assert_eq!(derive_duration(Some("95")), (None, None));
}

#[test]
fn duration_with_both_tokens_prefers_minutes() {
    assert_eq!(derive_duration(Some("90 min 2 Seasons")), (Some(90), None));
}

#[test]
fn derived_fields_are_mutually_exclusive() {
    for raw in [
        Some("90 min"),
        Some("3 Seasons"),
        Some("garbage"),
        Some(""),
        None,
    ] {
        let (minutes, seasons) = derive_duration(raw);
        assert!(minutes.is_none() || seasons.is_none());
    }
}

#[test]
fn date_added_parses_catalog_and_iso_formats() {
    assert!(parse_date("September 9, 2019").is_some());
    assert!(parse_date("2019-09-09").is_some());
    assert_eq!(parse_date("September 9, 2019"), parse_date("2019-09-09"));
}

#[test]
fn unparseable_dates_become_none() {
    assert_eq!(parse_date(""), None);
    assert_eq!(parse_date("sometime in fall"), None);
    assert_eq!(parse_date("13/13/2019"), None);
}

// ---------------------------------------------------------------------------
// Catalog construction
// ---------------------------------------------------------------------------

#[test]
fn catalog_builds_facet_domains_and_year_bounds() {
    let catalog = india_catalog();
    assert_eq!(catalog.types, vec!["Movie", "TV Show"]);
    assert_eq!(catalog.countries, vec!["India", "United States"]);
    assert_eq!(
        catalog.genres,
        vec!["Crime TV Shows", "Dramas", "Thrillers"]
    );
    assert_eq!(catalog.ratings, vec!["PG-13", "TV-MA"]);
    assert_eq!((catalog.year_min, catalog.year_max), (2015, 2019));
}

#[test]
fn init_selection_ticks_every_type_and_spans_all_years() {
    let catalog = india_catalog();
    let selection = init_selection(&catalog);
    assert_eq!(selection.types.len(), catalog.types.len());
    assert!(selection.countries.is_empty());
    assert!(selection.genres.is_empty());
    assert!(selection.ratings.is_empty());
    assert_eq!(selection.year_range, (2015, 2019));
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[test]
fn india_scenario_keeps_both_rows() {
    let catalog = india_catalog();
    let mut selection = wide_selection();
    selection.countries.insert("India".into());
    selection.year_range = (2010, 2021);

    assert_eq!(filtered_indices(&catalog, &selection), vec![0, 1]);
}

#[test]
fn empty_sets_mean_no_constraint() {
    let catalog = india_catalog();
    let selection = wide_selection();
    // No types, countries, genres or ratings chosen: everything passes.
    assert_eq!(filtered_indices(&catalog, &selection), vec![0, 1]);
}

#[test]
fn type_filter_is_exact_membership() {
    let catalog = india_catalog();
    let mut selection = wide_selection();
    selection.types.insert("Movie".into());
    assert_eq!(filtered_indices(&catalog, &selection), vec![0]);
}

#[test]
fn country_filter_excludes_rows_without_country() {
    let catalog = Catalog::from_titles(vec![
        t("A", "Movie", None, 2015, None, None, None),
        t("B", "Movie", Some("India"), 2015, None, None, None),
    ]);
    let mut selection = wide_selection();
    selection.countries.insert("India".into());
    assert_eq!(filtered_indices(&catalog, &selection), vec![1]);
}

#[test]
fn country_filter_uses_substring_containment() {
    let catalog = Catalog::from_titles(vec![t(
        "A",
        "Movie",
        Some("Nigeria"),
        2015,
        None,
        None,
        None,
    )]);
    let mut selection = wide_selection();
    // "Niger" is a fragment of "Nigeria": the raw-substring match keeps the row.
    selection.countries.insert("Niger".into());
    assert_eq!(filtered_indices(&catalog, &selection), vec![0]);
}

#[test]
fn genre_filter_matches_against_raw_listed_in() {
    let catalog = india_catalog();
    let mut selection = wide_selection();
    selection.genres.insert("Thrillers".into());
    assert_eq!(filtered_indices(&catalog, &selection), vec![0]);
}

#[test]
fn rating_filter_is_exact_and_skips_unrated_rows() {
    let catalog = Catalog::from_titles(vec![
        t("A", "Movie", None, 2015, Some("PG-13"), None, None),
        t("B", "Movie", None, 2015, None, None, None),
    ]);
    let mut selection = wide_selection();
    selection.ratings.insert("PG-13".into());
    assert_eq!(filtered_indices(&catalog, &selection), vec![0]);
}

#[test]
fn empty_rating_selection_passes_all_rows() {
    let catalog = Catalog::from_titles(vec![
        t("A", "Movie", None, 2015, Some("PG-13"), None, None),
        t("B", "Movie", None, 2015, None, None, None),
    ]);
    assert_eq!(
        filtered_indices(&catalog, &wide_selection()),
        vec![0, 1]
    );
}

#[test]
fn year_range_is_inclusive_on_both_ends() {
    let catalog = Catalog::from_titles(vec![
        t("A", "Movie", None, 2010, None, None, None),
        t("B", "Movie", None, 2015, None, None, None),
        t("C", "Movie", None, 2021, None, None, None),
        t("D", "Movie", None, 2022, None, None, None),
    ]);
    let mut selection = wide_selection();
    selection.year_range = (2010, 2021);
    assert_eq!(filtered_indices(&catalog, &selection), vec![0, 1, 2]);
}

#[test]
fn degenerate_year_range_matches_nothing() {
    let catalog = india_catalog();
    let mut selection = wide_selection();
    selection.year_range = (2020, 2010);
    assert!(filtered_indices(&catalog, &selection).is_empty());
}

#[test]
fn filtering_is_idempotent() {
    let catalog = india_catalog();
    let mut selection = wide_selection();
    selection.countries.insert("India".into());
    selection.types.insert("TV Show".into());

    let first = filtered_indices(&catalog, &selection);
    assert!(!first.is_empty());

    // Re-filter a catalog reduced to the first pass's rows: every row survives.
    let reduced = Catalog::from_titles(
        first
            .iter()
            .map(|&i| catalog.titles[i].clone())
            .collect(),
    );
    let second = filtered_indices(&reduced, &selection);
    assert_eq!(second, (0..first.len()).collect::<Vec<_>>());
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[test]
fn count_by_type_sums_to_row_count() {
    let catalog = india_catalog();
    let indices: Vec<usize> = (0..catalog.len()).collect();
    let counts = count_by_type(&catalog, &indices);
    assert_eq!(counts.values().sum::<usize>(), indices.len());
    assert_eq!(counts["Movie"], 1);
    assert_eq!(counts["TV Show"], 1);
}

#[test]
fn count_by_year_is_sorted_ascending() {
    let catalog = Catalog::from_titles(vec![
        t("A", "Movie", None, 2019, None, None, None),
        t("B", "Movie", None, 2015, None, None, None),
        t("C", "Movie", None, 2019, None, None, None),
    ]);
    let indices: Vec<usize> = (0..catalog.len()).collect();
    assert_eq!(
        count_by_year(&catalog, &indices),
        vec![(2015, 1), (2019, 2)]
    );
}

#[test]
fn top_countries_explodes_multi_country_rows() {
    let catalog = india_catalog();
    let indices: Vec<usize> = (0..catalog.len()).collect();
    assert_eq!(
        top_countries(&catalog, &indices, 10),
        vec![("India".to_string(), 2), ("United States".to_string(), 1)]
    );
}

#[test]
fn top_countries_respects_k_and_breaks_ties_by_first_seen() {
    let catalog = Catalog::from_titles(vec![
        t("A", "Movie", Some("Japan"), 2015, None, None, None),
        t("B", "Movie", Some("France"), 2015, None, None, None),
        t("C", "Movie", Some("Spain"), 2015, None, None, None),
    ]);
    let indices: Vec<usize> = (0..catalog.len()).collect();

    let all = top_countries(&catalog, &indices, 10);
    assert_eq!(
        all,
        vec![
            ("Japan".to_string(), 1),
            ("France".to_string(), 1),
            ("Spain".to_string(), 1)
        ]
    );

    let capped = top_countries(&catalog, &indices, 2);
    assert_eq!(capped.len(), 2);
}

#[test]
fn top_countries_is_sorted_descending() {
    let catalog = Catalog::from_titles(vec![
        t("A", "Movie", Some("Japan"), 2015, None, None, None),
        t("B", "Movie", Some("France, Japan"), 2016, None, None, None),
        t("C", "Movie", Some("France, Japan"), 2017, None, None, None),
        t("D", "Movie", Some("Spain"), 2018, None, None, None),
    ]);
    let indices: Vec<usize> = (0..catalog.len()).collect();
    let counts = top_countries(&catalog, &indices, 10);
    for pair in counts.windows(2) {
        assert!(pair[0].1 >= pair[1].1);
    }
    assert_eq!(counts[0], ("Japan".to_string(), 3));
}

#[test]
fn rating_distribution_skips_unrated_rows() {
    let catalog = Catalog::from_titles(vec![
        t("A", "Movie", None, 2015, Some("PG"), None, None),
        t("B", "Movie", None, 2015, None, None, None),
        t("C", "Movie", None, 2015, Some("PG"), None, None),
        t("D", "Movie", None, 2015, Some("R"), None, None),
    ]);
    let indices: Vec<usize> = (0..catalog.len()).collect();
    assert_eq!(
        rating_distribution(&catalog, &indices),
        vec![("PG".to_string(), 2), ("R".to_string(), 1)]
    );
}

#[test]
fn movie_durations_only_cover_movies_with_minutes() {
    let catalog = Catalog::from_titles(vec![
        t("A", "Movie", None, 2015, None, Some("90 min"), None),
        t("B", "Movie", None, 2015, None, None, None),
        t("C", "TV Show", None, 2015, None, Some("2 Seasons"), None),
    ]);
    let indices: Vec<usize> = (0..catalog.len()).collect();
    assert_eq!(movie_durations(&catalog, &indices), vec![90.0]);
}

#[test]
fn tv_season_counts_only_cover_shows_with_seasons() {
    let catalog = Catalog::from_titles(vec![
        t("A", "TV Show", None, 2015, None, Some("2 Seasons"), None),
        t("B", "TV Show", None, 2015, None, Some("2 Seasons"), None),
        t("C", "TV Show", None, 2015, None, None, None),
        t("D", "Movie", None, 2015, None, Some("95 min"), None),
    ]);
    let indices: Vec<usize> = (0..catalog.len()).collect();
    let counts = tv_season_counts(&catalog, &indices);
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[&2], 2);
}

#[test]
fn empty_view_yields_empty_aggregates() {
    let catalog = india_catalog();
    let aggregates = Aggregates::compute(&catalog, &[]);
    assert_eq!(aggregates.row_count, 0);
    assert!(aggregates.by_type.is_empty());
    assert!(aggregates.by_year.is_empty());
    assert!(aggregates.top_countries.is_empty());
    assert!(aggregates.rating_distribution.is_empty());
    assert!(aggregates.movie_durations.is_empty());
    assert!(aggregates.tv_season_counts.is_empty());
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

const SAMPLE_CSV: &str = "\
title,type,country,date_added,release_year,rating,duration,listed_in
Dust and Echoes,Movie,\"United States, India\",\"September 9, 2019\",2015,PG-13,90 min,\"Dramas, Thrillers\"
Harbor Lights,TV Show,India,,2019,TV-MA,2 Seasons,Crime TV Shows
Unrated Short,Movie,,,2001,,,
";

#[test]
fn csv_load_derives_fields_and_nulls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.csv");
    std::fs::write(&path, SAMPLE_CSV).unwrap();

    let catalog = load_file(&path).unwrap();
    assert_eq!(catalog.len(), 3);

    let first = &catalog.titles[0];
    assert_eq!(first.kind, "Movie");
    assert_eq!(first.duration_minutes, Some(90));
    assert_eq!(first.num_seasons, None);
    assert!(first.date_added.is_some());

    let second = &catalog.titles[1];
    assert_eq!(second.num_seasons, Some(2));
    assert_eq!(second.duration_minutes, None);
    assert_eq!(second.date_added, None);

    let third = &catalog.titles[2];
    assert_eq!(third.country, None);
    assert_eq!(third.rating, None);
    assert_eq!(third.duration, None);
    assert_eq!(third.duration_minutes, None);
    assert_eq!(third.num_seasons, None);
}

#[test]
fn csv_load_rejects_missing_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.csv");
    std::fs::write(
        &path,
        "title,type,country,date_added,release_year,rating,listed_in\nA,Movie,,,2015,,\n",
    )
    .unwrap();

    let err = load_file(&path).unwrap_err();
    assert!(err.to_string().contains("duration"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_file(&dir.path().join("nope.csv")).is_err());
}

#[test]
fn unsupported_extension_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.xlsx");
    std::fs::write(&path, "not a catalog").unwrap();
    let err = load_file(&path).unwrap_err();
    assert!(err.to_string().contains("xlsx"));
}

#[test]
fn header_only_csv_loads_as_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.csv");
    std::fs::write(
        &path,
        "title,type,country,date_added,release_year,rating,duration,listed_in\n",
    )
    .unwrap();

    let catalog = load_file(&path).unwrap();
    assert!(catalog.is_empty());
    assert!(filtered_indices(&catalog, &init_selection(&catalog)).is_empty());
}

#[test]
fn cache_returns_the_same_catalog_for_a_repeated_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.csv");
    std::fs::write(&path, SAMPLE_CSV).unwrap();

    let mut cache = CatalogCache::new();
    let first = cache.get_or_load(&path).unwrap();
    let second = cache.get_or_load(&path).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn json_load_round_trips_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"[
            {"title": "Dust and Echoes", "type": "Movie", "country": "United States, India",
             "date_added": "September 9, 2019", "release_year": 2015, "rating": "PG-13",
             "duration": "90 min", "listed_in": "Dramas, Thrillers"},
            {"title": "Harbor Lights", "type": "TV Show", "country": "India",
             "date_added": null, "release_year": 2019, "rating": "TV-MA",
             "duration": "2 Seasons", "listed_in": "Crime TV Shows"}
        ]"#,
    )
    .unwrap();

    let catalog = load_file(&path).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.titles[0].duration_minutes, Some(90));
    assert_eq!(catalog.titles[1].num_seasons, Some(2));
    assert_eq!(catalog.countries, vec!["India", "United States"]);
}

#[test]
fn parquet_load_round_trips_flat_columns() {
    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    let schema = Arc::new(Schema::new(vec![
        Field::new("title", DataType::Utf8, false),
        Field::new("type", DataType::Utf8, false),
        Field::new("country", DataType::Utf8, true),
        Field::new("date_added", DataType::Utf8, true),
        Field::new("release_year", DataType::Int64, false),
        Field::new("rating", DataType::Utf8, true),
        Field::new("duration", DataType::Utf8, true),
        Field::new("listed_in", DataType::Utf8, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["Dust and Echoes", "Harbor Lights"])),
        Arc::new(StringArray::from(vec!["Movie", "TV Show"])),
        Arc::new(StringArray::from(vec![
            Some("United States, India"),
            Some("India"),
        ])),
        Arc::new(StringArray::from(vec![Some("September 9, 2019"), None])),
        Arc::new(Int64Array::from(vec![2015i64, 2019])),
        Arc::new(StringArray::from(vec![Some("PG-13"), Some("TV-MA")])),
        Arc::new(StringArray::from(vec![Some("90 min"), Some("2 Seasons")])),
        Arc::new(StringArray::from(vec![Some("Dramas, Thrillers"), None])),
    ];
    let batch = RecordBatch::try_new(Arc::clone(&schema), columns).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.parquet");
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let catalog = load_file(&path).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.titles[0].duration_minutes, Some(90));
    assert!(catalog.titles[0].date_added.is_some());
    assert_eq!(catalog.titles[1].num_seasons, Some(2));
    assert_eq!(catalog.titles[1].date_added, None);
    assert_eq!((catalog.year_min, catalog.year_max), (2015, 2019));
}
