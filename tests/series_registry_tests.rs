mod common;

use chart_lifecycle::core::SeriesId;
use serde_json::json;

use common::{RecordingSeries, build_chart, settle};

fn ids(values: &[&str]) -> Vec<SeriesId> {
    values.iter().map(|value| SeriesId::new(*value)).collect()
}

#[test]
fn adding_same_series_id_twice_is_rejected() {
    let (mut chart, _overlay) = build_chart();
    assert!(chart.add_series(Box::new(RecordingSeries::new("s1")), None));
    assert!(!chart.add_series(Box::new(RecordingSeries::new("s1")), None));
    assert_eq!(chart.series_count(), 1);
    assert_eq!(chart.series_groups().len(), 1);
}

#[test]
fn series_added_before_anchor_precedes_it_in_list_and_scene() {
    let (mut chart, _overlay) = build_chart();
    chart.add_series(Box::new(RecordingSeries::new("a")), None);
    chart.add_series(Box::new(RecordingSeries::new("b")), Some(&SeriesId::new("a")));

    assert_eq!(chart.series_ids(), ids(&["b", "a"]));
    let expected_groups: Vec<_> = chart
        .series_ids()
        .iter()
        .map(|id| chart.series(id).and_then(|series| series.base().group()))
        .collect::<Option<Vec<_>>>()
        .expect("bound groups");
    assert_eq!(chart.series_groups(), expected_groups);
}

#[test]
fn missing_anchor_appends_at_the_end() {
    let (mut chart, _overlay) = build_chart();
    chart.add_series(Box::new(RecordingSeries::new("a")), None);
    chart.add_series(
        Box::new(RecordingSeries::new("b")),
        Some(&SeriesId::new("missing")),
    );
    assert_eq!(chart.series_ids(), ids(&["a", "b"]));
}

#[test]
fn add_series_after_inserts_behind_anchor_or_at_front() {
    let (mut chart, _overlay) = build_chart();
    chart.add_series(Box::new(RecordingSeries::new("a")), None);
    chart.add_series(Box::new(RecordingSeries::new("c")), None);

    assert!(chart.add_series_after(Box::new(RecordingSeries::new("b")), Some(&SeriesId::new("a"))));
    assert!(chart.add_series_after(Box::new(RecordingSeries::new("z")), None));
    assert!(chart.add_series_after(Box::new(RecordingSeries::new("d")), Some(&SeriesId::new("c"))));
    assert!(!chart.add_series_after(Box::new(RecordingSeries::new("a")), None));

    assert_eq!(chart.series_ids(), ids(&["z", "a", "b", "c", "d"]));
    let groups = chart.series_groups();
    for (index, id) in chart.series_ids().iter().enumerate() {
        let group = chart
            .series(id)
            .and_then(|series| series.base().group())
            .expect("bound group");
        assert_eq!(groups[index], group);
    }
}

#[test]
fn attached_series_points_back_at_its_chart() {
    let (mut chart, _overlay) = build_chart();
    chart.add_series(Box::new(RecordingSeries::new("s1")), None);
    let series = chart.series(&SeriesId::new("s1")).expect("series");
    assert_eq!(series.base().chart(), Some(chart.id()));
}

#[test]
fn remove_series_detaches_and_marks_data_pending() {
    let (mut chart, _overlay) = build_chart();
    chart.add_series(Box::new(RecordingSeries::new("a")), None);
    chart.add_series(Box::new(RecordingSeries::new("b")), None);
    settle(&mut chart);
    let group = chart
        .series(&SeriesId::new("a"))
        .and_then(|series| series.base().group())
        .expect("group");

    let removed = chart.remove_series(&SeriesId::new("a")).expect("removed");
    assert_eq!(removed.base().chart(), None);
    assert_eq!(removed.base().group(), None);
    assert!(!chart.scene().contains(group));
    assert!(chart.is_data_pending());
    assert_eq!(chart.series_ids(), ids(&["b"]));
    assert!(chart.remove_series(&SeriesId::new("a")).is_none());

    // A detached series can be attached again.
    assert!(chart.add_series(removed, None));
    assert_eq!(chart.series_ids(), ids(&["b", "a"]));
}

#[test]
fn remove_all_series_returns_them_in_order() {
    let (mut chart, _overlay) = build_chart();
    for id in ["a", "b", "c"] {
        chart.add_series(Box::new(RecordingSeries::new(id).with_items(&["x"])), None);
    }
    settle(&mut chart);
    assert_eq!(chart.legend().data().len(), 3);

    let removed = chart.remove_all_series();
    let removed_ids: Vec<_> = removed.iter().map(|series| series.id().clone()).collect();
    assert_eq!(removed_ids, ids(&["a", "b", "c"]));
    assert!(removed.iter().all(|series| series.base().chart().is_none()));
    assert_eq!(chart.series_count(), 0);
    assert!(chart.series_groups().is_empty());

    settle(&mut chart);
    assert!(chart.legend().data().is_empty());
}

#[test]
fn chart_data_reaches_current_and_later_series() {
    let (mut chart, _overlay) = build_chart();
    let first = RecordingSeries::new("a");
    let first_log = first.log();
    chart.add_series(Box::new(first), None);

    chart.set_data(vec![json!({ "x": 1 }), json!({ "x": 2 })]);
    assert_eq!(first_log.borrow().data_len, 2);

    let second = RecordingSeries::new("b");
    let second_log = second.log();
    chart.add_series(Box::new(second), None);
    assert_eq!(second_log.borrow().data_len, 2);
    assert_eq!(chart.data().len(), 2);
}

#[test]
fn update_series_marks_data_pending() {
    let (mut chart, _overlay) = build_chart();
    chart.add_series(Box::new(RecordingSeries::new("a").with_items(&["x"])), None);
    settle(&mut chart);

    assert!(chart.update_series(&SeriesId::new("a"), |series| {
        series.base_mut().show_in_legend = false;
    }));
    assert!(chart.is_data_pending());
    settle(&mut chart);
    assert!(chart.legend().data().is_empty());
    assert!(!chart.update_series(&SeriesId::new("missing"), |_| {}));
}
