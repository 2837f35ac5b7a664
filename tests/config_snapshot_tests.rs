mod common;

use chart_lifecycle::ChartError;
use chart_lifecycle::api::{CHART_SNAPSHOT_JSON_SCHEMA_V1, Chart, ChartConfig, ChartSnapshot, ManualScheduler};
use chart_lifecycle::core::{LegendPosition, Padding, SeriesId, Size};
use chart_lifecycle::interaction::{PointerEvent, TooltipOffset};
use chart_lifecycle::render::{Color, HeadlessOverlay, NullRenderer};

use common::{RecordingSeries, build_chart, build_chart_with, settle};

#[test]
fn config_json_fills_defaults() {
    let config = ChartConfig::from_json_str(r#"{ "size": { "width": 640.0, "height": 480.0 } }"#)
        .expect("parse config");
    assert_eq!(config, ChartConfig::new(Size::new(640.0, 480.0)));
    assert_eq!(config.padding, Padding::uniform(20.0));
    assert_eq!(config.legend.position, LegendPosition::Right);
    assert_eq!(config.tooltip_offset, TooltipOffset { x: 20.0, y: 20.0 });
}

#[test]
fn config_json_round_trips_custom_values() {
    let config = ChartConfig::new(Size::new(800.0, 600.0))
        .with_padding(Padding::new(5.0, 10.0, 15.0, 20.0))
        .with_background(Color::rgb(0.1, 0.1, 0.1))
        .with_tooltip_class("dark")
        .with_tooltip_offset(8.0, 12.0)
        .with_legend_position(LegendPosition::Bottom)
        .with_legend_enabled(false);
    let json = config.to_json_pretty().expect("serialize");
    assert!(json.contains("\"bottom\""));
    assert_eq!(ChartConfig::from_json_str(&json).expect("parse"), config);
}

#[test]
fn invalid_config_is_rejected() {
    let err = ChartConfig::from_json_str(r#"{ "size": { "width": 0.0, "height": 480.0 } }"#)
        .expect_err("zero width");
    assert!(matches!(err, ChartError::InvalidViewport { .. }));

    let err = ChartConfig::from_json_str("{").expect_err("malformed");
    assert!(matches!(err, ChartError::InvalidData(_)));

    let config = ChartConfig::new(Size::new(100.0, 100.0)).with_tooltip_offset(f64::NAN, 0.0);
    let result = Chart::new(
        NullRenderer::default(),
        ManualScheduler::new(),
        Box::new(HeadlessOverlay::default()),
        config,
    );
    assert!(matches!(result, Err(ChartError::InvalidData(_))));
}

#[test]
fn configured_tooltip_class_and_offset_apply() {
    let config = ChartConfig::new(Size::new(400.0, 300.0))
        .with_tooltip_class("dark")
        .with_tooltip_offset(5.0, 7.0);
    let (mut chart, overlay) = build_chart_with(config);
    assert!(overlay.classes().contains(&"dark".to_owned()));

    chart.add_series(
        Box::new(
            RecordingSeries::new("a")
                .with_geometry(50.0, 50.0, 100.0, 100.0)
                .with_tooltip("a"),
        ),
        None,
    );
    settle(&mut chart);
    chart.pointer_move(PointerEvent::at(60.0, 60.0));
    assert_eq!(overlay.state().position, Some((65.0, 67.0)));

    chart
        .set_tooltip_offset(TooltipOffset { x: 1.0, y: 1.0 })
        .expect("offset");
    chart.pointer_move(PointerEvent::at(60.0, 60.0));
    assert_eq!(overlay.state().position, Some((61.0, 61.0)));
    assert!(chart
        .set_tooltip_offset(TooltipOffset {
            x: f64::INFINITY,
            y: 0.0
        })
        .is_err());
}

#[test]
fn snapshot_contract_round_trips() {
    let (mut chart, _overlay) = build_chart();
    chart.add_series(
        Box::new(
            RecordingSeries::new("s1")
                .with_items(&["x"])
                .with_geometry(50.0, 50.0, 100.0, 100.0),
        ),
        None,
    );
    settle(&mut chart);
    chart.pointer_move(PointerEvent::at(60.0, 60.0));

    let snapshot = chart.snapshot();
    assert_eq!(snapshot.series_ids, vec![SeriesId::new("s1")]);
    assert_eq!(snapshot.legend_data.len(), 1);
    assert_eq!(
        snapshot.pick.as_ref().map(|pick| pick.series.clone()),
        Some(SeriesId::new("s1"))
    );
    assert!(!snapshot.data_pending);
    assert!(snapshot.redraw_pending);

    let json = chart.snapshot_json_contract_v1_pretty().expect("contract");
    assert!(json.contains(&format!("\"schema_version\": {CHART_SNAPSHOT_JSON_SCHEMA_V1}")));
    assert_eq!(ChartSnapshot::from_json_compat_str(&json).expect("parse"), snapshot);

    let bare = serde_json::to_string(&snapshot).expect("bare snapshot");
    assert_eq!(ChartSnapshot::from_json_compat_str(&bare).expect("parse bare"), snapshot);
}

#[test]
fn snapshot_contract_rejects_unknown_schema() {
    let (chart, _overlay) = build_chart();
    let json = chart
        .snapshot_json_contract_v1_pretty()
        .expect("contract")
        .replace("\"schema_version\": 1", "\"schema_version\": 9");
    let err = ChartSnapshot::from_json_compat_str(&json).expect_err("unknown schema");
    assert!(matches!(err, ChartError::InvalidData(_)));
}
