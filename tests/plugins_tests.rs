mod common;

use chart_lifecycle::ChartError;
use chart_lifecycle::core::SeriesId;
use chart_lifecycle::extensions::PluginEvent;
use chart_lifecycle::interaction::PointerEvent;

use common::{RecordingPlugin, RecordingSeries, build_chart, settle};

fn event_kind(event: &PluginEvent) -> &'static str {
    match event {
        PluginEvent::DataProcessed { .. } => "data",
        PluginEvent::LayoutDone { .. } => "layout",
        PluginEvent::Rendered => "rendered",
        PluginEvent::NodePicked { .. } => "picked",
        PluginEvent::PickCleared => "pick_cleared",
        PluginEvent::LegendItemToggled { .. } => "legend_toggled",
    }
}

#[test]
fn plugin_receives_deterministic_event_sequence() {
    let (mut chart, _overlay) = build_chart();
    let plugin = RecordingPlugin::new("recorder");
    let events = plugin.events.clone();
    chart.register_plugin(Box::new(plugin)).expect("register plugin");

    chart.add_series(
        Box::new(
            RecordingSeries::new("s1")
                .with_items(&["x", "y"])
                .with_geometry(50.0, 50.0, 100.0, 100.0),
        ),
        None,
    );
    settle(&mut chart);
    chart.pointer_move(PointerEvent::at(60.0, 60.0));
    chart.pointer_move(PointerEvent::at(61.0, 61.0));
    chart.pointer_out(PointerEvent::at(-1.0, -1.0));
    chart.click(PointerEvent::at(335.0, 137.0)).expect("legend entry");

    let events = events.borrow();
    let kinds: Vec<&'static str> = events.iter().map(|(event, _)| event_kind(event)).collect();
    assert_eq!(
        kinds,
        vec![
            "data",
            "layout",
            "layout",
            "rendered",
            "picked",
            "pick_cleared",
            "legend_toggled",
        ]
    );
    assert_eq!(events[0].0, PluginEvent::DataProcessed { legend_items: 2 });
    assert_eq!(events[2].0, PluginEvent::LayoutDone { pass: 2 });
    assert_eq!(events[4].1.picked_series, Some(SeriesId::new("s1")));
    assert_eq!(
        events[6].0,
        PluginEvent::LegendItemToggled {
            series_id: SeriesId::new("s1"),
            item_id: "x".to_owned(),
            enabled: false,
        }
    );
}

#[test]
fn plugin_context_reflects_settled_layout() {
    let (mut chart, _overlay) = build_chart();
    let plugin = RecordingPlugin::new("recorder");
    let events = plugin.events.clone();
    chart.register_plugin(Box::new(plugin)).expect("register plugin");
    chart.add_series(Box::new(RecordingSeries::new("s1").with_items(&["x"])), None);
    settle(&mut chart);

    let events = events.borrow();
    let (_, context) = events.last().expect("rendered event");
    assert_eq!(context.series_count, 1);
    assert_eq!(context.legend_items, 1);
    assert_eq!(context.legend_auto_padding, chart.legend_auto_padding());
    assert_eq!(context.size, chart.size());
}

#[test]
fn plugin_registry_rejects_duplicate_and_empty_ids() {
    let (mut chart, _overlay) = build_chart();
    chart
        .register_plugin(Box::new(RecordingPlugin::new("p1")))
        .expect("register p1");

    let duplicate = chart
        .register_plugin(Box::new(RecordingPlugin::new("p1")))
        .expect_err("duplicate plugin id must fail");
    assert!(matches!(duplicate, ChartError::InvalidData(_)));

    let empty = chart
        .register_plugin(Box::new(RecordingPlugin::new("")))
        .expect_err("empty plugin id must fail");
    assert!(matches!(empty, ChartError::InvalidData(_)));

    assert!(chart.has_plugin("p1"));
    assert_eq!(chart.plugin_count(), 1);
    assert!(chart.unregister_plugin("p1"));
    assert!(!chart.unregister_plugin("p1"));
    assert_eq!(chart.plugin_count(), 0);
}
