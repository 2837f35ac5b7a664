use tracing::trace;

use crate::core::{BBox, LegendPosition, Padding};
use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;
use crate::scene::{NodeKind, Scene};

use super::chart::CaptionSlot;
use super::{Chart, HostScheduler};

/// Top of the title's line box.
const TITLE_TOP: f64 = 10.0;
/// Space below the title, as a multiple of its height.
const TITLE_EXTENT_FACTOR: f64 = 1.5;
const SUBTITLE_SPACING: f64 = 5.0;

const AUTO_PADDING_EPSILON: f64 = 1e-9;

pub(super) struct LayoutCoordinator;

impl LayoutCoordinator {
    pub(super) fn layout_background<R: Renderer, S: HostScheduler>(
        chart: &mut Chart<R, S>,
    ) -> ChartResult<()> {
        let size = chart.scene.size();
        let background = chart.background;
        match chart.scene.node_mut(background).map(|node| &mut node.kind) {
            Some(NodeKind::Rect(rect)) => {
                rect.x = 0.0;
                rect.y = 0.0;
                rect.width = size.width;
                rect.height = size.height;
                Ok(())
            }
            _ => Err(ChartError::UnknownNode {
                index: background.index(),
            }),
        }
    }

    /// Centers the title and subtitle at the top and updates the caption
    /// padding. A subtitle is shown only under an enabled title.
    pub(super) fn position_captions<R: Renderer, S: HostScheduler>(
        chart: &mut Chart<R, S>,
    ) -> ChartResult<()> {
        let center_x = chart.scene.size().width / 2.0;
        let mut padding_top = 0.0;
        let mut title_shown = false;
        let mut subtitle_shown = false;

        if let Some(title) = chart.title.as_ref().filter(|slot| slot.caption.enabled) {
            let bbox = place_caption(&mut chart.scene, title, center_x, TITLE_TOP);
            padding_top = bbox.y + bbox.height * TITLE_EXTENT_FACTOR;
            title_shown = true;

            if let Some(subtitle) = chart.subtitle.as_ref().filter(|slot| slot.caption.enabled)
            {
                let bbox = place_caption(&mut chart.scene, subtitle, center_x, padding_top);
                padding_top += SUBTITLE_SPACING + bbox.height;
                subtitle_shown = true;
            }
        }

        if let Some(title) = &chart.title {
            chart.scene.set_visible(title.node, title_shown)?;
        }
        if let Some(subtitle) = &chart.subtitle {
            chart.scene.set_visible(subtitle.node, subtitle_shown)?;
        }

        if (chart.layout.caption_auto_padding - padding_top).abs() > AUTO_PADDING_EPSILON {
            trace!(
                previous = chart.layout.caption_auto_padding,
                next = padding_top,
                "caption padding changed"
            );
            chart.layout.caption_auto_padding = padding_top;
            chart.set_layout_pending(true);
        }
        Ok(())
    }

    /// Lays out legend items within the space left by captions, pins the
    /// legend to its edge and records the space it takes on that edge.
    pub(super) fn position_legend<R: Renderer, S: HostScheduler>(
        chart: &mut Chart<R, S>,
    ) -> ChartResult<()> {
        let group = chart.legend.group();
        if !chart.legend.is_enabled() || chart.legend.data().is_empty() {
            chart.scene.set_visible(group, false)?;
            chart.layout.legend_auto_padding.clear();
            return Ok(());
        }
        chart.scene.set_visible(group, true)?;

        let size = chart.scene.size();
        let caption_padding = chart.layout.caption_auto_padding;
        let width = size.width;
        let height = size.height - caption_padding;
        let legend_padding = chart.legend.padding();
        let position = chart.legend.position();

        if position.is_horizontal() {
            chart
                .legend
                .perform_layout(&mut chart.scene, width - legend_padding * 2.0, 0.0)?;
        } else {
            chart
                .legend
                .perform_layout(&mut chart.scene, 0.0, height - legend_padding * 2.0)?;
        }
        let bbox = chart.scene.bbox(group).unwrap_or_default();

        let (translation_x, translation_y, extent) = match position {
            LegendPosition::Top => (
                (width - bbox.width) / 2.0 - bbox.x,
                caption_padding + legend_padding - bbox.y,
                bbox.height,
            ),
            LegendPosition::Bottom => (
                (width - bbox.width) / 2.0 - bbox.x,
                caption_padding + height - bbox.height - bbox.y - legend_padding,
                bbox.height,
            ),
            LegendPosition::Left => (
                legend_padding - bbox.x,
                caption_padding + (height - bbox.height) / 2.0 - bbox.y,
                bbox.width,
            ),
            LegendPosition::Right => (
                width - bbox.width - bbox.x - legend_padding,
                caption_padding + (height - bbox.height) / 2.0 - bbox.y,
                bbox.width,
            ),
        };

        let auto_padding = &mut chart.layout.legend_auto_padding;
        let edge = match position {
            LegendPosition::Top => &mut auto_padding.top,
            LegendPosition::Right => &mut auto_padding.right,
            LegendPosition::Bottom => &mut auto_padding.bottom,
            LegendPosition::Left => &mut auto_padding.left,
        };
        let changed = (*edge - extent).abs() > AUTO_PADDING_EPSILON;
        *edge = extent;
        if changed {
            trace!(?position, extent, "legend padding changed");
            chart.set_layout_pending(true);
        }

        // Whole pixels keep marker edges crisp.
        chart
            .scene
            .set_translation(group, translation_x.floor(), translation_y.floor())
    }

    /// Computes the shared series rectangle and updates every visible series.
    pub(super) fn layout_series<R: Renderer, S: HostScheduler>(
        chart: &mut Chart<R, S>,
    ) -> ChartResult<()> {
        let size = chart.scene.size();
        let mut reserved = chart.padding;
        reserved.top += chart.layout.caption_auto_padding;

        if chart.legend.is_enabled() && !chart.legend.data().is_empty() {
            let gap = chart.legend.padding() * 2.0;
            let legend = chart.layout.legend_auto_padding;
            reserved = match chart.legend.position() {
                LegendPosition::Top => Padding {
                    top: reserved.top + legend.top + gap,
                    ..reserved
                },
                LegendPosition::Right => Padding {
                    right: reserved.right + legend.right + gap,
                    ..reserved
                },
                LegendPosition::Bottom => Padding {
                    bottom: reserved.bottom + legend.bottom + gap,
                    ..reserved
                },
                LegendPosition::Left => Padding {
                    left: reserved.left + legend.left + gap,
                    ..reserved
                },
            };
        }

        let series_rect = BBox::new(0.0, 0.0, size.width, size.height).shrink(reserved);
        chart.layout.series_rect = series_rect;

        for series in chart.series.values_mut() {
            let Some(group) = series.base().group() else {
                continue;
            };
            let visible = series.is_visible();
            chart.scene.set_visible(group, visible)?;
            if visible {
                series.update(&mut chart.scene, series_rect)?;
            }
        }
        Ok(())
    }
}

/// Anchors a caption's text at `(center_x, top)` and returns its bounds.
fn place_caption(scene: &mut Scene, slot: &CaptionSlot, center_x: f64, top: f64) -> BBox {
    let Some(node) = scene.node_mut(slot.node) else {
        return BBox::default();
    };
    match &mut node.kind {
        NodeKind::Text(text) => {
            text.x = center_x;
            text.y = top;
            text.bbox()
        }
        _ => BBox::default(),
    }
}
