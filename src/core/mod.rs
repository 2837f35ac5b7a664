pub mod caption;
pub mod legend;
pub mod series;
pub mod types;

pub use caption::Caption;
pub use legend::{Legend, LegendConfig, LegendPosition};
pub use series::{
    ChartId, LegendDatum, LegendMarker, Series, SeriesBase, SeriesBinding, SeriesId,
};
pub use types::{BBox, Padding, Size};
