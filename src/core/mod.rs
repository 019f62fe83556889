pub mod catalog;
pub mod color_scale;
pub mod data_store;
pub mod scale;
pub mod scale_manager;
pub mod ticks;
pub mod transition;
pub mod types;
pub mod view_state;

pub use catalog::{
    AxisOption, CatalogMetadata, ColumnMetadata, DataRow, FieldDescriptor, FieldIndex,
    FieldPayload,
};
pub use color_scale::{SequentialColorScale, viridis};
pub use data_store::{DataStore, RowKey, merge_metadata};
pub use scale::{LinearScale, ZoomTransform};
pub use scale_manager::{AxisTransition, ComposedScales, ScaleManager};
pub use transition::{Easing, TransitionClock};
pub use types::{Axis, ScreenPoint, Viewport};
pub use view_state::ViewState;
