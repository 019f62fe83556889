//! Hooks and helpers for the panes that sit around the plot.
//!
//! Nothing here is needed to draw points; hosts opt in by registering
//! observers or calling the formatting helpers.

pub mod observers;
pub mod source_detail;

pub use observers::{PlotContext, PlotEvent, PlotObserver};
pub use source_detail::{
    CutoutResolver, HoverInfo, PatternCutoutResolver, SourceDetail, clipboard_text,
};
