//! ReuseCore: Incremental Text-Reuse Scatterplot Engine
//!
//! A Rust/WASM implementation of the text-reuse visualization pipeline.
//!
//! # Architecture
//!
//! ## Core
//! - `reconcile/delta.rs` - Keyed enter/update/exit partition between the
//!   rendered mark set and an incoming record set
//! - `dataset/` - Alignment records, identity keys, tolerant payload parsing
//! - `scale/` - Linear scales, nice ticks, integer-safe label formatting
//! - `marks/` - Scatter/legend/time-axis mark geometry, category20 palette,
//!   render ops
//!
//! ## Views
//! - `plot/engine.rs` - PlotEngine: alignment scatter + legend + time axis,
//!   selection with segment lookups, epoch-guarded loads
//! - `plot/wasm.rs` - PlotCortex: **one call per gesture** WASM facade
//! - `corpus/trend.rs` - CorpusEngine/CorpusCortex: per-document similarity
//!   trends with metric switching
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { PlotCortex } from 'reusecore';
//!
//! await init();
//!
//! const cortex = new PlotCortex();
//! cortex.hydrateDocuments([
//!   { id: 1, name: 'An Essay upon Projects', year: 1697 },
//!   { id: 2, name: 'Jure Divino', year: 1710 }
//! ]);
//!
//! // One load call - returns every op needed to redraw
//! const outcome = cortex.loadAlignments(1, payloadText);
//! for (const op of outcome.frame.scatter) {
//!   // op.op is 'enter' | 'update' | 'exit'; update/exit carry transitionMs
//! }
//!
//! // Click a dot: titles now, passage texts when the host delivers them
//! const selection = cortex.selectMark(mark.key);
//! for (const request of selection.requests) {
//!   const store = await fetch(`segments_${request.documentId}.json`);
//!   cortex.resolveSegmentStore(request, await store.text());
//! }
//! ```

pub mod corpus;
pub mod dataset;
pub mod marks;
pub mod plot;
pub mod reconcile;
pub mod scale;

pub use corpus::*;
pub use dataset::*;
pub use marks::*;
pub use plot::*;
pub use reconcile::*;
pub use scale::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("reusecore v{}", env!("CARGO_PKG_VERSION"))
}
