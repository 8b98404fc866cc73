//! PlotCortex: WASM bindings for the scatterplot engine
//!
//! One cross-boundary call per user gesture: the host passes raw payload text
//! or a serialized request object, and gets back a plain data frame
//! (`RenderFrame`, `SelectionUpdate`, `PanelUpdate`) to apply to the DOM.

use wasm_bindgen::prelude::*;

use crate::dataset::{AlignmentKey, DocumentSummary};
use crate::plot::config::PlotConfig;
use crate::plot::engine::{LoadTicket, PlotEngine};
use crate::plot::selection::{SegmentRequest, HINT_TEXT};

#[wasm_bindgen]
pub struct PlotCortex {
    engine: PlotEngine,
}

impl Default for PlotCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl PlotCortex {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: PlotEngine::new(),
        }
    }

    /// Build a cortex with a custom layout (JS binding)
    #[wasm_bindgen(js_name = withConfig)]
    pub fn js_with_config(config: JsValue) -> Result<PlotCortex, JsValue> {
        let config: PlotConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?;
        let engine = PlotEngine::with_config(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(PlotCortex { engine })
    }

    /// Hydrate the corpus document list (JS binding)
    ///
    /// documents should be an array of { id: number, name: string, year: number }
    #[wasm_bindgen(js_name = hydrateDocuments)]
    pub fn js_hydrate_documents(&mut self, documents: JsValue) -> Result<(), JsValue> {
        let documents: Vec<DocumentSummary> = serde_wasm_bindgen::from_value(documents)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse documents: {}", e)))?;
        self.engine.hydrate_documents(documents);
        Ok(())
    }

    /// Start a load and get the ticket to deliver the payload with (JS binding)
    #[wasm_bindgen(js_name = beginLoad)]
    pub fn js_begin_load(&mut self, source_id: u32) -> JsValue {
        let ticket = self.engine.begin_load(source_id);
        match serde_wasm_bindgen::to_value(&ticket) {
            Ok(v) => v,
            Err(e) => {
                web_sys::console::error_1(
                    &format!("[PlotCortex] Serialization failed: {:?}", e).into(),
                );
                JsValue::NULL
            }
        }
    }

    /// Deliver a fetched payload for a ticket (JS binding)
    #[wasm_bindgen(js_name = deliverPayload)]
    pub fn js_deliver_payload(
        &mut self,
        ticket: JsValue,
        payload_text: &str,
    ) -> Result<JsValue, JsValue> {
        let ticket: LoadTicket = serde_wasm_bindgen::from_value(ticket)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse ticket: {}", e)))?;
        let outcome = self
            .engine
            .deliver_payload(&ticket, payload_text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_wasm_bindgen::to_value(&outcome)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Load a payload in one call, for hosts that already have the text (JS binding)
    #[wasm_bindgen(js_name = loadAlignments)]
    pub fn js_load_alignments(
        &mut self,
        source_id: u32,
        payload_text: &str,
    ) -> Result<JsValue, JsValue> {
        let outcome = self
            .engine
            .load_alignments(source_id, payload_text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_wasm_bindgen::to_value(&outcome)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Select a scatter mark by its key and get the segment requests (JS binding)
    ///
    /// key is the { sourceId, similarId, similarityBits } object carried on
    /// every rendered scatter mark
    #[wasm_bindgen(js_name = selectMark)]
    pub fn js_select_mark(&mut self, key: JsValue) -> Result<JsValue, JsValue> {
        let key: AlignmentKey = serde_wasm_bindgen::from_value(key)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse mark key: {}", e)))?;
        let update = self
            .engine
            .select_mark(&key)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_wasm_bindgen::to_value(&update)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deliver one resolved segment text (JS binding)
    #[wasm_bindgen(js_name = resolveSegment)]
    pub fn js_resolve_segment(&mut self, request: JsValue, text: &str) -> Result<JsValue, JsValue> {
        let request: SegmentRequest = serde_wasm_bindgen::from_value(request)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse request: {}", e)))?;
        let update = self.engine.resolve_segment(&request, text);
        serde_wasm_bindgen::to_value(&update)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deliver a whole segments_<id>.json file and index the passage (JS binding)
    #[wasm_bindgen(js_name = resolveSegmentStore)]
    pub fn js_resolve_segment_store(
        &mut self,
        request: JsValue,
        store_json: &str,
    ) -> Result<JsValue, JsValue> {
        let request: SegmentRequest = serde_wasm_bindgen::from_value(request)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse request: {}", e)))?;
        let update = self.engine.resolve_segment_store(&request, store_json);
        serde_wasm_bindgen::to_value(&update)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Record a failed segment fetch (JS binding)
    #[wasm_bindgen(js_name = failSegment)]
    pub fn js_fail_segment(&mut self, request: JsValue, message: &str) -> Result<JsValue, JsValue> {
        let request: SegmentRequest = serde_wasm_bindgen::from_value(request)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse request: {}", e)))?;
        let update = self.engine.fail_segment(&request, message);
        serde_wasm_bindgen::to_value(&update)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Clear the selection and get the reset panels back (JS binding)
    #[wasm_bindgen(js_name = clearSelection)]
    pub fn js_clear_selection(&mut self) -> JsValue {
        let panels = self.engine.clear_selection();
        match serde_wasm_bindgen::to_value(&panels) {
            Ok(v) => v,
            Err(e) => {
                web_sys::console::error_1(
                    &format!("[PlotCortex] Serialization failed: {:?}", e).into(),
                );
                JsValue::NULL
            }
        }
    }

    /// Placeholder text shown while nothing is selected
    #[wasm_bindgen(js_name = hintText)]
    pub fn hint_text(&self) -> String {
        HINT_TEXT.to_string()
    }

    /// Document currently plotted, if any
    #[wasm_bindgen(js_name = currentSource)]
    pub fn current_source(&self) -> Option<u32> {
        self.engine.current_source()
    }

    /// Number of hydrated corpus documents
    #[wasm_bindgen(js_name = documentCount)]
    pub fn document_count(&self) -> usize {
        self.engine.document_count()
    }

    /// Everything currently on screen, for redraw-from-scratch hosts (JS binding)
    #[wasm_bindgen(js_name = visibleMarks)]
    pub fn js_visible_marks(&self) -> JsValue {
        match serde_wasm_bindgen::to_value(&self.engine.visible_marks()) {
            Ok(v) => v,
            Err(e) => {
                web_sys::console::error_1(
                    &format!("[PlotCortex] Serialization failed: {:?}", e).into(),
                );
                JsValue::NULL
            }
        }
    }

    /// Lifetime engine counters (JS binding)
    #[wasm_bindgen(js_name = engineStats)]
    pub fn js_engine_stats(&self) -> JsValue {
        match serde_wasm_bindgen::to_value(self.engine.engine_stats()) {
            Ok(v) => v,
            Err(e) => {
                web_sys::console::error_1(
                    &format!("[PlotCortex] Serialization failed: {:?}", e).into(),
                );
                JsValue::NULL
            }
        }
    }
}

impl PlotCortex {
    /// The wrapped engine, for native callers
    pub fn engine(&self) -> &PlotEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PlotEngine {
        &mut self.engine
    }
}
