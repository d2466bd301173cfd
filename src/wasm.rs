//! WASM bindings for Luxfile Core.
//!
//! String-in, string-out entry points for converting and normalizing
//! photometric files in the browser. Errors surface as JavaScript strings.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { ldt_to_ies, normalize_ies } from 'luxfile_core';
//!
//! await init();
//!
//! const ies = ldt_to_ies(await file.text(), false);
//! const canonical = normalize_ies(ies, true);
//! ```

use wasm_bindgen::prelude::*;

use crate::convert;
use crate::error::LuxError;
use crate::eulumdat;
use crate::ies;
use crate::reader::ParseOptions;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: LuxError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Convert EULUMDAT text to LM-63-2002 text.
///
/// # Arguments
/// * `text` - Contents of a `.ldt` file
/// * `strict` - Fail on over-long lines instead of warning
#[wasm_bindgen]
pub fn ldt_to_ies(text: &str, strict: bool) -> Result<String, JsValue> {
    let options = ParseOptions::new().with_strict(strict);
    let ldt = eulumdat::parse(text, &options).map_err(to_js)?;
    let doc = convert::eulumdat_to_ies(&ldt).map_err(to_js)?;
    ies::to_string(&doc).map_err(to_js)
}

/// Parse IES text and write it back out with canonical line layout.
#[wasm_bindgen]
pub fn normalize_ies(text: &str, strict: bool) -> Result<String, JsValue> {
    let options = ParseOptions::new().with_strict(strict);
    let doc = ies::parse(text, &options).map_err(to_js)?;
    doc.validate(strict).map_err(to_js)?;
    ies::to_string(&doc).map_err(to_js)
}

/// Parse IES text of any revision and write it as LM-63-2002.
#[wasm_bindgen]
pub fn upgrade_ies(text: &str) -> Result<String, JsValue> {
    let mut doc = ies::parse(text, &ParseOptions::new()).map_err(to_js)?;
    doc.upgrade().map_err(to_js)?;
    ies::to_string(&doc).map_err(to_js)
}

/// Crate version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
