// Binary target for wasm bundlers (Trunk and similar).
//
// On native targets there is nothing to run. The page script starts from
// `wasm_start` when built with `--features web` for wasm32.

fn main() {}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    diet_web::start();
}
