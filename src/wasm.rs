use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::ai::SearchConfig;
use crate::game::{GameError, GameInstance};
use crate::types::Point;

/// Browser-facing handle. Every method returns the serialized `GameState`
/// (or the requested value) and maps errors to their message string.
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameInstance,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: GameInstance::new(),
        }
    }

    /// Accepts a partial `{ normal_depth, wld_depth, perfect_depth }` object.
    pub fn with_config(config: JsValue) -> Result<WasmGame, JsValue> {
        let config: SearchConfig = if config.is_undefined() || config.is_null() {
            SearchConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self {
            inner: GameInstance::with_config(config),
        })
    }

    pub fn place(&mut self, x: u8, y: u8) -> Result<JsValue, JsValue> {
        self.inner.place(Point::new(x, y)).map_err(to_js_error)?;
        self.state()
    }

    pub fn place_str(&mut self, coord: &str) -> Result<JsValue, JsValue> {
        self.inner.place_str(coord).map_err(to_js_error)?;
        self.state()
    }

    pub fn pass(&mut self) -> Result<JsValue, JsValue> {
        self.inner.pass().map_err(to_js_error)?;
        self.state()
    }

    pub fn ai_move(&mut self) -> Result<JsValue, JsValue> {
        self.inner.do_ai_move().map_err(to_js_error)?;
        self.state()
    }

    pub fn undo(&mut self) -> Result<JsValue, JsValue> {
        self.inner.undo().map_err(to_js_error)?;
        self.state()
    }

    pub fn is_players_turn(&self) -> bool {
        self.inner.is_players_turn()
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.to_game_state())
    }

    pub fn legal_moves(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.legal_moves())
    }

    pub fn result(&self) -> Result<JsValue, JsValue> {
        let result = self.inner.final_result().map_err(to_js_error)?;
        to_js(&result)
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn to_js_error(err: GameError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
