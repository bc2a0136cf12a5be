//! Toast notification sink
//!
//! The ledger never touches toast markup. Grants and shortfalls are
//! published as a DOM `CustomEvent` the host page's toast chrome listens
//! for, replacing the old per-call `typeof showToast === 'function'`
//! checks with a capability resolved at construction time.

use econavi_rewards::Notifier;
use serde::Serialize;
use wasm_bindgen::JsValue;
use web_sys::{CustomEvent, CustomEventInit};

use crate::dom;

/// Event name the host page subscribes to on `document`.
pub const TOAST_EVENT: &str = "econavi:toast";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToastDetail<'a> {
    message: &'a str,
    duration_ms: u32,
}

/// Dispatches `econavi:toast` events carrying `{ message, durationMs }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToastNotifier;

impl Notifier for ToastNotifier {
    fn notify(&self, message: &str, duration_ms: u32) {
        log::debug!("toast: {message} ({duration_ms}ms)");

        let detail = serde_wasm_bindgen::to_value(&ToastDetail {
            message,
            duration_ms,
        })
        .unwrap_or(JsValue::NULL);

        let init = CustomEventInit::new();
        init.set_detail(&detail);
        if let Ok(event) = CustomEvent::new_with_event_init_dict(TOAST_EVENT, &init) {
            let _ = dom::document().dispatch_event(&event);
        }
    }
}
