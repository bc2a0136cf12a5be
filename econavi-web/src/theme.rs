//! Theme application against `document.body`
//!
//! The ledger only persists the applied theme id; this module reconciles
//! the body element with it. Every catalog id class is removed first so a
//! theme switch never leaves a stale class behind, then the applied item's
//! class (and, for background items, its inline image) is put back.

use econavi_rewards::{Catalog, ItemKind};

use crate::dom;

/// Reconcile `document.body` with the applied theme id, or restore the
/// default look when `applied` is `None` or names an id outside the
/// catalog.
pub fn apply_to_body(catalog: &Catalog, applied: Option<&str>) {
    let body = dom::body();
    let class_list = body.class_list();

    for item in catalog.items() {
        let _ = class_list.remove_1(&item.id);
    }
    let _ = body.style().remove_property("background-image");

    let Some(item) = applied.and_then(|id| catalog.find_item(id)) else {
        return;
    };

    let _ = class_list.add_1(&item.id);
    if item.kind == ItemKind::Background {
        if let Some(image) = &item.image {
            let _ = body
                .style()
                .set_property("background-image", &format!("url('{image}')"));
        }
    }
}
