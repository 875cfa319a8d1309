//! Coercion of pre-registry storage layouts into the v1 registry shape.
//!
//! Earlier builds stored workspace state in three different layouts. Each is
//! modeled as an explicit [`LegacyShape`] variant, detected by an ordered
//! list of matchers, and normalized into a v1 [`WorkspaceRegistry`]. This
//! module is deliberately isolated from steady-state registry operations so
//! it can be deleted wholesale once legacy data is fully migrated in
//! production.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{DEFAULT_WORKSPACE_NAME, LEGACY_ACTIVE_KEY, LEGACY_ITEMS_KEY};
use crate::types::workspace::{Workspace, WorkspaceRegistry};

/// The storage layouts written by pre-registry builds.
#[derive(Debug)]
pub enum LegacyShape {
    /// Two separate keys: an items map and an active-id string.
    SplitKeys {
        items: BTreeMap<String, Workspace>,
        active_id: Option<String>,
    },
    /// The registry key holding a bare active-id string; legacy items are
    /// reused when present, otherwise a default workspace is fabricated.
    BareActiveId {
        active_id: String,
        items: Option<BTreeMap<String, Workspace>>,
    },
    /// The registry key holding a raw items map with no version wrapper.
    UnversionedItems { items: BTreeMap<String, Workspace> },
}

/// A legacy layout normalized to v1, plus the legacy keys it consumed.
pub struct Coerced {
    pub registry: WorkspaceRegistry,
    pub consumed_keys: Vec<&'static str>,
}

/// Runs the ordered matcher list over the raw stored values.
///
/// Returns `None` when nothing coercible is present (a fresh install, or a
/// registry value from a future format version and left untouched).
pub fn detect(
    registry_raw: Option<&Value>,
    items_raw: Option<&Value>,
    active_raw: Option<&Value>,
) -> Option<LegacyShape> {
    // (a) split legacy keys, only when the registry key is not usable itself
    let registry_usable = matches!(registry_raw, Some(Value::String(_)) | Some(Value::Object(_)));
    if !registry_usable {
        if let Some(items) = items_raw.and_then(parse_items) {
            return Some(LegacyShape::SplitKeys {
                items,
                active_id: active_raw.and_then(Value::as_str).map(str::to_string),
            });
        }
    }

    match registry_raw {
        // (b) bare string at the registry key
        Some(Value::String(active_id)) => Some(LegacyShape::BareActiveId {
            active_id: active_id.clone(),
            items: items_raw.and_then(parse_items),
        }),
        // (c) raw items map with no version wrapper
        Some(value @ Value::Object(map)) if !map.contains_key("version") => {
            parse_items(value).map(|items| LegacyShape::UnversionedItems { items })
        }
        _ => None,
    }
}

impl LegacyShape {
    /// Normalizes this shape into a v1 registry and names the keys consumed.
    pub fn coerce(self) -> Coerced {
        match self {
            LegacyShape::SplitKeys { items, active_id } => {
                let active = active_id
                    .filter(|id| items.contains_key(id))
                    .or_else(|| items.keys().next().cloned())
                    .unwrap_or_default();
                Coerced {
                    registry: WorkspaceRegistry::with_items(active, items),
                    consumed_keys: vec![LEGACY_ITEMS_KEY, LEGACY_ACTIVE_KEY],
                }
            }
            LegacyShape::BareActiveId { active_id, items } => {
                let consumed = if items.is_some() {
                    vec![LEGACY_ITEMS_KEY]
                } else {
                    vec![]
                };
                let mut items = items.unwrap_or_default();
                items.entry(active_id.clone()).or_insert_with(|| {
                    Workspace::new_local(active_id.clone(), DEFAULT_WORKSPACE_NAME)
                });
                Coerced {
                    registry: WorkspaceRegistry::with_items(active_id, items),
                    consumed_keys: consumed,
                }
            }
            LegacyShape::UnversionedItems { items } => {
                let active = items.keys().next().cloned().unwrap_or_default();
                Coerced {
                    registry: WorkspaceRegistry::with_items(active, items),
                    consumed_keys: vec![],
                }
            }
        }
    }
}

/// Lenient parse of a legacy items map.
///
/// Entries that no longer deserialize as a full workspace are rebuilt from
/// their key and whatever `name` survives; an empty or non-object value is
/// not an items map at all.
fn parse_items(value: &Value) -> Option<BTreeMap<String, Workspace>> {
    let map = value.as_object()?;
    if map.is_empty() {
        return None;
    }
    let mut items = BTreeMap::new();
    for (id, raw) in map {
        let workspace = serde_json::from_value::<Workspace>(raw.clone()).unwrap_or_else(|_| {
            let name = raw
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(id)
                .to_string();
            Workspace::new_local(id.clone(), name)
        });
        items.insert(id.clone(), workspace);
    }
    Some(items)
}
