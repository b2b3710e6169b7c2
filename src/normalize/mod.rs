//! Response normalization.
//!
//! The backend does not commit to one list envelope. Records may come back
//! as a bare array or under `data`, `results`, `items`, `records` or a
//! resource-named key, and pagination metadata may sit in `pagination`,
//! `meta`, `paging` or directly on the root. A [`ListShape`] names the keys
//! to probe for one resource, and a [`Normalizer`] applies it.

pub mod pagination;

pub use pagination::{PageState, PaginationDescriptor};

use log::warn;
use pagination::{
    PAGE_KEYS, PAGE_SIZE_KEYS, ROOT_TOTAL_KEYS, TOTAL_ITEMS_KEYS, TOTAL_PAGES_KEYS, number_at,
    non_negative_u64, pages_for, positive_u32,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Where one resource keeps its records and its pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListShape {
    pub resource: &'static str,
    /// Probed in order, first array wins.
    pub containers: &'static [&'static str],
    /// Probed in order, first object wins; the root is used when none exists.
    pub scopes: &'static [&'static str],
}

pub const POLLS: ListShape = ListShape {
    resource: "polls",
    containers: &["data", "results", "polls", "items", "records"],
    scopes: &["pagination", "meta"],
};

pub const SHEETS: ListShape = ListShape {
    resource: "sheets",
    containers: &["data", "results", "sheets", "items", "records"],
    scopes: &["pagination", "meta"],
};

pub const ADMIN_USERS: ListShape = ListShape {
    resource: "users",
    containers: &["data", "results", "users", "items", "records"],
    scopes: &["pagination", "meta", "paging"],
};

pub const NOTIFICATIONS: ListShape = ListShape {
    resource: "notifications",
    containers: &["data", "results", "notifications", "items"],
    scopes: &["pagination", "meta"],
};

#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    shape: ListShape,
}

impl Normalizer {
    pub const fn new(shape: ListShape) -> Self {
        Self { shape }
    }

    pub fn shape(&self) -> &ListShape {
        &self.shape
    }

    /// The record array in server order, or an empty slice when the body
    /// holds none.
    pub fn raw_records<'a>(&self, body: &'a Value) -> &'a [Value] {
        if let Some(list) = body.as_array() {
            return list;
        }

        let Some(root) = body.as_object() else {
            return &[];
        };

        self.shape
            .containers
            .iter()
            .find_map(|key| root.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Typed records. Elements that do not fit `T` are skipped.
    pub fn records<T: DeserializeOwned>(&self, body: &Value) -> Vec<T> {
        self.raw_records(body)
            .iter()
            .enumerate()
            .filter_map(|(idx, raw)| match T::deserialize(raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(
                        "Skipping malformed {} record at position {}: {}",
                        self.shape.resource, idx, e
                    );
                    None
                }
            })
            .collect()
    }

    pub fn pagination(&self, body: &Value, fallback_page_size: Option<u32>) -> PaginationDescriptor {
        let fallback_page_size = fallback_page_size.filter(|s| *s > 0);

        let Some(root) = body.as_object() else {
            return PaginationDescriptor {
                page_size: fallback_page_size,
                ..Default::default()
            };
        };

        let scope = self
            .shape
            .scopes
            .iter()
            .find_map(|key| root.get(*key).and_then(Value::as_object))
            .unwrap_or(root);

        let page = positive_u32(number_at(scope, PAGE_KEYS));
        let page_size = positive_u32(number_at(scope, PAGE_SIZE_KEYS)).or(fallback_page_size);
        let total_items = non_negative_u64(
            number_at(scope, TOTAL_ITEMS_KEYS).or_else(|| number_at(root, ROOT_TOTAL_KEYS)),
        );

        let mut total_pages = positive_u32(number_at(scope, TOTAL_PAGES_KEYS));
        if total_pages.is_none() {
            if let (Some(items), Some(size)) = (total_items, page_size) {
                total_pages = Some(pages_for(items, size));
            }
        }

        PaginationDescriptor {
            page,
            page_size,
            total_pages: total_pages.map(|t| t.max(1)),
            total_items,
        }
    }
}
