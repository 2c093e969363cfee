//! Export payloads and writers.
//!
//! Builds the list, per-product, batch and link exports from extracted
//! records and writes them as files under the output directory.

mod affiliate;
mod naming;
mod payload;
mod writer;

pub use affiliate::{
    clean_affiliate_url, estimate_earnings, marketplace_domain, product_checks,
    with_affiliate_tag, ProductChecks,
};
pub use naming::{batch_file_name, links_file_name, list_file_name, product_file_name};
pub use payload::{links_payload, list_payload, product_payload, prune_empty, ListItemExport};
pub use writer::{print_json, write_export, write_json_export};
