/*!
 * NFO sidecar handling.
 *
 * - `document`: parsing, tag merging and serialization of the XML document
 * - `encoding`: decoding of sidecars written in legacy encodings
 * - `updater`: per-directory load, idempotent insert and commit (or dry run)
 */

pub mod document;
pub mod encoding;
pub mod updater;

pub use document::{Element, NfoDocument, Node, TAG_ELEMENT};
pub use encoding::decode_document;
pub use updater::{SidecarUpdater, TagOutcome};
