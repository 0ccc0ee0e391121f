/*!
 * Image media service
 *
 * Responsibility:
 * - `MediaStore`: the seam to the binary object store (upload bytes, get a
 *   stable URI back). Backends are swappable behind the trait.
 * - `CdnStore`: HTTP upload client against an account/key/secret endpoint.
 * - slot normalization: 0-4 uploaded URIs -> the fixed 4-slot image list.
 */
mod cdn;
mod factory;
mod slots;
mod store;

pub use cdn::CdnStore;
pub use factory::build_media_store;
pub use slots::{MAX_IMAGE_SLOTS, PLACEHOLDER_IMAGE, fill_slots};
pub use store::{MediaError, MediaStore};
