//! Image slot normalization.
//!
//! A product always carries exactly `MAX_IMAGE_SLOTS` image slots, however
//! many files were attached (0-4; extras are ignored at the upload boundary).
//! Slot 0 falls back to the placeholder URI, slots 1-3 fall back to "".

pub const MAX_IMAGE_SLOTS: usize = 4;

/// Shown when a product was created without a primary image.
pub const PLACEHOLDER_IMAGE: &str = "/uploads/not_available.jpg";

/// Fill the fixed slot list from uploaded URIs, in upload order.
pub fn fill_slots(uploaded: Vec<String>) -> [String; MAX_IMAGE_SLOTS] {
    let mut slots = [
        PLACEHOLDER_IMAGE.to_string(),
        String::new(),
        String::new(),
        String::new(),
    ];
    for (slot, url) in slots.iter_mut().zip(uploaded) {
        *slot = url;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::{MAX_IMAGE_SLOTS, PLACEHOLDER_IMAGE, fill_slots};

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://media.test/u/{i}.jpg")).collect()
    }

    #[test]
    fn no_files_yields_placeholder_and_empties() {
        let slots = fill_slots(Vec::new());
        assert_eq!(slots.len(), MAX_IMAGE_SLOTS);
        assert_eq!(slots[0], PLACEHOLDER_IMAGE);
        assert_eq!(&slots[1..], ["", "", ""]);
    }

    #[test]
    fn one_file_fills_slot_zero_only() {
        let slots = fill_slots(urls(1));
        assert_eq!(slots[0], "https://media.test/u/0.jpg");
        assert_eq!(&slots[1..], ["", "", ""]);
    }

    #[test]
    fn four_files_fill_all_slots_in_order() {
        let slots = fill_slots(urls(4));
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot, &format!("https://media.test/u/{i}.jpg"));
        }
    }

    #[test]
    fn extra_files_are_ignored() {
        let slots = fill_slots(urls(7));
        assert_eq!(slots.len(), MAX_IMAGE_SLOTS);
        assert_eq!(slots[3], "https://media.test/u/3.jpg");
    }
}
