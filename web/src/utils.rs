/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Three-character counter display, clamped to `-99..=999`.
pub(crate) fn format_for_counter(value: i32) -> String {
    let value = value.clamp(-99, 999);
    if value < 0 {
        format!("-{:02}", -value)
    } else {
        format!("{:03}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_zero_padded() {
        assert_eq!(format_for_counter(0), "000");
        assert_eq!(format_for_counter(7), "007");
        assert_eq!(format_for_counter(40), "040");
        assert_eq!(format_for_counter(999), "999");
    }

    #[test]
    fn counter_clamps_and_shows_negatives() {
        assert_eq!(format_for_counter(1000), "999");
        assert_eq!(format_for_counter(-3), "-03");
        assert_eq!(format_for_counter(-150), "-99");
    }
}
