//! Showdown identifier normalisation

/// Convert a display name to a Showdown id ("Necrozma-Dusk-Mane" -> "necrozmaduskmane")
pub fn to_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_id() {
        assert_eq!(to_id("Necrozma-Dusk-Mane"), "necrozmaduskmane");
        assert_eq!(to_id("Knock Off"), "knockoff");
        assert_eq!(to_id("U-turn"), "uturn");
        assert_eq!(to_id("Farfetch’d"), "farfetchd");
        assert_eq!(to_id("already"), "already");
        assert_eq!(to_id(""), "");
    }
}
