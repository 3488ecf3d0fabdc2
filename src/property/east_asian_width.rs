use super::property_tags;

property_tags! {
    /// East_Asian_Width values from UAX #11. `Neutral` comes first so it is
    /// the fallback for unlisted code points.
    pub enum EastAsianWidth {
        Neutral => "N",
        Ambiguous => "A",
        Fullwidth => "F",
        Halfwidth => "H",
        Narrow => "Na",
        Wide => "W",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyTag;

    #[test]
    fn neutral_is_first() {
        assert_eq!(EastAsianWidth::Neutral as u8, 0);
        assert_eq!(EastAsianWidth::from_name("Na"), Some(EastAsianWidth::Narrow));
        assert_eq!(EastAsianWidth::from_name("Narrow"), None);
    }
}
