use super::property_tags;

property_tags! {
    /// Word_Break values from UAX #29, Table 3.
    #[allow(clippy::upper_case_acronyms)]
    pub enum WordBreak {
        Other => "Other",
        LF => "LF",
        CR => "CR",
        ALetter => "ALetter",
        Format => "Format",
        Katakana => "Katakana",
        Numeric => "Numeric",
        Extend => "Extend",
        Newline => "Newline",
        ExtendNumLet => "ExtendNumLet",
        RegionalIndicator => "Regional_Indicator",
        HebrewLetter => "Hebrew_Letter",
        SingleQuote => "Single_Quote",
        DoubleQuote => "Double_Quote",
        MidNum => "MidNum",
        MidLetter => "MidLetter",
        MidNumLet => "MidNumLet",
        WSegSpace => "WSegSpace",
        ZWJ => "ZWJ",
    }
}
