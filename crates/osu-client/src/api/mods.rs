//! Legacy mod bitflag naming.

/// Bit values and acronyms in display order.
const MODS: &[(u32, &str)] = &[
    (1 << 0, "NF"),
    (1 << 1, "EZ"),
    (1 << 2, "TD"),
    (1 << 3, "HD"),
    (1 << 4, "HR"),
    (1 << 5, "SD"),
    (1 << 6, "DT"),
    (1 << 7, "RX"),
    (1 << 8, "HT"),
    (1 << 9, "NC"),
    (1 << 10, "FL"),
    (1 << 11, "AT"),
    (1 << 12, "SO"),
    (1 << 13, "AP"),
    (1 << 14, "PF"),
    (1 << 15, "4K"),
    (1 << 16, "5K"),
    (1 << 17, "6K"),
    (1 << 18, "7K"),
    (1 << 19, "8K"),
    (1 << 20, "FI"),
    (1 << 21, "RD"),
    (1 << 22, "CN"),
    (1 << 23, "TP"),
    (1 << 24, "9K"),
    (1 << 25, "CO"),
    (1 << 26, "1K"),
    (1 << 27, "3K"),
    (1 << 28, "2K"),
    (1 << 29, "V2"),
    (1 << 30, "MR"),
];

const DT: u32 = 1 << 6;
const NC: u32 = 1 << 9;
const SD: u32 = 1 << 5;
const PF: u32 = 1 << 14;

/// Acronyms for a legacy mod bitmask.
///
/// Implied mods are dropped: `NC` hides `DT` and `PF` hides `SD`.
pub fn mod_acronyms(bits: u32) -> Vec<&'static str> {
    let mut bits = bits;
    if bits & NC != 0 {
        bits &= !DT;
    }
    if bits & PF != 0 {
        bits &= !SD;
    }

    MODS.iter()
        .filter(|(bit, _)| bits & bit != 0)
        .map(|(_, name)| *name)
        .collect()
}

/// Concatenated acronyms, `NM` when no mod is set.
pub fn mod_name(bits: u32) -> String {
    let acronyms = mod_acronyms(bits);
    if acronyms.is_empty() {
        "NM".into()
    } else {
        acronyms.concat()
    }
}
