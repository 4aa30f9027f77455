//! Canonicalisation and ordering of technology labels.
//!
//! The upstream model names technologies and carriers with strings such as
//! `"residential rural ground heat pump"` or `"Offshore Wind (DC)"`. For summary tables these are
//! mapped onto a smaller set of human-facing categories using the tables in a [`RuleSet`], then
//! put into a fixed presentation order for stacked bar charts.
use std::collections::BTreeSet;

/// The tables used to map raw technology labels onto canonical categories.
///
/// Every rule list is applied with a full scan and overwrite-on-match semantics: later entries
/// win over earlier ones, and a value rewritten by one entry can still be matched by a later one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleSet {
    /// Prefixes removed from the start of a label, checked in order
    pub prefixes_to_strip: &'static [&'static str],
    /// If a label contains one of these, the whole label is replaced by it
    pub rename_if_contains: &'static [&'static str],
    /// If a label contains the key, the whole label is replaced by the value
    pub rename_if_contains_map: &'static [(&'static str, &'static str)],
    /// If a label equals the key, it is replaced by the value
    pub rename_exact: &'static [(&'static str, &'static str)],
    /// Presentation order for charts
    pub preferred_order: &'static [&'static str],
    /// Categories which are never shown
    pub excluded: &'static [&'static str],
}

/// The rule set applied to all summary tables
pub const DEFAULT_RULES: RuleSet = RuleSet {
    prefixes_to_strip: &[
        "residential ",
        "services ",
        "urban ",
        "rural ",
        "central ",
        "decentral ",
    ],
    rename_if_contains: &[
        "solid biomass CHP",
        "gas CHP",
        "gas boiler",
        "biogas",
        "solar thermal",
        "air heat pump",
        "ground heat pump",
        "resistive heater",
        "Fischer-Tropsch",
    ],
    rename_if_contains_map: &[
        ("water tanks", "TES"),
        ("retrofitting", "building retrofitting"),
        ("battery", "battery storage"),
    ],
    rename_exact: &[
        ("Solar", "solar PV"),
        ("solar", "solar PV"),
        ("Sabatier", "methanation"),
        ("helmeth", "methanation"),
        ("Offshore Wind (AC)", "offshore wind"),
        ("Offshore Wind (DC)", "offshore wind"),
        ("Onshore Wind", "onshore wind"),
        ("offwind-ac", "offshore wind"),
        ("offwind-dc", "offshore wind"),
        ("Run of River", "hydroelectricity"),
        ("Run of river", "hydroelectricity"),
        ("Reservoir & Dam", "hydroelectricity"),
        ("Pumped Hydro Storage", "hydroelectricity"),
        ("PHS", "hydroelectricity"),
        ("NH3", "ammonia"),
        ("co2 Store", "DAC"),
        ("co2 stored", "CO2 sequestration"),
        ("AC", "transmission lines"),
        ("DC", "transmission lines"),
        ("B2B", "transmission lines"),
        ("solid biomass for industry", "solid biomass"),
        ("solid biomass for industry CC", "solid biomass"),
        ("electricity distribution grid", "distribution lines"),
        ("Open-Cycle Gas", "OCGT"),
        ("gas", "gas storage"),
        ("gas pipeline new", "gas pipeline"),
        ("gas for industry CC", "gas for industry"),
        ("SMR CC", "SMR"),
        ("process emissions CC", "process emissions"),
        ("Battery Storage", "battery storage"),
        ("H2 Store", "H2 storage"),
        ("Hydrogen Storage", "H2 storage"),
        ("co2 sequestered", "CO2 sequestration"),
        ("solid biomass transport", "solid biomass"),
    ],
    preferred_order: &[
        "nuclear",
        "solid biomass",
        "biogas",
        "gas for industry",
        "coal for industry",
        "methanol",
        "oil",
        "coal",
        "shipping oil",
        "shipping methanol",
        "naphtha for industry",
        "land transport oil",
        "kerosene for aviation",
        // networks
        "transmission lines",
        "distribution lines",
        "gas pipeline",
        "H2 pipeline",
        // conversion
        "H2 Electrolysis",
        "H2 Fuel Cell",
        "DAC",
        "Fischer-Tropsch",
        "methanation",
        "BEV charger",
        "V2G",
        "SMR",
        "methanolisation",
        // storage
        "battery storage",
        "gas storage",
        "H2 storage",
        "TES",
        // generation
        "hydroelectricity",
        "OCGT",
        "onshore wind",
        "offshore wind",
        "solar PV",
        "solar thermal",
        "solar rooftop",
        // emissions
        "co2",
        "CO2 sequestration",
        "process emissions",
        // heating
        "gas CHP",
        "solid biomass CHP",
        "resistive heater",
        "air heat pump",
        "ground heat pump",
        "gas boiler",
        "biomass boiler",
        "building retrofitting",
    ],
    excluded: &["gas storage"],
};

impl Default for RuleSet {
    fn default() -> Self {
        DEFAULT_RULES
    }
}

/// Map a raw technology label onto its canonical category.
///
/// The steps are applied in this order, each one scanning its whole list:
///
/// 1. Strip every matching prefix (the value is updated as the scan proceeds)
/// 2. Replace the whole value with any contained substring from `rename_if_contains`
/// 3. Replace the whole value with the mapped value of any contained key of
///    `rename_if_contains_map`
/// 4. Replace the value with the mapped value of an exactly matching key of `rename_exact`
pub fn canonicalize(raw_label: &str, rules: &RuleSet) -> String {
    let mut value = raw_label;
    for &prefix in rules.prefixes_to_strip {
        if let Some(stripped) = value.strip_prefix(prefix) {
            value = stripped;
        }
    }

    for &substring in rules.rename_if_contains {
        if value.contains(substring) {
            value = substring;
        }
    }

    for &(substring, replacement) in rules.rename_if_contains_map {
        if value.contains(substring) {
            value = replacement;
        }
    }

    for &(key, replacement) in rules.rename_exact {
        if value == key {
            value = replacement;
        }
    }

    value.to_string()
}

/// Put a set of canonical labels into presentation order.
///
/// Labels in `rules.preferred_order` come first, in that order, followed by the remaining labels
/// sorted alphabetically. Excluded labels are then removed.
pub fn order_categories<I, S>(present: I, rules: &RuleSet) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let present: BTreeSet<String> = present
        .into_iter()
        .map(|label| label.as_ref().to_string())
        .collect();

    let mut order: Vec<String> = rules
        .preferred_order
        .iter()
        .filter(|label| present.contains(**label))
        .map(|label| (*label).to_string())
        .collect();
    order.extend(
        present
            .iter()
            .filter(|label| !rules.preferred_order.contains(&label.as_str()))
            .cloned(),
    );

    for &excluded in rules.excluded {
        order.retain(|label| label != excluded);
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("residential rural ground heat pump", "ground heat pump")]
    #[case("urban central gas CHP", "gas CHP")]
    #[case("services rural resistive heater", "resistive heater")]
    #[case("urban central water tanks discharger", "TES")]
    #[case("residential rural retrofitting", "building retrofitting")]
    #[case("home battery charger", "battery storage")]
    #[case("H2 Store", "H2 storage")]
    #[case("Offshore Wind (DC)", "offshore wind")]
    #[case("Offshore Wind (AC)", "offshore wind")]
    #[case("AC", "transmission lines")]
    #[case("gas", "gas storage")]
    #[case("Solar", "solar PV")]
    #[case("solar rooftop", "solar rooftop")]
    #[case("urban central solar thermal", "solar thermal")]
    #[case("unknown tech", "unknown tech")]
    fn test_canonicalize(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(canonicalize(raw, &DEFAULT_RULES), expected);
    }

    #[test]
    fn test_canonicalize_deterministic() {
        for (raw, _) in DEFAULT_RULES.rename_exact {
            assert_eq!(
                canonicalize(raw, &DEFAULT_RULES),
                canonicalize(raw, &DEFAULT_RULES)
            );
        }
    }

    #[test]
    fn test_canonicalize_strips_every_matching_prefix() {
        let rules = RuleSet {
            prefixes_to_strip: &["a ", "b ", "a "],
            rename_if_contains: &[],
            rename_if_contains_map: &[],
            rename_exact: &[],
            preferred_order: &[],
            excluded: &[],
        };

        // The scan continues with the updated value, so "a " can be removed twice
        assert_eq!(canonicalize("a b a x", &rules), "x");
        assert_eq!(canonicalize("b a x", &rules), "x");
        assert_eq!(canonicalize("x a ", &rules), "x a ");
    }

    #[test]
    fn test_canonicalize_later_matches_overwrite() {
        let rules = RuleSet {
            prefixes_to_strip: &[],
            rename_if_contains: &["heat pump", "pump"],
            rename_if_contains_map: &[("pump", "heating"), ("heat", "other")],
            rename_exact: &[("other", "misc"), ("misc", "final")],
            preferred_order: &[],
            excluded: &[],
        };

        // "heat pump" -> "pump" -> "heating" -> "other" -> "misc" -> "final"
        assert_eq!(canonicalize("ground heat pump", &rules), "final");
    }

    #[test]
    fn test_canonicalize_prefix_removed() {
        for prefix in DEFAULT_RULES.prefixes_to_strip {
            let raw = format!("{prefix}gas boiler");
            let label = canonicalize(&raw, &DEFAULT_RULES);
            assert!(!label.starts_with(prefix));
            assert_eq!(label, "gas boiler");
        }
    }

    #[test]
    fn test_order_categories() {
        assert_eq!(
            order_categories(["solar PV", "unknown tech", "onshore wind"], &DEFAULT_RULES),
            ["onshore wind", "solar PV", "unknown tech"]
        );
    }

    #[test]
    fn test_order_categories_excluded() {
        assert_eq!(
            order_categories(["gas storage", "zzz", "aaa", "TES"], &DEFAULT_RULES),
            ["TES", "aaa", "zzz"]
        );

        // Excluded label absent: nothing to do
        assert_eq!(order_categories(["TES"], &DEFAULT_RULES), ["TES"]);
    }

    #[test]
    fn test_order_categories_permutation() {
        let present = ["OCGT", "gas storage", "nuclear", "foo", "bar", "gas CHP"];
        let order = order_categories(present, &DEFAULT_RULES);

        // Same labels, minus the excluded one
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(sorted, ["OCGT", "bar", "foo", "gas CHP", "nuclear"]);

        // Preferred labels first, in preferred order
        assert_eq!(order[..3], ["nuclear", "OCGT", "gas CHP"]);
    }

    #[test]
    fn test_order_categories_duplicates() {
        assert_eq!(
            order_categories(["TES", "TES", "x", "x"], &DEFAULT_RULES),
            ["TES", "x"]
        );
    }
}
