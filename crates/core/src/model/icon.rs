/// Icon used for any topic title without a dedicated icon.
pub const GENERIC_ICON: &str = "photo";

const TOPIC_ICONS: &[(&str, &str)] = &[
    ("Mathematics", "math_icon"),
    ("Marvel Super Heroes", "heroes_icon"),
    ("Science", "science_icon"),
];

/// Icon identifier for a topic title.
///
/// Matching is exact and case-sensitive.
#[must_use]
pub fn icon_for_title(title: &str) -> &'static str {
    TOPIC_ICONS
        .iter()
        .find(|(known, _)| *known == title)
        .map_or(GENERIC_ICON, |(_, icon)| icon)
}
