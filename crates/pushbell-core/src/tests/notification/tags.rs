use crate::notification::{TagDictionary, format_tags, remove_tags};

/// WHAT: Known tags render as glyphs
/// WHY: Titles show the category glyph
#[test]
fn given_social_tag_when_formatting_then_glyph_replaces_tag() {
    // Given: A dictionary mapping social to a glyph
    let dictionary = TagDictionary::from_pairs([("social", "🍻")]);

    // When: Formatting a tagged message
    let formatted = format_tags("{social} hello", &dictionary);

    // Then: The tag is replaced
    assert_eq!(formatted, "🍻 hello");
}

/// WHAT: Removal strips the tag but keeps surrounding whitespace
/// WHY: Bodies never show braces; trimming is the caller's job
#[test]
fn given_social_tag_when_removing_then_leading_space_is_preserved() {
    let dictionary = TagDictionary::from_pairs([("social", "🍻")]);

    let removed = remove_tags("{social} hello", &dictionary);

    assert_eq!(removed, " hello");
}

/// WHAT: Unknown tags and stray braces pass through
/// WHY: Arbitrary text may contain braces
#[test]
fn given_unknown_tag_and_stray_braces_when_formatting_then_unchanged() {
    // Given: The default dictionary
    let dictionary = TagDictionary::default();

    // When: Formatting text with an unknown tag and unbalanced braces
    let formatted = format_tags("{weather} is {sunny and {video}}", &dictionary);

    // Then: Only the known tag changes
    assert_eq!(formatted, "{weather} is {sunny and 📺}");
    assert_eq!(format_tags("trailing {", &dictionary), "trailing {");
}

/// WHAT: Several tags in one string are all handled
/// WHY: Services may stack categories
#[test]
fn given_multiple_tags_when_formatting_and_removing_then_all_handled() {
    let dictionary = TagDictionary::default();
    let content = "{article}{developer} release notes";

    assert_eq!(format_tags(content, &dictionary), "📰🖥 release notes");
    assert_eq!(remove_tags(content, &dictionary), " release notes");
}
