use super::*;

fn page(description_inner: &str, icon: Option<&str>) -> String {
    let icon_markup = icon.map_or(String::new(), |href| {
        format!(
            r#"<div class="age-restrictions"><svg class="age-restrictions__icon"><use xlink:href="{href}"></use></svg></div>"#
        )
    });
    format!(
        r#"<html><body><div class="layout"><div class="description">{description_inner}</div>{icon_markup}</div></body></html>"#
    )
}

#[test]
fn missing_icon_defaults_rating() {
    let details = extract_game_details(&page("<p>Hello</p>", None)).unwrap();
    assert_eq!(details.rating, "BR0");
}

#[test]
fn pegi_icon_is_normalized() {
    let details = extract_game_details(&page("<p>Hello</p>", Some("#PEGI_16"))).unwrap();
    assert_eq!(details.rating, "PEGI16");
}

#[test]
fn rating_falls_back_to_plain_href() {
    let html = r##"<div class="description">x</div><span class="age-restrictions__icon"><svg><use href="#ESRB_M"/></svg></span>"##;
    let details = extract_game_details(html).unwrap();
    assert_eq!(details.rating, "ESRBM");
}

#[test]
fn icon_without_reference_defaults_rating() {
    let html = r#"<div class="description">x</div><svg class="age-restrictions__icon"><use></use></svg>"#;
    let details = extract_game_details(html).unwrap();
    assert_eq!(details.rating, "BR0");
}

#[test]
fn banner_and_video_are_stripped() {
    let inner = "\n<div class=\"banner\"><img src=\"promo.jpg\"></div>\n<video loop muted><source src=\"trailer.mp4\"></video>\n<br><br/>\n<p><b>Wild Hunt</b> is a story-driven RPG.</p>\n<div class=\"module\">More</div>";
    let details = extract_game_details(&page(inner, None)).unwrap();
    assert!(
        details.description.starts_with("<p><b>Wild Hunt</b>"),
        "description should start at the first content node, got: {}",
        details.description
    );
    assert!(details.description.contains("<div class=\"module\">More</div>"));
    assert!(!details.description.contains("banner"));
    assert!(!details.description.contains("<video"));
}

#[test]
fn short_description_is_plain_text() {
    let inner = "<p><b>Wild Hunt</b> is a <i>story-driven</i> RPG &amp; more.</p>";
    let details = extract_game_details(&page(inner, None)).unwrap();
    assert_eq!(details.short_description, "Wild Hunt is a story-driven RPG & more.");
    assert!(!details.short_description.contains('<'));
}

#[test]
fn short_description_is_truncated_to_160_chars() {
    let long = "ä".repeat(500);
    let inner = format!("<p>{long}</p>");
    let details = extract_game_details(&page(&inner, None)).unwrap();
    assert_eq!(details.short_description.chars().count(), SHORT_DESCRIPTION_MAX_CHARS);
    assert!(details.short_description.chars().all(|c| c == 'ä'));
}

#[test]
fn short_description_excludes_stripped_banner_text() {
    let inner = "<div class=\"banner\">BUY NOW</div><p>Story</p>";
    let details = extract_game_details(&page(inner, None)).unwrap();
    assert_eq!(details.short_description, "Story");
}

#[test]
fn missing_description_is_an_error() {
    let err = extract_game_details("<html><body><p>nothing</p></body></html>").unwrap_err();
    assert!(
        matches!(err, ScraperError::MissingElement { selector: ".description", .. }),
        "expected MissingElement, got: {err:?}"
    );
}

#[test]
fn unquoted_class_attribute_is_found() {
    let html = "<html><body><div class=description><p>Unquoted markup</p></div></body></html>";
    let details = extract_game_details(html).unwrap();
    assert_eq!(details.description, "<p>Unquoted markup</p>");
    assert_eq!(details.short_description, "Unquoted markup");
}

#[test]
fn markup_inside_script_is_not_an_element() {
    let html = r#"<html><head><script>var tpl = '<div class="description">TEMPLATE</div>';</script></head><body><div class="description"><p>Real story</p></div></body></html>"#;
    let details = extract_game_details(html).unwrap();
    assert_eq!(details.description, "<p>Real story</p>");
    assert!(!details.description.contains("TEMPLATE"));
}

#[test]
fn closing_tag_text_in_script_does_not_truncate_description() {
    let inner = r#"<p>Story</p><script>if (a < b) { x = "</div>"; }</script><p>More story</p>"#;
    let details = extract_game_details(&page(inner, Some("#PEGI_12"))).unwrap();
    assert!(
        details.description.ends_with("<p>More story</p>"),
        "description was cut short: {}",
        details.description
    );
    assert_eq!(details.short_description, "Story More story");
    assert_eq!(details.rating, "PEGI12");
}

#[test]
fn xlink_reference_wins_over_plain_href() {
    let html = r##"<div class="description">x</div><span class="age-restrictions__icon"><use href="#OTHER" xlink:href="#USK_12"></use></span>"##;
    let details = extract_game_details(html).unwrap();
    assert_eq!(details.rating, "USK12");
}
