//! URL slug derivation for reference entities and storefront pages.

/// Derives a lowercase, URL-safe slug from a display name.
///
/// Latin accented letters are folded to ASCII and common symbols are spelled
/// out in place (`&` becomes `and`, `™` becomes `tm`). Whitespace and hyphen
/// runs collapse into a single hyphen. Any other character, including
/// punctuation such as `.` or `_`, is dropped without leaving a separator.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            pending_separator = true;
            continue;
        }

        let folded = fold(c);
        if folded.is_none() && !c.is_ascii_alphanumeric() {
            continue;
        }

        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        match folded {
            Some(text) => slug.push_str(text),
            None => slug.push(c),
        }
    }

    slug
}

/// ASCII replacement for a lowercased non-ASCII letter or a spelled-out symbol.
fn fold(c: char) -> Option<&'static str> {
    let text = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ą' | 'ª' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' | '©' => "c",
        'đ' | 'ď' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' | 'º' => "o",
        'œ' => "oe",
        'ř' | '®' => "r",
        'ś' | 'š' => "s",
        'ß' => "ss",
        'ť' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        '&' => "and",
        '|' => "or",
        '$' => "dollar",
        '%' => "percent",
        '<' => "less",
        '>' => "greater",
        '¢' => "cent",
        '£' => "pound",
        '¤' => "currency",
        '¥' => "yen",
        '€' => "euro",
        '™' => "tm",
        '℠' => "sm",
        '∑' => "sum",
        '∞' => "infinity",
        '♥' => "love",
        _ => return None,
    };
    Some(text)
}

/// Converts a catalog slug into the storefront page slug: hyphens become
/// underscores and the result is lowercased.
#[must_use]
pub fn storefront_slug(slug: &str) -> String {
    slug.replace('-', "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_simple_name() {
        assert_eq!(slugify("CD PROJEKT RED"), "cd-projekt-red");
    }

    #[test]
    fn slug_drops_apostrophes() {
        assert_eq!(slugify("Uncle Arnie's"), "uncle-arnies");
    }

    #[test]
    fn slug_folds_accents() {
        assert_eq!(slugify("Ubisoft Montréal"), "ubisoft-montreal");
        assert_eq!(slugify("Señorita"), "senorita");
    }

    #[test]
    fn slug_collapses_separator_runs() {
        assert_eq!(slugify("Role-playing  /  Strategy"), "role-playing-strategy");
        assert_eq!(slugify("  Linux  "), "linux");
        assert_eq!(slugify("--Indie--"), "indie");
    }

    #[test]
    fn slug_drops_punctuation_inside_words() {
        assert_eq!(slugify("S.T.A.L.K.E.R."), "stalker");
        assert_eq!(slugify("Role_playing"), "roleplaying");
        assert_eq!(slugify("Point/Click"), "pointclick");
    }

    #[test]
    fn slug_spells_out_ampersand() {
        assert_eq!(slugify("Hack & Slash"), "hack-and-slash");
        assert_eq!(slugify("Hack&Slash"), "hackandslash");
    }

    #[test]
    fn slug_spells_out_symbols() {
        assert_eq!(slugify("Bethesda Softworks™"), "bethesda-softworkstm");
        assert_eq!(slugify("Rock | Paper"), "rock-or-paper");
        assert_eq!(slugify("100% Orange Juice"), "100percent-orange-juice");
        assert_eq!(slugify("Big $ Games"), "big-dollar-games");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slug_of_unmapped_script_is_empty() {
        assert_eq!(slugify("ウィッチャー"), "");
        assert_eq!(slugify("Ведьмак 3"), "3");
    }

    #[test]
    fn slug_keeps_digits() {
        assert_eq!(slugify("11 bit studios"), "11-bit-studios");
    }

    #[test]
    fn storefront_slug_uses_underscores() {
        assert_eq!(storefront_slug("the-witcher-3-wild-hunt"), "the_witcher_3_wild_hunt");
        assert_eq!(storefront_slug("Baldurs-Gate"), "baldurs_gate");
    }
}
