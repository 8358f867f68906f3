//! Identifier normalization for tree fragments.

/// Fragments kept verbatim: they structure the tree rather than name parameters.
pub const STRUCTURAL_MARKERS: &[&str] = &[
    "RENAME", "TRANCHE", "TYPE", "SEUIL", "MONTANT", "TAUX", "ASSIETTE",
];

/// Slug of a tree fragment, structural markers excepted.
pub fn normalize_fragment(fragment: &str) -> String {
    if STRUCTURAL_MARKERS.contains(&fragment) {
        fragment.to_string()
    } else {
        slugify(fragment)
    }
}

/// Lower-case ASCII slug with `_` between words.
///
/// Accented Latin letters are folded to their base letter; any other
/// character separates words.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        let mut buf = [0u8; 4];
        let folded = match ch {
            'a'..='z' | '0'..='9' => Some(&*ch.encode_utf8(&mut buf)),
            other => fold_accent(other),
        };
        match folded {
            Some(ascii) => {
                if pending_separator && !slug.is_empty() {
                    slug.push('_');
                }
                pending_separator = false;
                slug.push_str(ascii);
            }
            None => pending_separator = true,
        }
    }
    slug
}

fn fold_accent(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}
